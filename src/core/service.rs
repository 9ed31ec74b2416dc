//! Flight CRUD on top of a [`FlightStore`].
//!
//! Every mutation of a flight runs read, allocate and write back while
//! holding that flight code's lock, so two requests against the same flight
//! never allocate from the same stale passenger list.

use crate::core::allocation::allocate;
use crate::domain::model::{Allocation, Flight, FlightUpdate, NewFlight, Passenger};
use crate::domain::ports::FlightStore;
use crate::utils::error::{ManifestError, Result};
use crate::utils::validation::Validate;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct FlightService<S: FlightStore> {
    store: S,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: FlightStore> FlightService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn flight_lock(&self, flight_code: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(flight_code.to_string()).or_default().clone()
    }

    /// Drops the map entry once no other task holds or waits on the lock.
    /// Clones are only handed out under the map lock, so the count cannot
    /// grow while it is checked.
    async fn release_lock(&self, flight_code: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        if Arc::strong_count(&lock) == 2 {
            locks.remove(flight_code);
        }
    }

    #[cfg(test)]
    async fn tracked_locks(&self) -> usize {
        self.locks.lock().await.len()
    }

    async fn load(&self, flight_code: &str) -> Result<Flight> {
        self.store
            .find_by_code(flight_code)
            .await?
            .ok_or_else(|| ManifestError::FlightNotFound {
                flight_code: flight_code.to_string(),
            })
    }

    pub async fn list_flights(&self) -> Result<Vec<Flight>> {
        self.store.list().await
    }

    pub async fn get_flight(&self, flight_code: &str) -> Result<Flight> {
        self.load(flight_code).await
    }

    /// Recomputes the boarded / waitlisted split of a stored flight.
    pub async fn allocation(&self, flight_code: &str) -> Result<Allocation> {
        let flight = self.load(flight_code).await?;
        allocate(&flight.passengers, flight.capacity)
    }

    pub async fn create_flight(&self, request: NewFlight) -> Result<(Flight, Allocation)> {
        request.validate()?;

        let flight_code = request.flight_code.clone();
        let lock = self.flight_lock(&flight_code).await;
        let result = {
            let _guard = lock.lock().await;
            self.insert_allocated(request).await
        };
        self.release_lock(&flight_code, lock).await;
        result
    }

    async fn insert_allocated(&self, request: NewFlight) -> Result<(Flight, Allocation)> {
        let mut passengers = request.passengers;
        let allocation = allocate(&passengers, request.capacity)?;
        allocation.apply_to(&mut passengers);

        let now = Utc::now();
        let flight = Flight {
            flight_code: request.flight_code,
            capacity: request.capacity,
            passengers,
            created_at: now,
            updated_at: now,
        };
        self.store.insert(flight.clone()).await?;

        tracing::info!(
            flight_code = %flight.flight_code,
            boarded = allocation.boarded_passengers.len(),
            waitlisted = allocation.passengers_on_waiting_list.len(),
            "Flight created"
        );
        Ok((flight, allocation))
    }

    pub async fn update_flight(
        &self,
        flight_code: &str,
        update: FlightUpdate,
    ) -> Result<(Flight, Allocation)> {
        update.validate()?;

        self.mutate(flight_code, "Flight updated", move |flight| {
            if let Some(capacity) = update.capacity {
                flight.capacity = capacity;
            }
            if let Some(passengers) = update.passengers {
                flight.passengers = passengers;
            }
            Ok(())
        })
        .await
    }

    pub async fn delete_flight(&self, flight_code: &str) -> Result<Flight> {
        let lock = self.flight_lock(flight_code).await;
        let result = {
            let _guard = lock.lock().await;
            self.store.delete(flight_code).await
        };
        self.release_lock(flight_code, lock).await;
        let deleted = result?;

        tracing::info!(flight_code = %flight_code, "Flight deleted");
        Ok(deleted)
    }

    /// Appends a passenger and reallocates the whole manifest.
    pub async fn add_passenger(
        &self,
        flight_code: &str,
        passenger: Passenger,
    ) -> Result<(Flight, Allocation)> {
        passenger.validate()?;

        self.mutate(flight_code, "Passenger added", move |flight| {
            if flight.passenger(passenger.id).is_some() {
                return Err(ManifestError::DuplicatePassengerId { id: passenger.id });
            }
            flight.passengers.push(passenger);
            Ok(())
        })
        .await
    }

    /// Removes a passenger; a waitlisted passenger may take the freed seat.
    pub async fn remove_passenger(
        &self,
        flight_code: &str,
        passenger_id: i64,
    ) -> Result<(Flight, Allocation)> {
        self.mutate(flight_code, "Passenger removed", move |flight| {
            let before = flight.passengers.len();
            flight.passengers.retain(|p| p.id != passenger_id);
            if flight.passengers.len() == before {
                return Err(ManifestError::PassengerNotFound {
                    flight_code: flight.flight_code.clone(),
                    passenger_id,
                });
            }
            Ok(())
        })
        .await
    }

    async fn mutate<F>(
        &self,
        flight_code: &str,
        action: &'static str,
        change: F,
    ) -> Result<(Flight, Allocation)>
    where
        F: FnOnce(&mut Flight) -> Result<()>,
    {
        let lock = self.flight_lock(flight_code).await;
        let result = {
            let _guard = lock.lock().await;
            self.update_allocated(flight_code, action, change).await
        };
        self.release_lock(flight_code, lock).await;
        result
    }

    async fn update_allocated<F>(
        &self,
        flight_code: &str,
        action: &'static str,
        change: F,
    ) -> Result<(Flight, Allocation)>
    where
        F: FnOnce(&mut Flight) -> Result<()>,
    {
        let mut flight = self.load(flight_code).await?;
        change(&mut flight)?;

        let allocation = allocate(&flight.passengers, flight.capacity)?;
        allocation.apply_to(&mut flight.passengers);
        flight.updated_at = Utc::now();
        self.store.update(flight.clone()).await?;

        tracing::info!(
            flight_code = %flight.flight_code,
            boarded = allocation.boarded_passengers.len(),
            waitlisted = allocation.passengers_on_waiting_list.len(),
            "{}",
            action
        );
        Ok((flight, allocation))
    }
}
