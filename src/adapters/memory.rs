use crate::domain::model::Flight;
use crate::domain::ports::FlightStore;
use crate::utils::error::{ManifestError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Flight store held in process memory, listed in flight-code order.
#[derive(Debug, Default)]
pub struct InMemoryFlightStore {
    flights: RwLock<BTreeMap<String, Flight>>,
}

impl InMemoryFlightStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlightStore for InMemoryFlightStore {
    async fn list(&self) -> Result<Vec<Flight>> {
        Ok(self.flights.read().await.values().cloned().collect())
    }

    async fn find_by_code(&self, flight_code: &str) -> Result<Option<Flight>> {
        Ok(self.flights.read().await.get(flight_code).cloned())
    }

    async fn insert(&self, flight: Flight) -> Result<()> {
        let mut flights = self.flights.write().await;
        if flights.contains_key(&flight.flight_code) {
            return Err(ManifestError::DuplicateFlightCode {
                flight_code: flight.flight_code,
            });
        }
        flights.insert(flight.flight_code.clone(), flight);
        Ok(())
    }

    async fn update(&self, flight: Flight) -> Result<()> {
        let mut flights = self.flights.write().await;
        match flights.get_mut(&flight.flight_code) {
            Some(existing) => {
                *existing = flight;
                Ok(())
            }
            None => Err(ManifestError::FlightNotFound {
                flight_code: flight.flight_code,
            }),
        }
    }

    async fn delete(&self, flight_code: &str) -> Result<Flight> {
        self.flights
            .write()
            .await
            .remove(flight_code)
            .ok_or_else(|| ManifestError::FlightNotFound {
                flight_code: flight_code.to_string(),
            })
    }
}
