use async_trait::async_trait;
use flight_manifest::core::FlightStore;
use flight_manifest::{
    Category, Flight, FlightService, FlightUpdate, InMemoryFlightStore, ManifestError, NewFlight,
    Passenger,
};
use std::sync::Arc;
use std::time::Duration;

fn passenger(id: i64, category: Category, reservation: &str) -> Passenger {
    Passenger {
        id,
        name: format!("Passenger {}", id),
        age: 35,
        category,
        reservation_id: reservation.to_string(),
        has_connections: false,
        has_checked_baggage: false,
        boarded: false,
    }
}

fn new_flight(code: &str, capacity: i64, passengers: Vec<Passenger>) -> NewFlight {
    NewFlight {
        flight_code: code.to_string(),
        capacity,
        passengers,
    }
}

fn boarded_ids(flight: &Flight) -> Vec<i64> {
    flight
        .passengers
        .iter()
        .filter(|p| p.boarded)
        .map(|p| p.id)
        .collect()
}

#[tokio::test]
async fn test_create_flight_allocates_and_stores_in_request_order() {
    let service = FlightService::new(InMemoryFlightStore::new());

    let (flight, allocation) = service
        .create_flight(new_flight(
            "IB0001",
            1,
            vec![
                passenger(1, Category::Normal, "A"),
                passenger(2, Category::Black, "B"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(allocation.boarded_passengers[0].id, 2);
    assert_eq!(allocation.passengers_on_waiting_list[0].id, 1);

    let stored = service.get_flight("IB0001").await.unwrap();
    assert_eq!(stored, flight);
    let order: Vec<i64> = stored.passengers.iter().map(|p| p.id).collect();
    assert_eq!(order, vec![1, 2]);
    assert_eq!(boarded_ids(&stored), vec![2]);
}

#[tokio::test]
async fn test_create_rejects_invalid_requests_without_storing() {
    let service = FlightService::new(InMemoryFlightStore::new());

    let duplicate = new_flight(
        "VY0100",
        5,
        vec![
            passenger(1, Category::Gold, "A"),
            passenger(1, Category::Gold, "B"),
        ],
    );
    assert!(matches!(
        service.create_flight(duplicate).await,
        Err(ManifestError::DuplicatePassengerId { id: 1 })
    ));

    let negative = new_flight("VY0101", -2, vec![]);
    assert!(matches!(
        service.create_flight(negative).await,
        Err(ManifestError::InvalidCapacity { capacity: -2 })
    ));

    assert!(service.list_flights().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_rejects_duplicate_flight_code() {
    let service = FlightService::new(InMemoryFlightStore::new());
    service
        .create_flight(new_flight("FR2000", 2, vec![]))
        .await
        .unwrap();

    let err = service
        .create_flight(new_flight("FR2000", 4, vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, ManifestError::DuplicateFlightCode { .. }));
}

#[tokio::test]
async fn test_add_passenger_reallocates_by_tier() {
    let service = FlightService::new(InMemoryFlightStore::new());
    service
        .create_flight(new_flight(
            "UX3000",
            1,
            vec![passenger(1, Category::Gold, "A")],
        ))
        .await
        .unwrap();

    let (flight, allocation) = service
        .add_passenger("UX3000", passenger(2, Category::Platinum, "B"))
        .await
        .unwrap();

    assert_eq!(boarded_ids(&flight), vec![2]);
    assert_eq!(allocation.passengers_on_waiting_list.len(), 1);
    assert_eq!(flight.passengers.len(), 2);
    assert!(flight.updated_at >= flight.created_at);
}

#[tokio::test]
async fn test_add_passenger_with_existing_id_fails() {
    let service = FlightService::new(InMemoryFlightStore::new());
    service
        .create_flight(new_flight(
            "LA4000",
            3,
            vec![passenger(1, Category::Gold, "A")],
        ))
        .await
        .unwrap();

    let err = service
        .add_passenger("LA4000", passenger(1, Category::Black, "Z"))
        .await
        .unwrap_err();
    assert!(matches!(err, ManifestError::DuplicatePassengerId { id: 1 }));

    let stored = service.get_flight("LA4000").await.unwrap();
    assert_eq!(stored.passengers.len(), 1);
}

#[tokio::test]
async fn test_remove_passenger_frees_seat_for_waitlist() {
    let service = FlightService::new(InMemoryFlightStore::new());
    service
        .create_flight(new_flight(
            "AV5000",
            1,
            vec![
                passenger(1, Category::Black, "A"),
                passenger(2, Category::Normal, "B"),
            ],
        ))
        .await
        .unwrap();

    let (flight, allocation) = service.remove_passenger("AV5000", 1).await.unwrap();
    assert_eq!(boarded_ids(&flight), vec![2]);
    assert!(allocation.passengers_on_waiting_list.is_empty());

    let err = service.remove_passenger("AV5000", 99).await.unwrap_err();
    assert!(matches!(
        err,
        ManifestError::PassengerNotFound {
            passenger_id: 99,
            ..
        }
    ));
}

#[tokio::test]
async fn test_update_capacity_keeps_flight_code() {
    let service = FlightService::new(InMemoryFlightStore::new());
    service
        .create_flight(new_flight(
            "AM6000",
            0,
            vec![
                passenger(1, Category::Normal, "A"),
                passenger(2, Category::Gold, "A"),
            ],
        ))
        .await
        .unwrap();

    let (flight, _) = service
        .update_flight(
            "AM6000",
            FlightUpdate {
                capacity: Some(2),
                passengers: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(flight.flight_code, "AM6000");
    assert_eq!(flight.capacity, 2);
    assert_eq!(boarded_ids(&flight), vec![1, 2]);

    let allocation = service.allocation("AM6000").await.unwrap();
    assert_eq!(allocation.boarded_passengers.len(), 2);
}

#[tokio::test]
async fn test_update_replaces_passenger_list() {
    let service = FlightService::new(InMemoryFlightStore::new());
    service
        .create_flight(new_flight("IB7000", 1, vec![passenger(1, Category::Black, "A")]))
        .await
        .unwrap();

    let (flight, _) = service
        .update_flight(
            "IB7000",
            FlightUpdate {
                capacity: None,
                passengers: Some(vec![
                    passenger(5, Category::Gold, "Q"),
                    passenger(6, Category::Platinum, "R"),
                ]),
            },
        )
        .await
        .unwrap();

    assert_eq!(boarded_ids(&flight), vec![6]);
}

#[tokio::test]
async fn test_missing_flight_operations() {
    let service = FlightService::new(InMemoryFlightStore::new());

    assert!(matches!(
        service.get_flight("XX0000").await,
        Err(ManifestError::FlightNotFound { .. })
    ));
    assert!(matches!(
        service
            .add_passenger("XX0000", passenger(1, Category::Gold, "A"))
            .await,
        Err(ManifestError::FlightNotFound { .. })
    ));
    assert!(matches!(
        service.delete_flight("XX0000").await,
        Err(ManifestError::FlightNotFound { .. })
    ));
}

#[tokio::test]
async fn test_delete_flight() {
    let service = FlightService::new(InMemoryFlightStore::new());
    service
        .create_flight(new_flight("VY8000", 2, vec![]))
        .await
        .unwrap();

    let deleted = service.delete_flight("VY8000").await.unwrap();
    assert_eq!(deleted.flight_code, "VY8000");
    assert!(service.list_flights().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_never_overbook_or_lose_passengers() {
    let service = Arc::new(FlightService::new(InMemoryFlightStore::new()));
    service
        .create_flight(new_flight("FR9000", 5, vec![]))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for id in 1..=40 {
        let service = Arc::clone(&service);
        let category = Category::ALL[(id % 4) as usize];
        handles.push(tokio::spawn(async move {
            service
                .add_passenger("FR9000", passenger(id, category, &format!("R{}", id % 9)))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let flight = service.get_flight("FR9000").await.unwrap();
    assert_eq!(flight.passengers.len(), 40);
    assert_eq!(flight.boarded_count(), 5);
}

/// Store that yields for a while on every access so overlapping requests
/// interleave the way they would against a remote database.
struct SlowStore {
    inner: InMemoryFlightStore,
    delay: Duration,
}

#[async_trait]
impl FlightStore for SlowStore {
    async fn list(&self) -> flight_manifest::Result<Vec<Flight>> {
        self.inner.list().await
    }

    async fn find_by_code(&self, flight_code: &str) -> flight_manifest::Result<Option<Flight>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_code(flight_code).await
    }

    async fn insert(&self, flight: Flight) -> flight_manifest::Result<()> {
        self.inner.insert(flight).await
    }

    async fn update(&self, flight: Flight) -> flight_manifest::Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.update(flight).await
    }

    async fn delete(&self, flight_code: &str) -> flight_manifest::Result<Flight> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(flight_code).await
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_recreated_flight_keeps_adds_serialized() {
    let service = Arc::new(FlightService::new(SlowStore {
        inner: InMemoryFlightStore::new(),
        delay: Duration::from_millis(60),
    }));
    service
        .create_flight(new_flight("IB0500", 5, vec![]))
        .await
        .unwrap();

    let deleter = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.delete_flight("IB0500").await })
    };
    tokio::time::sleep(Duration::from_millis(15)).await;

    let first_add = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .add_passenger("IB0500", passenger(1, Category::Gold, "A"))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(15)).await;

    let recreate = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.create_flight(new_flight("IB0500", 5, vec![])).await })
    };
    tokio::time::sleep(Duration::from_millis(15)).await;

    let second_add = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .add_passenger("IB0500", passenger(2, Category::Gold, "B"))
                .await
        })
    };

    deleter.await.unwrap().unwrap();
    recreate.await.unwrap().unwrap();
    let outcomes = [
        (1, first_add.await.unwrap().is_ok()),
        (2, second_add.await.unwrap().is_ok()),
    ];

    let flight = service.get_flight("IB0500").await.unwrap();
    for (id, added) in outcomes {
        assert_eq!(
            flight.passenger(id).is_some(),
            added,
            "passenger {} stored state disagrees with add result",
            id
        );
    }
    assert!(outcomes.iter().any(|(_, added)| *added));
}
