use crate::domain::model::{NewFlight, Passenger};
use crate::utils::error::{ManifestError, Result};
use crate::utils::validation::{validate_capacity, validate_positive_number};
use rand::Rng;
use std::collections::HashSet;

pub const AIRLINES: [&str; 7] = ["IB", "VY", "FR", "UX", "LA", "AV", "AM"];
const FLIGHT_NUMBERS: u32 = 9999;

/// Number of distinct codes [`generate_flight_code`] can produce.
pub const MAX_FLIGHT_CODES: usize = AIRLINES.len() * FLIGHT_NUMBERS as usize;

pub fn generate_flight_code<R: Rng>(rng: &mut R) -> String {
    let airline = AIRLINES[rng.random_range(0..AIRLINES.len())];
    let number: u32 = rng.random_range(0..FLIGHT_NUMBERS);
    format!("{}{:04}", airline, number)
}

/// Splits passengers into consecutive chunks of `ceil(n / num_flights)`, one
/// flight per non-empty chunk, each with a distinct generated code.
pub fn distribute_passengers<R: Rng>(
    passengers: Vec<Passenger>,
    num_flights: usize,
    capacity: i64,
    rng: &mut R,
) -> Result<Vec<NewFlight>> {
    validate_positive_number("num_flights", num_flights, 1)?;
    validate_capacity(capacity)?;
    if num_flights > MAX_FLIGHT_CODES {
        return Err(ManifestError::ValidationError {
            message: format!(
                "num_flights {} exceeds the {} available flight codes",
                num_flights, MAX_FLIGHT_CODES
            ),
        });
    }

    let per_flight = passengers.len().div_ceil(num_flights).max(1);
    let mut used_codes = HashSet::new();
    let mut flights = Vec::new();

    for chunk in passengers.chunks(per_flight).take(num_flights) {
        let flight_code = loop {
            let code = generate_flight_code(rng);
            if used_codes.insert(code.clone()) {
                break code;
            }
        };
        flights.push(NewFlight {
            flight_code,
            capacity,
            passengers: chunk.to_vec(),
        });
    }

    tracing::debug!(
        "Distributed {} passengers into {} flights",
        passengers.len(),
        flights.len()
    );
    Ok(flights)
}
