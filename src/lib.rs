pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::{InMemoryFlightStore, LocalStorage};
pub use crate::core::{
    allocation::allocate, manifest::ManifestEngine, service::FlightService, tier::rank,
};
pub use crate::domain::model::{
    Allocation, Category, Envelope, Flight, FlightReport, FlightUpdate, NewFlight, Passenger,
};
pub use crate::utils::error::{ManifestError, Result};
