pub mod allocation;
pub mod manifest;
pub mod seed;
pub mod service;
pub mod tier;

pub use crate::domain::model::{Allocation, Category, Flight, Passenger};
pub use crate::domain::ports::{ConfigProvider, FlightStore, Storage};
pub use crate::utils::error::Result;
