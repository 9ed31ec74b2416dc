use crate::domain::model::Flight;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
}

/// Persistence of flight records, keyed by flight code.
#[async_trait]
pub trait FlightStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Flight>>;
    async fn find_by_code(&self, flight_code: &str) -> Result<Option<Flight>>;
    /// Fails with `DuplicateFlightCode` if the code is taken.
    async fn insert(&self, flight: Flight) -> Result<()>;
    /// Fails with `FlightNotFound` if the code is unknown.
    async fn update(&self, flight: Flight) -> Result<()>;
    async fn delete(&self, flight_code: &str) -> Result<Flight>;
}
