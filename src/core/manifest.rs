use crate::adapters::InMemoryFlightStore;
use crate::core::service::FlightService;
use crate::domain::model::{Envelope, FlightReport, NewFlight};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{ManifestError, Result};
use serde::Serialize;
use std::path::Path;

pub const JSON_OUTPUT: &str = "manifest.json";
pub const CSV_OUTPUT: &str = "boarding.csv";

#[derive(Debug, Serialize)]
struct BoardingRow<'a> {
    flight_code: &'a str,
    passenger_id: i64,
    name: &'a str,
    category: &'a str,
    reservation_id: &'a str,
    boarded: bool,
}

/// Reads a batch of flight requests, allocates seats for each and writes the
/// configured reports.
pub struct ManifestEngine<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ManifestEngine<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub async fn read_requests(&self) -> Result<Vec<NewFlight>> {
        tracing::debug!("Reading flight requests from: {}", self.config.input_path());
        let raw = self.storage.read_file(self.config.input_path()).await?;
        let requests: Vec<NewFlight> = serde_json::from_slice(&raw)?;
        tracing::info!("📥 Read {} flight requests", requests.len());
        Ok(requests)
    }

    /// Allocates every request. Failed flights become error entries; they do
    /// not stop the rest of the batch.
    pub async fn allocate_all(&self, requests: Vec<NewFlight>) -> Vec<Envelope<FlightReport>> {
        let service = FlightService::new(InMemoryFlightStore::new());
        let mut reports = Vec::with_capacity(requests.len());

        for request in requests {
            let flight_code = request.flight_code.clone();
            match service.create_flight(request).await {
                Ok((flight, allocation)) => reports.push(Envelope::ok(FlightReport {
                    flight_code: flight.flight_code,
                    capacity: flight.capacity,
                    allocation,
                })),
                Err(e) => {
                    tracing::warn!("⚠️ Flight {} rejected: {}", flight_code, e);
                    reports.push(Envelope::failure(
                        format!("Error creating flight {}", flight_code),
                        Some(e.user_friendly_message()),
                    ));
                }
            }
        }

        reports
    }

    pub async fn write_reports(&self, reports: &[Envelope<FlightReport>]) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in self.config.output_formats() {
            let (file_name, data) = match format.as_str() {
                "json" => (JSON_OUTPUT, render_json(reports)?),
                "csv" => (CSV_OUTPUT, render_csv(reports)?),
                other => {
                    return Err(ManifestError::InvalidConfigValueError {
                        field: "output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported output format".to_string(),
                    })
                }
            };

            let path = Path::new(self.config.output_path())
                .join(file_name)
                .to_string_lossy()
                .into_owned();
            tracing::debug!("Writing {} ({} bytes) to storage", path, data.len());
            self.storage.write_file(&path, &data).await?;
            written.push(path);
        }

        Ok(written)
    }

    pub async fn run(&self) -> Result<Vec<String>> {
        tracing::info!("Starting manifest run");

        let requests = self.read_requests().await?;
        let reports = self.allocate_all(requests).await;

        let failed = reports.iter().filter(|r| !r.success).count();
        tracing::info!(
            "🛫 Allocated {} flights ({} rejected)",
            reports.len() - failed,
            failed
        );

        let written = self.write_reports(&reports).await?;
        for path in &written {
            tracing::info!("📁 Output saved to: {}", path);
        }
        Ok(written)
    }
}

fn render_json(reports: &[Envelope<FlightReport>]) -> Result<Vec<u8>> {
    let envelope = Envelope::list(reports, reports.len());
    Ok(serde_json::to_vec_pretty(&envelope)?)
}

fn render_csv(reports: &[Envelope<FlightReport>]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for report in reports.iter().filter_map(|r| r.data.as_ref()) {
        let allocation = &report.allocation;
        let passengers = allocation
            .boarded_passengers
            .iter()
            .chain(&allocation.passengers_on_waiting_list);
        for passenger in passengers {
            writer.serialize(BoardingRow {
                flight_code: &report.flight_code,
                passenger_id: passenger.id,
                name: &passenger.name,
                category: passenger.category.as_str(),
                reservation_id: &passenger.reservation_id,
                boarded: passenger.boarded,
            })?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| ManifestError::IoError(e.into_error()))
}
