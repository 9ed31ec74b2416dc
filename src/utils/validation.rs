use crate::domain::model::{FlightUpdate, NewFlight, Passenger};
use crate::utils::error::{ManifestError, Result};
use std::collections::HashSet;

pub const OUTPUT_FORMATS: [&str; 2] = ["json", "csv"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ManifestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ManifestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ManifestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<()> {
    if formats.is_empty() {
        return Err(ManifestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one output format is required".to_string(),
        });
    }

    let allowed: HashSet<&str> = OUTPUT_FORMATS.iter().copied().collect();
    for format in formats {
        if !allowed.contains(format.as_str()) {
            return Err(ManifestError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    OUTPUT_FORMATS.join(", ")
                ),
            });
        }
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ManifestError::ValidationError {
            message: format!("{} cannot be empty or whitespace-only", field_name),
        });
    }
    Ok(())
}

pub fn validate_capacity(capacity: i64) -> Result<()> {
    if capacity < 0 {
        return Err(ManifestError::InvalidCapacity { capacity });
    }
    Ok(())
}

impl Validate for Passenger {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_non_empty_string("reservationId", &self.reservation_id)
    }
}

impl Validate for NewFlight {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("flightCode", &self.flight_code)?;
        validate_capacity(self.capacity)?;
        self.passengers.iter().try_for_each(|p| p.validate())
    }
}

impl Validate for FlightUpdate {
    fn validate(&self) -> Result<()> {
        if let Some(capacity) = self.capacity {
            validate_capacity(capacity)?;
        }
        if let Some(passengers) = &self.passengers {
            passengers.iter().try_for_each(|p| p.validate())?;
        }
        Ok(())
    }
}
