use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Invalid passenger category: {value}")]
    InvalidCategory { value: String },

    #[error("Duplicate passenger id {id} in flight manifest")]
    DuplicatePassengerId { id: i64 },

    #[error("Invalid capacity {capacity}: capacity cannot be negative")]
    InvalidCapacity { capacity: i64 },

    #[error("Flight not found: {flight_code}")]
    FlightNotFound { flight_code: String },

    #[error("Flight already exists: {flight_code}")]
    DuplicateFlightCode { flight_code: String },

    #[error("Passenger {passenger_id} not found on flight {flight_code}")]
    PassengerNotFound {
        flight_code: String,
        passenger_id: i64,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Allocation,
    NotFound,
    Conflict,
    Validation,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ManifestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ManifestError::InvalidCategory { .. }
            | ManifestError::DuplicatePassengerId { .. }
            | ManifestError::InvalidCapacity { .. } => ErrorCategory::Allocation,
            ManifestError::FlightNotFound { .. } | ManifestError::PassengerNotFound { .. } => {
                ErrorCategory::NotFound
            }
            ManifestError::DuplicateFlightCode { .. } => ErrorCategory::Conflict,
            ManifestError::ValidationError { .. }
            | ManifestError::SerializationError(_)
            | ManifestError::CsvError(_) => ErrorCategory::Validation,
            ManifestError::ConfigError { .. }
            | ManifestError::InvalidConfigValueError { .. }
            | ManifestError::TomlError(_) => ErrorCategory::Configuration,
            ManifestError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::NotFound | ErrorCategory::Conflict => ErrorSeverity::Medium,
            ErrorCategory::Allocation | ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ManifestError::InvalidCategory { value } => format!(
                "Passenger category '{}' is not one of Normal, Gold, Platinum, Black",
                value
            ),
            ManifestError::DuplicatePassengerId { id } => {
                format!("Passenger id {} appears more than once on the same flight", id)
            }
            ManifestError::InvalidCapacity { capacity } => {
                format!("Flight capacity {} is negative", capacity)
            }
            ManifestError::IoError(e) => format!("Could not read or write a file: {}", e),
            ManifestError::TomlError(e) => format!("Configuration file is not valid TOML: {}", e),
            other => other.to_string(),
        }
    }

    /// Process exit code for the CLI binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Allocation => {
                "Check the passenger list: ids must be unique and capacity must be zero or more"
            }
            ErrorCategory::NotFound => "Check the flight code or passenger id",
            ErrorCategory::Conflict => "Use a different flight code or update the existing flight",
            ErrorCategory::Validation => "Fix the input payload and try again",
            ErrorCategory::Configuration => "Review the configuration flags or TOML file",
            ErrorCategory::Io => "Make sure the input file exists and the output path is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, ManifestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_are_allocation_category() {
        let err = ManifestError::DuplicatePassengerId { id: 7 };
        assert_eq!(err.category(), ErrorCategory::Allocation);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains('7'));
    }

    #[test]
    fn test_not_found_is_medium_severity() {
        let err = ManifestError::FlightNotFound {
            flight_code: "IB0001".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.to_string(), "Flight not found: IB0001");
    }
}
