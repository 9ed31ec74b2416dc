use crate::utils::error::ManifestError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Passenger tier. Declaration order is priority order, `Black` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Normal,
    Gold,
    Platinum,
    Black,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Normal,
        Category::Gold,
        Category::Platinum,
        Category::Black,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Normal => "Normal",
            Category::Gold => "Gold",
            Category::Platinum => "Platinum",
            Category::Black => "Black",
        }
    }
}

impl FromStr for Category {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Normal" => Ok(Category::Normal),
            "Gold" => Ok(Category::Gold),
            "Platinum" => Ok(Category::Platinum),
            "Black" => Ok(Category::Black),
            other => Err(ManifestError::InvalidCategory {
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = ManifestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub id: i64,
    pub name: String,
    pub age: u32,
    #[serde(rename = "flightCategory", alias = "category")]
    pub category: Category,
    pub reservation_id: String,
    #[serde(default)]
    pub has_connections: bool,
    #[serde(default)]
    pub has_checked_baggage: bool,
    /// Written by the allocation engine only; whatever a caller sends is ignored.
    #[serde(default)]
    pub boarded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub flight_code: String,
    pub capacity: i64,
    pub passengers: Vec<Passenger>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flight {
    pub fn boarded_count(&self) -> usize {
        self.passengers.iter().filter(|p| p.boarded).count()
    }

    pub fn passenger(&self, id: i64) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlight {
    pub flight_code: String,
    pub capacity: i64,
    #[serde(default)]
    pub passengers: Vec<Passenger>,
}

/// Partial update of a stored flight. The flight code is never changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightUpdate {
    pub capacity: Option<i64>,
    pub passengers: Option<Vec<Passenger>>,
}

/// Passengers sharing a reservation, computed fresh on every allocation run.
#[derive(Debug, Clone)]
pub struct ReservationGroup<'a> {
    pub reservation_id: &'a str,
    pub members: Vec<&'a Passenger>,
    pub priority: u8,
    pub first_seen: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub boarded_passengers: Vec<Passenger>,
    pub passengers_on_waiting_list: Vec<Passenger>,
}

impl Allocation {
    pub fn is_boarded(&self, id: i64) -> bool {
        self.boarded_passengers.iter().any(|p| p.id == id)
    }

    /// Copies the computed `boarded` flags onto a manifest kept in request order.
    pub fn apply_to(&self, passengers: &mut [Passenger]) {
        for passenger in passengers.iter_mut() {
            passenger.boarded = self.is_boarded(passenger.id);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightReport {
    pub flight_code: String,
    pub capacity: i64,
    #[serde(flatten)]
    pub allocation: Allocation,
}

/// Response envelope: `{success, data | error, message?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            count: None,
        }
    }

    pub fn list(data: T, count: usize) -> Self {
        Self {
            count: Some(count),
            ..Self::ok(data)
        }
    }

    pub fn failure(error: impl Into<String>, message: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message,
            count: None,
        }
    }
}
