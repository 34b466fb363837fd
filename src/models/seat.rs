use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de;

/// Seat slot as the backend returns it.
///
/// Only the fields the gateway interprets are typed; everything else the
/// backend sends is kept in `extra` and written back out untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatRecord {
    #[serde(rename = "Seat No", default, deserialize_with = "de::label")]
    pub seat_no: String,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Day Type", default, skip_serializing_if = "Option::is_none")]
    pub day_type: Option<String>,
    #[serde(rename = "Charge", default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<Value>,
    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "Start Date", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(rename = "Expiry Date", default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(rename = "Phone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Value>,
    #[serde(rename = "Due", default, deserialize_with = "de::opt_amount", skip_serializing_if = "Option::is_none")]
    pub due: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SeatRecord {
    pub fn name_lower(&self) -> String {
        self.name.as_deref().unwrap_or_default().to_lowercase()
    }

    pub fn day_type_lower(&self) -> String {
        self.day_type.as_deref().unwrap_or_default().to_lowercase()
    }

    pub fn status_lower(&self) -> String {
        self.status.as_deref().unwrap_or_default().to_lowercase()
    }

    /// An empty seat is marked by the literal occupant name "vacant".
    pub fn is_vacant(&self) -> bool {
        self.name_lower() == "vacant"
    }

    pub fn due_or_zero(&self) -> f64 {
        self.due.unwrap_or(0.0)
    }
}

/// Rental shift of a seat slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayType {
    FullDay,
    MorningHalf,
    EveningHalf,
}

impl DayType {
    /// Label as stored by the backend, lowercased.
    pub fn label(self) -> &'static str {
        match self {
            DayType::FullDay => "full day",
            DayType::MorningHalf => "morning half",
            DayType::EveningHalf => "evening half",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "full day" => Some(DayType::FullDay),
            "morning half" => Some(DayType::MorningHalf),
            "evening half" => Some(DayType::EveningHalf),
            _ => None,
        }
    }
}
