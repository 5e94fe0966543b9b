//! Trip catalog model
//!
//! Trips are owned by the catalog service; the booking core only reads the
//! duration and pricing configuration.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Means of transport offered for a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Bus,
    Train,
    Flight,
    Ferry,
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportType::Bus => write!(f, "bus"),
            TransportType::Train => write!(f, "train"),
            TransportType::Flight => write!(f, "flight"),
            TransportType::Ferry => write!(f, "ferry"),
        }
    }
}

impl TransportType {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bus" => Some(TransportType::Bus),
            "train" => Some(TransportType::Train),
            "flight" => Some(TransportType::Flight),
            "ferry" => Some(TransportType::Ferry),
            _ => None,
        }
    }
}

/// Per-trip price sheet. Every amount is non-negative; absent entries price at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceConfig {
    pub base_per_student: Decimal,

    #[serde(default)]
    pub base_per_adult: Decimal,

    #[serde(default)]
    pub meal_per_person_per_day: Decimal,

    /// Flat surcharge per traveller, keyed by transport type
    #[serde(default)]
    pub transport_surcharge: HashMap<TransportType, Decimal>,

    /// Extras priced per student
    #[serde(default)]
    pub extras: HashMap<String, Decimal>,
}

impl PriceConfig {
    pub fn surcharge_for(&self, transport: TransportType) -> Decimal {
        self.transport_surcharge
            .get(&transport)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Trip as seen by the booking core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub title: String,
    pub destination: String,

    /// Length of the trip in days (at least 1)
    pub duration_days: i32,

    pub price_config: PriceConfig,

    /// Catalog-level extras, used when the price sheet has no entry for one
    #[serde(default)]
    pub available_extras: HashMap<String, Decimal>,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    /// Price of one extra per student, falling back to the catalog list
    pub fn extra_price(&self, name: &str) -> Decimal {
        self.price_config
            .extras
            .get(name)
            .or_else(|| self.available_extras.get(name))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}
