//! Availability DTOs

use campustrip_core::models::CapacityEntry;
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertSlotRequest {
    pub date: NaiveDate,

    #[serde(alias = "total_capacity")]
    #[validate(range(min = 0, message = "Capacity cannot be negative"))]
    pub capacity: i32,

    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

/// Entries are applied independently; invalid ones are reported back, not rejected up front
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkUpsertRequest {
    #[validate(length(min = 1, max = 366))]
    pub dates: Vec<CapacityEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailableDatesQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}
