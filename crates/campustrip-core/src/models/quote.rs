//! Quote request and result

use super::trip::TransportType;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inputs for pricing one trip configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub trip_id: Uuid,
    pub students: i32,
    pub adults: i32,
    pub start_date: NaiveDate,
    pub meals_per_day: i32,
    pub transport_type: TransportType,
    #[serde(default)]
    pub selected_extras: Vec<String>,
}

impl QuoteRequest {
    /// Students plus adults; `None` when the sum does not fit an `i32`
    pub fn travellers(&self) -> Option<i32> {
        self.students.checked_add(self.adults)
    }
}

/// Priced quote with every component itemised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub base_students: Decimal,
    pub base_adults: Decimal,
    pub meals: Decimal,
    pub transport: Decimal,
    pub extras: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub per_student: Decimal,
    pub applied_rules: Vec<String>,
}

impl QuoteResult {
    pub fn subtotal(&self) -> Decimal {
        self.base_students + self.base_adults + self.meals + self.transport + self.extras
    }
}

/// Cumulative discount from every applicable rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscountOutcome {
    pub amount: Decimal,
    pub applied_rule_names: Vec<String>,
}
