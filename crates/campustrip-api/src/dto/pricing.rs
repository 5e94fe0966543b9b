//! Quote and pricing rule DTOs

use campustrip_core::models::{
    DiscountType, NewPricingRule, PricingRuleUpdate, QuoteRequest, RuleType, TransportType,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Trip configuration to price
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuoteRequestDto {
    pub trip_id: Uuid,

    #[validate(range(min = 1, message = "At least one student is required"))]
    pub students: i32,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub adults: i32,

    pub start_date: NaiveDate,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub meals_per_day: i32,

    pub transport_type: TransportType,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub selected_extras: Vec<String>,
}

impl From<QuoteRequestDto> for QuoteRequest {
    fn from(dto: QuoteRequestDto) -> Self {
        Self {
            trip_id: dto.trip_id,
            students: dto.students,
            adults: dto.adults,
            start_date: dto.start_date,
            meals_per_day: dto.meals_per_day,
            transport_type: dto.transport_type,
            selected_extras: dto.selected_extras,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRuleRequest {
    /// Omit for a rule that applies to every trip
    pub trip_id: Option<Uuid>,

    #[validate(length(min = 1, max = 120, message = "Rule name is required"))]
    pub name: String,

    #[serde(default)]
    pub rule_type: RuleType,

    pub discount_type: DiscountType,

    pub discount_value: Decimal,

    #[validate(range(min = 0))]
    pub min_students: Option<i32>,

    #[validate(range(min = 0))]
    pub max_students: Option<i32>,

    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,

    #[validate(range(min = 0))]
    pub days_before_trip: Option<i32>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl From<CreateRuleRequest> for NewPricingRule {
    fn from(req: CreateRuleRequest) -> Self {
        Self {
            trip_id: req.trip_id,
            name: req.name,
            rule_type: req.rule_type,
            discount_type: req.discount_type,
            discount_value: req.discount_value,
            min_students: req.min_students,
            max_students: req.max_students,
            valid_from: req.valid_from,
            valid_to: req.valid_to,
            days_before_trip: req.days_before_trip,
            is_active: req.is_active,
        }
    }
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRuleRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub rule_type: Option<RuleType>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    #[validate(range(min = 0))]
    pub min_students: Option<i32>,
    #[validate(range(min = 0))]
    pub max_students: Option<i32>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    #[validate(range(min = 0))]
    pub days_before_trip: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<UpdateRuleRequest> for PricingRuleUpdate {
    fn from(req: UpdateRuleRequest) -> Self {
        Self {
            name: req.name,
            rule_type: req.rule_type,
            discount_type: req.discount_type,
            discount_value: req.discount_value,
            min_students: req.min_students,
            max_students: req.max_students,
            valid_from: req.valid_from,
            valid_to: req.valid_to,
            days_before_trip: req.days_before_trip,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleListQuery {
    #[serde(alias = "tripId")]
    pub trip_id: Option<Uuid>,
}
