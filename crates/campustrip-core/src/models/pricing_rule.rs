//! Discount rules
//!
//! A rule either targets one trip or, with no trip set, every trip.
//! `rule_type` is descriptive only; the arithmetic depends on `discount_type`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    EarlyBird,
    GroupDiscount,
    Seasonal,
    #[default]
    Flat,
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleType::EarlyBird => write!(f, "early_bird"),
            RuleType::GroupDiscount => write!(f, "group_discount"),
            RuleType::Seasonal => write!(f, "seasonal"),
            RuleType::Flat => write!(f, "flat"),
        }
    }
}

impl RuleType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "early_bird" => Some(RuleType::EarlyBird),
            "group_discount" => Some(RuleType::GroupDiscount),
            "seasonal" => Some(RuleType::Seasonal),
            "flat" => Some(RuleType::Flat),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` percent of the subtotal
    Percentage,
    /// `discount_value` as an absolute amount
    Fixed,
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountType::Percentage => write!(f, "percentage"),
            DiscountType::Fixed => write!(f, "fixed"),
        }
    }
}

impl DiscountType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "percentage" => Some(DiscountType::Percentage),
            "fixed" => Some(DiscountType::Fixed),
            _ => None,
        }
    }
}

/// Pricing rule entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    pub id: Uuid,

    /// Trip this rule is scoped to; `None` applies to every trip
    pub trip_id: Option<Uuid>,

    pub name: String,
    pub rule_type: RuleType,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_students: Option<i32>,
    pub max_students: Option<i32>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,

    /// Minimum whole days between booking time and trip start
    pub days_before_trip: Option<i32>,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingRule {
    pub fn applies_to_trip(&self, trip_id: Uuid) -> bool {
        self.trip_id.map_or(true, |scoped| scoped == trip_id)
    }
}

/// Data for a new pricing rule
#[derive(Debug, Clone)]
pub struct NewPricingRule {
    pub trip_id: Option<Uuid>,
    pub name: String,
    pub rule_type: RuleType,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_students: Option<i32>,
    pub max_students: Option<i32>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub days_before_trip: Option<i32>,
    pub is_active: bool,
}

/// Partial update of a pricing rule. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct PricingRuleUpdate {
    pub name: Option<String>,
    pub rule_type: Option<RuleType>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    pub min_students: Option<i32>,
    pub max_students: Option<i32>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub days_before_trip: Option<i32>,
    pub is_active: Option<bool>,
}

impl PricingRuleUpdate {
    /// Merge into an existing rule
    pub fn apply_to(&self, rule: &mut PricingRule, at: DateTime<Utc>) {
        if let Some(name) = &self.name {
            rule.name = name.clone();
        }
        if let Some(rule_type) = self.rule_type {
            rule.rule_type = rule_type;
        }
        if let Some(discount_type) = self.discount_type {
            rule.discount_type = discount_type;
        }
        if let Some(value) = self.discount_value {
            rule.discount_value = value;
        }
        if self.min_students.is_some() {
            rule.min_students = self.min_students;
        }
        if self.max_students.is_some() {
            rule.max_students = self.max_students;
        }
        if self.valid_from.is_some() {
            rule.valid_from = self.valid_from;
        }
        if self.valid_to.is_some() {
            rule.valid_to = self.valid_to;
        }
        if self.days_before_trip.is_some() {
            rule.days_before_trip = self.days_before_trip;
        }
        if let Some(active) = self.is_active {
            rule.is_active = active;
        }
        rule.updated_at = at;
    }
}
