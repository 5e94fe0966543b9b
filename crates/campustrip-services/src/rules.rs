//! Pricing rule administration

use campustrip_core::models::{
    DiscountType, NewPricingRule, PricingRule, PricingRuleUpdate,
};
use campustrip_core::traits::PricingRuleRepository;
use campustrip_core::{AppError, AppResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::constants::PERCENT_BASE;

/// Fields shared by create and update checks
struct RuleShape {
    discount_type: DiscountType,
    discount_value: Decimal,
    min_students: Option<i32>,
    max_students: Option<i32>,
    valid_from: Option<NaiveDate>,
    valid_to: Option<NaiveDate>,
    days_before_trip: Option<i32>,
}

impl From<&PricingRule> for RuleShape {
    fn from(rule: &PricingRule) -> Self {
        Self {
            discount_type: rule.discount_type,
            discount_value: rule.discount_value,
            min_students: rule.min_students,
            max_students: rule.max_students,
            valid_from: rule.valid_from,
            valid_to: rule.valid_to,
            days_before_trip: rule.days_before_trip,
        }
    }
}

impl From<&NewPricingRule> for RuleShape {
    fn from(rule: &NewPricingRule) -> Self {
        Self {
            discount_type: rule.discount_type,
            discount_value: rule.discount_value,
            min_students: rule.min_students,
            max_students: rule.max_students,
            valid_from: rule.valid_from,
            valid_to: rule.valid_to,
            days_before_trip: rule.days_before_trip,
        }
    }
}

impl RuleShape {
    fn validate(&self) -> AppResult<()> {
        if self.discount_value < Decimal::ZERO {
            return Err(AppError::Validation(
                "discount_value cannot be negative".to_string(),
            ));
        }
        if self.discount_type == DiscountType::Percentage && self.discount_value > PERCENT_BASE {
            return Err(AppError::Validation(
                "percentage discount cannot exceed 100".to_string(),
            ));
        }
        if let (Some(min), Some(max)) = (self.min_students, self.max_students) {
            if min > max {
                return Err(AppError::Validation(format!(
                    "min_students ({min}) exceeds max_students ({max})"
                )));
            }
        }
        if let (Some(from), Some(to)) = (self.valid_from, self.valid_to) {
            if from > to {
                return Err(AppError::Validation(format!(
                    "valid_from ({from}) is after valid_to ({to})"
                )));
            }
        }
        if self.days_before_trip.is_some_and(|d| d < 0) {
            return Err(AppError::Validation(
                "days_before_trip cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct PricingRuleService {
    rules: Arc<dyn PricingRuleRepository>,
}

impl PricingRuleService {
    pub fn new(rules: Arc<dyn PricingRuleRepository>) -> Self {
        Self { rules }
    }

    pub async fn list(&self, trip_id: Option<Uuid>) -> AppResult<Vec<PricingRule>> {
        self.rules.list(trip_id).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<PricingRule> {
        self.rules
            .find_by_id(id)
            .await?
            .ok_or(AppError::RuleNotFound(id))
    }

    #[instrument(skip(self, rule), fields(name = %rule.name))]
    pub async fn create(&self, rule: NewPricingRule) -> AppResult<PricingRule> {
        RuleShape::from(&rule).validate()?;
        let created = self.rules.create(&rule).await?;
        info!("Pricing rule '{}' created ({})", created.name, created.id);
        Ok(created)
    }

    /// Partial update, validated against the merged result
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: Uuid, update: PricingRuleUpdate) -> AppResult<PricingRule> {
        let mut preview = self.get(id).await?;
        let updated_at = preview.updated_at;
        update.apply_to(&mut preview, updated_at);
        RuleShape::from(&preview).validate()?;

        let updated = self
            .rules
            .update(id, &update)
            .await?
            .ok_or(AppError::RuleNotFound(id))?;
        info!("Pricing rule {} updated", id);
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.rules.delete(id).await? {
            warn!("Delete requested for unknown pricing rule {}", id);
            return Err(AppError::RuleNotFound(id));
        }
        info!("Pricing rule {} deleted", id);
        Ok(())
    }
}
