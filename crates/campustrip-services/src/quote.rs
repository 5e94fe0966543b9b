//! Quote calculation
//!
//! Prices a trip configuration from the trip's price sheet and the discount
//! engine. Only the per-student figure and the discount total are rounded;
//! every other component is exact.

use campustrip_core::clock::Clock;
use campustrip_core::models::{QuoteRequest, QuoteResult, Trip};
use campustrip_core::traits::TripCatalog;
use campustrip_core::{AppError, AppResult};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::constants::MONEY_SCALE;
use crate::discount::DiscountRuleEngine;

/// Round to cents, halves away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Undiscounted price components
#[derive(Debug, Clone, PartialEq)]
pub struct PriceComponents {
    pub base_students: Decimal,
    pub base_adults: Decimal,
    pub meals: Decimal,
    pub transport: Decimal,
    pub extras: Decimal,
}

impl PriceComponents {
    /// Sum of all components; [`price_components`] guarantees it fits a `Decimal`
    pub fn subtotal(&self) -> Decimal {
        self.base_students + self.base_adults + self.meals + self.transport + self.extras
    }

    fn checked_subtotal(&self) -> Option<Decimal> {
        [self.base_adults, self.meals, self.transport, self.extras]
            .into_iter()
            .try_fold(self.base_students, |sum, part| sum.checked_add(part))
    }
}

fn amount_out_of_range() -> AppError {
    AppError::Validation("quote exceeds the supported amount range".to_string())
}

fn product(factors: &[Decimal]) -> AppResult<Decimal> {
    factors
        .iter()
        .try_fold(Decimal::ONE, |acc, factor| acc.checked_mul(*factor))
        .ok_or_else(amount_out_of_range)
}

/// Itemise a configuration against a trip's price sheet
pub fn price_components(trip: &Trip, request: &QuoteRequest) -> AppResult<PriceComponents> {
    let price = &trip.price_config;
    let days = Decimal::from(trip.duration_days);
    let students = Decimal::from(request.students);
    let adults = Decimal::from(request.adults);
    let people = students + adults;

    // each extra counts once even if listed twice
    let mut seen = HashSet::new();
    let extras_per_student = request
        .selected_extras
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .map(|name| trip.extra_price(name))
        .try_fold(Decimal::ZERO, |sum, extra| sum.checked_add(extra))
        .ok_or_else(amount_out_of_range)?;

    let components = PriceComponents {
        base_students: product(&[price.base_per_student, students, days])?,
        base_adults: product(&[price.base_per_adult, adults, days])?,
        meals: product(&[
            price.meal_per_person_per_day,
            Decimal::from(request.meals_per_day),
            people,
            days,
        ])?,
        transport: product(&[price.surcharge_for(request.transport_type), people])?,
        extras: product(&[extras_per_student, students])?,
    };

    components
        .checked_subtotal()
        .ok_or_else(amount_out_of_range)?;
    Ok(components)
}

/// Reject configurations no trip can be priced for
pub fn validate_request(request: &QuoteRequest) -> AppResult<()> {
    if request.students < 1 {
        return Err(AppError::Validation(
            "students must be at least 1".to_string(),
        ));
    }
    if request.adults < 0 {
        return Err(AppError::Validation("adults cannot be negative".to_string()));
    }
    if request.meals_per_day < 0 {
        return Err(AppError::Validation(
            "meals_per_day cannot be negative".to_string(),
        ));
    }
    if request.travellers().is_none() {
        return Err(AppError::Validation(
            "students plus adults exceeds the supported group size".to_string(),
        ));
    }
    Ok(())
}

/// Combines catalog prices and discounts into a quote
pub struct QuoteCalculator {
    catalog: Arc<dyn TripCatalog>,
    discounts: DiscountRuleEngine,
    clock: Arc<dyn Clock>,
}

impl QuoteCalculator {
    pub fn new(
        catalog: Arc<dyn TripCatalog>,
        discounts: DiscountRuleEngine,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            discounts,
            clock,
        }
    }

    #[instrument(skip(self, request), fields(trip_id = %request.trip_id, students = request.students))]
    pub async fn calculate(&self, request: &QuoteRequest) -> AppResult<QuoteResult> {
        validate_request(request)?;

        let trip = self
            .catalog
            .find_by_id(request.trip_id)
            .await?
            .ok_or_else(|| {
                warn!("Quote requested for unknown trip {}", request.trip_id);
                AppError::TripNotFound(request.trip_id)
            })?;

        let components = price_components(&trip, request)?;
        let subtotal = components.subtotal();

        let discount = self
            .discounts
            .evaluate(
                trip.id,
                request.students,
                request.start_date,
                subtotal,
                self.clock.now(),
            )
            .await?;

        let total = (subtotal - discount.amount).max(Decimal::ZERO);
        let per_student = if request.students > 0 {
            round_money(total / Decimal::from(request.students))
        } else {
            Decimal::ZERO
        };

        debug!(
            "Quoted trip {}: subtotal {}, discount {}, total {}",
            trip.id, subtotal, discount.amount, total
        );

        Ok(QuoteResult {
            base_students: components.base_students,
            base_adults: components.base_adults,
            meals: components.meals,
            transport: components.transport,
            extras: components.extras,
            discount: discount.amount,
            total,
            per_student,
            applied_rules: discount.applied_rule_names,
        })
    }
}
