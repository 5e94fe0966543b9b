//! Discount rule evaluation
//!
//! Rules are fetched per trip (scoped plus global) and filtered in-process by
//! two predicates: whether a rule is a candidate at `now`, and whether it
//! applies to the requested group and start date. Every applicable rule
//! contributes; contributions are summed.

use campustrip_core::models::{DiscountOutcome, DiscountType, PricingRule};
use campustrip_core::traits::PricingRuleRepository;
use campustrip_core::AppResult;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::constants::{MILLIS_PER_DAY, PERCENT_BASE};
use crate::quote::round_money;

/// Calendar dates are read as midnight UTC
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Whole days from `now` until the trip starts, rounded toward negative infinity
pub fn days_until(start_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    (start_of_day(start_date) - now)
        .num_milliseconds()
        .div_euclid(MILLIS_PER_DAY)
}

/// Scope, activity flag and validity window
pub fn is_candidate(rule: &PricingRule, trip_id: Uuid, now: DateTime<Utc>) -> bool {
    rule.applies_to_trip(trip_id)
        && rule.is_active
        && rule.valid_from.map_or(true, |from| start_of_day(from) <= now)
        && rule.valid_to.map_or(true, |to| start_of_day(to) >= now)
}

/// Group-size bounds and booking lead time
pub fn is_applicable(
    rule: &PricingRule,
    students: i32,
    start_date: NaiveDate,
    now: DateTime<Utc>,
) -> bool {
    rule.min_students.map_or(true, |min| students >= min)
        && rule.max_students.map_or(true, |max| students <= max)
        && rule
            .days_before_trip
            .map_or(true, |days| days_until(start_date, now) >= i64::from(days))
}

/// Amount a single rule takes off `subtotal`
pub fn contribution(rule: &PricingRule, subtotal: Decimal) -> Decimal {
    match rule.discount_type {
        DiscountType::Percentage => subtotal * (rule.discount_value / PERCENT_BASE),
        DiscountType::Fixed => rule.discount_value,
    }
}

/// Fold every matching rule into one outcome, keeping the input order
pub fn accumulate<'a>(
    rules: impl IntoIterator<Item = &'a PricingRule>,
    trip_id: Uuid,
    students: i32,
    start_date: NaiveDate,
    subtotal: Decimal,
    now: DateTime<Utc>,
) -> DiscountOutcome {
    let (amount, names) = rules
        .into_iter()
        .filter(|rule| is_candidate(rule, trip_id, now))
        .filter(|rule| is_applicable(rule, students, start_date, now))
        .fold((Decimal::ZERO, Vec::new()), |(sum, mut names), rule| {
            names.push(rule.name.clone());
            (sum.saturating_add(contribution(rule, subtotal)), names)
        });

    DiscountOutcome {
        amount: round_money(amount),
        applied_rule_names: names,
    }
}

/// Evaluates stored pricing rules against a candidate booking
#[derive(Clone)]
pub struct DiscountRuleEngine {
    rules: Arc<dyn PricingRuleRepository>,
}

impl DiscountRuleEngine {
    pub fn new(rules: Arc<dyn PricingRuleRepository>) -> Self {
        Self { rules }
    }

    #[instrument(skip(self))]
    pub async fn evaluate(
        &self,
        trip_id: Uuid,
        students: i32,
        start_date: NaiveDate,
        subtotal: Decimal,
        now: DateTime<Utc>,
    ) -> AppResult<DiscountOutcome> {
        let rules = self.rules.list_for_trip(trip_id).await?;
        let outcome = accumulate(&rules, trip_id, students, start_date, subtotal, now);

        debug!(
            "Evaluated {} rules for trip {}: discount {} from {:?}",
            rules.len(),
            trip_id,
            outcome.amount,
            outcome.applied_rule_names
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campustrip_core::models::RuleType;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap()
    }

    fn rule(name: &str, discount_type: DiscountType, value: Decimal) -> PricingRule {
        PricingRule {
            id: Uuid::new_v4(),
            trip_id: None,
            name: name.to_string(),
            rule_type: RuleType::Flat,
            discount_type,
            discount_value: value,
            min_students: None,
            max_students: None,
            valid_from: None,
            valid_to: None,
            days_before_trip: None,
            is_active: true,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_until_floors() {
        // 10:30 on the 15th, trip at midnight on the 20th: 4.56 days
        assert_eq!(days_until(day(2026, 1, 20), now()), 4);
        // trip started earlier today: -0.44 days floors to -1
        assert_eq!(days_until(day(2026, 1, 15), now()), -1);
        assert_eq!(days_until(day(2026, 1, 16), now()), 0);
    }

    #[test]
    fn test_percentage_and_fixed_are_summed() {
        let mut group = rule("Group 10%", DiscountType::Percentage, dec!(10));
        group.min_students = Some(15);
        let mut early = rule("Early 50", DiscountType::Fixed, dec!(50));
        early.days_before_trip = Some(60);

        let start = (now() + Duration::days(90)).date_naive();
        let outcome = accumulate(
            &[group, early],
            Uuid::new_v4(),
            20,
            start,
            dec!(15000),
            now(),
        );

        assert_eq!(outcome.amount, dec!(1550));
        assert_eq!(outcome.applied_rule_names, vec!["Group 10%", "Early 50"]);
    }

    #[test]
    fn test_student_bounds() {
        let mut r = rule("Mid-size", DiscountType::Fixed, dec!(25));
        r.min_students = Some(10);
        r.max_students = Some(30);
        let start = day(2026, 6, 1);

        assert!(!is_applicable(&r, 9, start, now()));
        assert!(is_applicable(&r, 10, start, now()));
        assert!(is_applicable(&r, 30, start, now()));
        assert!(!is_applicable(&r, 31, start, now()));
    }

    #[test]
    fn test_lead_time_boundary() {
        let mut r = rule("Early bird", DiscountType::Percentage, dec!(5));
        r.days_before_trip = Some(4);

        assert!(is_applicable(&r, 1, day(2026, 1, 20), now()));
        assert!(!is_applicable(&r, 1, day(2026, 1, 19), now()));
    }

    #[test]
    fn test_candidate_window_and_scope() {
        let trip = Uuid::new_v4();

        let mut scoped = rule("Other trip", DiscountType::Fixed, dec!(10));
        scoped.trip_id = Some(Uuid::new_v4());
        assert!(!is_candidate(&scoped, trip, now()));

        let mut inactive = rule("Paused", DiscountType::Fixed, dec!(10));
        inactive.is_active = false;
        assert!(!is_candidate(&inactive, trip, now()));

        let mut future = rule("Not yet", DiscountType::Fixed, dec!(10));
        future.valid_from = Some(day(2026, 1, 16));
        assert!(!is_candidate(&future, trip, now()));

        let mut expired = rule("Expired", DiscountType::Fixed, dec!(10));
        expired.valid_to = Some(day(2026, 1, 15));
        assert!(!is_candidate(&expired, trip, now()));

        let mut open = rule("Open window", DiscountType::Fixed, dec!(10));
        open.valid_from = Some(day(2026, 1, 15));
        open.valid_to = Some(day(2026, 1, 16));
        open.trip_id = Some(trip);
        assert!(is_candidate(&open, trip, now()));
    }

    #[test]
    fn test_total_discount_rounded() {
        let r = rule("Third", DiscountType::Percentage, dec!(33.333));
        let outcome = accumulate(
            &[r],
            Uuid::new_v4(),
            1,
            day(2026, 3, 1),
            dec!(100.01),
            now(),
        );
        assert_eq!(outcome.amount, dec!(33.34));
    }

    #[test]
    fn test_no_rules_no_discount() {
        let outcome = accumulate(&[], Uuid::new_v4(), 12, day(2026, 3, 1), dec!(900), now());
        assert_eq!(outcome, DiscountOutcome::default());
    }
}
