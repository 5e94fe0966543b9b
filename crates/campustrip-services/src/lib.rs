//! Business logic services for CampusTrip
//!
//! Quotes, discount rules, availability and the booking lifecycle. Services
//! own their repositories behind trait objects and are shared through
//! [`Services`], which the HTTP layer receives as application data.
//!
//! # Services
//!
//! - `QuoteCalculator` - itemised price for a trip configuration
//! - `DiscountRuleEngine` - applicable rules and their summed discount
//! - `PricingRuleService` - rule administration
//! - `AvailabilityLedger` - capacity per trip and date
//! - `BookingOrchestrator` - booking creation and status changes

pub mod availability;
pub mod booking;
pub mod discount;
pub mod lifecycle;
pub mod quote;
pub mod rules;

pub use availability::{AvailabilityLedger, BulkFailure, BulkUpsertSummary};
pub use booking::{BookingOrchestrator, CreateBooking};
pub use discount::DiscountRuleEngine;
pub use lifecycle::{BookingStateMachine, KanbanBoard};
pub use quote::{round_money, QuoteCalculator};
pub use rules::PricingRuleService;

use campustrip_core::clock::Clock;
use campustrip_core::config::BookingPolicy;
use campustrip_db::Repositories;
use std::sync::Arc;

/// Business logic constants
pub mod constants {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Decimal places kept on rounded money values
    pub const MONEY_SCALE: u32 = 2;

    /// Percentage discounts are expressed out of this
    pub const PERCENT_BASE: Decimal = dec!(100);

    pub const MILLIS_PER_DAY: i64 = 86_400_000;

    /// Status writes retried after losing a concurrent update
    pub const MAX_TRANSITION_ATTEMPTS: u32 = 3;
}

/// Every service, wired against one set of repositories
#[derive(Clone)]
pub struct Services {
    pub quotes: Arc<QuoteCalculator>,
    pub rules: Arc<PricingRuleService>,
    pub availability: Arc<AvailabilityLedger>,
    pub bookings: Arc<BookingOrchestrator>,
}

impl Services {
    pub fn new(repos: Repositories, clock: Arc<dyn Clock>, policy: BookingPolicy) -> Self {
        let quotes = Arc::new(QuoteCalculator::new(
            repos.trips.clone(),
            DiscountRuleEngine::new(repos.rules.clone()),
            clock.clone(),
        ));
        let availability = Arc::new(AvailabilityLedger::new(repos.availability.clone()));
        let bookings = Arc::new(BookingOrchestrator::new(
            repos.bookings.clone(),
            quotes.clone(),
            availability.clone(),
            clock,
            policy,
        ));

        Self {
            quotes,
            rules: Arc::new(PricingRuleService::new(repos.rules)),
            availability,
            bookings,
        }
    }
}
