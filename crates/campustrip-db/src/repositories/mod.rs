//! PostgreSQL repository implementations

pub mod availability_repo;
pub mod booking_repo;
pub mod pricing_rule_repo;
pub mod trip_repo;

pub use availability_repo::PgAvailabilityRepository;
pub use booking_repo::PgBookingRepository;
pub use pricing_rule_repo::PgPricingRuleRepository;
pub use trip_repo::PgTripRepository;
