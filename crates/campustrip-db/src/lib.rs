//! CampusTrip Database Layer
//!
//! Repository implementations for the booking core:
//!
//! - Connection pool management and migrations with sqlx
//! - PostgreSQL repositories for trips, pricing rules, bookings and availability
//! - An in-memory store with the same semantics for tests and local runs

pub mod memory;
pub mod pool;
pub mod repositories;

pub use memory::InMemoryStore;
pub use pool::{create_pool, run_migrations};
pub use repositories::*;

use campustrip_core::traits::{
    AvailabilityRepository, BookingRepository, PricingRuleRepository, TripCatalog,
};
use sqlx::PgPool;
use std::sync::Arc;

// Re-export commonly used types
pub use campustrip_core::{AppError, AppResult};
pub use sqlx::Postgres;

/// One handle per storage seam, ready to hand to the services
#[derive(Clone)]
pub struct Repositories {
    pub trips: Arc<dyn TripCatalog>,
    pub rules: Arc<dyn PricingRuleRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub availability: Arc<dyn AvailabilityRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            trips: Arc::new(PgTripRepository::new(pool.clone())),
            rules: Arc::new(PgPricingRuleRepository::new(pool.clone())),
            bookings: Arc::new(PgBookingRepository::new(pool.clone())),
            availability: Arc::new(PgAvailabilityRepository::new(pool)),
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            trips: store.clone(),
            rules: store.clone(),
            bookings: store.clone(),
            availability: store,
        }
    }
}
