//! CampusTrip Core Library
//!
//! Foundational types for the school-trip booking core:
//!
//! - Domain models (Trip, PricingRule, Booking, AvailabilitySlot)
//! - Repository traits implemented by `campustrip-db`
//! - The injected [`Clock`]
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, BookingPolicy};
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
