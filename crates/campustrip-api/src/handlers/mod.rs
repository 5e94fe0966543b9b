//! HTTP request handlers

pub mod availability;
pub mod bookings;
pub mod health;
pub mod pricing;

pub use availability::configure as configure_availability;
pub use bookings::configure as configure_bookings;
pub use health::configure as configure_health;
pub use pricing::configure as configure_pricing;
