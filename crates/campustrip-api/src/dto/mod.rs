//! Data Transfer Objects (DTOs) for API requests and responses

pub mod availability;
pub mod booking;
pub mod common;
pub mod pricing;

pub use availability::*;
pub use booking::*;
pub use common::*;
pub use pricing::*;
