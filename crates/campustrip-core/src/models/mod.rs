//! Domain models for CampusTrip

pub mod availability;
pub mod booking;
pub mod pricing_rule;
pub mod quote;
pub mod trip;
pub mod user;

pub use availability::{AvailabilitySlot, CapacityEntry, SeatReservation};
pub use booking::{
    Booking, BookingConfig, BookingFilter, BookingStatus, NewBooking, PriceBreakdown,
    StatusChange,
};
pub use pricing_rule::{DiscountType, NewPricingRule, PricingRule, PricingRuleUpdate, RuleType};
pub use quote::{DiscountOutcome, QuoteRequest, QuoteResult};
pub use trip::{PriceConfig, TransportType, Trip};
pub use user::UserRole;
