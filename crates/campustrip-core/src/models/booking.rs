//! Booking model and lifecycle states
//!
//! A booking freezes its configuration and price breakdown at creation time.
//! Only status and the lifecycle stamps change afterwards, and bookings are
//! never deleted.

use super::quote::QuoteResult;
use super::trip::TransportType;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Booking lifecycle status
///
/// ```text
/// pending   -> approved | rejected
/// approved  -> confirmed | cancelled
/// confirmed -> cancelled
/// rejected, cancelled: terminal
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Approved,
    Confirmed,
    Cancelled,
    Rejected,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Approved,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Rejected => "rejected",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(BookingStatus::Pending),
            "approved" => Some(BookingStatus::Approved),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "rejected" => Some(BookingStatus::Rejected),
            _ => None,
        }
    }

    /// States an administrator may move a booking into from this one
    pub fn allowed_next_states(&self) -> &'static [BookingStatus] {
        match self {
            BookingStatus::Pending => &[BookingStatus::Approved, BookingStatus::Rejected],
            BookingStatus::Approved => &[BookingStatus::Confirmed, BookingStatus::Cancelled],
            BookingStatus::Confirmed => &[BookingStatus::Cancelled],
            BookingStatus::Rejected | BookingStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, target: BookingStatus) -> bool {
        self.allowed_next_states().contains(&target)
    }

    /// Rejected and cancelled bookings accept no further transitions
    pub fn is_closed(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Rejected)
    }
}

/// Trip configuration chosen by the client. Immutable once booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfig {
    pub students: i32,
    pub adults: i32,
    pub start_date: NaiveDate,
    pub meals_per_day: i32,
    pub transport_type: TransportType,
    #[serde(default)]
    pub selected_extras: Vec<String>,
}

impl BookingConfig {
    pub fn total_people(&self) -> i32 {
        self.students + self.adults
    }
}

/// Price components frozen on the booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_students: Decimal,
    pub base_adults: Decimal,
    pub meals: Decimal,
    pub transport: Decimal,
    pub extras: Decimal,
    pub total: Decimal,
    pub per_student: Decimal,
}

impl From<&QuoteResult> for PriceBreakdown {
    fn from(quote: &QuoteResult) -> Self {
        Self {
            base_students: quote.base_students,
            base_adults: quote.base_adults,
            meals: quote.meals,
            transport: quote.transport,
            extras: quote.extras,
            total: quote.total,
            per_student: quote.per_student,
        }
    }
}

/// Booking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub client_id: Uuid,
    pub trip_id: Uuid,
    pub config: BookingConfig,
    pub price_breakdown: PriceBreakdown,
    pub status: BookingStatus,

    /// Seats taken from the availability ledger, zero when the date is untracked
    pub reserved_seats: i32,

    pub client_notes: Option<String>,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_owned_by(&self, client_id: Uuid) -> bool {
        self.client_id == client_id
    }

    /// Apply a planned status change in memory
    pub fn apply(&mut self, change: &StatusChange) {
        self.status = change.status;
        if let Some(notes) = &change.admin_notes {
            self.admin_notes = Some(notes.clone());
        }
        if let Some(reviewer) = change.reviewed_by {
            self.reviewed_by = Some(reviewer);
        }
        if let Some(at) = change.reviewed_at {
            self.reviewed_at = Some(at);
        }
        if let Some(at) = change.confirmed_at {
            self.confirmed_at = Some(at);
        }
        if let Some(at) = change.cancelled_at {
            self.cancelled_at = Some(at);
        }
        if let Some(reason) = &change.cancellation_reason {
            self.cancellation_reason = Some(reason.clone());
        }
        self.updated_at = change.at;
    }
}

/// Data for a booking about to be persisted
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub client_id: Uuid,
    pub trip_id: Uuid,
    pub config: BookingConfig,
    pub price_breakdown: PriceBreakdown,
    pub reserved_seats: i32,
    pub client_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated status transition, applied by the store only if the booking
/// is still in `from`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub from: BookingStatus,
    pub status: BookingStatus,
    pub at: DateTime<Utc>,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
}

impl StatusChange {
    pub fn new(from: BookingStatus, status: BookingStatus, at: DateTime<Utc>) -> Self {
        Self {
            from,
            status,
            at,
            admin_notes: None,
            reviewed_by: None,
            reviewed_at: None,
            confirmed_at: None,
            cancelled_at: None,
            cancellation_reason: None,
        }
    }
}

/// Filters for booking listings
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub client_id: Option<Uuid>,
    pub trip_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use BookingStatus::*;

        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Confirmed));
        assert!(!Pending.can_transition_to(Cancelled));

        assert!(Approved.can_transition_to(Confirmed));
        assert!(Approved.can_transition_to(Cancelled));
        assert!(!Approved.can_transition_to(Rejected));

        assert!(Confirmed.can_transition_to(Cancelled));
        assert_eq!(Confirmed.allowed_next_states().len(), 1);

        assert!(Rejected.allowed_next_states().is_empty());
        assert!(Cancelled.allowed_next_states().is_empty());
    }

    #[test]
    fn test_no_self_transitions() {
        for status in BookingStatus::ALL {
            assert!(!status.can_transition_to(status), "{status} -> {status}");
        }
    }

    #[test]
    fn test_closed_states() {
        assert!(BookingStatus::Cancelled.is_closed());
        assert!(BookingStatus::Rejected.is_closed());
        assert!(!BookingStatus::Confirmed.is_closed());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&BookingStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
        assert_eq!(BookingStatus::from_str("REJECTED"), Some(BookingStatus::Rejected));
        assert_eq!(BookingStatus::from_str("archived"), None);
    }
}
