//! Per-date capacity ledger

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Capacity record for one (trip, date) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub date: NaiveDate,
    pub total_capacity: i32,
    pub booked_count: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilitySlot {
    /// Seats left, never negative even when an upsert shrank capacity below bookings
    pub fn remaining(&self) -> i32 {
        (self.total_capacity - self.booked_count).max(0)
    }

    pub fn can_accommodate(&self, seats: i32) -> bool {
        self.is_available
            && seats >= 0
            && self
                .booked_count
                .checked_add(seats)
                .is_some_and(|booked| booked <= self.total_capacity)
    }
}

/// One entry of a bulk capacity upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityEntry {
    pub date: NaiveDate,
    pub capacity: i32,
}

/// Result of a guarded seat reservation
#[derive(Debug, Clone, PartialEq)]
pub enum SeatReservation {
    /// Seats were added to `booked_count`
    Reserved(AvailabilitySlot),
    /// The slot is closed or lacks room; nothing changed
    Insufficient(AvailabilitySlot),
    /// No slot exists for that date
    Untracked,
}
