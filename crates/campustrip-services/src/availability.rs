//! Availability ledger
//!
//! Capacity per (trip, date). Upserts are idempotent and never check
//! `booked_count` against the new capacity.

use campustrip_core::models::{AvailabilitySlot, CapacityEntry, SeatReservation};
use campustrip_core::traits::AvailabilityRepository;
use campustrip_core::{AppError, AppResult};
use chrono::NaiveDate;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// One failed entry of a bulk upload
#[derive(Debug, Clone, Serialize)]
pub struct BulkFailure {
    pub date: NaiveDate,
    pub error: String,
}

/// Outcome of a bulk upload; entries succeed or fail independently
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkUpsertSummary {
    pub upserted: Vec<AvailabilitySlot>,
    pub failed: Vec<BulkFailure>,
}

fn validate_capacity(capacity: i32) -> AppResult<()> {
    if capacity < 0 {
        return Err(AppError::Validation(
            "capacity cannot be negative".to_string(),
        ));
    }
    Ok(())
}

pub struct AvailabilityLedger {
    slots: Arc<dyn AvailabilityRepository>,
}

impl AvailabilityLedger {
    pub fn new(slots: Arc<dyn AvailabilityRepository>) -> Self {
        Self { slots }
    }

    #[instrument(skip(self))]
    pub async fn upsert(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        total_capacity: i32,
        is_available: bool,
    ) -> AppResult<AvailabilitySlot> {
        validate_capacity(total_capacity)?;
        let slot = self
            .slots
            .upsert(trip_id, date, total_capacity, is_available)
            .await?;
        debug!("Slot {} {} now holds {} seats", trip_id, date, total_capacity);
        Ok(slot)
    }

    /// Upsert each entry on its own; a date is open iff its capacity is positive
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub async fn bulk_upsert(
        &self,
        trip_id: Uuid,
        entries: &[CapacityEntry],
    ) -> BulkUpsertSummary {
        let results = join_all(
            entries
                .iter()
                .map(|entry| self.upsert(trip_id, entry.date, entry.capacity, entry.capacity > 0)),
        )
        .await;

        let mut summary = BulkUpsertSummary::default();
        for (entry, result) in entries.iter().zip(results) {
            match result {
                Ok(slot) => summary.upserted.push(slot),
                Err(e) => {
                    warn!("Bulk upsert failed for {} {}: {}", trip_id, entry.date, e);
                    summary.failed.push(BulkFailure {
                        date: entry.date,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Bulk availability for trip {}: {} upserted, {} failed",
            trip_id,
            summary.upserted.len(),
            summary.failed.len()
        );
        summary
    }

    pub async fn get_for_trip(
        &self,
        trip_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<AvailabilitySlot>> {
        self.slots.list_slots(trip_id, from, to, false).await
    }

    /// Open slots within `from..=to`; an inverted range matches nothing
    pub async fn get_available_dates(
        &self,
        trip_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<AvailabilitySlot>> {
        self.slots.list_slots(trip_id, Some(from), Some(to), true).await
    }

    /// Unconditionally count `count` more seats as booked
    #[instrument(skip(self))]
    pub async fn decrement_capacity(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        count: i32,
    ) -> AppResult<Option<AvailabilitySlot>> {
        let slot = self.slots.increment_booked(trip_id, date, count).await?;
        if slot.is_none() {
            debug!("No slot for {} {}, nothing to decrement", trip_id, date);
        }
        Ok(slot)
    }

    /// Take seats only if the slot is open and has room
    pub async fn reserve(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        count: i32,
    ) -> AppResult<SeatReservation> {
        self.slots.reserve_seats(trip_id, date, count).await
    }

    /// Give seats back, never going below zero
    #[instrument(skip(self))]
    pub async fn release_capacity(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        count: i32,
    ) -> AppResult<Option<AvailabilitySlot>> {
        self.slots.release_seats(trip_id, date, count).await
    }
}
