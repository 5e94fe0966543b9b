//! Availability slot repository implementation
//!
//! All booked-count changes are single-statement updates so that concurrent
//! bookings for one (trip, date) never lose increments.

use async_trait::async_trait;
use campustrip_core::models::{AvailabilitySlot, SeatReservation};
use campustrip_core::traits::AvailabilityRepository;
use campustrip_core::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct SlotRow {
    id: Uuid,
    trip_id: Uuid,
    slot_date: NaiveDate,
    total_capacity: i32,
    booked_count: i32,
    is_available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SlotRow> for AvailabilitySlot {
    fn from(row: SlotRow) -> Self {
        AvailabilitySlot {
            id: row.id,
            trip_id: row.trip_id,
            date: row.slot_date,
            total_capacity: row.total_capacity,
            booked_count: row.booked_count,
            is_available: row.is_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL implementation of the availability ledger storage
pub struct PgAvailabilityRepository {
    pool: PgPool,
}

impl PgAvailabilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for PgAvailabilityRepository {
    #[instrument(skip(self))]
    async fn upsert(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        total_capacity: i32,
        is_available: bool,
    ) -> AppResult<AvailabilitySlot> {
        let row = sqlx::query_as::<sqlx::Postgres, SlotRow>(
            r#"
            INSERT INTO availability_slots (id, trip_id, slot_date, total_capacity, is_available)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (trip_id, slot_date) DO UPDATE SET
                total_capacity = EXCLUDED.total_capacity,
                is_available = EXCLUDED.is_available,
                updated_at = NOW()
            RETURNING
                id, trip_id, slot_date, total_capacity, booked_count,
                is_available, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(trip_id)
        .bind(date)
        .bind(total_capacity)
        .bind(is_available)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error upserting slot {} {}: {}", trip_id, date, e);
            AppError::Database(format!("Failed to upsert availability: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn list_slots(
        &self,
        trip_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        only_available: bool,
    ) -> AppResult<Vec<AvailabilitySlot>> {
        let rows = sqlx::query_as::<sqlx::Postgres, SlotRow>(
            r#"
            SELECT
                id, trip_id, slot_date, total_capacity, booked_count,
                is_available, created_at, updated_at
            FROM availability_slots
            WHERE trip_id = $1
              AND ($2::date IS NULL OR slot_date >= $2)
              AND ($3::date IS NULL OR slot_date <= $3)
              AND (NOT $4 OR is_available)
            ORDER BY slot_date ASC
            "#,
        )
        .bind(trip_id)
        .bind(from)
        .bind(to)
        .bind(only_available)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing availability for {}: {}", trip_id, e);
            AppError::Database(format!("Failed to list availability: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find(&self, trip_id: Uuid, date: NaiveDate) -> AppResult<Option<AvailabilitySlot>> {
        let row = sqlx::query_as::<sqlx::Postgres, SlotRow>(
            r#"
            SELECT
                id, trip_id, slot_date, total_capacity, booked_count,
                is_available, created_at, updated_at
            FROM availability_slots
            WHERE trip_id = $1 AND slot_date = $2
            "#,
        )
        .bind(trip_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding slot {} {}: {}", trip_id, date, e);
            AppError::Database(format!("Failed to find availability: {}", e))
        })?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn increment_booked(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        count: i32,
    ) -> AppResult<Option<AvailabilitySlot>> {
        let row = sqlx::query_as::<sqlx::Postgres, SlotRow>(
            r#"
            UPDATE availability_slots
            SET booked_count = booked_count + $3, updated_at = NOW()
            WHERE trip_id = $1 AND slot_date = $2
            RETURNING
                id, trip_id, slot_date, total_capacity, booked_count,
                is_available, created_at, updated_at
            "#,
        )
        .bind(trip_id)
        .bind(date)
        .bind(count)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error incrementing slot {} {}: {}", trip_id, date, e);
            AppError::Database(format!("Failed to update booked count: {}", e))
        })?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn reserve_seats(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        count: i32,
    ) -> AppResult<SeatReservation> {
        let row = sqlx::query_as::<sqlx::Postgres, SlotRow>(
            r#"
            UPDATE availability_slots
            SET booked_count = booked_count + $3, updated_at = NOW()
            WHERE trip_id = $1
              AND slot_date = $2
              AND is_available
              AND $3 >= 0
              AND booked_count + $3 <= total_capacity
            RETURNING
                id, trip_id, slot_date, total_capacity, booked_count,
                is_available, created_at, updated_at
            "#,
        )
        .bind(trip_id)
        .bind(date)
        .bind(count)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error reserving seats on {} {}: {}", trip_id, date, e);
            AppError::Database(format!("Failed to reserve seats: {}", e))
        })?;

        if let Some(row) = row {
            debug!("Reserved {} seats on {} {}", count, trip_id, date);
            return Ok(SeatReservation::Reserved(row.into()));
        }

        match self.find(trip_id, date).await? {
            Some(slot) => {
                warn!(
                    "Slot {} {} cannot take {} seats ({} remaining)",
                    trip_id,
                    date,
                    count,
                    slot.remaining()
                );
                Ok(SeatReservation::Insufficient(slot))
            }
            None => Ok(SeatReservation::Untracked),
        }
    }

    #[instrument(skip(self))]
    async fn release_seats(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        count: i32,
    ) -> AppResult<Option<AvailabilitySlot>> {
        let row = sqlx::query_as::<sqlx::Postgres, SlotRow>(
            r#"
            UPDATE availability_slots
            SET booked_count = GREATEST(booked_count - $3, 0), updated_at = NOW()
            WHERE trip_id = $1 AND slot_date = $2
            RETURNING
                id, trip_id, slot_date, total_capacity, booked_count,
                is_available, created_at, updated_at
            "#,
        )
        .bind(trip_id)
        .bind(date)
        .bind(count)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error releasing seats on {} {}: {}", trip_id, date, e);
            AppError::Database(format!("Failed to release seats: {}", e))
        })?;

        Ok(row.map(Into::into))
    }
}
