//! Booking repository implementation
//!
//! Status changes go through a conditional `UPDATE ... WHERE status = $expected`,
//! so two concurrent transitions on one booking can never both succeed.

use async_trait::async_trait;
use campustrip_core::models::{
    Booking, BookingConfig, BookingFilter, BookingStatus, NewBooking, PriceBreakdown,
    StatusChange, TransportType,
};
use campustrip_core::traits::BookingRepository;
use campustrip_core::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = r#"
    id, client_id, trip_id, students, adults, start_date, meals_per_day,
    transport_type, selected_extras, base_students, base_adults, meals,
    transport, extras, total, per_student, reserved_seats, status,
    client_notes, admin_notes, reviewed_by, reviewed_at, confirmed_at,
    cancelled_at, cancellation_reason, created_at, updated_at
"#;

#[derive(Debug, FromRow)]
struct BookingRow {
    id: Uuid,
    client_id: Uuid,
    trip_id: Uuid,
    students: i32,
    adults: i32,
    start_date: NaiveDate,
    meals_per_day: i32,
    transport_type: String,
    selected_extras: Vec<String>,
    base_students: Decimal,
    base_adults: Decimal,
    meals: Decimal,
    transport: Decimal,
    extras: Decimal,
    total: Decimal,
    per_student: Decimal,
    reserved_seats: i32,
    status: String,
    client_notes: Option<String>,
    admin_notes: Option<String>,
    reviewed_by: Option<Uuid>,
    reviewed_at: Option<DateTime<Utc>>,
    confirmed_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    cancellation_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = BookingStatus::from_str(&row.status).ok_or_else(|| {
            AppError::Database(format!("Unknown status '{}' on booking {}", row.status, row.id))
        })?;
        let transport_type = TransportType::from_str(&row.transport_type).ok_or_else(|| {
            AppError::Database(format!(
                "Unknown transport '{}' on booking {}",
                row.transport_type, row.id
            ))
        })?;

        Ok(Booking {
            id: row.id,
            client_id: row.client_id,
            trip_id: row.trip_id,
            config: BookingConfig {
                students: row.students,
                adults: row.adults,
                start_date: row.start_date,
                meals_per_day: row.meals_per_day,
                transport_type,
                selected_extras: row.selected_extras,
            },
            price_breakdown: PriceBreakdown {
                base_students: row.base_students,
                base_adults: row.base_adults,
                meals: row.meals,
                transport: row.transport,
                extras: row.extras,
                total: row.total,
                per_student: row.per_student,
            },
            status,
            reserved_seats: row.reserved_seats,
            client_notes: row.client_notes,
            admin_notes: row.admin_notes,
            reviewed_by: row.reviewed_by,
            reviewed_at: row.reviewed_at,
            confirmed_at: row.confirmed_at,
            cancelled_at: row.cancelled_at,
            cancellation_reason: row.cancellation_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_bookings(rows: Vec<BookingRow>) -> AppResult<Vec<Booking>> {
    rows.into_iter().map(Booking::try_from).collect()
}

/// PostgreSQL implementation of the booking repository
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    #[instrument(skip(self, booking), fields(trip_id = %booking.trip_id, client_id = %booking.client_id))]
    async fn create(&self, booking: &NewBooking) -> AppResult<Booking> {
        let query = format!(
            r#"
            INSERT INTO bookings (
                id, client_id, trip_id, students, adults, start_date, meals_per_day,
                transport_type, selected_extras, base_students, base_adults, meals,
                transport, extras, total, per_student, reserved_seats, status,
                client_notes, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $20
            )
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        let config = &booking.config;
        let price = &booking.price_breakdown;

        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(Uuid::now_v7())
            .bind(booking.client_id)
            .bind(booking.trip_id)
            .bind(config.students)
            .bind(config.adults)
            .bind(config.start_date)
            .bind(config.meals_per_day)
            .bind(config.transport_type.to_string())
            .bind(&config.selected_extras)
            .bind(price.base_students)
            .bind(price.base_adults)
            .bind(price.meals)
            .bind(price.transport)
            .bind(price.extras)
            .bind(price.total)
            .bind(price.per_student)
            .bind(booking.reserved_seats)
            .bind(BookingStatus::Pending.as_str())
            .bind(&booking.client_notes)
            .bind(booking.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error creating booking: {}", e);
                AppError::Database(format!("Failed to create booking: {}", e))
            })?;

        info!("Created booking {}", row.id);
        Booking::try_from(row)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        debug!("Finding booking by id: {}", id);

        let query = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");
        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding booking {}: {}", id, e);
                AppError::Database(format!("Failed to find booking: {}", e))
            })?;

        row.map(Booking::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_filtered(
        &self,
        filter: &BookingFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Booking>, i64)> {
        let status = filter.status.map(|s| s.as_str());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM bookings
            WHERE ($1::uuid IS NULL OR client_id = $1)
              AND ($2::uuid IS NULL OR trip_id = $2)
              AND ($3::text IS NULL OR status = $3)
            "#,
        )
        .bind(filter.client_id)
        .bind(filter.trip_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error counting bookings: {}", e);
            AppError::Database(format!("Failed to count bookings: {}", e))
        })?;

        let query = format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE ($1::uuid IS NULL OR client_id = $1)
              AND ($2::uuid IS NULL OR trip_id = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY created_at DESC, id DESC
            LIMIT $4 OFFSET $5
            "#
        );

        let rows = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(filter.client_id)
            .bind(filter.trip_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error listing bookings: {}", e);
                AppError::Database(format!("Failed to list bookings: {}", e))
            })?;

        Ok((into_bookings(rows)?, total))
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> AppResult<Vec<Booking>> {
        let query =
            format!("SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC, id DESC");

        let rows = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error listing all bookings: {}", e);
                AppError::Database(format!("Failed to list bookings: {}", e))
            })?;

        into_bookings(rows)
    }

    #[instrument(skip(self, change), fields(from = %change.from, to = %change.status))]
    async fn apply_transition(
        &self,
        id: Uuid,
        change: &StatusChange,
    ) -> AppResult<Option<Booking>> {
        let query = format!(
            r#"
            UPDATE bookings SET
                status = $3,
                admin_notes = COALESCE($4, admin_notes),
                reviewed_by = COALESCE($5, reviewed_by),
                reviewed_at = COALESCE($6, reviewed_at),
                confirmed_at = COALESCE($7, confirmed_at),
                cancelled_at = COALESCE($8, cancelled_at),
                cancellation_reason = COALESCE($9, cancellation_reason),
                updated_at = $10
            WHERE id = $1 AND status = $2
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(id)
            .bind(change.from.as_str())
            .bind(change.status.as_str())
            .bind(&change.admin_notes)
            .bind(change.reviewed_by)
            .bind(change.reviewed_at)
            .bind(change.confirmed_at)
            .bind(change.cancelled_at)
            .bind(&change.cancellation_reason)
            .bind(change.at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error updating booking {} status: {}", id, e);
                AppError::Database(format!("Failed to update booking status: {}", e))
            })?;

        if row.is_none() {
            debug!("Status guard did not match for booking {}", id);
        }

        row.map(Booking::try_from).transpose()
    }
}
