//! Trip catalog repository
//!
//! Read-only view over the `trips` table maintained by the catalog service.

use async_trait::async_trait;
use campustrip_core::models::{PriceConfig, Trip};
use campustrip_core::traits::TripCatalog;
use campustrip_core::{AppError, AppResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use tracing::{debug, error, instrument};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct TripRow {
    id: Uuid,
    title: String,
    destination: String,
    duration_days: i32,
    price_config: Json<PriceConfig>,
    available_extras: Json<HashMap<String, Decimal>>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<TripRow> for Trip {
    fn from(row: TripRow) -> Self {
        Trip {
            id: row.id,
            title: row.title,
            destination: row.destination,
            duration_days: row.duration_days,
            price_config: row.price_config.0,
            available_extras: row.available_extras.0,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL implementation of the trip catalog
pub struct PgTripRepository {
    pool: PgPool,
}

impl PgTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TripCatalog for PgTripRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Trip>> {
        debug!("Finding trip by id: {}", id);

        let row = sqlx::query_as::<sqlx::Postgres, TripRow>(
            r#"
            SELECT
                id, title, destination, duration_days,
                price_config, available_extras, is_active, created_at
            FROM trips
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding trip {}: {}", id, e);
            AppError::Database(format!("Failed to find trip: {}", e))
        })?;

        Ok(row.map(Into::into))
    }
}
