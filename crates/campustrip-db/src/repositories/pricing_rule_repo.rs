//! Pricing rule repository implementation

use async_trait::async_trait;
use campustrip_core::models::{
    DiscountType, NewPricingRule, PricingRule, PricingRuleUpdate, RuleType,
};
use campustrip_core::traits::PricingRuleRepository;
use campustrip_core::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct PricingRuleRow {
    id: Uuid,
    trip_id: Option<Uuid>,
    name: String,
    rule_type: String,
    discount_type: String,
    discount_value: Decimal,
    min_students: Option<i32>,
    max_students: Option<i32>,
    valid_from: Option<NaiveDate>,
    valid_to: Option<NaiveDate>,
    days_before_trip: Option<i32>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PricingRuleRow> for PricingRule {
    type Error = AppError;

    fn try_from(row: PricingRuleRow) -> Result<Self, Self::Error> {
        let discount_type = DiscountType::from_str(&row.discount_type).ok_or_else(|| {
            AppError::Database(format!(
                "Unknown discount type '{}' on rule {}",
                row.discount_type, row.id
            ))
        })?;

        Ok(PricingRule {
            id: row.id,
            trip_id: row.trip_id,
            name: row.name,
            rule_type: RuleType::from_str(&row.rule_type).unwrap_or_default(),
            discount_type,
            discount_value: row.discount_value,
            min_students: row.min_students,
            max_students: row.max_students,
            valid_from: row.valid_from,
            valid_to: row.valid_to,
            days_before_trip: row.days_before_trip,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_rules(rows: Vec<PricingRuleRow>) -> AppResult<Vec<PricingRule>> {
    rows.into_iter().map(PricingRule::try_from).collect()
}

/// PostgreSQL implementation of the pricing rule repository
pub struct PgPricingRuleRepository {
    pool: PgPool,
}

impl PgPricingRuleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PricingRuleRepository for PgPricingRuleRepository {
    #[instrument(skip(self))]
    async fn list_for_trip(&self, trip_id: Uuid) -> AppResult<Vec<PricingRule>> {
        debug!("Loading candidate rules for trip {}", trip_id);

        let rows = sqlx::query_as::<sqlx::Postgres, PricingRuleRow>(
            r#"
            SELECT
                id, trip_id, name, rule_type, discount_type, discount_value,
                min_students, max_students, valid_from, valid_to,
                days_before_trip, is_active, created_at, updated_at
            FROM pricing_rules
            WHERE trip_id = $1 OR trip_id IS NULL
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error loading rules for trip {}: {}", trip_id, e);
            AppError::Database(format!("Failed to load pricing rules: {}", e))
        })?;

        into_rules(rows)
    }

    #[instrument(skip(self))]
    async fn list(&self, trip_id: Option<Uuid>) -> AppResult<Vec<PricingRule>> {
        debug!("Listing pricing rules, trip filter: {:?}", trip_id);

        let rows = sqlx::query_as::<sqlx::Postgres, PricingRuleRow>(
            r#"
            SELECT
                id, trip_id, name, rule_type, discount_type, discount_value,
                min_students, max_students, valid_from, valid_to,
                days_before_trip, is_active, created_at, updated_at
            FROM pricing_rules
            WHERE ($1::uuid IS NULL OR trip_id = $1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing pricing rules: {}", e);
            AppError::Database(format!("Failed to list pricing rules: {}", e))
        })?;

        into_rules(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PricingRule>> {
        let row = sqlx::query_as::<sqlx::Postgres, PricingRuleRow>(
            r#"
            SELECT
                id, trip_id, name, rule_type, discount_type, discount_value,
                min_students, max_students, valid_from, valid_to,
                days_before_trip, is_active, created_at, updated_at
            FROM pricing_rules
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding pricing rule {}: {}", id, e);
            AppError::Database(format!("Failed to find pricing rule: {}", e))
        })?;

        row.map(PricingRule::try_from).transpose()
    }

    #[instrument(skip(self, rule), fields(name = %rule.name))]
    async fn create(&self, rule: &NewPricingRule) -> AppResult<PricingRule> {
        let row = sqlx::query_as::<sqlx::Postgres, PricingRuleRow>(
            r#"
            INSERT INTO pricing_rules (
                id, trip_id, name, rule_type, discount_type, discount_value,
                min_students, max_students, valid_from, valid_to,
                days_before_trip, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING
                id, trip_id, name, rule_type, discount_type, discount_value,
                min_students, max_students, valid_from, valid_to,
                days_before_trip, is_active, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(rule.trip_id)
        .bind(&rule.name)
        .bind(rule.rule_type.to_string())
        .bind(rule.discount_type.to_string())
        .bind(rule.discount_value)
        .bind(rule.min_students)
        .bind(rule.max_students)
        .bind(rule.valid_from)
        .bind(rule.valid_to)
        .bind(rule.days_before_trip)
        .bind(rule.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating pricing rule: {}", e);
            AppError::Database(format!("Failed to create pricing rule: {}", e))
        })?;

        info!("Created pricing rule {}", row.id);
        PricingRule::try_from(row)
    }

    #[instrument(skip(self, update))]
    async fn update(
        &self,
        id: Uuid,
        update: &PricingRuleUpdate,
    ) -> AppResult<Option<PricingRule>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to begin transaction: {}", e);
            AppError::Transaction(format!("Failed to begin transaction: {}", e))
        })?;

        let current = sqlx::query_as::<sqlx::Postgres, PricingRuleRow>(
            r#"
            SELECT
                id, trip_id, name, rule_type, discount_type, discount_value,
                min_students, max_students, valid_from, valid_to,
                days_before_trip, is_active, created_at, updated_at
            FROM pricing_rules
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error locking pricing rule {}: {}", id, e);
            AppError::Database(format!("Failed to load pricing rule: {}", e))
        })?;

        let Some(current) = current else {
            return Ok(None);
        };

        let mut rule = PricingRule::try_from(current)?;
        update.apply_to(&mut rule, Utc::now());

        let row = sqlx::query_as::<sqlx::Postgres, PricingRuleRow>(
            r#"
            UPDATE pricing_rules SET
                name = $2, rule_type = $3, discount_type = $4, discount_value = $5,
                min_students = $6, max_students = $7, valid_from = $8, valid_to = $9,
                days_before_trip = $10, is_active = $11, updated_at = $12
            WHERE id = $1
            RETURNING
                id, trip_id, name, rule_type, discount_type, discount_value,
                min_students, max_students, valid_from, valid_to,
                days_before_trip, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&rule.name)
        .bind(rule.rule_type.to_string())
        .bind(rule.discount_type.to_string())
        .bind(rule.discount_value)
        .bind(rule.min_students)
        .bind(rule.max_students)
        .bind(rule.valid_from)
        .bind(rule.valid_to)
        .bind(rule.days_before_trip)
        .bind(rule.is_active)
        .bind(rule.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error updating pricing rule {}: {}", id, e);
            AppError::Database(format!("Failed to update pricing rule: {}", e))
        })?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit pricing rule update: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        PricingRule::try_from(row).map(Some)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM pricing_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting pricing rule {}: {}", id, e);
                AppError::Database(format!("Failed to delete pricing rule: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::run_migrations;
    use rust_decimal_macros::dec;

    #[tokio::test]
    #[ignore] // Requires database
    async fn test_discount_value_round_trips_at_full_scale() {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/campustrip".to_string());
        let pool = PgPool::connect(&url).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = PgPricingRuleRepository::new(pool);

        let created = repo
            .create(&NewPricingRule {
                trip_id: None,
                name: "One third off".to_string(),
                rule_type: RuleType::Flat,
                discount_type: DiscountType::Percentage,
                discount_value: dec!(33.333),
                min_students: None,
                max_students: None,
                valid_from: None,
                valid_to: None,
                days_before_trip: None,
                is_active: false,
            })
            .await
            .unwrap();

        let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.discount_value, dec!(33.333));
        assert!(repo.delete(created.id).await.unwrap());
    }
}
