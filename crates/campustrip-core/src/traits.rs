//! Storage seams for the booking core
//!
//! Services depend on these traits only; `campustrip-db` provides the
//! PostgreSQL and in-memory implementations.

use crate::error::AppError;
use crate::models::{
    AvailabilitySlot, Booking, BookingFilter, NewBooking, NewPricingRule, PricingRule,
    PricingRuleUpdate, SeatReservation, StatusChange, Trip,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// Read-only access to the trip catalog
#[async_trait]
pub trait TripCatalog: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Trip>, AppError>;
}

/// Pricing rule storage
#[async_trait]
pub trait PricingRuleRepository: Send + Sync {
    /// Rules scoped to `trip_id` plus global rules, oldest first
    async fn list_for_trip(&self, trip_id: Uuid) -> Result<Vec<PricingRule>, AppError>;

    /// Admin listing, newest first, optionally restricted to one trip's rules
    async fn list(&self, trip_id: Option<Uuid>) -> Result<Vec<PricingRule>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PricingRule>, AppError>;

    async fn create(&self, rule: &NewPricingRule) -> Result<PricingRule, AppError>;

    async fn update(
        &self,
        id: Uuid,
        update: &PricingRuleUpdate,
    ) -> Result<Option<PricingRule>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Booking storage
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &NewBooking) -> Result<Booking, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError>;

    /// Filtered listing, newest first, with the total match count
    async fn list_filtered(
        &self,
        filter: &BookingFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Booking>, i64), AppError>;

    /// Every booking, newest first
    async fn list_all(&self) -> Result<Vec<Booking>, AppError>;

    /// Compare-and-swap: applies `change` only while the stored status still
    /// equals `change.from`. Returns `None` when the booking is missing or
    /// its status moved on.
    async fn apply_transition(
        &self,
        id: Uuid,
        change: &StatusChange,
    ) -> Result<Option<Booking>, AppError>;
}

/// Per-date capacity storage
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Create or replace the slot for (trip, date); `booked_count` is preserved
    async fn upsert(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        total_capacity: i32,
        is_available: bool,
    ) -> Result<AvailabilitySlot, AppError>;

    /// Slots ordered by date, optionally bounded and restricted to open ones
    async fn list_slots(
        &self,
        trip_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        only_available: bool,
    ) -> Result<Vec<AvailabilitySlot>, AppError>;

    async fn find(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AvailabilitySlot>, AppError>;

    /// Atomically add `count` to `booked_count` with no capacity check
    async fn increment_booked(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        count: i32,
    ) -> Result<Option<AvailabilitySlot>, AppError>;

    /// Atomically add `count` only if the slot is open and has room
    async fn reserve_seats(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        count: i32,
    ) -> Result<SeatReservation, AppError>;

    /// Atomically subtract `count`, flooring `booked_count` at zero
    async fn release_seats(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        count: i32,
    ) -> Result<Option<AvailabilitySlot>, AppError>;
}

/// Pagination parameters
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64, max_per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, max_per_page.max(1)),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}
