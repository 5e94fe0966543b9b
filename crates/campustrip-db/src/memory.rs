//! In-process store implementing every repository trait
//!
//! Used by tests and by `memory://` database URLs for local runs. Each
//! operation holds the write lock for its whole read-modify-write, which gives
//! the same atomicity as the single-statement SQL updates.

use async_trait::async_trait;
use campustrip_core::clock::{Clock, SystemClock};
use campustrip_core::models::{
    AvailabilitySlot, Booking, BookingFilter, NewBooking, NewPricingRule, PricingRule,
    PricingRuleUpdate, SeatReservation, StatusChange, Trip,
};
use campustrip_core::traits::{
    AvailabilityRepository, BookingRepository, PricingRuleRepository, TripCatalog,
};
use campustrip_core::AppResult;
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    trips: HashMap<Uuid, Trip>,
    // insertion order doubles as creation order
    rules: Vec<PricingRule>,
    bookings: Vec<Booking>,
    slots: BTreeMap<(Uuid, NaiveDate), AvailabilitySlot>,
}

/// Thread-safe in-memory repository set
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            clock,
        }
    }

    /// Seed the catalog with a trip
    pub fn insert_trip(&self, trip: Trip) {
        debug!("Seeding trip {}", trip.id);
        self.tables.write().trips.insert(trip.id, trip);
    }

    /// Load a JSON array of trips into the catalog
    pub fn seed_trips_from_file(&self, path: &Path) -> AppResult<usize> {
        let raw = std::fs::read_to_string(path)?;
        let trips: Vec<Trip> = serde_json::from_str(&raw)?;
        let count = trips.len();
        for trip in trips {
            self.insert_trip(trip);
        }
        info!("Seeded {} trips from {}", count, path.display());
        Ok(count)
    }

    pub fn booking_count(&self) -> usize {
        self.tables.read().bookings.len()
    }
}

/// Newest first; among equal timestamps the later insertion wins
fn newest_first<T, F>(items: impl DoubleEndedIterator<Item = T>, created: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    let mut out: Vec<T> = items.rev().collect();
    out.sort_by_key(|item| Reverse(created(item)));
    out
}

#[async_trait]
impl TripCatalog for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Trip>> {
        Ok(self.tables.read().trips.get(&id).cloned())
    }
}

#[async_trait]
impl PricingRuleRepository for InMemoryStore {
    async fn list_for_trip(&self, trip_id: Uuid) -> AppResult<Vec<PricingRule>> {
        let tables = self.tables.read();
        let mut rules: Vec<PricingRule> = tables
            .rules
            .iter()
            .filter(|r| r.applies_to_trip(trip_id))
            .cloned()
            .collect();
        rules.sort_by_key(|r| r.created_at);
        Ok(rules)
    }

    async fn list(&self, trip_id: Option<Uuid>) -> AppResult<Vec<PricingRule>> {
        let tables = self.tables.read();
        let matching = tables
            .rules
            .iter()
            .filter(|r| trip_id.map_or(true, |t| r.trip_id == Some(t)))
            .cloned();
        Ok(newest_first(matching, |r| r.created_at))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PricingRule>> {
        Ok(self.tables.read().rules.iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, rule: &NewPricingRule) -> AppResult<PricingRule> {
        let now = self.clock.now();
        let created = PricingRule {
            id: Uuid::now_v7(),
            trip_id: rule.trip_id,
            name: rule.name.clone(),
            rule_type: rule.rule_type,
            discount_type: rule.discount_type,
            discount_value: rule.discount_value,
            min_students: rule.min_students,
            max_students: rule.max_students,
            valid_from: rule.valid_from,
            valid_to: rule.valid_to,
            days_before_trip: rule.days_before_trip,
            is_active: rule.is_active,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().rules.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, update: &PricingRuleUpdate) -> AppResult<Option<PricingRule>> {
        let now = self.clock.now();
        let mut tables = self.tables.write();
        Ok(tables.rules.iter_mut().find(|r| r.id == id).map(|rule| {
            update.apply_to(rule, now);
            rule.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.rules.len();
        tables.rules.retain(|r| r.id != id);
        Ok(tables.rules.len() < before)
    }
}

fn matches_filter(booking: &Booking, filter: &BookingFilter) -> bool {
    filter.client_id.map_or(true, |c| booking.client_id == c)
        && filter.trip_id.map_or(true, |t| booking.trip_id == t)
        && filter.status.map_or(true, |s| booking.status == s)
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn create(&self, booking: &NewBooking) -> AppResult<Booking> {
        let created = Booking {
            id: Uuid::now_v7(),
            client_id: booking.client_id,
            trip_id: booking.trip_id,
            config: booking.config.clone(),
            price_breakdown: booking.price_breakdown.clone(),
            status: Default::default(),
            reserved_seats: booking.reserved_seats,
            client_notes: booking.client_notes.clone(),
            admin_notes: None,
            reviewed_by: None,
            reviewed_at: None,
            confirmed_at: None,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: booking.created_at,
            updated_at: booking.created_at,
        };
        self.tables.write().bookings.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        Ok(self.tables.read().bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list_filtered(
        &self,
        filter: &BookingFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Booking>, i64)> {
        let tables = self.tables.read();
        let matching = tables
            .bookings
            .iter()
            .filter(|b| matches_filter(b, filter))
            .cloned();
        let sorted = newest_first(matching, |b| b.created_at);
        let total = sorted.len() as i64;
        let page = sorted
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn list_all(&self) -> AppResult<Vec<Booking>> {
        let tables = self.tables.read();
        Ok(newest_first(tables.bookings.iter().cloned(), |b| b.created_at))
    }

    async fn apply_transition(&self, id: Uuid, change: &StatusChange) -> AppResult<Option<Booking>> {
        let mut tables = self.tables.write();
        Ok(tables
            .bookings
            .iter_mut()
            .find(|b| b.id == id && b.status == change.from)
            .map(|booking| {
                booking.apply(change);
                booking.clone()
            }))
    }
}

#[async_trait]
impl AvailabilityRepository for InMemoryStore {
    async fn upsert(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        total_capacity: i32,
        is_available: bool,
    ) -> AppResult<AvailabilitySlot> {
        let now = self.clock.now();
        let mut tables = self.tables.write();
        let slot = tables
            .slots
            .entry((trip_id, date))
            .and_modify(|slot| {
                slot.total_capacity = total_capacity;
                slot.is_available = is_available;
                slot.updated_at = now;
            })
            .or_insert_with(|| AvailabilitySlot {
                id: Uuid::now_v7(),
                trip_id,
                date,
                total_capacity,
                booked_count: 0,
                is_available,
                created_at: now,
                updated_at: now,
            });
        Ok(slot.clone())
    }

    async fn list_slots(
        &self,
        trip_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        only_available: bool,
    ) -> AppResult<Vec<AvailabilitySlot>> {
        let tables = self.tables.read();
        // BTreeMap keys keep dates ascending within a trip
        Ok(tables
            .slots
            .values()
            .filter(|s| s.trip_id == trip_id)
            .filter(|s| from.map_or(true, |f| s.date >= f))
            .filter(|s| to.map_or(true, |t| s.date <= t))
            .filter(|s| !only_available || s.is_available)
            .cloned()
            .collect())
    }

    async fn find(&self, trip_id: Uuid, date: NaiveDate) -> AppResult<Option<AvailabilitySlot>> {
        Ok(self.tables.read().slots.get(&(trip_id, date)).cloned())
    }

    async fn increment_booked(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        count: i32,
    ) -> AppResult<Option<AvailabilitySlot>> {
        let now = self.clock.now();
        let mut tables = self.tables.write();
        Ok(tables.slots.get_mut(&(trip_id, date)).map(|slot| {
            slot.booked_count = slot.booked_count.saturating_add(count);
            slot.updated_at = now;
            slot.clone()
        }))
    }

    async fn reserve_seats(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        count: i32,
    ) -> AppResult<SeatReservation> {
        let now = self.clock.now();
        let mut tables = self.tables.write();
        Ok(match tables.slots.get_mut(&(trip_id, date)) {
            None => SeatReservation::Untracked,
            Some(slot) if slot.can_accommodate(count) => {
                slot.booked_count += count;
                slot.updated_at = now;
                SeatReservation::Reserved(slot.clone())
            }
            Some(slot) => SeatReservation::Insufficient(slot.clone()),
        })
    }

    async fn release_seats(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        count: i32,
    ) -> AppResult<Option<AvailabilitySlot>> {
        let now = self.clock.now();
        let mut tables = self.tables.write();
        Ok(tables.slots.get_mut(&(trip_id, date)).map(|slot| {
            slot.booked_count = slot.booked_count.saturating_sub(count).max(0);
            slot.updated_at = now;
            slot.clone()
        }))
    }
}
