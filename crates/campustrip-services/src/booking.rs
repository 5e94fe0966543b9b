//! Booking orchestration
//!
//! Creates bookings from quotes and drives them through the lifecycle. Every
//! status write is a guarded compare-and-swap; a lost race is re-planned
//! against the fresh booking a bounded number of times.

use campustrip_core::clock::Clock;
use campustrip_core::config::BookingPolicy;
use campustrip_core::models::{
    Booking, BookingConfig, BookingFilter, BookingStatus, NewBooking, PriceBreakdown,
    QuoteRequest, SeatReservation, StatusChange,
};
use campustrip_core::traits::{BookingRepository, PaginatedResponse, Pagination, PaginationMeta};
use campustrip_core::{AppError, AppResult};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::availability::AvailabilityLedger;
use crate::constants::MAX_TRANSITION_ATTEMPTS;
use crate::lifecycle::{ensure_owner, BookingStateMachine, KanbanBoard};
use crate::quote::QuoteCalculator;

/// A client's booking submission
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub client_id: Uuid,
    pub quote: QuoteRequest,
    pub client_notes: Option<String>,
}

pub struct BookingOrchestrator {
    bookings: Arc<dyn BookingRepository>,
    quotes: Arc<QuoteCalculator>,
    ledger: Arc<AvailabilityLedger>,
    clock: Arc<dyn Clock>,
    policy: BookingPolicy,
}

impl BookingOrchestrator {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        quotes: Arc<QuoteCalculator>,
        ledger: Arc<AvailabilityLedger>,
        clock: Arc<dyn Clock>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            bookings,
            quotes,
            ledger,
            clock,
            policy,
        }
    }

    /// Price the configuration, hold seats when enforced, and store a pending booking
    #[instrument(skip(self, request), fields(client_id = %request.client_id, trip_id = %request.quote.trip_id))]
    pub async fn create(&self, request: CreateBooking) -> AppResult<Booking> {
        let quote = self.quotes.calculate(&request.quote).await?;
        let q = &request.quote;
        let seats = q.travellers().ok_or_else(|| {
            AppError::Validation(
                "students plus adults exceeds the supported group size".to_string(),
            )
        })?;

        let reserved_seats = if self.policy.enforce_capacity {
            match self.ledger.reserve(q.trip_id, q.start_date, seats).await? {
                SeatReservation::Reserved(slot) => {
                    debug!(
                        "Holding {} seats on {} ({} left)",
                        seats,
                        slot.date,
                        slot.remaining()
                    );
                    seats
                }
                SeatReservation::Insufficient(slot) => {
                    let remaining = if slot.is_available { slot.remaining() } else { 0 };
                    warn!(
                        "Trip {} on {} cannot take {} travellers",
                        q.trip_id, q.start_date, seats
                    );
                    return Err(AppError::CapacityExceeded {
                        requested: seats,
                        remaining,
                    });
                }
                SeatReservation::Untracked => {
                    debug!("No capacity tracked for {} on {}", q.trip_id, q.start_date);
                    0
                }
            }
        } else {
            0
        };

        let new_booking = NewBooking {
            client_id: request.client_id,
            trip_id: q.trip_id,
            config: BookingConfig {
                students: q.students,
                adults: q.adults,
                start_date: q.start_date,
                meals_per_day: q.meals_per_day,
                transport_type: q.transport_type,
                selected_extras: q.selected_extras.clone(),
            },
            price_breakdown: PriceBreakdown::from(&quote),
            reserved_seats,
            client_notes: request.client_notes,
            created_at: self.clock.now(),
        };

        match self.bookings.create(&new_booking).await {
            Ok(booking) => {
                info!(
                    "Booking {} created for trip {} (total {})",
                    booking.id, booking.trip_id, booking.price_breakdown.total
                );
                Ok(booking)
            }
            Err(e) => {
                if reserved_seats > 0 {
                    self.release_seats(q.trip_id, q.start_date, reserved_seats).await;
                }
                Err(e)
            }
        }
    }

    /// Load a booking; when `client_id` is given the booking must belong to it
    pub async fn find_by_id(&self, id: Uuid, client_id: Option<Uuid>) -> AppResult<Booking> {
        let booking = self.load(id).await?;
        if let Some(client_id) = client_id {
            ensure_owner(&booking, client_id)?;
        }
        Ok(booking)
    }

    pub async fn list(
        &self,
        filter: BookingFilter,
        page: Option<i64>,
        per_page: Option<i64>,
    ) -> AppResult<PaginatedResponse<Booking>> {
        let pagination = Pagination::new(
            page.unwrap_or(1),
            per_page.unwrap_or(self.policy.default_page_size),
            self.policy.max_page_size,
        );

        let (data, total) = self
            .bookings
            .list_filtered(&filter, pagination.limit(), pagination.offset())
            .await?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(total, pagination.page, pagination.per_page),
        })
    }

    /// Administrator status change
    #[instrument(skip(self, notes))]
    pub async fn update_status(
        &self,
        id: Uuid,
        target: BookingStatus,
        actor_id: Uuid,
        notes: Option<String>,
    ) -> AppResult<Booking> {
        self.transition(id, |booking, now| {
            BookingStateMachine::plan_admin_transition(booking, target, actor_id, notes.clone(), now)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn client_confirm(&self, id: Uuid, client_id: Uuid) -> AppResult<Booking> {
        self.transition(id, |booking, now| {
            BookingStateMachine::plan_client_confirm(booking, client_id, now)
        })
        .await
    }

    #[instrument(skip(self, reason))]
    pub async fn client_cancel(
        &self,
        id: Uuid,
        client_id: Uuid,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        self.transition(id, |booking, now| {
            BookingStateMachine::plan_client_cancel(booking, client_id, reason.clone(), now)
        })
        .await
    }

    /// All bookings grouped by status, newest first within each column
    pub async fn kanban(&self) -> AppResult<KanbanBoard> {
        let bookings = self.bookings.list_all().await?;
        Ok(KanbanBoard::from_bookings(bookings))
    }

    async fn load(&self, id: Uuid) -> AppResult<Booking> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or(AppError::BookingNotFound(id))
    }

    async fn transition<F>(&self, id: Uuid, plan: F) -> AppResult<Booking>
    where
        F: Fn(&Booking, chrono::DateTime<chrono::Utc>) -> AppResult<StatusChange>,
    {
        for attempt in 1..=MAX_TRANSITION_ATTEMPTS {
            let current = self.load(id).await?;
            let change = plan(&current, self.clock.now())?;

            match self.bookings.apply_transition(id, &change).await? {
                Some(updated) => {
                    info!("Booking {} moved {} -> {}", id, change.from, change.status);
                    if updated.status.is_closed() && updated.reserved_seats > 0 {
                        self.release_seats(
                            updated.trip_id,
                            updated.config.start_date,
                            updated.reserved_seats,
                        )
                        .await;
                    }
                    return Ok(updated);
                }
                None => {
                    debug!(
                        "Booking {} changed while moving {} -> {} (attempt {})",
                        id, change.from, change.status, attempt
                    );
                }
            }
        }

        warn!("Giving up on booking {} after concurrent updates", id);
        Err(AppError::Conflict(format!(
            "Booking {} was modified concurrently, retry the request",
            id
        )))
    }

    // The status change is already committed, so a failed release is logged, not returned
    async fn release_seats(&self, trip_id: Uuid, date: chrono::NaiveDate, seats: i32) {
        match self.ledger.release_capacity(trip_id, date, seats).await {
            Ok(_) => debug!("Released {} seats on {} {}", seats, trip_id, date),
            Err(e) => error!(
                "Failed to release {} seats on {} {}: {}",
                seats, trip_id, date, e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount::DiscountRuleEngine;
    use async_trait::async_trait;
    use campustrip_core::clock::FixedClock;
    use campustrip_core::models::{PriceConfig, TransportType, Trip};
    use campustrip_db::InMemoryStore;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use parking_lot::Mutex;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Fixture {
        store: Arc<InMemoryStore>,
        quotes: Arc<QuoteCalculator>,
        ledger: Arc<AvailabilityLedger>,
        clock: Arc<FixedClock>,
        orchestrator: BookingOrchestrator,
        trip: Trip,
    }

    fn fixture(policy: BookingPolicy) -> Fixture {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap(),
        ));
        let store = Arc::new(InMemoryStore::with_clock(clock.clone()));
        let trip = Trip {
            id: Uuid::new_v4(),
            title: "Alpine Science Camp".to_string(),
            destination: "Innsbruck".to_string(),
            duration_days: 3,
            price_config: PriceConfig {
                base_per_student: dec!(120),
                base_per_adult: dec!(90),
                ..Default::default()
            },
            available_extras: HashMap::new(),
            is_active: true,
            created_at: clock.now(),
        };
        store.insert_trip(trip.clone());

        let quotes = Arc::new(QuoteCalculator::new(
            store.clone(),
            DiscountRuleEngine::new(store.clone()),
            clock.clone(),
        ));
        let ledger = Arc::new(AvailabilityLedger::new(store.clone()));
        let orchestrator = BookingOrchestrator::new(
            store.clone(),
            quotes.clone(),
            ledger.clone(),
            clock.clone(),
            policy,
        );

        Fixture {
            store,
            quotes,
            ledger,
            clock,
            orchestrator,
            trip,
        }
    }

    /// Booking storage where another writer lands a status change right
    /// before ours, or wins every race when `always_lose` is set
    struct ContendedBookings {
        store: Arc<InMemoryStore>,
        competing: Mutex<Option<StatusChange>>,
        always_lose: bool,
        writes: AtomicU32,
    }

    impl ContendedBookings {
        fn new(
            store: Arc<InMemoryStore>,
            competing: Option<StatusChange>,
            always_lose: bool,
        ) -> Arc<Self> {
            Arc::new(Self {
                store,
                competing: Mutex::new(competing),
                always_lose,
                writes: AtomicU32::new(0),
            })
        }

        fn writes(&self) -> u32 {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BookingRepository for ContendedBookings {
        async fn create(&self, booking: &NewBooking) -> AppResult<Booking> {
            BookingRepository::create(self.store.as_ref(), booking).await
        }

        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
            BookingRepository::find_by_id(self.store.as_ref(), id).await
        }

        async fn list_filtered(
            &self,
            filter: &BookingFilter,
            limit: i64,
            offset: i64,
        ) -> AppResult<(Vec<Booking>, i64)> {
            self.store.list_filtered(filter, limit, offset).await
        }

        async fn list_all(&self) -> AppResult<Vec<Booking>> {
            self.store.list_all().await
        }

        async fn apply_transition(
            &self,
            id: Uuid,
            change: &StatusChange,
        ) -> AppResult<Option<Booking>> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.always_lose {
                return Ok(None);
            }
            let competing = self.competing.lock().take();
            if let Some(other) = competing {
                self.store.apply_transition(id, &other).await?;
            }
            self.store.apply_transition(id, change).await
        }
    }

    fn contended(f: &Fixture, bookings: Arc<ContendedBookings>) -> BookingOrchestrator {
        BookingOrchestrator::new(
            bookings,
            f.quotes.clone(),
            f.ledger.clone(),
            f.clock.clone(),
            BookingPolicy::default(),
        )
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 18).unwrap()
    }

    fn submission(trip_id: Uuid, client_id: Uuid, students: i32) -> CreateBooking {
        CreateBooking {
            client_id,
            quote: QuoteRequest {
                trip_id,
                students,
                adults: 2,
                start_date: start(),
                meals_per_day: 0,
                transport_type: TransportType::Bus,
                selected_extras: vec![],
            },
            client_notes: Some("Two teachers with dietary needs".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_stores_pending_booking_with_quote() {
        let f = fixture(BookingPolicy::default());
        let client = Uuid::new_v4();

        let booking = f
            .orchestrator
            .create(submission(f.trip.id, client, 10))
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.price_breakdown.base_students, dec!(3600));
        assert_eq!(booking.price_breakdown.base_adults, dec!(540));
        assert_eq!(booking.price_breakdown.total, dec!(4140));
        assert_eq!(booking.price_breakdown.per_student, dec!(414));
        assert_eq!(booking.reserved_seats, 0);
        assert_eq!(booking.created_at, f.clock.now());
    }

    #[tokio::test]
    async fn test_create_reserves_and_rejects_over_capacity() {
        let f = fixture(BookingPolicy::default());
        f.ledger.upsert(f.trip.id, start(), 20, true).await.unwrap();

        let first = f
            .orchestrator
            .create(submission(f.trip.id, Uuid::new_v4(), 15))
            .await
            .unwrap();
        assert_eq!(first.reserved_seats, 17);

        let err = f
            .orchestrator
            .create(submission(f.trip.id, Uuid::new_v4(), 5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::CapacityExceeded { requested: 7, remaining: 3 }
        ));
        assert_eq!(f.store.booking_count(), 1);
    }

    #[tokio::test]
    async fn test_oversized_group_is_rejected_without_touching_seats() {
        let f = fixture(BookingPolicy::default());
        f.ledger.upsert(f.trip.id, start(), 20, true).await.unwrap();

        let err = f
            .orchestrator
            .create(submission(f.trip.id, Uuid::new_v4(), i32::MAX - 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let slots = f.ledger.get_for_trip(f.trip.id, None, None).await.unwrap();
        assert_eq!(slots[0].booked_count, 0);
        assert_eq!(f.store.booking_count(), 0);
    }

    #[tokio::test]
    async fn test_capacity_ignored_when_not_enforced() {
        let f = fixture(BookingPolicy {
            enforce_capacity: false,
            ..Default::default()
        });
        f.ledger.upsert(f.trip.id, start(), 5, true).await.unwrap();

        let booking = f
            .orchestrator
            .create(submission(f.trip.id, Uuid::new_v4(), 30))
            .await
            .unwrap();
        assert_eq!(booking.reserved_seats, 0);
    }

    #[tokio::test]
    async fn test_rejection_releases_seats() {
        let f = fixture(BookingPolicy::default());
        f.ledger.upsert(f.trip.id, start(), 40, true).await.unwrap();
        let booking = f
            .orchestrator
            .create(submission(f.trip.id, Uuid::new_v4(), 18))
            .await
            .unwrap();

        let admin = Uuid::new_v4();
        let rejected = f
            .orchestrator
            .update_status(booking.id, BookingStatus::Rejected, admin, Some("Dates full".to_string()))
            .await
            .unwrap();
        assert_eq!(rejected.reviewed_by, Some(admin));
        assert_eq!(rejected.admin_notes.as_deref(), Some("Dates full"));

        let slots = f.ledger.get_for_trip(f.trip.id, None, None).await.unwrap();
        assert_eq!(slots[0].booked_count, 0);
    }

    #[tokio::test]
    async fn test_full_client_lifecycle() {
        let f = fixture(BookingPolicy::default());
        let client = Uuid::new_v4();
        let booking = f
            .orchestrator
            .create(submission(f.trip.id, client, 12))
            .await
            .unwrap();

        let err = f.orchestrator.client_confirm(booking.id, client).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        f.clock.advance(Duration::hours(3));
        f.orchestrator
            .update_status(booking.id, BookingStatus::Approved, Uuid::new_v4(), None)
            .await
            .unwrap();

        f.clock.advance(Duration::hours(1));
        let confirmed = f.orchestrator.client_confirm(booking.id, client).await.unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        assert_eq!(confirmed.confirmed_at, Some(f.clock.now()));

        let cancelled = f
            .orchestrator
            .client_cancel(booking.id, client, Some("Budget cut".to_string()))
            .await
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Budget cut"));

        let err = f
            .orchestrator
            .client_cancel(booking.id, client, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BookingClosed(BookingStatus::Cancelled)));
    }

    #[tokio::test]
    async fn test_illegal_transition_leaves_status_unchanged() {
        let f = fixture(BookingPolicy::default());
        let booking = f
            .orchestrator
            .create(submission(f.trip.id, Uuid::new_v4(), 10))
            .await
            .unwrap();

        let err = f
            .orchestrator
            .update_status(booking.id, BookingStatus::Confirmed, Uuid::new_v4(), Some("skip".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot transition from pending to confirmed");

        let stored = f.orchestrator.find_by_id(booking.id, None).await.unwrap();
        assert_eq!(stored.status, BookingStatus::Pending);
        assert!(stored.admin_notes.is_none());
    }

    #[tokio::test]
    async fn test_other_clients_are_forbidden() {
        let f = fixture(BookingPolicy::default());
        let owner = Uuid::new_v4();
        let booking = f
            .orchestrator
            .create(submission(f.trip.id, owner, 10))
            .await
            .unwrap();

        let stranger = Uuid::new_v4();
        assert!(matches!(
            f.orchestrator.find_by_id(booking.id, Some(stranger)).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            f.orchestrator.client_cancel(booking.id, stranger, None).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(f.orchestrator.find_by_id(booking.id, Some(owner)).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_booking() {
        let f = fixture(BookingPolicy::default());
        let id = Uuid::new_v4();
        assert!(matches!(
            f.orchestrator
                .update_status(id, BookingStatus::Approved, Uuid::new_v4(), None)
                .await,
            Err(AppError::BookingNotFound(missing)) if missing == id
        ));
    }

    #[tokio::test]
    async fn test_lost_race_is_replanned_against_new_status() {
        let f = fixture(BookingPolicy::default());
        let client = Uuid::new_v4();
        let booking = f
            .orchestrator
            .create(submission(f.trip.id, client, 10))
            .await
            .unwrap();

        let admin = Uuid::new_v4();
        let approval = BookingStateMachine::plan_admin_transition(
            &booking,
            BookingStatus::Approved,
            admin,
            None,
            f.clock.now(),
        )
        .unwrap();
        let bookings = ContendedBookings::new(f.store.clone(), Some(approval), false);

        let cancelled = contended(&f, bookings.clone())
            .client_cancel(booking.id, client, Some("Trip moved".to_string()))
            .await
            .unwrap();

        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.reviewed_by, Some(admin));
        assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Trip moved"));
        assert_eq!(bookings.writes(), 2);
    }

    #[tokio::test]
    async fn test_lost_race_reports_the_winning_status() {
        let f = fixture(BookingPolicy::default());
        let client = Uuid::new_v4();
        let booking = f
            .orchestrator
            .create(submission(f.trip.id, client, 10))
            .await
            .unwrap();

        let admin = Uuid::new_v4();
        let approval = BookingStateMachine::plan_admin_transition(
            &booking,
            BookingStatus::Approved,
            admin,
            None,
            f.clock.now(),
        )
        .unwrap();
        let bookings = ContendedBookings::new(f.store.clone(), Some(approval), false);

        let err = contended(&f, bookings.clone())
            .update_status(booking.id, BookingStatus::Rejected, Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition {
                from: BookingStatus::Approved,
                to: BookingStatus::Rejected,
            }
        ));
        assert_eq!(bookings.writes(), 1);

        let stored = f.orchestrator.find_by_id(booking.id, None).await.unwrap();
        assert_eq!(stored.status, BookingStatus::Approved);
        assert_eq!(stored.reviewed_by, Some(admin));

        let other = f
            .orchestrator
            .create(submission(f.trip.id, client, 11))
            .await
            .unwrap();
        let rejection = BookingStateMachine::plan_admin_transition(
            &other,
            BookingStatus::Rejected,
            admin,
            None,
            f.clock.now(),
        )
        .unwrap();
        let bookings = ContendedBookings::new(f.store.clone(), Some(rejection), false);
        let err = contended(&f, bookings)
            .client_cancel(other.id, client, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BookingClosed(BookingStatus::Rejected)));
    }

    #[tokio::test]
    async fn test_gives_up_after_repeated_lost_races() {
        let f = fixture(BookingPolicy::default());
        let booking = f
            .orchestrator
            .create(submission(f.trip.id, Uuid::new_v4(), 10))
            .await
            .unwrap();
        let bookings = ContendedBookings::new(f.store.clone(), None, true);

        let err = contended(&f, bookings.clone())
            .update_status(booking.id, BookingStatus::Approved, Uuid::new_v4(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(bookings.writes(), MAX_TRANSITION_ATTEMPTS);
        let stored = f.orchestrator.find_by_id(booking.id, None).await.unwrap();
        assert_eq!(stored.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_concurrent_reviews_have_one_winner() {
        let f = fixture(BookingPolicy::default());
        let booking = f
            .orchestrator
            .create(submission(f.trip.id, Uuid::new_v4(), 10))
            .await
            .unwrap();

        let (approve, reject) = tokio::join!(
            f.orchestrator
                .update_status(booking.id, BookingStatus::Approved, Uuid::new_v4(), None),
            f.orchestrator
                .update_status(booking.id, BookingStatus::Rejected, Uuid::new_v4(), None),
        );

        let winner = match (approve, reject) {
            (Ok(won), Err(AppError::InvalidTransition { .. })) => won,
            (Err(AppError::InvalidTransition { .. }), Ok(won)) => won,
            other => panic!("expected exactly one successful review, got {other:?}"),
        };
        let stored = f.orchestrator.find_by_id(booking.id, None).await.unwrap();
        assert_eq!(stored.status, winner.status);
    }

    #[tokio::test]
    async fn test_list_and_kanban() {
        let f = fixture(BookingPolicy::default());
        let client = Uuid::new_v4();
        let mut ids = Vec::new();
        for students in [10, 11, 12] {
            let b = f
                .orchestrator
                .create(submission(f.trip.id, client, students))
                .await
                .unwrap();
            ids.push(b.id);
            f.clock.advance(Duration::minutes(10));
        }
        f.orchestrator
            .update_status(ids[0], BookingStatus::Approved, Uuid::new_v4(), None)
            .await
            .unwrap();

        let page = f
            .orchestrator
            .list(
                BookingFilter {
                    client_id: Some(client),
                    status: Some(BookingStatus::Pending),
                    ..Default::default()
                },
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.data[0].id, ids[2]);

        let board = f.orchestrator.kanban().await.unwrap();
        assert_eq!(board.pending.len(), 2);
        assert_eq!(board.approved.len(), 1);
        assert_eq!(board.pending[0].id, ids[2]);
    }
}
