//! Booking lifecycle rules
//!
//! Planning is pure: each function checks the current booking and either
//! returns the [`StatusChange`] to persist or an error. Nothing is stamped on a
//! rejected transition. The orchestrator persists plans with a status guard.

use campustrip_core::models::{Booking, BookingStatus, StatusChange};
use campustrip_core::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Stateless validator for booking status changes
pub struct BookingStateMachine;

impl BookingStateMachine {
    /// Administrator-driven transition along the status table
    pub fn plan_admin_transition(
        booking: &Booking,
        target: BookingStatus,
        actor_id: Uuid,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<StatusChange> {
        let from = booking.status;
        if !from.can_transition_to(target) {
            return Err(AppError::InvalidTransition { from, to: target });
        }

        let mut change = StatusChange::new(from, target, now);
        change.admin_notes = notes;

        match target {
            BookingStatus::Approved | BookingStatus::Rejected => {
                change.reviewed_by = Some(actor_id);
                change.reviewed_at = Some(now);
            }
            BookingStatus::Confirmed => change.confirmed_at = Some(now),
            BookingStatus::Cancelled => change.cancelled_at = Some(now),
            // never an allowed target
            BookingStatus::Pending => {}
        }

        Ok(change)
    }

    /// Client accepts an approved booking
    pub fn plan_client_confirm(
        booking: &Booking,
        client_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<StatusChange> {
        ensure_owner(booking, client_id)?;

        if booking.status != BookingStatus::Approved {
            return Err(AppError::BadRequest(format!(
                "Booking must be approved before confirmation (currently {})",
                booking.status
            )));
        }

        let mut change = StatusChange::new(booking.status, BookingStatus::Confirmed, now);
        change.confirmed_at = Some(now);
        Ok(change)
    }

    /// Client withdraws a booking that is still open
    pub fn plan_client_cancel(
        booking: &Booking,
        client_id: Uuid,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<StatusChange> {
        ensure_owner(booking, client_id)?;

        if booking.status.is_closed() {
            return Err(AppError::BookingClosed(booking.status));
        }

        let mut change = StatusChange::new(booking.status, BookingStatus::Cancelled, now);
        change.cancelled_at = Some(now);
        change.cancellation_reason = reason;
        Ok(change)
    }
}

pub(crate) fn ensure_owner(booking: &Booking, client_id: Uuid) -> AppResult<()> {
    if booking.is_owned_by(client_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Booking {} belongs to another client",
            booking.id
        )))
    }
}

/// Read-only board grouping bookings by status
#[derive(Debug, Clone, Default, Serialize)]
pub struct KanbanBoard {
    pub pending: Vec<Booking>,
    pub approved: Vec<Booking>,
    pub confirmed: Vec<Booking>,
    pub cancelled: Vec<Booking>,
    pub rejected: Vec<Booking>,
}

impl KanbanBoard {
    /// Buckets keep the order of the input
    pub fn from_bookings(bookings: impl IntoIterator<Item = Booking>) -> Self {
        let mut board = Self::default();
        for booking in bookings {
            board.column_mut(booking.status).push(booking);
        }
        board
    }

    pub fn column(&self, status: BookingStatus) -> &[Booking] {
        match status {
            BookingStatus::Pending => &self.pending,
            BookingStatus::Approved => &self.approved,
            BookingStatus::Confirmed => &self.confirmed,
            BookingStatus::Cancelled => &self.cancelled,
            BookingStatus::Rejected => &self.rejected,
        }
    }

    fn column_mut(&mut self, status: BookingStatus) -> &mut Vec<Booking> {
        match status {
            BookingStatus::Pending => &mut self.pending,
            BookingStatus::Approved => &mut self.approved,
            BookingStatus::Confirmed => &mut self.confirmed,
            BookingStatus::Cancelled => &mut self.cancelled,
            BookingStatus::Rejected => &mut self.rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campustrip_core::models::{BookingConfig, PriceBreakdown, TransportType};
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap()
    }

    fn booking(status: BookingStatus, client_id: Uuid) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            client_id,
            trip_id: Uuid::new_v4(),
            config: BookingConfig {
                students: 25,
                adults: 3,
                start_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
                meals_per_day: 1,
                transport_type: TransportType::Bus,
                selected_extras: vec![],
            },
            price_breakdown: PriceBreakdown {
                base_students: Decimal::ZERO,
                base_adults: Decimal::ZERO,
                meals: Decimal::ZERO,
                transport: Decimal::ZERO,
                extras: Decimal::ZERO,
                total: Decimal::ZERO,
                per_student: Decimal::ZERO,
            },
            status,
            reserved_seats: 0,
            client_notes: None,
            admin_notes: None,
            reviewed_by: None,
            reviewed_at: None,
            confirmed_at: None,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_every_illegal_admin_transition_is_rejected() {
        let admin = Uuid::new_v4();
        for from in BookingStatus::ALL {
            for to in BookingStatus::ALL {
                let b = booking(from, Uuid::new_v4());
                let result = BookingStateMachine::plan_admin_transition(&b, to, admin, None, now());
                if from.can_transition_to(to) {
                    assert!(result.is_ok(), "{from} -> {to} should be allowed");
                } else {
                    assert!(
                        matches!(result, Err(AppError::InvalidTransition { from: f, to: t }) if f == from && t == to),
                        "{from} -> {to} should be rejected"
                    );
                }
            }
        }
    }

    #[test]
    fn test_review_stamps() {
        let admin = Uuid::new_v4();
        let b = booking(BookingStatus::Pending, Uuid::new_v4());

        let change = BookingStateMachine::plan_admin_transition(
            &b,
            BookingStatus::Approved,
            admin,
            Some("Coach confirmed".to_string()),
            now(),
        )
        .unwrap();

        assert_eq!(change.from, BookingStatus::Pending);
        assert_eq!(change.reviewed_by, Some(admin));
        assert_eq!(change.reviewed_at, Some(now()));
        assert_eq!(change.admin_notes.as_deref(), Some("Coach confirmed"));
        assert!(change.confirmed_at.is_none());
    }

    #[test]
    fn test_admin_cancel_stamps_cancelled_at() {
        let b = booking(BookingStatus::Confirmed, Uuid::new_v4());
        let change = BookingStateMachine::plan_admin_transition(
            &b,
            BookingStatus::Cancelled,
            Uuid::new_v4(),
            None,
            now(),
        )
        .unwrap();
        assert_eq!(change.cancelled_at, Some(now()));
        assert!(change.reviewed_by.is_none());
    }

    #[test]
    fn test_client_confirm_requires_approval() {
        let client = Uuid::new_v4();

        let pending = booking(BookingStatus::Pending, client);
        assert!(matches!(
            BookingStateMachine::plan_client_confirm(&pending, client, now()),
            Err(AppError::BadRequest(_))
        ));

        let approved = booking(BookingStatus::Approved, client);
        let change = BookingStateMachine::plan_client_confirm(&approved, client, now()).unwrap();
        assert_eq!(change.status, BookingStatus::Confirmed);
        assert_eq!(change.confirmed_at, Some(now()));
    }

    #[test]
    fn test_ownership_checked_before_status() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let b = booking(BookingStatus::Rejected, owner);

        assert!(matches!(
            BookingStateMachine::plan_client_confirm(&b, stranger, now()),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            BookingStateMachine::plan_client_cancel(&b, stranger, None, now()),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_client_cancel_from_open_states() {
        let client = Uuid::new_v4();
        for status in [
            BookingStatus::Pending,
            BookingStatus::Approved,
            BookingStatus::Confirmed,
        ] {
            let b = booking(status, client);
            let change = BookingStateMachine::plan_client_cancel(
                &b,
                client,
                Some("Exam week moved".to_string()),
                now(),
            )
            .unwrap();
            assert_eq!(change.from, status);
            assert_eq!(change.status, BookingStatus::Cancelled);
            assert_eq!(change.cancellation_reason.as_deref(), Some("Exam week moved"));
        }

        for status in [BookingStatus::Cancelled, BookingStatus::Rejected] {
            let b = booking(status, client);
            assert!(matches!(
                BookingStateMachine::plan_client_cancel(&b, client, None, now()),
                Err(AppError::BookingClosed(s)) if s == status
            ));
        }
    }

    #[test]
    fn test_kanban_buckets() {
        let client = Uuid::new_v4();
        let board = KanbanBoard::from_bookings(vec![
            booking(BookingStatus::Pending, client),
            booking(BookingStatus::Rejected, client),
            booking(BookingStatus::Pending, client),
            booking(BookingStatus::Confirmed, client),
        ]);

        assert_eq!(board.column(BookingStatus::Pending).len(), 2);
        assert_eq!(board.column(BookingStatus::Rejected).len(), 1);
        assert_eq!(board.column(BookingStatus::Confirmed).len(), 1);
        assert!(board.column(BookingStatus::Approved).is_empty());
        assert!(board.column(BookingStatus::Cancelled).is_empty());
    }
}
