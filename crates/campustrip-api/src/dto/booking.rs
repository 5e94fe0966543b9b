//! Booking DTOs

use campustrip_core::models::{BookingFilter, BookingStatus};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::common::PaginationParams;
use super::pricing::QuoteRequestDto;

/// A booking is submitted with exactly the fields of a quote plus notes
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub trip: QuoteRequestDto,

    #[validate(length(max = 2000))]
    pub client_notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CancelRequest {
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,

    #[serde(alias = "tripId")]
    pub trip_id: Option<Uuid>,

    #[serde(flatten)]
    #[validate(nested)]
    pub pagination: PaginationParams,
}

impl BookingListQuery {
    /// Filter for the given caller; `None` means every client
    pub fn filter(&self, client_id: Option<Uuid>) -> BookingFilter {
        BookingFilter {
            client_id,
            trip_id: self.trip_id,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_booking_request_flattens_quote_fields() {
        let req: CreateBookingRequest = serde_json::from_str(
            r#"{
                "trip_id": "0b6f7a53-9f53-4f4e-9a61-3f0f2b1c9c11",
                "students": 18,
                "adults": 2,
                "start_date": "2026-10-05",
                "meals_per_day": 3,
                "transport_type": "ferry",
                "selected_extras": ["Boat tour"],
                "client_notes": "Two vegetarian students"
            }"#,
        )
        .unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.trip.students, 18);
        assert_eq!(req.client_notes.as_deref(), Some("Two vegetarian students"));
    }

    #[test]
    fn test_create_booking_request_validates_nested_quote() {
        let req: CreateBookingRequest = serde_json::from_str(
            r#"{
                "trip_id": "0b6f7a53-9f53-4f4e-9a61-3f0f2b1c9c11",
                "students": 0,
                "start_date": "2026-10-05",
                "transport_type": "bus"
            }"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_list_query_filter() {
        let query = BookingListQuery {
            status: Some(BookingStatus::Approved),
            ..Default::default()
        };
        let client = Uuid::new_v4();

        let filter = query.filter(Some(client));
        assert_eq!(filter.client_id, Some(client));
        assert_eq!(filter.status, Some(BookingStatus::Approved));
        assert!(filter.trip_id.is_none());
    }
}
