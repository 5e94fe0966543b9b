//! Unified error handling for CampusTrip
//!
//! Every failure in the booking core is expressed as an [`AppError`] variant.
//! The enum implements `ResponseError`, so handlers can return it directly.

use crate::models::BookingStatus;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Database Errors ====================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database pool error: {0}")]
    Pool(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    // ==================== Authentication Errors ====================
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // ==================== Booking Domain Errors ====================
    #[error("Trip not found: {0}")]
    TripNotFound(Uuid),

    #[error("Booking not found: {0}")]
    BookingNotFound(Uuid),

    #[error("Pricing rule not found: {0}")]
    RuleNotFound(Uuid),

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Booking already closed ({0})")]
    BookingClosed(BookingStatus),

    #[error("Not enough capacity: requested {requested}, remaining {remaining}")]
    CapacityExceeded { requested: i32, remaining: i32 },

    // ==================== Validation Errors ====================
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // ==================== Concurrency Errors ====================
    #[error("Conflict: {0}")]
    Conflict(String),

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::BadRequest(_)
            | AppError::InvalidTransition { .. }
            | AppError::BookingClosed(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            AppError::InvalidToken(_) | AppError::TokenExpired | AppError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,

            // 404 Not Found
            AppError::TripNotFound(_)
            | AppError::BookingNotFound(_)
            | AppError::RuleNotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::Conflict(_) | AppError::CapacityExceeded { .. } => StatusCode::CONFLICT,

            // 500 Internal Server Error
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Transaction(_)
            | AppError::Internal(_)
            | AppError::Config(_)
            | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Pool(_) => "pool_error",
            AppError::Transaction(_) => "transaction_error",
            AppError::TokenExpired => "token_expired",
            AppError::InvalidToken(_) => "invalid_token",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::TripNotFound(_) => "trip_not_found",
            AppError::BookingNotFound(_) => "booking_not_found",
            AppError::RuleNotFound(_) => "rule_not_found",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::BookingClosed(_) => "booking_closed",
            AppError::CapacityExceeded { .. } => "capacity_exceeded",
            AppError::BadRequest(_) => "bad_request",
            AppError::Validation(_) => "validation_error",
            AppError::Conflict(_) => "conflict",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = json!({
            "error": self.error_code(),
            "message": self.to_string(),
            "status": status.as_u16(),
        });

        HttpResponse::build(status).json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => AppError::Pool(err.to_string()),
            other => AppError::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::TripNotFound(Uuid::nil()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Forbidden("not yours".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::InvalidTransition {
                from: BookingStatus::Rejected,
                to: BookingStatus::Approved,
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::CapacityExceeded {
                requested: 30,
                remaining: 4
            }
            .status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_transition_message_names_both_states() {
        let err = AppError::InvalidTransition {
            from: BookingStatus::Pending,
            to: BookingStatus::Confirmed,
        };
        assert_eq!(err.to_string(), "Cannot transition from pending to confirmed");
        assert_eq!(err.error_code(), "invalid_transition");
    }

    #[test]
    fn test_conflict_and_validation_codes() {
        let conflict = AppError::Conflict("booking moved on".to_string());
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(conflict.error_code(), "conflict");

        let invalid = AppError::Validation("students must be at least 1".to_string());
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.error_code(), "validation_error");

        let missing_rule = AppError::RuleNotFound(Uuid::nil());
        assert_eq!(missing_rule.error_code(), "rule_not_found");
    }

    #[test]
    fn test_closed_booking_message() {
        let err = AppError::BookingClosed(BookingStatus::Cancelled);
        assert!(err.to_string().contains("already closed"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
