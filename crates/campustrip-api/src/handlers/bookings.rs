//! Booking handlers
//!
//! Client routes live under `/bookings/my` and act on the caller's own
//! bookings. Everything else is admin-only.

use crate::dto::{
    ApiResponse, BookingListQuery, CancelRequest, CreateBookingRequest, UpdateStatusRequest,
};
use actix_web::{web, HttpResponse};
use campustrip_auth::{AdminUser, AuthenticatedUser};
use campustrip_core::AppError;
use campustrip_services::{CreateBooking, Services};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Submit a booking for review
///
/// POST /api/v1/bookings
#[instrument(skip(services, user, req), fields(client_id = %user.user_id))]
pub async fn create_booking(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    req: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Booking validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let req = req.into_inner();
    let booking = services
        .bookings
        .create(CreateBooking {
            client_id: user.user_id,
            quote: req.trip.into(),
            client_notes: req.client_notes,
        })
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        booking,
        "Booking submitted for review",
    )))
}

/// GET /api/v1/bookings/my
#[instrument(skip(services, user, query), fields(client_id = %user.user_id))]
pub async fn list_my_bookings(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    query: web::Query<BookingListQuery>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let page = services
        .bookings
        .list(
            query.filter(Some(user.user_id)),
            query.pagination.page,
            query.pagination.per_page,
        )
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/v1/bookings/my/{id}
pub async fn get_my_booking(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking = services
        .bookings
        .find_by_id(path.into_inner(), Some(user.user_id))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(booking)))
}

/// PATCH /api/v1/bookings/my/{id}/confirm
#[instrument(skip(services, user), fields(client_id = %user.user_id))]
pub async fn confirm_my_booking(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking = services
        .bookings
        .client_confirm(path.into_inner(), user.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(booking, "Booking confirmed")))
}

/// PATCH /api/v1/bookings/my/{id}/cancel
///
/// The body is optional; `{"reason": "..."}` records why. A body that is
/// present must be valid JSON.
#[instrument(skip(services, user, body), fields(client_id = %user.user_id))]
pub async fn cancel_my_booking(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let req: CancelRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CancelRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            warn!("Rejected cancel body: {}", e);
            AppError::BadRequest(format!("Invalid cancel request body: {}", e))
        })?
    };
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let booking = services
        .bookings
        .client_cancel(path.into_inner(), user.user_id, req.reason)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(booking, "Booking cancelled")))
}

/// Bookings grouped by status
///
/// GET /api/v1/bookings/kanban
pub async fn kanban(
    services: web::Data<Services>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let board = services.bookings.kanban().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(board)))
}

/// GET /api/v1/bookings
#[instrument(skip(services, _admin, query))]
pub async fn list_bookings(
    services: web::Data<Services>,
    _admin: AdminUser,
    query: web::Query<BookingListQuery>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let page = services
        .bookings
        .list(
            query.filter(None),
            query.pagination.page,
            query.pagination.per_page,
        )
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/v1/bookings/{id}
pub async fn get_booking(
    services: web::Data<Services>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking = services.bookings.find_by_id(path.into_inner(), None).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(booking)))
}

/// Move a booking along the review workflow
///
/// PATCH /api/v1/bookings/{id}/status
#[instrument(skip(services, admin, req), fields(admin_id = %admin.user_id))]
pub async fn update_status(
    services: web::Data<Services>,
    admin: AdminUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Status update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let id = path.into_inner();
    let req = req.into_inner();
    let booking = services
        .bookings
        .update_status(id, req.status, admin.user_id, req.notes)
        .await?;

    info!(booking_id = %id, status = %booking.status, "Booking status updated");
    Ok(HttpResponse::Ok().json(ApiResponse::success(booking)))
}

/// Configure booking routes
///
/// Literal segments are registered before `/{id}` so they are matched first.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("", web::post().to(create_booking))
            .route("", web::get().to(list_bookings))
            .route("/my", web::get().to(list_my_bookings))
            .route("/my/{id}", web::get().to(get_my_booking))
            .route("/my/{id}/confirm", web::patch().to(confirm_my_booking))
            .route("/my/{id}/cancel", web::patch().to(cancel_my_booking))
            .route("/kanban", web::get().to(kanban))
            .route("/{id}", web::get().to(get_booking))
            .route("/{id}/status", web::patch().to(update_status)),
    );
}
