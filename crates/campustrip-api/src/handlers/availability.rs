//! Trip availability handlers

use crate::dto::{ApiResponse, AvailableDatesQuery, BulkUpsertRequest, DateRangeQuery, UpsertSlotRequest};
use actix_web::{web, HttpResponse};
use campustrip_auth::{AdminUser, AuthenticatedUser};
use campustrip_core::AppError;
use campustrip_services::Services;
use tracing::{instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// GET /api/v1/availability/trips/{trip_id}
pub async fn get_for_trip(
    services: web::Data<Services>,
    path: web::Path<Uuid>,
    query: web::Query<DateRangeQuery>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let slots = services
        .availability
        .get_for_trip(path.into_inner(), query.from, query.to)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(slots)))
}

/// Open dates in `[from, to]`
///
/// GET /api/v1/availability/trips/{trip_id}/available-dates
pub async fn get_available_dates(
    services: web::Data<Services>,
    path: web::Path<Uuid>,
    query: web::Query<AvailableDatesQuery>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let slots = services
        .availability
        .get_available_dates(path.into_inner(), query.from, query.to)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(slots)))
}

/// Create or replace the slot for one date
///
/// POST /api/v1/availability/trips/{trip_id}
#[instrument(skip(services, _admin, req))]
pub async fn upsert_slot(
    services: web::Data<Services>,
    path: web::Path<Uuid>,
    _admin: AdminUser,
    req: web::Json<UpsertSlotRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Availability validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let slot = services
        .availability
        .upsert(path.into_inner(), req.date, req.capacity, req.is_available)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(slot)))
}

/// POST /api/v1/availability/trips/{trip_id}/bulk
#[instrument(skip(services, _admin, req))]
pub async fn bulk_upsert(
    services: web::Data<Services>,
    path: web::Path<Uuid>,
    _admin: AdminUser,
    req: web::Json<BulkUpsertRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let summary = services
        .availability
        .bulk_upsert(path.into_inner(), &req.dates)
        .await;

    let message = format!(
        "{} dates saved, {} failed",
        summary.upserted.len(),
        summary.failed.len()
    );
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(summary, message)))
}

/// Configure availability routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/availability/trips/{trip_id}")
            .route("", web::get().to(get_for_trip))
            .route("", web::post().to(upsert_slot))
            .route("/bulk", web::post().to(bulk_upsert))
            .route("/available-dates", web::get().to(get_available_dates)),
    );
}
