//! Quote and pricing rule handlers

use crate::dto::{ApiResponse, CreateRuleRequest, QuoteRequestDto, RuleListQuery, UpdateRuleRequest};
use actix_web::{web, HttpResponse};
use campustrip_auth::{AdminUser, AuthenticatedUser};
use campustrip_core::models::QuoteRequest;
use campustrip_core::AppError;
use campustrip_services::Services;
use tracing::{debug, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Price a trip configuration without booking it
///
/// POST /api/v1/pricing/quote
#[instrument(skip(services, user, req), fields(user_id = %user.user_id))]
pub async fn calculate_quote(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    req: web::Json<QuoteRequestDto>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Quote validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let request = QuoteRequest::from(req.into_inner());
    let quote = services.quotes.calculate(&request).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(quote)))
}

/// GET /api/v1/pricing/rules
#[instrument(skip(services, _admin))]
pub async fn list_rules(
    services: web::Data<Services>,
    query: web::Query<RuleListQuery>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    debug!(trip_id = ?query.trip_id, "Listing pricing rules");
    let rules = services.rules.list(query.trip_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(rules)))
}

/// GET /api/v1/pricing/rules/{id}
pub async fn get_rule(
    services: web::Data<Services>,
    path: web::Path<Uuid>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let rule = services.rules.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(rule)))
}

/// POST /api/v1/pricing/rules
#[instrument(skip(services, admin, req), fields(admin_id = %admin.user_id))]
pub async fn create_rule(
    services: web::Data<Services>,
    admin: AdminUser,
    req: web::Json<CreateRuleRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Pricing rule validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let created = services.rules.create(req.into_inner().into()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        created,
        "Pricing rule created successfully",
    )))
}

/// PATCH /api/v1/pricing/rules/{id}
#[instrument(skip(services, _admin, req))]
pub async fn update_rule(
    services: web::Data<Services>,
    path: web::Path<Uuid>,
    _admin: AdminUser,
    req: web::Json<UpdateRuleRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Pricing rule update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let updated = services
        .rules
        .update(path.into_inner(), req.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        updated,
        "Pricing rule updated successfully",
    )))
}

/// DELETE /api/v1/pricing/rules/{id}
#[instrument(skip(services, _admin))]
pub async fn delete_rule(
    services: web::Data<Services>,
    path: web::Path<Uuid>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    services.rules.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        (),
        "Pricing rule deleted successfully",
    )))
}

/// Configure pricing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pricing")
            .route("/quote", web::post().to(calculate_quote))
            .route("/rules", web::get().to(list_rules))
            .route("/rules", web::post().to(create_rule))
            .route("/rules/{id}", web::get().to(get_rule))
            .route("/rules/{id}", web::patch().to(update_rule))
            .route("/rules/{id}", web::delete().to(delete_rule)),
    );
}
