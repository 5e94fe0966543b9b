//! API layer for CampusTrip
//!
//! HTTP handlers for quotes, pricing rules, trip availability and the
//! booking review workflow. Handlers receive [`Services`] and the
//! [`JwtService`] as application data.

#![forbid(unsafe_code)]

pub mod dto;
pub mod handlers;

use actix_web::web;
use campustrip_auth::JwtService;
use campustrip_services::Services;
use std::sync::Arc;

pub use dto::{ApiResponse, PaginationParams};
pub use handlers::{
    configure_availability, configure_bookings, configure_health, configure_pricing,
};

/// Mount every route under `/api/v1`
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(configure_health)
            .configure(configure_pricing)
            .configure(configure_bookings)
            .configure(configure_availability),
    );
}

/// Application data plus routes; shared by the server and HTTP tests
pub fn configure_app(
    services: Services,
    jwt_service: Arc<JwtService>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(services))
            .app_data(web::Data::new(jwt_service))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                let message = err.to_string();
                actix_web::error::InternalError::from_response(
                    err,
                    actix_web::HttpResponse::BadRequest().json(serde_json::json!({
                        "error": "invalid_body",
                        "message": message,
                        "status": 400,
                    })),
                )
                .into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                let message = err.to_string();
                actix_web::error::InternalError::from_response(
                    err,
                    actix_web::HttpResponse::BadRequest().json(serde_json::json!({
                        "error": "invalid_query",
                        "message": message,
                        "status": 400,
                    })),
                )
                .into()
            }));
        configure_routes(cfg);
    }
}
