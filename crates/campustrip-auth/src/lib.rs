//! Authentication and authorization for CampusTrip
//!
//! Accounts and login live in an external identity provider. This crate only
//! validates the JWTs it issues and exposes the caller as Actix-web
//! extractors.
//!
//! # Examples
//!
//! ```no_run
//! use actix_web::HttpResponse;
//! use campustrip_auth::middleware::{AdminUser, AuthenticatedUser};
//!
//! async fn my_bookings(user: AuthenticatedUser) -> HttpResponse {
//!     HttpResponse::Ok().json(serde_json::json!({ "client_id": user.user_id }))
//! }
//!
//! async fn review_queue(admin: AdminUser) -> HttpResponse {
//!     HttpResponse::Ok().json(serde_json::json!({ "reviewer": admin.user_id }))
//! }
//! ```

pub mod claims;
pub mod jwt;
pub mod middleware;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::{AdminUser, AuthenticatedUser};
