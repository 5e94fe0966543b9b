//! CampusTrip booking server
//!
//! Serves quotes, pricing rules, trip availability and the booking review
//! workflow. Storage is PostgreSQL, or an in-process store for `memory://`
//! database URLs.

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpResponse, HttpServer};
use anyhow::Context;
use campustrip_api::configure_app;
use campustrip_auth::JwtService;
use campustrip_core::clock::{Clock, SystemClock};
use campustrip_core::AppConfig;
use campustrip_db::{create_pool, run_migrations, InMemoryStore, Repositories};
use campustrip_services::Services;
use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging; `LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "campustrip={0},campustrip_api={0},campustrip_services={0},campustrip_db={0},campustrip_auth={0},actix_web=info,sqlx=warn",
            log_level
        ))
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    if env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }
}

async fn build_repositories(config: &AppConfig, clock: Arc<dyn Clock>) -> anyhow::Result<Repositories> {
    if config.database.is_in_memory() {
        warn!("Using in-memory storage; data is lost on shutdown");
        let store = Arc::new(InMemoryStore::with_clock(clock));
        if let Some(path) = config.database.memory_seed_path() {
            store
                .seed_trips_from_file(Path::new(path))
                .with_context(|| format!("failed to seed trips from {}", path))?;
        }
        return Ok(Repositories::in_memory(store));
    }

    info!("Connecting to database...");
    let pool = create_pool(&config.database)
        .await
        .context("failed to create database pool")?;
    info!(
        "Database connection established with {} max connections",
        config.database.max_connections
    );

    if config.database.run_migrations {
        run_migrations(&pool).await.context("failed to run migrations")?;
    }

    Ok(Repositories::postgres(pool))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    info!("Starting CampusTrip v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().context("failed to load configuration")?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repos = build_repositories(&config, clock.clone()).await?;
    let services = Services::new(repos, clock, config.booking.clone());

    let jwt_service = Arc::new(JwtService::new(
        &config.auth.jwt_secret,
        config.auth.jwt_expiration_minutes * 60,
    ));
    info!(
        "JWT service configured with {} minute token expiration",
        config.auth.jwt_expiration_minutes
    );

    let bind_addr = config.server_addr();
    let workers = config.server.workers.max(1);
    let cors_origins: Vec<String> = config
        .server
        .cors_origins
        .split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();

    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, workers
    );

    HttpServer::new(move || {
        let origins = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                origin
                    .to_str()
                    .map(|o| origins.iter().any(|allowed| allowed == o))
                    .unwrap_or(false)
            })
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
                header::COOKIE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_app(services.clone(), jwt_service.clone()))
            .route(
                "/",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "/api/v1/health"))
                        .finish()
                }),
            )
    })
    .workers(workers)
    .client_request_timeout(Duration::from_secs(config.server.timeout_secs))
    .bind(&bind_addr)
    .with_context(|| format!("failed to bind {}", bind_addr))?
    .run()
    .await
    .context("HTTP server error")
}
