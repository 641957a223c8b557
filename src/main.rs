//! DialTrack Backend Server
//!
//! Outbound call tracking backend: originates calls through Twilio, folds
//! the provider's webhook callbacks into one record per call, and serves the
//! dashboard read API.

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpResponse, HttpServer};
use dialtrack_api::handlers::{
    configure_calls, configure_dashboard, configure_voice, configure_webhooks,
};
use dialtrack_core::AppConfig;
use dialtrack_db::{create_pool, init_schema};
use dialtrack_telephony::TwilioClient;
use std::env;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "dialtrack",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Configure API routes
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Health check
            .route("/health", web::get().to(health_check))
            // Dashboard stats
            .configure(configure_dashboard)
            // Call initiation and listings
            .configure(configure_calls),
    )
    // Provider webhooks - always acknowledged, never authenticated reads
    .service(web::scope("/webhooks").configure(configure_webhooks))
    // Voice menu document fetched by the provider
    .configure(configure_voice);
}

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "dialtrack={},dialtrack_api={},dialtrack_db={},dialtrack_telephony={},actix_web=info,sqlx=warn",
            log_level, log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    info!("Starting DialTrack backend v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().expect("Failed to load configuration");

    info!("Connecting to database...");
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database pool");

    init_schema(&pool)
        .await
        .expect("Failed to initialize database schema");

    let twilio = TwilioClient::new(&config.twilio);
    info!(
        "Twilio client configured for account {} with callbacks at {}",
        config.twilio.account_sid, config.twilio.base_url
    );

    let bind_addr = config.server_addr();
    let workers = config.server.workers;
    let cors_origins = config.server.cors_origins.clone();

    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, workers
    );

    HttpServer::new(move || {
        let cors = if cors_origins.trim() == "*" {
            Cors::permissive()
        } else {
            let cors_origins_inner = cors_origins.clone();
            Cors::default()
                .allowed_origin_fn(move |origin, _req_head| {
                    let origins: Vec<&str> = cors_origins_inner.split(',').collect();
                    if let Ok(origin_str) = origin.to_str() {
                        origins.iter().any(|o| o.trim() == origin_str)
                    } else {
                        false
                    }
                })
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        };

        App::new()
            // Shared state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(twilio.clone()))
            // Middleware
            .wrap(cors)
            .wrap(middleware::Logger::new("%a \"%r\" %s %b %Dms"))
            .wrap(middleware::NormalizePath::trim())
            // Routes
            .configure(configure_routes)
            // Unversioned health for load balancers
            .route("/health", web::get().to(health_check))
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await
}
