//! Dashboard handlers
//!
//! HTTP handler for the call statistics endpoint.

use crate::dto::StatsResponse;
use actix_web::{web, HttpResponse};
use dialtrack_core::{stats::CallStats, traits::CallRepository, AppError};
use dialtrack_db::PgCallRepository;
use sqlx::PgPool;
use tracing::{debug, instrument};

/// Get call statistics
///
/// GET /api/v1/stats
///
/// The rollup is one grouped query, so `total` always equals the sum of the
/// class counts plus the unclassified records.
#[instrument(skip(pool))]
pub async fn get_stats(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    debug!("Fetching call statistics");

    let repo = PgCallRepository::new(pool.get_ref().clone());
    let breakdown = repo.status_breakdown().await?;
    let stats = CallStats::from_breakdown(&breakdown);

    Ok(HttpResponse::Ok().json(StatsResponse::from(stats)))
}

/// Configure dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/stats", web::get().to(get_stats));
}
