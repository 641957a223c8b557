//! Call handlers
//!
//! HTTP handlers for call initiation and the dashboard call listings.

use crate::dto::{CallResponse, RecordingResponse, StartCallRequest, StartCallResponse};
use actix_web::web::{Data, Json, Path};
use dialtrack_core::{
    models::{CallInit, Department},
    traits::CallRepository,
    AppError,
};
use dialtrack_db::PgCallRepository;
use dialtrack_telephony::TwilioClient;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Start an outbound call
///
/// POST /api/v1/calls
///
/// Originates the call with the provider, then inserts the initial record
/// with status "initiated". Unlike the webhook path, failures here propagate
/// to the caller: a call that was never recorded is a failed initiation.
#[instrument(skip(pool, twilio, body))]
pub async fn start_call(
    body: Json<StartCallRequest>,
    pool: Data<PgPool>,
    twilio: Data<TwilioClient>,
) -> Result<Json<StartCallResponse>, AppError> {
    body.validate().map_err(|e| {
        warn!("Invalid start-call request: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let request = body.into_inner();
    let customer_name = request.customer_name.trim().to_string();
    let phone_number = request.phone_number.trim().to_string();

    let call_sid = twilio
        .start_outbound_call(&phone_number, &customer_name, request.department)
        .await?;

    let repo = PgCallRepository::new(pool.get_ref().clone());
    repo.upsert_initial(&CallInit::initiated(
        call_sid.as_str(),
        customer_name,
        phone_number,
        request.department,
    ))
    .await?;

    info!("Call {} started for {}", call_sid, request.department);

    Ok(Json(StartCallResponse {
        message: "Call started".to_string(),
        call_sid,
    }))
}

/// List all call records, newest first
///
/// GET /api/v1/calls
#[instrument(skip(pool))]
pub async fn list_calls(pool: Data<PgPool>) -> Result<Json<Vec<CallResponse>>, AppError> {
    debug!("Listing all calls");

    let repo = PgCallRepository::new(pool.get_ref().clone());
    let calls = repo.list_all().await?;

    Ok(Json(calls.into_iter().map(CallResponse::from).collect()))
}

/// List call records for one department, newest first
///
/// GET /api/v1/calls/{department}
///
/// Responds 400 for a department outside Sales/CRM/Collection/Support.
#[instrument(skip(pool))]
pub async fn list_department_calls(
    path: Path<String>,
    pool: Data<PgPool>,
) -> Result<Json<Vec<CallResponse>>, AppError> {
    let department = Department::parse(&path.into_inner())?;
    debug!("Listing calls for department {}", department);

    let repo = PgCallRepository::new(pool.get_ref().clone());
    let calls = repo.list_by_department(department).await?;

    Ok(Json(calls.into_iter().map(CallResponse::from).collect()))
}

/// Look up the recording for a call
///
/// GET /api/v1/recordings/{call_sid}
#[instrument(skip(pool))]
pub async fn get_recording(
    path: Path<String>,
    pool: Data<PgPool>,
) -> Result<Json<RecordingResponse>, AppError> {
    let call_sid = path.into_inner();
    debug!("Fetching recording for call {}", call_sid);

    let repo = PgCallRepository::new(pool.get_ref().clone());
    let recording = repo
        .find_recording(&call_sid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Call {} not found", call_sid)))?;

    Ok(Json(RecordingResponse::from(recording)))
}

/// Configure call routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    use actix_web::web;

    cfg.route("/calls", web::post().to(start_call))
        .route("/calls", web::get().to(list_calls))
        .route("/calls/{department}", web::get().to(list_department_calls))
        .route("/recordings/{call_sid}", web::get().to(get_recording));
}
