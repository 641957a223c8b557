//! Provider webhook handlers
//!
//! Twilio delivers status and recording callbacks at-least-once and with no
//! ordering guarantee. Both handlers always acknowledge with 200, including
//! when the callback carries no CallSid or the local merge fails; anything
//! else would make the provider retry-storm an endpoint that cannot succeed.
//! Local failures are logged with the SID and operation instead.

use crate::dto::{RecordingCallbackParams, StatusCallbackParams};
use actix_web::{
    web::{Data, Form},
    HttpResponse,
};
use dialtrack_core::traits::CallRepository;
use dialtrack_db::PgCallRepository;
use sqlx::PgPool;
use tracing::{debug, error, instrument, warn};

/// Handle a call status callback
///
/// POST /webhooks/call-status
///
/// Also the Gather action target, so digit presses arrive here as `Digits`.
#[instrument(skip(pool, form))]
pub async fn call_status(form: Form<StatusCallbackParams>, pool: Data<PgPool>) -> HttpResponse {
    let params = form.into_inner();

    // An empty CallSid is as useless as a missing one; neither may touch a row.
    let Some(call_sid) = params.call_sid().map(str::to_owned) else {
        warn!("call-status webhook without CallSid");
        return HttpResponse::Ok().finish();
    };

    let patch = params.into_patch();
    debug!("call-status webhook for {}: {:?}", call_sid, patch);

    let repo = PgCallRepository::new(pool.get_ref().clone());
    if let Err(e) = repo.merge_event(&call_sid, &patch).await {
        error!("Failed to merge call-status event for {}: {}", call_sid, e);
    }

    HttpResponse::Ok().finish()
}

/// Handle a recording-complete callback
///
/// POST /webhooks/recording-complete
#[instrument(skip(pool, form))]
pub async fn recording_complete(
    form: Form<RecordingCallbackParams>,
    pool: Data<PgPool>,
) -> HttpResponse {
    let params = form.into_inner();

    let Some(call_sid) = params.call_sid().map(str::to_owned) else {
        warn!("recording-complete webhook without CallSid");
        return HttpResponse::Ok().finish();
    };

    let patch = params.into_patch();
    debug!("recording-complete webhook for {}", call_sid);

    let repo = PgCallRepository::new(pool.get_ref().clone());
    if let Err(e) = repo.merge_event(&call_sid, &patch).await {
        error!(
            "Failed to merge recording-complete event for {}: {}",
            call_sid, e
        );
    }

    HttpResponse::Ok().finish()
}

/// Configure webhook routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    use actix_web::web;

    cfg.route("/call-status", web::post().to(call_status))
        .route("/recording-complete", web::post().to(recording_complete));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use sqlx::postgres::PgPoolOptions;

    // Callbacks with no usable CallSid return before touching the pool, so
    // a lazy pool that can never connect is enough here.
    fn unconnected_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgresql://127.0.0.1:1/unreachable")
            .unwrap()
    }

    async fn post_form(uri: &str, body: &'static str) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(unconnected_pool()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(uri)
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .set_payload(body)
            .to_request();
        test::call_service(&app, req).await
    }

    #[actix_web::test]
    async fn test_call_status_without_call_sid_is_acked_without_merge() {
        let resp = post_form("/call-status", "CallStatus=ringing").await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn test_call_status_with_empty_call_sid_is_acked_without_merge() {
        let resp = post_form("/call-status", "CallSid=&CallStatus=ringing").await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn test_recording_complete_with_empty_call_sid_is_acked_without_merge() {
        let resp = post_form(
            "/recording-complete",
            "CallSid=&RecordingUrl=https%3A%2F%2Fx%2Frec.mp3",
        )
        .await;
        assert!(resp.status().is_success());
    }
}
