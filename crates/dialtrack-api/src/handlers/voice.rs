//! TwiML voice menu handler
//!
//! Twilio fetches this endpoint when the callee answers. The customer name
//! and department were baked into the URL at call creation, so the menu
//! needs no database access.

use actix_web::{
    web::{self, Query},
    HttpResponse,
};
use dialtrack_core::models::Department;
use dialtrack_telephony::build_voice_menu;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Query parameters on the TwiML fetch URL
#[derive(Debug, Clone, Deserialize)]
pub struct TwimlQuery {
    #[serde(rename = "customerName")]
    pub customer_name: Option<String>,
    pub department: Option<String>,
}

/// Render the voice menu TwiML document
///
/// GET|POST /twiml
#[instrument]
pub async fn twiml(query: Query<TwimlQuery>) -> HttpResponse {
    let params = query.into_inner();

    let customer_name = params.customer_name.unwrap_or_default();
    let department = params
        .department
        .as_deref()
        .and_then(|d| Department::parse(d).ok())
        .unwrap_or(Department::Sales);

    debug!("Rendering voice menu for department {}", department);

    let doc = build_voice_menu(&customer_name, department);

    HttpResponse::Ok().content_type("text/xml").body(doc)
}

/// Configure the TwiML route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/twiml", web::get().to(twiml))
        .route("/twiml", web::post().to(twiml));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, test, App};

    #[actix_web::test]
    async fn test_twiml_endpoint_renders_menu() {
        let app = test::init_service(App::new().configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/twiml?customerName=Priya&department=Support")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body = to_bytes(resp.into_body()).await.unwrap();
        let doc = std::str::from_utf8(&body).unwrap();
        assert!(doc.contains("Hello Priya"));
        assert!(doc.contains("the Support team"));
    }

    #[actix_web::test]
    async fn test_twiml_defaults_when_params_missing() {
        let app = test::init_service(App::new().configure(configure)).await;

        let req = test::TestRequest::get().uri("/twiml").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body = to_bytes(resp.into_body()).await.unwrap();
        let doc = std::str::from_utf8(&body).unwrap();
        assert!(doc.contains("Hello Customer"));
        assert!(doc.contains("the Sales team"));
    }
}
