//! Twilio REST client
//!
//! Originates outbound calls through the Twilio Calls API. The client owns
//! the callback URL layout: the TwiML fetch URL carries the customer name
//! and department as query parameters, and the status/recording callbacks
//! point at the webhook endpoints that feed the call record store.

use dialtrack_core::{config::TwilioConfig, models::Department, AppError, AppResult};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// Lifecycle events Twilio is asked to report on the status callback
const STATUS_CALLBACK_EVENTS: [&str; 4] = ["initiated", "ringing", "answered", "completed"];

/// Twilio Calls API client
#[derive(Debug, Clone)]
pub struct TwilioClient {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
    caller_id: String,
    base_url: String,
    api_root: String,
}

/// The subset of the call resource we care about
#[derive(Debug, Deserialize)]
struct CallResource {
    sid: String,
}

impl TwilioClient {
    /// Create a client from provider configuration
    pub fn new(config: &TwilioConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            caller_id: config.caller_id.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_root: config.api_root.trim_end_matches('/').to_string(),
        }
    }

    /// Originate an outbound call and return the provider-issued call SID
    ///
    /// The SID is the identity key every later webhook correlates to; the
    /// caller inserts the initial record once this returns.
    #[instrument(skip(self), fields(department = %department))]
    pub async fn start_outbound_call(
        &self,
        phone_number: &str,
        customer_name: &str,
        department: Department,
    ) -> AppResult<String> {
        let twiml_url = self.twiml_url(customer_name, department)?;
        let status_callback = format!("{}/webhooks/call-status", self.base_url);
        let recording_callback = format!("{}/webhooks/recording-complete", self.base_url);

        debug!("Creating Twilio call to {}", phone_number);

        let endpoint = format!(
            "{}/2010-04-01/Accounts/{}/Calls.json",
            self.api_root, self.account_sid
        );

        let mut params: Vec<(&str, &str)> = vec![
            ("To", phone_number),
            ("From", &self.caller_id),
            ("Url", twiml_url.as_str()),
            ("StatusCallback", &status_callback),
            ("StatusCallbackMethod", "POST"),
            ("Record", "true"),
            ("RecordingStatusCallback", &recording_callback),
            ("RecordingStatusCallbackMethod", "POST"),
            ("RecordingStatusCallbackEvent", "completed"),
        ];
        for event in STATUS_CALLBACK_EVENTS {
            params.push(("StatusCallbackEvent", event));
        }

        let response = self
            .http
            .post(&endpoint)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                warn!("Twilio call creation request failed: {}", e);
                AppError::Provider(format!("Call creation request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Twilio rejected call creation: {} {}", status, body);
            return Err(AppError::Provider(format!(
                "Call creation rejected with status {}: {}",
                status, body
            )));
        }

        let call: CallResource = response.json().await.map_err(|e| {
            AppError::Provider(format!("Malformed call creation response: {}", e))
        })?;

        info!("Outbound call created with SID {}", call.sid);

        Ok(call.sid)
    }

    /// Build the TwiML fetch URL for a call
    fn twiml_url(&self, customer_name: &str, department: Department) -> AppResult<Url> {
        Url::parse_with_params(
            &format!("{}/twiml", self.base_url),
            &[
                ("customerName", customer_name),
                ("department", department.as_str()),
            ],
        )
        .map_err(|e| AppError::Internal(format!("Invalid TwiML callback URL: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TwilioClient {
        TwilioClient::new(&TwilioConfig {
            account_sid: "AC000".to_string(),
            auth_token: "secret".to_string(),
            caller_id: "+15550001111".to_string(),
            base_url: "https://example.com/".to_string(),
            api_root: "https://api.twilio.com".to_string(),
        })
    }

    #[test]
    fn test_twiml_url_encodes_query() {
        let url = client()
            .twiml_url("Rohan & Co", Department::Crm)
            .unwrap();

        assert!(url.as_str().starts_with("https://example.com/twiml?"));
        assert!(url.as_str().contains("department=CRM"));
        // The ampersand in the name must not split the query
        assert!(url
            .query_pairs()
            .any(|(k, v)| k == "customerName" && v == "Rohan & Co"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let c = client();
        assert_eq!(c.base_url, "https://example.com");
    }
}
