//! Provider webhook DTOs
//!
//! Twilio delivers callbacks as form-encoded bodies with PascalCase field
//! names, every field optional in practice. Each callback is converted to a
//! `CallPatch`; a field the callback did not carry stays `None` so the merge
//! cannot blank a known value.

use dialtrack_core::reconcile::CallPatch;
use serde::Deserialize;

/// Call status callback parameters
///
/// Also receives the Gather action post, which carries `Digits`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusCallbackParams {
    #[serde(rename = "CallSid")]
    pub call_sid: Option<String>,

    #[serde(rename = "CallStatus")]
    pub call_status: Option<String>,

    /// Twilio sends the duration as a decimal string
    #[serde(rename = "CallDuration")]
    pub call_duration: Option<String>,

    #[serde(rename = "To")]
    pub to: Option<String>,

    #[serde(rename = "Digits")]
    pub digits: Option<String>,
}

impl StatusCallbackParams {
    /// The callback's call SID; an empty string counts as absent
    pub fn call_sid(&self) -> Option<&str> {
        self.call_sid.as_deref().filter(|s| !s.is_empty())
    }

    /// Convert to the partial update this callback represents
    pub fn into_patch(self) -> CallPatch {
        CallPatch {
            phone_number: self.to.filter(|s| !s.is_empty()),
            status: self.call_status.filter(|s| !s.is_empty()),
            duration: self
                .call_duration
                .as_deref()
                .and_then(|d| d.parse::<i32>().ok())
                .filter(|d| *d >= 0),
            recording_url: None,
            ivr_selection: self.digits.filter(|s| !s.is_empty()),
        }
    }
}

/// Recording status callback parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordingCallbackParams {
    #[serde(rename = "CallSid")]
    pub call_sid: Option<String>,

    #[serde(rename = "RecordingUrl")]
    pub recording_url: Option<String>,
}

impl RecordingCallbackParams {
    /// The callback's call SID; an empty string counts as absent
    pub fn call_sid(&self) -> Option<&str> {
        self.call_sid.as_deref().filter(|s| !s.is_empty())
    }

    /// Convert to the partial update this callback represents
    pub fn into_patch(self) -> CallPatch {
        CallPatch {
            recording_url: self.recording_url.filter(|s| !s.is_empty()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_callback_form_parsing() {
        let body = "CallSid=CA123&CallStatus=completed&CallDuration=42&To=%2B15550001111";
        let params: StatusCallbackParams = serde_urlencoded::from_str(body).unwrap();

        assert_eq!(params.call_sid.as_deref(), Some("CA123"));

        let patch = params.into_patch();
        assert_eq!(patch.status.as_deref(), Some("completed"));
        assert_eq!(patch.duration, Some(42));
        assert_eq!(patch.phone_number.as_deref(), Some("+15550001111"));
        assert!(patch.recording_url.is_none());
    }

    #[test]
    fn test_status_callback_without_call_sid() {
        let body = "CallStatus=ringing";
        let params: StatusCallbackParams = serde_urlencoded::from_str(body).unwrap();
        assert!(params.call_sid.is_none());
    }

    #[test]
    fn test_empty_call_sid_counts_as_absent() {
        let params: StatusCallbackParams =
            serde_urlencoded::from_str("CallSid=&CallStatus=ringing").unwrap();
        assert!(params.call_sid().is_none());

        let params: StatusCallbackParams =
            serde_urlencoded::from_str("CallSid=CA123&CallStatus=ringing").unwrap();
        assert_eq!(params.call_sid(), Some("CA123"));

        let params: RecordingCallbackParams = serde_urlencoded::from_str("CallSid=").unwrap();
        assert!(params.call_sid().is_none());
    }

    #[test]
    fn test_negative_duration_is_dropped() {
        let params = StatusCallbackParams {
            call_duration: Some("-5".to_string()),
            ..Default::default()
        };
        assert!(params.into_patch().duration.is_none());

        let params = StatusCallbackParams {
            call_duration: Some("0".to_string()),
            ..Default::default()
        };
        assert_eq!(params.into_patch().duration, Some(0));
    }

    #[test]
    fn test_unparseable_duration_is_dropped() {
        let params = StatusCallbackParams {
            call_duration: Some("n/a".to_string()),
            ..Default::default()
        };
        assert!(params.into_patch().duration.is_none());
    }

    #[test]
    fn test_empty_strings_do_not_become_values() {
        let params = StatusCallbackParams {
            call_sid: Some("CA123".to_string()),
            call_status: Some(String::new()),
            to: Some(String::new()),
            digits: Some(String::new()),
            ..Default::default()
        };
        let patch = params.into_patch();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_gather_digits_become_ivr_selection() {
        let body = "CallSid=CA123&Digits=1";
        let params: StatusCallbackParams = serde_urlencoded::from_str(body).unwrap();
        let patch = params.into_patch();
        assert_eq!(patch.ivr_selection.as_deref(), Some("1"));
        assert!(patch.status.is_none());
    }

    #[test]
    fn test_recording_callback_patch() {
        let body = "CallSid=CA123&RecordingUrl=https%3A%2F%2Fx%2Frec.mp3";
        let params: RecordingCallbackParams = serde_urlencoded::from_str(body).unwrap();
        assert_eq!(params.call_sid.as_deref(), Some("CA123"));

        let patch = params.into_patch();
        assert_eq!(patch.recording_url.as_deref(), Some("https://x/rec.mp3"));
        assert!(patch.status.is_none());
    }
}
