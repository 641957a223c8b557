//! Call initiation and listing DTOs

use chrono::{DateTime, Utc};
use dialtrack_core::models::{CallRecord, CallRecording, Department};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for starting an outbound call
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartCallRequest {
    /// Customer name spoken in the voice menu greeting
    #[validate(length(min = 1, message = "customerName is required"))]
    pub customer_name: String,

    /// Number to dial, E.164
    #[validate(length(min = 1, message = "phoneNumber is required"))]
    pub phone_number: String,

    /// Department the call belongs to
    pub department: Department,
}

/// Response for a started call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartCallResponse {
    pub message: String,
    pub call_sid: String,
}

/// A call record as returned by the dashboard endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResponse {
    pub call_sid: String,
    pub customer_name: Option<String>,
    pub phone_number: Option<String>,
    pub department: Option<Department>,
    pub status: Option<String>,
    pub duration: Option<i32>,
    pub recording_url: Option<String>,
    pub ivr_selection: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CallRecord> for CallResponse {
    fn from(record: CallRecord) -> Self {
        Self {
            call_sid: record.call_sid,
            customer_name: record.customer_name,
            phone_number: record.phone_number,
            department: record.department,
            status: record.status,
            duration: record.duration,
            recording_url: record.recording_url,
            ivr_selection: record.ivr_selection,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Recording lookup response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingResponse {
    pub call_sid: String,
    pub recording_url: Option<String>,
}

impl From<CallRecording> for RecordingResponse {
    fn from(recording: CallRecording) -> Self {
        Self {
            call_sid: recording.call_sid,
            recording_url: recording.recording_url,
        }
    }
}
