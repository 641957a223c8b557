//! Call record model
//!
//! One `CallRecord` exists per outbound call attempt, keyed by the
//! provider-issued call SID. Rows are created by the call-initiation path and
//! then filled in by asynchronous webhook events in whatever order the
//! provider delivers them.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status labels counted as an answered call
pub const ANSWERED_STATUSES: [&str; 2] = ["completed", "answered"];

/// Status labels counted as a failed call
pub const FAILED_STATUSES: [&str; 4] = ["failed", "busy", "no-answer", "canceled"];

/// Department that owns an outbound call campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    Sales,
    #[serde(rename = "CRM")]
    Crm,
    Collection,
    Support,
}

impl Department {
    /// All allowed departments
    pub const ALL: [Department; 4] = [
        Department::Sales,
        Department::Crm,
        Department::Collection,
        Department::Support,
    ];

    /// Canonical string form, as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Sales => "Sales",
            Department::Crm => "CRM",
            Department::Collection => "Collection",
            Department::Support => "Support",
        }
    }

    /// Parse from its canonical string form
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "Sales" => Ok(Department::Sales),
            "CRM" => Ok(Department::Crm),
            "Collection" => Ok(Department::Collection),
            "Support" => Ok(Department::Support),
            other => Err(AppError::InvalidDepartment(other.to_string())),
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call record
///
/// Identity fields (`call_sid`, `customer_name`, `department`) come from the
/// initiation path; lifecycle fields are filled in by webhook merges. Any
/// field a webhook has not yet reported is `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    /// Provider-issued call SID, globally unique
    pub call_sid: String,

    /// Customer name captured at initiation
    pub customer_name: Option<String>,

    /// Dialed number; status callbacks may also report it
    pub phone_number: Option<String>,

    /// Owning department, set at initiation
    pub department: Option<Department>,

    /// Most recently observed provider lifecycle label
    /// (initiated/ringing/answered/completed/failed/busy/no-answer/canceled)
    pub status: Option<String>,

    /// Call duration in seconds, known once the call ends
    pub duration: Option<i32>,

    /// Recording URL, known once the recording-complete event arrives
    pub recording_url: Option<String>,

    /// IVR digit(s) the callee pressed
    pub ivr_selection: Option<String>,

    /// Fixed at first insert
    pub created_at: DateTime<Utc>,

    /// Bumped on every merge
    pub updated_at: DateTime<Utc>,
}

impl CallRecord {
    /// Check if the call counts as answered
    #[inline]
    pub fn is_answered(&self) -> bool {
        self.status
            .as_deref()
            .map_or(false, |s| ANSWERED_STATUSES.contains(&s))
    }

    /// Check if the call counts as failed
    #[inline]
    pub fn is_failed(&self) -> bool {
        self.status
            .as_deref()
            .map_or(false, |s| FAILED_STATUSES.contains(&s))
    }
}

/// Fields supplied by the call-initiation path
///
/// A resubmitted initiation with the same SID is treated as an authoritative
/// restart of the call identity, not as a partial event.
#[derive(Debug, Clone)]
pub struct CallInit {
    pub call_sid: String,
    pub customer_name: String,
    pub phone_number: String,
    pub department: Department,
    pub status: String,
}

impl CallInit {
    /// Build the initial record for a freshly created provider call
    pub fn initiated(
        call_sid: impl Into<String>,
        customer_name: impl Into<String>,
        phone_number: impl Into<String>,
        department: Department,
    ) -> Self {
        Self {
            call_sid: call_sid.into(),
            customer_name: customer_name.into(),
            phone_number: phone_number.into(),
            department,
            status: "initiated".to_string(),
        }
    }
}

/// Recording lookup result
#[derive(Debug, Clone, Serialize)]
pub struct CallRecording {
    pub call_sid: String,
    pub recording_url: Option<String>,
}

/// One row of the department/status rollup the aggregator folds
///
/// Produced by a single `GROUP BY department, status` query so the resulting
/// statistics come from one consistent snapshot of the table.
#[derive(Debug, Clone)]
pub struct StatusBreakdownRow {
    pub department: Option<String>,
    pub status: Option<String>,
    pub count: i64,
}
