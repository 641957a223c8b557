//! Repository traits for the call record store
//!
//! Defines the storage abstraction the handlers depend on; the PostgreSQL
//! implementation lives in `dialtrack-db`.

use crate::error::AppError;
use crate::models::{CallInit, CallRecord, CallRecording, Department, StatusBreakdownRow};
use crate::reconcile::CallPatch;
use async_trait::async_trait;

/// Call record store
///
/// Implementations must make `merge_event` safe under concurrent invocation
/// for the same call SID: two events for one call may race, and a lost
/// update is a correctness bug, not an acceptable race.
#[async_trait]
pub trait CallRepository: Send + Sync {
    /// Insert the initial row for a freshly created provider call.
    ///
    /// If a row already exists for the SID (duplicate initiation, e.g. a
    /// retried request), the identity fields and status are overwritten with
    /// the new values and `updated_at` is bumped: a resubmission is an
    /// authoritative restart of the call identity, not a partial event.
    async fn upsert_initial(&self, init: &CallInit) -> Result<(), AppError>;

    /// Fold a partial webhook event into the record for `call_sid`.
    ///
    /// Creates a minimal row first if none exists (the provider may deliver
    /// a webhook before the initiation path commits its insert). Field
    /// semantics follow [`CallPatch::apply_to`]; `updated_at` is bumped on
    /// every merge.
    async fn merge_event(&self, call_sid: &str, patch: &CallPatch) -> Result<(), AppError>;

    /// All call records, newest first
    async fn list_all(&self) -> Result<Vec<CallRecord>, AppError>;

    /// Call records for one department, newest first
    async fn list_by_department(&self, department: Department)
        -> Result<Vec<CallRecord>, AppError>;

    /// Recording reference for a call, or `None` if the SID is unknown
    async fn find_recording(&self, call_sid: &str) -> Result<Option<CallRecording>, AppError>;

    /// Department/status rollup from a single consistent read, for the
    /// statistics aggregator
    async fn status_breakdown(&self) -> Result<Vec<StatusBreakdownRow>, AppError>;
}
