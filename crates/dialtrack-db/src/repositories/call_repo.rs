//! Call record repository implementation
//!
//! PostgreSQL-backed store for call records. Uses runtime queries (not
//! compile-time macros) to avoid requiring a database connection at build
//! time.
//!
//! Webhook merges run inside a transaction with a `FOR UPDATE` row lock, so
//! concurrent events for the same call SID serialize instead of losing
//! updates; events for different SIDs only contend at the pool level.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dialtrack_core::{
    models::{CallInit, CallRecord, CallRecording, Department, StatusBreakdownRow},
    reconcile::CallPatch,
    traits::CallRepository,
    AppError, AppResult,
};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of CallRepository
pub struct PgCallRepository {
    pool: PgPool,
}

impl PgCallRepository {
    /// Create a new call record repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CALL_SELECT_COLUMNS: &str = r#"
    call_sid, customer_name, phone_number, department,
    status, duration, recording_url, ivr_selection,
    created_at, updated_at
"#;

#[async_trait]
impl CallRepository for PgCallRepository {
    #[instrument(skip(self, init), fields(call_sid = %init.call_sid))]
    async fn upsert_initial(&self, init: &CallInit) -> AppResult<()> {
        debug!("Upserting initial record for call {}", init.call_sid);

        // A duplicate initiation is an authoritative restart of the call
        // identity, so the identity fields are overwritten rather than merged.
        sqlx::query(
            r#"
            INSERT INTO calls (call_sid, customer_name, phone_number, department, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (call_sid) DO UPDATE SET
                customer_name = EXCLUDED.customer_name,
                phone_number = EXCLUDED.phone_number,
                department = EXCLUDED.department,
                status = EXCLUDED.status,
                updated_at = now()
            "#,
        )
        .bind(&init.call_sid)
        .bind(&init.customer_name)
        .bind(&init.phone_number)
        .bind(init.department.as_str())
        .bind(&init.status)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error upserting call {}: {}", init.call_sid, e);
            AppError::Database(format!("Failed to upsert initial call record: {}", e))
        })?;

        Ok(())
    }

    #[instrument(skip(self, patch))]
    async fn merge_event(&self, call_sid: &str, patch: &CallPatch) -> AppResult<()> {
        debug!("Merging webhook event for call {}", call_sid);

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to begin merge transaction for {}: {}", call_sid, e);
            AppError::Transaction(format!("Failed to begin transaction: {}", e))
        })?;

        // The webhook may outrun the initiation insert; make sure a row
        // exists before locking it.
        sqlx::query(
            "INSERT INTO calls (call_sid) VALUES ($1) ON CONFLICT (call_sid) DO NOTHING",
        )
        .bind(call_sid)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error ensuring row for {}: {}", call_sid, e);
            AppError::Database(format!("Failed to ensure call row: {}", e))
        })?;

        let query = format!(
            "SELECT {} FROM calls WHERE call_sid = $1 FOR UPDATE",
            CALL_SELECT_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, CallRow>(&query)
            .bind(call_sid)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                error!("Database error locking row for {}: {}", call_sid, e);
                AppError::Database(format!("Failed to read call record: {}", e))
            })?;

        let mut record: CallRecord = row.into();
        patch.apply_to(&mut record);

        // updated_at is bumped even when the patch was a no-op duplicate, so
        // redelivery leaves a visible trace without changing the payload.
        sqlx::query(
            r#"
            UPDATE calls
            SET phone_number = $2,
                status = $3,
                duration = $4,
                recording_url = $5,
                ivr_selection = $6,
                updated_at = now()
            WHERE call_sid = $1
            "#,
        )
        .bind(call_sid)
        .bind(&record.phone_number)
        .bind(&record.status)
        .bind(record.duration)
        .bind(&record.recording_url)
        .bind(&record.ivr_selection)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error writing merge for {}: {}", call_sid, e);
            AppError::Database(format!("Failed to write merged call record: {}", e))
        })?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit merge for {}: {}", call_sid, e);
            AppError::Transaction(format!("Failed to commit merge: {}", e))
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> AppResult<Vec<CallRecord>> {
        debug!("Listing all call records");

        let query = format!(
            "SELECT {} FROM calls ORDER BY created_at DESC",
            CALL_SELECT_COLUMNS
        );

        let rows = sqlx::query_as::<sqlx::Postgres, CallRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error listing calls: {}", e);
                AppError::Database(format!("Failed to fetch calls: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn list_by_department(&self, department: Department) -> AppResult<Vec<CallRecord>> {
        debug!("Listing call records for department {}", department);

        let query = format!(
            "SELECT {} FROM calls WHERE department = $1 ORDER BY created_at DESC",
            CALL_SELECT_COLUMNS
        );

        let rows = sqlx::query_as::<sqlx::Postgres, CallRow>(&query)
            .bind(department.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error listing {} calls: {}", department, e);
                AppError::Database(format!("Failed to fetch department calls: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_recording(&self, call_sid: &str) -> AppResult<Option<CallRecording>> {
        debug!("Finding recording for call {}", call_sid);

        let row: Option<(String, Option<String>)> =
            sqlx::query_as("SELECT call_sid, recording_url FROM calls WHERE call_sid = $1")
                .bind(call_sid)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    error!("Database error finding recording for {}: {}", call_sid, e);
                    AppError::Database(format!("Failed to fetch recording: {}", e))
                })?;

        Ok(row.map(|(call_sid, recording_url)| CallRecording {
            call_sid,
            recording_url,
        }))
    }

    #[instrument(skip(self))]
    async fn status_breakdown(&self) -> AppResult<Vec<StatusBreakdownRow>> {
        debug!("Computing department/status breakdown");

        // Single grouped query: the aggregator folds one snapshot, so totals
        // cannot drift from the class counts under concurrent writes.
        let rows: Vec<(Option<String>, Option<String>, i64)> = sqlx::query_as(
            r#"
            SELECT department, status, COUNT(*)::BIGINT AS count
            FROM calls
            GROUP BY department, status
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error computing breakdown: {}", e);
            AppError::Database(format!("Failed to compute stats: {}", e))
        })?;

        Ok(rows
            .into_iter()
            .map(|(department, status, count)| StatusBreakdownRow {
                department,
                status,
                count,
            })
            .collect())
    }
}

/// Helper struct for mapping database rows to the domain model
#[derive(Debug, sqlx::FromRow)]
struct CallRow {
    call_sid: String,
    customer_name: Option<String>,
    phone_number: Option<String>,
    department: Option<String>,
    status: Option<String>,
    duration: Option<i32>,
    recording_url: Option<String>,
    ivr_selection: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CallRow> for CallRecord {
    fn from(row: CallRow) -> Self {
        Self {
            call_sid: row.call_sid,
            customer_name: row.customer_name,
            phone_number: row.phone_number,
            department: row
                .department
                .as_deref()
                .and_then(|d| Department::parse(d).ok()),
            status: row.status,
            duration: row.duration,
            recording_url: row.recording_url,
            ivr_selection: row.ivr_selection,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
