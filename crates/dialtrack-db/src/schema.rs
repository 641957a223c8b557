//! Schema bootstrap
//!
//! Creates the `calls` table and its indexes at startup. One row per call
//! SID; the UNIQUE constraint is what makes duplicate initiations and
//! out-of-order webhooks converge on a single row.

use dialtrack_core::{AppError, AppResult};
use sqlx::PgPool;
use tracing::info;

const CREATE_CALLS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS calls (
    id            BIGSERIAL PRIMARY KEY,
    call_sid      TEXT NOT NULL UNIQUE,
    customer_name TEXT,
    phone_number  TEXT,
    department    TEXT,
    status        TEXT,
    duration      INTEGER,
    recording_url TEXT,
    ivr_selection TEXT,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_DEPARTMENT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_calls_department ON calls (department)";

const CREATE_CREATED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_calls_created_at ON calls (created_at DESC)";

/// Create the calls table and indexes if they do not exist
pub async fn init_schema(pool: &PgPool) -> AppResult<()> {
    for statement in [
        CREATE_CALLS_TABLE,
        CREATE_DEPARTMENT_INDEX,
        CREATE_CREATED_AT_INDEX,
    ] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| AppError::Database(format!("Schema bootstrap failed: {}", e)))?;
    }

    info!("Database schema initialized");

    Ok(())
}
