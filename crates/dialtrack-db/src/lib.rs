//! DialTrack Database Layer
//!
//! PostgreSQL-backed storage for the call record store. It includes:
//!
//! - Connection pool management with sqlx
//! - Startup schema bootstrap for the `calls` table
//! - The `PgCallRepository` implementation of the store, with per-row
//!   serialization of webhook merges

pub mod pool;
pub mod repositories;
pub mod schema;

pub use pool::create_pool;
pub use repositories::PgCallRepository;
pub use schema::init_schema;

// Re-export commonly used types
pub use dialtrack_core::{AppError, AppResult};
pub use sqlx::PgPool;
