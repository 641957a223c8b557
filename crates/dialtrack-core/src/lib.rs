//! DialTrack Core Library
//!
//! This crate provides the foundational types and logic for the DialTrack
//! outbound call tracking system. It includes:
//!
//! - Domain models (CallRecord, Department, CallInit)
//! - The webhook merge policy that reconciles partial provider events
//! - Read-side statistics aggregation
//! - Repository traits for the call record store
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod stats;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
