//! Domain models for DialTrack
//!
//! This module contains the core domain models used throughout the application.

pub mod call;

pub use call::{
    CallInit, CallRecord, CallRecording, Department, StatusBreakdownRow, ANSWERED_STATUSES,
    FAILED_STATUSES,
};
