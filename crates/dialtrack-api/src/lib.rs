//! API layer for DialTrack
//!
//! HTTP handlers and DTOs for call initiation, provider webhooks, the TwiML
//! voice menu, and the dashboard read endpoints.

#![forbid(unsafe_code)]

pub mod dto;
pub mod handlers;

pub use handlers::{
    configure_calls, configure_dashboard, configure_voice, configure_webhooks,
};
