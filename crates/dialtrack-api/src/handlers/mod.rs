//! HTTP request handlers

pub mod call;
pub mod dashboard;
pub mod voice;
pub mod webhook;

pub use call::configure as configure_calls;
pub use dashboard::configure as configure_dashboard;
pub use voice::configure as configure_voice;
pub use webhook::configure as configure_webhooks;
