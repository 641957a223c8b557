//! Data Transfer Objects (DTOs) for API requests and responses

pub mod call;
pub mod stats;
pub mod webhook;

pub use call::*;
pub use stats::*;
pub use webhook::*;
