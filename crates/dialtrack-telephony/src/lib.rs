//! DialTrack Telephony Layer
//!
//! Thin integration with the Twilio REST API: originating outbound calls
//! with status and recording callbacks wired up, and building the TwiML
//! voice menu document the provider fetches when the callee picks up.

pub mod client;
pub mod twiml;

pub use client::TwilioClient;
pub use twiml::build_voice_menu;
