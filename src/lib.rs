//! tvrelay Library
//!
//! Receives trading-alert webhooks, enriches CN/HK security codes with
//! display names from public quote providers, and relays the result to
//! a configured chat sink.

pub mod beautify;
pub mod config;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod relay;
pub mod resolver;
pub mod server;
pub mod substitute;
pub mod types;
