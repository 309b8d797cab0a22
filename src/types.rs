//! Core types used throughout tvrelay
//!
//! Defines the market classification, extraction results and the
//! per-alert presentation structure shared by the pipeline stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange grouping inferred from a security code's shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    /// Hong Kong (1-5 digit codes)
    Hk,
    /// Shanghai (6 digits, leading 6 or 5)
    Sh,
    /// Shenzhen (6 digits, leading 0, 1 or 3)
    Sz,
    /// Anything that fits no exchange; never queried upstream
    Unknown,
}

impl Market {
    /// Classify a bare code string into a market.
    ///
    /// Total over all inputs: a shape that fits no exchange yields
    /// `Unknown` instead of an error.
    pub fn classify(code: &str) -> Self {
        if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Market::Unknown;
        }
        match code.len() {
            1..=5 => Market::Hk,
            6 => match code.as_bytes()[0] {
                b'6' | b'5' => Market::Sh,
                b'0' | b'1' | b'3' => Market::Sz,
                _ => Market::Unknown,
            },
            _ => Market::Unknown,
        }
    }

    /// Prefix used in provider query URLs (e.g. "sh600000")
    pub fn query_prefix(&self) -> &'static str {
        match self {
            Market::Hk => "hk",
            Market::Sh => "sh",
            Market::Sz => "sz",
            Market::Unknown => "",
        }
    }

    /// Code as placed in a provider request. HK codes are left-padded
    /// to 5 digits; SH/SZ codes go out as-is.
    pub fn query_code(&self, code: &str) -> String {
        match self {
            Market::Hk => format!("{:0>5}", code),
            _ => code.to_string(),
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Market::Hk => "HK",
            Market::Sh => "SH",
            Market::Sz => "SZ",
            Market::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// One labeled code occurrence found in a message.
///
/// `span` is the byte range of the full `label:code` text consumed;
/// valid only against the string it was extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch {
    pub span: std::ops::Range<usize>,
    pub label: String,
    pub code: String,
    pub market: Market,
}

/// Trade direction inferred from an alert's signal text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
    Stop,
    Neutral,
}

impl Direction {
    pub fn icon(&self) -> &'static str {
        match self {
            Direction::Long => "📈",
            Direction::Short => "📉",
            Direction::Stop => "⛔",
            Direction::Neutral => "🔔",
        }
    }
}

/// One logical alert after beautification. Render-only; discarded
/// as soon as the display text is produced.
#[derive(Debug, Clone)]
pub struct Alert {
    pub stock: String,
    pub period: Option<String>,
    pub price: Option<String>,
    pub signal: Option<String>,
    pub indicator: Option<String>,
    pub direction: Direction,
}
