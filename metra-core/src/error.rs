//! Conversion errors
//!
//! Every error carries a machine-readable code so callers (the CLI, a UI)
//! can branch on it without matching message text.

use crate::ConversionKind;
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_UNIT: &str = "INVALID_UNIT";
    pub const RATE_FETCH: &str = "RATE_FETCH";
    pub const MISSING_RATE: &str = "MISSING_RATE";
    pub const NON_FINITE: &str = "NON_FINITE";
    pub const INCOMPLETE_DATA: &str = "INCOMPLETE_DATA";
    pub const UNKNOWN_KIND: &str = "UNKNOWN_KIND";
    pub const UNSUPPORTED_KIND: &str = "UNSUPPORTED_KIND";
    pub const STORAGE: &str = "STORAGE";
}

/// Error type for conversions and their collaborators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// One or both unit ids are not defined by the converter
    #[error("invalid {kind} unit: {}", .units.join(", "))]
    InvalidUnit {
        kind: ConversionKind,
        units: Vec<String>,
    },

    /// Live rates could not be fetched and no usable cache exists
    #[error("failed to fetch {kind} rates: {reason}")]
    RateFetch {
        kind: ConversionKind,
        reason: String,
    },

    /// The rate table has no usable rate for a configured unit
    #[error("no {kind} rate available for {unit}")]
    MissingRate {
        kind: ConversionKind,
        unit: String,
    },

    /// The conversion overflowed or otherwise left the finite range
    #[error("{kind} conversion from {from} to {to} has no finite result")]
    NonFinite {
        kind: ConversionKind,
        from: String,
        to: String,
    },

    /// A conversion record lacks required fields
    #[error("incomplete conversion data, missing: {}", .missing.join(", "))]
    IncompleteData { missing: Vec<&'static str> },

    #[error("unknown conversion type: {name}")]
    UnknownKind {
        name: String,
        suggestions: Vec<&'static str>,
    },

    #[error("no converter registered for {0}")]
    UnsupportedKind(ConversionKind),

    #[error("storage error: {0}")]
    Storage(String),
}

impl ConvertError {
    pub fn invalid_unit(kind: ConversionKind, units: Vec<String>) -> Self {
        Self::InvalidUnit { kind, units }
    }

    pub fn rate_fetch(kind: ConversionKind, reason: impl Into<String>) -> Self {
        Self::RateFetch { kind, reason: reason.into() }
    }

    pub fn missing_rate(kind: ConversionKind, unit: impl Into<String>) -> Self {
        Self::MissingRate { kind, unit: unit.into() }
    }

    /// `value` unchanged when finite, `NonFinite` otherwise
    pub fn finite(kind: ConversionKind, from: &str, to: &str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFinite {
                kind,
                from: from.to_string(),
                to: to.to_string(),
            })
        }
    }

    pub fn storage(details: impl std::fmt::Display) -> Self {
        Self::Storage(details.to_string())
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUnit { .. } => codes::INVALID_UNIT,
            Self::RateFetch { .. } => codes::RATE_FETCH,
            Self::MissingRate { .. } => codes::MISSING_RATE,
            Self::NonFinite { .. } => codes::NON_FINITE,
            Self::IncompleteData { .. } => codes::INCOMPLETE_DATA,
            Self::UnknownKind { .. } => codes::UNKNOWN_KIND,
            Self::UnsupportedKind(_) => codes::UNSUPPORTED_KIND,
            Self::Storage(_) => codes::STORAGE,
        }
    }

    /// Whether the caller can recover by re-prompting or retrying
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }

    /// Suggestion for fixing the error, when one exists
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::InvalidUnit { kind, .. } => {
                Some(format!("List the {} units and pick one of their ids", kind))
            }
            Self::RateFetch { .. } => Some("Check connectivity and retry".to_string()),
            Self::NonFinite { .. } => Some("Use a smaller value".to_string()),
            Self::UnknownKind { suggestions, .. } if !suggestions.is_empty() => {
                Some(format!("Similar: {}", suggestions.join(", ")))
            }
            _ => None,
        }
    }
}
