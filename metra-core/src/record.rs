//! Conversion records
//!
//! The core produces `ConversionRecord`s but never stores them; history
//! and favorites collaborators persist them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::{ConversionKind, ConvertError};

/// One completed conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRecord {
    #[serde(rename = "type")]
    pub kind: ConversionKind,
    pub from_unit: String,
    pub from_value: f64,
    pub to_unit: String,
    pub to_value: f64,
    pub timestamp: DateTime<Utc>,
}

impl ConversionRecord {
    /// Create a record stamped with the current time
    pub fn new(
        kind: ConversionKind,
        from_unit: &str,
        from_value: f64,
        to_unit: &str,
        to_value: f64,
    ) -> Self {
        ConversionRecord {
            kind,
            from_unit: from_unit.to_string(),
            from_value,
            to_unit: to_unit.to_string(),
            to_value,
            timestamp: Utc::now(),
        }
    }
}

/// A record as submitted by a UI, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    #[serde(rename = "type", default)]
    pub kind: Option<ConversionKind>,
    #[serde(default)]
    pub from_unit: Option<String>,
    #[serde(default)]
    pub from_value: Option<f64>,
    #[serde(default)]
    pub to_unit: Option<String>,
    #[serde(default)]
    pub to_value: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl RecordDraft {
    /// Validate the draft, stamping `now` when no timestamp was given.
    ///
    /// Empty unit strings count as missing, and so do non-finite values,
    /// which have no JSON representation.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<ConversionRecord, ConvertError> {
        let mut missing = Vec::new();
        if self.kind.is_none() {
            missing.push("type");
        }
        let from_unit = self.from_unit.filter(|u| !u.is_empty());
        if from_unit.is_none() {
            missing.push("fromUnit");
        }
        let to_unit = self.to_unit.filter(|u| !u.is_empty());
        if to_unit.is_none() {
            missing.push("toUnit");
        }
        let from_value = self.from_value.filter(|v| v.is_finite());
        if from_value.is_none() {
            missing.push("fromValue");
        }
        let to_value = self.to_value.filter(|v| v.is_finite());
        if to_value.is_none() {
            missing.push("toValue");
        }

        match (self.kind, from_unit, from_value, to_unit, to_value) {
            (Some(kind), Some(from_unit), Some(from_value), Some(to_unit), Some(to_value)) => {
                Ok(ConversionRecord {
                    kind,
                    from_unit,
                    from_value,
                    to_unit,
                    to_value,
                    timestamp: self.timestamp.unwrap_or(now),
                })
            }
            _ => Err(ConvertError::IncompleteData { missing }),
        }
    }
}

impl From<ConversionRecord> for RecordDraft {
    fn from(record: ConversionRecord) -> Self {
        RecordDraft {
            kind: Some(record.kind),
            from_unit: Some(record.from_unit),
            from_value: Some(record.from_value),
            to_unit: Some(record.to_unit),
            to_value: Some(record.to_value),
            timestamp: Some(record.timestamp),
        }
    }
}
