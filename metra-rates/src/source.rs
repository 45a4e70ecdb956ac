//! Rate tables and the sources they come from

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::RateSourceError;

/// Rates denominated in one base currency, keyed by lower-cased unit code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable(BTreeMap<String, f64>);

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: &str, rate: f64) {
        self.0.insert(code.to_lowercase(), rate);
    }

    /// Rate for `code`, whatever its casing
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.0.get(&code.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<'a> FromIterator<(&'a str, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut table = RateTable::new();
        for (code, rate) in iter {
            table.insert(code, rate);
        }
        table
    }
}

/// A usable rate is finite and strictly positive
pub fn is_usable_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// Extract the table for `base` from a `{ "<base>": { "<code>": rate, ... } }`
/// payload. Non-numeric entries are skipped.
pub fn parse_rate_payload(payload: &JsonValue, base: &str) -> Result<RateTable, RateSourceError> {
    let base = base.to_lowercase();
    let entries = payload
        .get(&base)
        .ok_or_else(|| RateSourceError::MissingBase(base.clone()))?
        .as_object()
        .ok_or_else(|| RateSourceError::Parse(format!("'{}' is not an object", base)))?;

    Ok(entries
        .iter()
        .filter_map(|(code, rate)| rate.as_f64().map(|r| (code.as_str(), r)))
        .collect())
}

/// Where rate tables come from
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch the rates denominated in `base` (a currency code, any casing)
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RateSourceError>;
}

/// A source serving a fixed table (or a fixed failure), counting requests.
///
/// Used for offline operation and tests.
#[derive(Debug)]
pub struct FixedRateSource {
    response: Mutex<Result<RateTable, String>>,
    calls: AtomicUsize,
}

impl FixedRateSource {
    pub fn new(table: RateTable) -> Self {
        Self {
            response: Mutex::new(Ok(table)),
            calls: AtomicUsize::new(0),
        }
    }

    /// A source whose every fetch fails with `reason`
    pub fn failing(reason: &str) -> Self {
        Self {
            response: Mutex::new(Err(reason.to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_table(&self, table: RateTable) {
        if let Ok(mut response) = self.response.lock() {
            *response = Ok(table);
        }
    }

    pub fn set_failing(&self, reason: &str) {
        if let Ok(mut response) = self.response.lock() {
            *response = Err(reason.to_string());
        }
    }

    /// Number of fetches served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateSource for FixedRateSource {
    async fn fetch_rates(&self, _base: &str) -> Result<RateTable, RateSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self
            .response
            .lock()
            .map_err(|_| RateSourceError::Unavailable("poisoned".to_string()))?;
        match &*response {
            Ok(table) => Ok(table.clone()),
            Err(reason) => Err(RateSourceError::Unavailable(reason.clone())),
        }
    }
}
