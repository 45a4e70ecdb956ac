//! Conversion domains

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::ConvertError;

/// The six measurement domains, in UI order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionKind {
    Length,
    Weight,
    Temperature,
    Volume,
    Currency,
    Crypto,
}

impl ConversionKind {
    pub const ALL: [ConversionKind; 6] = [
        ConversionKind::Length,
        ConversionKind::Weight,
        ConversionKind::Temperature,
        ConversionKind::Volume,
        ConversionKind::Currency,
        ConversionKind::Crypto,
    ];

    /// Wire name, as stored in records and favorites
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionKind::Length => "length",
            ConversionKind::Weight => "weight",
            ConversionKind::Temperature => "temperature",
            ConversionKind::Volume => "volume",
            ConversionKind::Currency => "currency",
            ConversionKind::Crypto => "crypto",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            ConversionKind::Length => "Length",
            ConversionKind::Weight => "Weight",
            ConversionKind::Temperature => "Temperature",
            ConversionKind::Volume => "Volume",
            ConversionKind::Currency => "Currency",
            ConversionKind::Crypto => "Cryptocurrency",
        }
    }

    /// Whether conversions need a remote rate table
    pub fn is_rate_backed(&self) -> bool {
        matches!(self, ConversionKind::Currency | ConversionKind::Crypto)
    }

    /// Kind names similar to `query`, best match first
    fn similar_names(query: &str) -> Vec<&'static str> {
        let mut matches: Vec<(&'static str, usize)> = Self::ALL
            .iter()
            .map(|k| k.as_str())
            .filter_map(|name| {
                let score = similarity_score(query, name);
                (score > 0).then_some((name, score))
            })
            .collect();

        matches.sort_by(|a, b| b.1.cmp(&a.1));
        matches.into_iter().take(3).map(|(name, _)| name).collect()
    }
}

/// Score how close `candidate` is to `query` (0 = unrelated)
fn similarity_score(query: &str, candidate: &str) -> usize {
    if query.is_empty() {
        return 0;
    }

    let mut score = 0;
    if candidate.starts_with(query) || query.starts_with(candidate) {
        score += 100;
    } else if candidate.contains(query) || query.contains(candidate) {
        score += 50;
    }

    // Shared leading characters
    score += query
        .chars()
        .zip(candidate.chars())
        .take_while(|(a, b)| a == b)
        .count()
        * 5;

    score
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversionKind {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == name)
            .ok_or_else(|| ConvertError::UnknownKind {
                suggestions: Self::similar_names(&name),
                name: s.to_string(),
            })
    }
}
