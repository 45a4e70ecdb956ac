//! Unit metadata shared by every converter

use std::fmt;
use serde::{Deserialize, Serialize};

/// Describes one convertible unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDefinition {
    /// Unit id used in conversion calls (e.g., "meter", "EUR")
    pub id: String,
    /// Display name (e.g., "Meter", "Euro")
    pub display_name: String,
    /// Unit symbol (e.g., "m", "€")
    pub symbol: String,
}

impl UnitDefinition {
    pub fn new(id: &str, display_name: &str, symbol: &str) -> Self {
        UnitDefinition {
            id: id.to_string(),
            display_name: display_name.to_string(),
            symbol: symbol.to_string(),
        }
    }

    /// The entry a UI lists for this unit
    pub fn option(&self) -> UnitOption {
        UnitOption {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            symbol: self.symbol.clone(),
        }
    }
}

impl fmt::Display for UnitDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// A unit as listed for UI population
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOption {
    pub id: String,
    pub display_name: String,
    pub symbol: String,
}

impl UnitOption {
    /// "Name (symbol)", as shown in unit pickers
    pub fn label(&self) -> String {
        format!("{} ({})", self.display_name, self.symbol)
    }
}
