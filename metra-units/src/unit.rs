//! Unit representation with a pair of base-unit mappings

use std::fmt;
use std::sync::Arc;
use metra_core::UnitDefinition;

type Mapping = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// A convertible unit: its metadata plus functions mapping values
/// into and out of the converter's base unit
#[derive(Clone)]
pub struct Unit {
    pub definition: UnitDefinition,
    to_base: Mapping,
    from_base: Mapping,
}

impl Unit {
    /// Create a unit from an explicit function pair
    pub fn new<T, F>(id: &str, name: &str, symbol: &str, to_base: T, from_base: F) -> Self
    where
        T: Fn(f64) -> f64 + Send + Sync + 'static,
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Unit {
            definition: UnitDefinition::new(id, name, symbol),
            to_base: Arc::new(to_base),
            from_base: Arc::new(from_base),
        }
    }

    /// Create the base unit itself (identity mappings)
    pub fn base(id: &str, name: &str, symbol: &str) -> Self {
        Self::new(id, name, symbol, |v| v, |v| v)
    }

    /// Create a proportional unit: one of it equals `base_per_unit` base units
    pub fn linear(id: &str, name: &str, symbol: &str, base_per_unit: f64) -> Self {
        Self::new(
            id,
            name,
            symbol,
            move |v| v * base_per_unit,
            move |b| b / base_per_unit,
        )
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    /// Convert a value from this unit to the base unit
    pub fn to_base(&self, value: f64) -> f64 {
        (self.to_base)(value)
    }

    /// Convert a value from the base unit to this unit
    pub fn from_base(&self, base: f64) -> f64 {
        (self.from_base)(base)
    }

    /// Base units per unit of change in this unit
    pub fn slope(&self) -> f64 {
        self.to_base(1.0) - self.to_base(0.0)
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("id", &self.definition.id)
            .field("symbol", &self.definition.symbol)
            .finish()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.definition.symbol)
    }
}

/// A known-exact ratio between two units that overrides the pivot.
///
/// One `from` equals `factor` of `to`. Applies in both directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExactRatio {
    pub from: &'static str,
    pub to: &'static str,
    pub factor: f64,
    /// Fractional digits kept, at least as many as the factor carries
    pub precision: u32,
}

impl ExactRatio {
    pub const fn new(from: &'static str, to: &'static str, factor: f64, precision: u32) -> Self {
        ExactRatio { from, to, factor, precision }
    }

    /// Apply the ratio if it covers the `(from, to)` pair, in either direction
    pub fn apply(&self, value: f64, from: &str, to: &str) -> Option<f64> {
        if from == self.from && to == self.to {
            Some(value * self.factor)
        } else if from == self.to && to == self.from {
            Some(value / self.factor)
        } else {
            None
        }
    }
}
