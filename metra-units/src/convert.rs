//! Table-driven static converter

use async_trait::async_trait;
use metra_core::{round_to, ConversionKind, ConvertError, UnitOption};
use metra_plugin::{Converter, ConverterMeta};
use tracing::trace;

use crate::unit::{ExactRatio, Unit};

/// Converts between the units of one domain by pivoting through a base unit.
///
/// Units keep their declaration order. Exact ratios override the pivot
/// for the pairs they name.
#[derive(Debug, Clone)]
pub struct StaticConverter {
    kind: ConversionKind,
    description: &'static str,
    base_unit: &'static str,
    precision: u32,
    units: Vec<Unit>,
    exact: Vec<ExactRatio>,
}

impl StaticConverter {
    pub fn new(
        kind: ConversionKind,
        description: &'static str,
        base_unit: &'static str,
        precision: u32,
    ) -> Self {
        StaticConverter {
            kind,
            description,
            base_unit,
            precision,
            units: Vec::new(),
            exact: Vec::new(),
        }
    }

    /// Add a unit; a later unit with the same id replaces the earlier one
    pub fn with_unit(mut self, unit: Unit) -> Self {
        match self.units.iter_mut().find(|u| u.id() == unit.id()) {
            Some(existing) => *existing = unit,
            None => self.units.push(unit),
        }
        self
    }

    pub fn with_exact_ratio(mut self, ratio: ExactRatio) -> Self {
        self.exact.push(ratio);
        self
    }

    pub fn kind(&self) -> ConversionKind {
        self.kind
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id() == id)
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn exact_ratios(&self) -> &[ExactRatio] {
        &self.exact
    }

    /// Units in declaration order, for UI population
    pub fn unit_options(&self) -> Vec<UnitOption> {
        self.units.iter().map(|u| u.definition.option()).collect()
    }

    fn lookup(&self, from: &str, to: &str) -> Result<(&Unit, &Unit), ConvertError> {
        match (self.unit(from), self.unit(to)) {
            (Some(f), Some(t)) => Ok((f, t)),
            (f, t) => {
                let mut invalid = Vec::new();
                if f.is_none() {
                    invalid.push(from.to_string());
                }
                if t.is_none() && from != to {
                    invalid.push(to.to_string());
                }
                Err(ConvertError::invalid_unit(self.kind, invalid))
            }
        }
    }

    /// Convert `value` between two units of this domain.
    ///
    /// Same-unit conversions return `value` untouched. Everything else is
    /// rounded once, at the end. Results that overflow are `NonFinite`.
    pub fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, ConvertError> {
        let (from_unit, to_unit) = self.lookup(from, to)?;

        let result = if from == to {
            value
        } else if let Some((result, precision)) = self
            .exact
            .iter()
            .find_map(|r| r.apply(value, from, to).map(|v| (v, r.precision)))
        {
            trace!(kind = %self.kind, from, to, "exact ratio");
            round_to(result, precision)
        } else {
            let base = from_unit.to_base(value);
            round_to(to_unit.from_base(base), self.precision)
        };

        ConvertError::finite(self.kind, from, to, result)
    }
}

#[async_trait]
impl Converter for StaticConverter {
    fn meta(&self) -> ConverterMeta {
        ConverterMeta {
            kind: self.kind,
            description: self.description,
            base_unit: self.base_unit,
            precision: self.precision,
            rate_backed: false,
        }
    }

    fn unit_options(&self) -> Vec<UnitOption> {
        StaticConverter::unit_options(self)
    }

    async fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, ConvertError> {
        StaticConverter::convert(self, value, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> StaticConverter {
        StaticConverter::new(ConversionKind::Length, "test", "meter", 6)
            .with_unit(Unit::base("meter", "Meter", "m"))
            .with_unit(Unit::linear("kilometer", "Kilometer", "km", 1000.0))
            .with_unit(Unit::linear("foot", "Foot", "ft", 0.3048))
            .with_unit(Unit::linear("inch", "Inch", "in", 0.0254))
            .with_exact_ratio(ExactRatio::new("foot", "inch", 12.0, 6))
    }

    #[test]
    fn test_pivot_conversion() {
        let c = converter();
        assert_eq!(c.convert(1000.0, "meter", "kilometer").unwrap(), 1.0);
        assert_eq!(c.convert(2.5, "kilometer", "meter").unwrap(), 2500.0);
    }

    #[test]
    fn test_same_unit_is_untouched() {
        let c = converter();
        let v = 1.23456789123;
        assert_eq!(c.convert(v, "foot", "foot").unwrap(), v);
    }

    #[test]
    fn test_exact_ratio_wins() {
        let c = converter();
        assert_eq!(c.convert(1.0, "foot", "inch").unwrap(), 12.0);
        assert_eq!(c.convert(18.0, "inch", "foot").unwrap(), 1.5);
    }

    #[test]
    fn test_invalid_units_named() {
        let c = converter();
        assert_eq!(
            c.convert(10.0, "invalidUnit", "meter").unwrap_err(),
            ConvertError::invalid_unit(ConversionKind::Length, vec!["invalidUnit".to_string()])
        );
        assert_eq!(
            c.convert(10.0, "meter", "invalidUnit").unwrap_err(),
            ConvertError::invalid_unit(ConversionKind::Length, vec!["invalidUnit".to_string()])
        );
        assert_eq!(
            c.convert(10.0, "a", "b").unwrap_err(),
            ConvertError::invalid_unit(ConversionKind::Length, vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            c.convert(10.0, "a", "a").unwrap_err(),
            ConvertError::invalid_unit(ConversionKind::Length, vec!["a".to_string()])
        );
    }

    #[test]
    fn test_options_keep_declaration_order() {
        let ids: Vec<String> = converter().unit_options().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["meter", "kilometer", "foot", "inch"]);
    }

    #[test]
    fn test_duplicate_unit_replaces() {
        let c = converter().with_unit(Unit::linear("kilometer", "Kilometre", "km", 1000.0));
        assert_eq!(c.units().len(), 4);
        assert_eq!(c.unit("kilometer").unwrap().definition.display_name, "Kilometre");
    }

    #[test]
    fn test_overflow_is_an_error() {
        let c = converter();
        let err = c.convert(1e308, "kilometer", "meter").unwrap_err();
        assert_eq!(
            err,
            ConvertError::NonFinite {
                kind: ConversionKind::Length,
                from: "kilometer".to_string(),
                to: "meter".to_string(),
            }
        );
        assert!(c.convert(f64::INFINITY, "meter", "meter").is_err());
        assert_eq!(c.convert(1e308, "meter", "meter").unwrap(), 1e308);
    }

    #[tokio::test]
    async fn test_converter_trait() {
        let c = converter();
        let dynamic: &dyn Converter = &c;
        assert_eq!(dynamic.convert(1000.0, "meter", "kilometer").await, Ok(1.0));
        assert!(!dynamic.meta().rate_backed);
        assert_eq!(dynamic.kind(), ConversionKind::Length);
    }
}
