//! Converter Registry

use crate::Converter;
use metra_core::{ConversionKind, ConvertError, UnitOption};
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Central converter registry, one converter per kind
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: BTreeMap<ConversionKind, Arc<dyn Converter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self {
            converters: BTreeMap::new(),
        }
    }

    /// Register a converter, replacing any previous one for its kind
    pub fn with_converter<C: Converter + 'static>(mut self, c: C) -> Self {
        self.converters.insert(c.kind(), Arc::new(c));
        self
    }

    pub fn with_shared(mut self, c: Arc<dyn Converter>) -> Self {
        self.converters.insert(c.kind(), c);
        self
    }

    pub fn get(&self, kind: ConversionKind) -> Option<&dyn Converter> {
        self.converters.get(&kind).map(|c| c.as_ref())
    }

    fn require(&self, kind: ConversionKind) -> Result<&dyn Converter, ConvertError> {
        self.get(kind).ok_or(ConvertError::UnsupportedKind(kind))
    }

    /// Registered kinds, in UI order
    pub fn kinds(&self) -> Vec<ConversionKind> {
        self.converters.keys().copied().collect()
    }

    pub fn unit_options(&self, kind: ConversionKind) -> Result<Vec<UnitOption>, ConvertError> {
        Ok(self.require(kind)?.unit_options())
    }

    pub async fn convert(
        &self,
        kind: ConversionKind,
        value: f64,
        from: &str,
        to: &str,
    ) -> Result<f64, ConvertError> {
        self.require(kind)?.convert(value, from, to).await
    }

    /// Describe every registered converter and its units
    pub fn describe(&self) -> JsonValue {
        let kinds: Vec<JsonValue> = self
            .converters
            .values()
            .map(|c| {
                let meta = c.meta();
                json!({
                    "type": meta.kind,
                    "label": meta.kind.label(),
                    "description": meta.description,
                    "baseUnit": meta.base_unit,
                    "precision": meta.precision,
                    "rateBacked": meta.rate_backed,
                    "units": c.unit_options(),
                })
            })
            .collect();
        JsonValue::Array(kinds)
    }
}
