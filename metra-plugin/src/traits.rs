//! Converter traits

use async_trait::async_trait;
use metra_core::{ConversionKind, ConvertError, UnitOption};
use serde::Serialize;

/// Metadata for a converter
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverterMeta {
    pub kind: ConversionKind,
    pub description: &'static str,
    /// Unit (or currency) every conversion pivots through
    pub base_unit: &'static str,
    /// Fractional digits of converted values
    pub precision: u32,
    /// Whether conversions may touch the network
    pub rate_backed: bool,
}

/// A converter for one measurement domain.
///
/// Static converters resolve immediately; rate-backed converters suspend
/// while their rate table is resolved.
#[async_trait]
pub trait Converter: Send + Sync {
    fn meta(&self) -> ConverterMeta;

    /// Units in declaration order
    fn unit_options(&self) -> Vec<UnitOption>;

    /// Convert `value` from one unit id to another.
    ///
    /// Unit ids are validated before any I/O.
    async fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, ConvertError>;

    fn kind(&self) -> ConversionKind {
        self.meta().kind
    }

    fn has_unit(&self, id: &str) -> bool {
        self.unit_options().iter().any(|u| u.id == id)
    }
}
