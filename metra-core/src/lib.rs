//! Metra Core - Fundamental types
//!
//! This crate provides the core types used throughout Metra:
//! - `ConversionKind`: The six measurement domains
//! - `UnitDefinition` / `UnitOption`: Unit metadata for converters and UIs
//! - `ConversionRecord`: The value object a conversion produces
//! - `ConvertError`: Typed errors with machine-readable codes
//! - `round_to`: The single decimal-rounding primitive

mod error;
mod kind;
mod record;
mod round;
mod unit;

pub use error::{ConvertError, codes};
pub use kind::ConversionKind;
pub use record::{ConversionRecord, RecordDraft};
pub use round::{round_to, Precision};
pub use unit::{UnitDefinition, UnitOption};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ConversionKind, ConversionRecord, ConvertError, Precision, RecordDraft,
        UnitDefinition, UnitOption, round_to,
    };
    pub use crate::error::codes;
}
