//! Metra Plugin System
//!
//! Every converter, static or rate-backed, is exposed through one
//! capability: list its units and convert a value between two of them.

mod traits;
mod registry;

pub use traits::{Converter, ConverterMeta};
pub use registry::ConverterRegistry;

/// Re-export core types for converter authors
pub mod prelude {
    pub use crate::{Converter, ConverterMeta, ConverterRegistry};
    pub use metra_core::prelude::*;
}
