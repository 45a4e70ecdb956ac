//! Metra Units - Static unit conversion
//!
//! Pure, synchronous, table-driven converters. Each unit maps into and out
//! of its domain's base unit, so adding a unit needs one function pair
//! rather than a pairwise matrix.
//!
//! Domains:
//! - Length (meter, kilometer, foot, inch, yard, mile) via the meter
//! - Weight (gram, kilogram, pound) via the gram
//! - Temperature (celsius, fahrenheit, kelvin) via Celsius
//! - Volume (liter, gallon) via the liter

mod convert;
mod temperature;
mod unit;
mod units;

pub use convert::StaticConverter;
pub use temperature::{celsius_to_fahrenheit, fahrenheit_to_celsius, temperature, KELVIN_OFFSET};
pub use unit::{ExactRatio, Unit};
pub use units::{length, volume, weight};

use metra_plugin::ConverterRegistry;

/// Load the static converters into a registry
pub fn load_static_converters(registry: ConverterRegistry) -> ConverterRegistry {
    registry
        .with_converter(length())
        .with_converter(weight())
        .with_converter(temperature())
        .with_converter(volume())
}
