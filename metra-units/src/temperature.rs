//! Temperature converter
//!
//! Celsius is the pivot; Fahrenheit and Kelvin map to it with the standard
//! affine transforms.

use metra_core::{ConversionKind, Precision};
use crate::{StaticConverter, Unit};

/// Offset between Kelvin and Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * (5.0 / 9.0)
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * (9.0 / 5.0) + 32.0
}

pub fn temperature() -> StaticConverter {
    StaticConverter::new(
        ConversionKind::Temperature,
        "Temperature conversions",
        "celsius",
        Precision::TEMPERATURE,
    )
    .with_unit(Unit::base("celsius", "Celsius", "°C"))
    .with_unit(Unit::new(
        "fahrenheit",
        "Fahrenheit",
        "°F",
        fahrenheit_to_celsius,
        celsius_to_fahrenheit,
    ))
    .with_unit(Unit::new(
        "kelvin",
        "Kelvin",
        "K",
        |k| k - KELVIN_OFFSET,
        |c| c + KELVIN_OFFSET,
    ))
}
