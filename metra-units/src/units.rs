//! Unit tables for the proportional domains

use metra_core::{ConversionKind, Precision};
use crate::{ExactRatio, StaticConverter, Unit};

/// International foot, in meters
pub const METERS_PER_FOOT: f64 = 0.3048;
/// International inch, in meters
pub const METERS_PER_INCH: f64 = 0.0254;
pub const METERS_PER_YARD: f64 = 0.9144;
pub const METERS_PER_MILE: f64 = 1609.344;

/// International avoirdupois pound, in kilograms
pub const KILOGRAMS_PER_POUND: f64 = 0.45359237;
pub const GRAMS_PER_POUND: f64 = 453.59237;

/// US liquid gallon, in liters
pub const LITERS_PER_GALLON: f64 = 3.785411784;

/// Length converter, pivoting through the meter
pub fn length() -> StaticConverter {
    StaticConverter::new(ConversionKind::Length, "Length conversions", "meter", Precision::LENGTH)
        .with_unit(Unit::base("meter", "Meter", "m"))
        .with_unit(Unit::linear("kilometer", "Kilometer", "km", 1000.0))
        .with_unit(Unit::linear("foot", "Foot", "ft", METERS_PER_FOOT))
        .with_unit(Unit::linear("inch", "Inch", "in", METERS_PER_INCH))
        .with_unit(Unit::linear("yard", "Yard", "yd", METERS_PER_YARD))
        .with_unit(Unit::linear("mile", "Mile", "mi", METERS_PER_MILE))
        .with_exact_ratio(ExactRatio::new("foot", "inch", 12.0, Precision::LENGTH))
}

/// Weight converter, pivoting through the gram
pub fn weight() -> StaticConverter {
    StaticConverter::new(ConversionKind::Weight, "Weight conversions", "gram", Precision::WEIGHT)
        .with_unit(Unit::base("gram", "Gram", "g"))
        .with_unit(Unit::linear("kilogram", "Kilogram", "kg", 1000.0))
        .with_unit(Unit::linear("pound", "Pound", "lb", GRAMS_PER_POUND))
        // The factor has 8 fractional digits; keep all of them
        .with_exact_ratio(ExactRatio::new("pound", "kilogram", KILOGRAMS_PER_POUND, 8))
}

/// Volume converter, pivoting through the liter
pub fn volume() -> StaticConverter {
    StaticConverter::new(ConversionKind::Volume, "Volume conversions", "liter", Precision::VOLUME)
        .with_unit(Unit::base("liter", "Liter", "L"))
        .with_unit(Unit::linear("gallon", "Gallon", "gal", LITERS_PER_GALLON))
}
