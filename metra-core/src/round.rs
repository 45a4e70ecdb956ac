//! Decimal rounding
//!
//! Every converter rounds exactly once, at the end of a conversion,
//! through `round_to`.

/// Fractional digits kept per domain
pub struct Precision;

impl Precision {
    pub const LENGTH: u32 = 6;
    pub const WEIGHT: u32 = 6;
    pub const VOLUME: u32 = 6;
    pub const TEMPERATURE: u32 = 6;
    pub const CURRENCY: u32 = 4;
    pub const CRYPTO: u32 = 8;
}

/// Round `value` to `digits` fractional digits, half away from zero.
///
/// Non-finite values and values too large to scale are returned as-is.
/// Negative zero is normalized to zero.
pub fn round_to(value: f64, digits: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let factor = 10f64.powi(digits as i32);
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.abs() >= 2f64.powi(52) {
        return value;
    }

    let rounded = scaled.round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_digits() {
        assert_eq!(round_to(3.280839895, 6), 3.28084);
        assert_eq!(round_to(13.636363636363637, 8), 13.63636364);
        assert_eq!(round_to(110.00000000000001, 4), 110.0);
    }

    #[test]
    fn test_round_negative() {
        assert_eq!(round_to(-273.15, 6), -273.15);
        assert_eq!(round_to(-1.23456789, 2), -1.23);
    }

    #[test]
    fn test_negative_zero_normalized() {
        let r = round_to(-0.0000001, 6);
        assert_eq!(r, 0.0);
        assert!(r.is_sign_positive());
    }

    #[test]
    fn test_non_finite_passthrough() {
        assert!(round_to(f64::NAN, 4).is_nan());
        assert_eq!(round_to(f64::INFINITY, 4), f64::INFINITY);
    }

    #[test]
    fn test_huge_values_untouched() {
        let big = 1.0e300;
        assert_eq!(round_to(big, 8), big);
    }
}
