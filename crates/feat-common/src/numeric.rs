//! Numeric helpers shared by the stages.

/// Round a value to `decimals` places, ties to even.
///
/// Non-finite values (NaN, ±inf) are returned unchanged so that arithmetic
/// degeneracies keep flowing downstream.
///
/// # Examples
///
/// ```
/// use feat_common::round_to;
///
/// assert_eq!(round_to(1.234_56, 2), 1.23);
/// assert_eq!(round_to(0.125, 2), 0.12);
/// assert_eq!(round_to(-2.5, 0), -2.0);
/// assert!(round_to(f64::INFINITY, 2).is_infinite());
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(110.0, 2), 110.0);
        assert_eq!(round_to(0.125_4, 2), 0.13);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(0.5, 0), 0.0);
        assert_eq!(round_to(1.5, 0), 2.0);
        assert_eq!(round_to(0.333_333_3, 4), 0.3333);
        assert_eq!(round_to(-1.005_1, 2), -1.01);
    }

    #[test]
    fn test_round_to_non_finite() {
        assert!(round_to(f64::NAN, 2).is_nan());
        assert_eq!(round_to(f64::NEG_INFINITY, 2), f64::NEG_INFINITY);
    }
}
