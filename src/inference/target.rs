//! Target-scale transform
//!
//! The model is trained on `log1p(price)`; predictions come back through
//! `expm1` to recover the price.

/// Forward transform applied to prices at training time
#[inline]
pub fn to_log_space(price: f64) -> f64 {
    price.ln_1p()
}

/// Inverse transform applied to raw model output
#[inline]
pub fn from_log_space(log_price: f64) -> f64 {
    log_price.exp_m1()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let samples = [
            -1.5, -1e-9, 0.0, 1e-12, 0.5, 1.0, 7.25, 11.3, 15.0, 42.0, 300.0,
        ];
        for &x in &samples {
            let back = to_log_space(from_log_space(x));
            let tolerance = 1e-12 * x.abs().max(1.0);
            assert!(
                (back - x).abs() <= tolerance,
                "round trip drifted for {}: got {}",
                x,
                back
            );
        }
    }

    #[test]
    fn test_small_values_keep_precision() {
        let x = 1e-15;
        assert!((from_log_space(x) - x).abs() / x < 1e-12);
        assert!((to_log_space(x) - x).abs() / x < 1e-12);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(from_log_space(0.0), 0.0);
        assert!((from_log_space(1.0) - (std::f64::consts::E - 1.0)).abs() < 1e-15);
        assert!((to_log_space(99.0) - 100f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_finite_for_finite_inputs() {
        for &x in &[-700.0, -1.0, 0.0, 1.0, 700.0] {
            assert!(from_log_space(x).is_finite());
        }
    }
}
