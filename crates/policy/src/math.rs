//! Fixed-point helpers shared by the EMA engine and the rate curve.
//!
//! Every rate in this crate is a per-second value scaled by [`WAD`] (1e18).
//! Multiplications always happen before divisions so that `a * b / WAD`
//! keeps full precision.

use alloy_primitives::{I256, U256};

/// Fixed-point scale (1e18)
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// WAD as a signed integer, for `w_exp` arguments
pub const WAD_INT: i128 = 1_000_000_000_000_000_000;

/// Seconds in a 365-day year
pub const SECONDS_PER_YEAR: u64 = 365 * 86_400;

/// ln(2) scaled by WAD
pub const LN_2_INT: i128 = 693_147_180_559_945_309;

/// ln(1e-18) scaled by WAD (negative)
pub const LN_WEI_INT: i128 = -41_446_531_673_892_822_312;

/// Upper bound for `w_exp` arguments; larger values are clipped to it
pub const WEXP_UPPER_BOUND: i128 = 93_859_467_695_000_404_319;

/// Maximum number of Taylor terms used for e^r in `w_exp`
const EXP_TAYLOR_TERMS: i128 = 24;

/// Returns the smaller of two values
pub fn min(a: U256, b: U256) -> U256 {
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the larger of two values
pub fn max(a: U256, b: U256) -> U256 {
    if a > b {
        a
    } else {
        b
    }
}

/// `x * y / d`, rounded down. Returns zero when `d` is zero.
pub fn mul_div_down(x: U256, y: U256, d: U256) -> U256 {
    if d.is_zero() {
        return U256::ZERO;
    }
    x.saturating_mul(y) / d
}

/// `x * y / WAD`, rounded down
pub fn w_mul_down(x: U256, y: U256) -> U256 {
    mul_div_down(x, y, WAD)
}

/// `x * WAD / y`, rounded down
pub fn w_div_down(x: U256, y: U256) -> U256 {
    mul_div_down(x, WAD, y)
}

/// Reinterprets an unsigned fixed-point value as signed.
///
/// Values used in this crate stay far below 2^255, so the conversion is exact.
pub fn to_signed(x: U256) -> I256 {
    I256::from_raw(x)
}

/// Converts a signed value back to unsigned, clamping negatives at zero.
pub fn to_unsigned(x: I256) -> U256 {
    if x.is_negative() {
        U256::ZERO
    } else {
        x.into_raw()
    }
}

/// Approximation of exp(x) for WAD-scaled `x`, accurate to a few wei.
///
/// Uses the decomposition e^x = 2^q * e^r where x = q*ln(2) + r
/// with -ln(2)/2 <= r <= ln(2)/2, and a Taylor series for e^r.
pub fn w_exp(x: i128) -> U256 {
    // If x < ln(1e-18) then exp(x) < 1e-18 so it is rounded to zero
    if x < LN_WEI_INT {
        return U256::ZERO;
    }
    let x = x.min(WEXP_UPPER_BOUND);

    // q = x / ln(2) rounded half away from zero
    let rounding_adjustment = if x < 0 { -(LN_2_INT / 2) } else { LN_2_INT / 2 };
    let q = (x + rounding_adjustment) / LN_2_INT;
    let r = x - q * LN_2_INT;

    let mut term = WAD_INT;
    let mut exp_r = WAD_INT;
    for k in 1..=EXP_TAYLOR_TERMS {
        term = term * r / WAD_INT / k;
        if term == 0 {
            break;
        }
        exp_r += term;
    }

    let exp_r = U256::from(exp_r.unsigned_abs());
    if q >= 0 {
        exp_r << (q as usize)
    } else {
        exp_r >> ((-q) as usize)
    }
}

/// Converts a WAD-scaled value to f64
pub fn rate_to_f64(value: U256) -> f64 {
    value.saturating_to::<u128>() as f64 / 1e18
}

/// Converts a per-second WAD rate to a simple APR (0.01 = 1%)
pub fn rate_to_apr(rate: U256) -> f64 {
    rate_to_f64(rate) * SECONDS_PER_YEAR as f64
}

/// Converts a simple APR (0.01 = 1%) to a per-second WAD rate.
///
/// Negative or non-finite inputs map to zero.
pub fn apr_to_rate(apr: f64) -> U256 {
    if !apr.is_finite() || apr <= 0.0 {
        return U256::ZERO;
    }
    U256::from((apr * 1e18 / SECONDS_PER_YEAR as f64) as u128)
}

/// Converts a fraction (0.85 = 85%) to WAD.
///
/// Negative or non-finite inputs map to zero.
pub fn fraction_to_wad(fraction: f64) -> U256 {
    if !fraction.is_finite() || fraction <= 0.0 {
        return U256::ZERO;
    }
    U256::from((fraction * 1e18).round() as u128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_w_exp_zero() {
        assert_eq!(w_exp(0), WAD);
    }

    #[test]
    fn test_w_exp_positive() {
        let result = rate_to_f64(w_exp(WAD_INT));
        assert!((result - std::f64::consts::E).abs() < 1e-12);
    }

    #[test]
    fn test_w_exp_negative() {
        let result = rate_to_f64(w_exp(-WAD_INT));
        assert!((result - (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_w_exp_ln2_halves() {
        let half = w_exp(-LN_2_INT);
        let diff = if half > WAD / U256::from(2) {
            half - WAD / U256::from(2)
        } else {
            WAD / U256::from(2) - half
        };
        assert!(diff < U256::from(10));
    }

    #[test]
    fn test_w_exp_very_small() {
        assert_eq!(w_exp(LN_WEI_INT - 1), U256::ZERO);
    }

    #[test]
    fn test_w_exp_clipped_at_upper_bound() {
        assert_eq!(w_exp(WEXP_UPPER_BOUND + 1), w_exp(WEXP_UPPER_BOUND));
    }

    #[test]
    fn test_w_exp_never_exceeds_wad_for_negative_args() {
        for x in [1i128, 1_000, 1_000_000_000, WAD_INT / 3, WAD_INT, 20 * WAD_INT] {
            assert!(w_exp(-x) <= WAD);
        }
    }

    #[test]
    fn test_mul_div_down_zero_denominator() {
        assert_eq!(mul_div_down(WAD, WAD, U256::ZERO), U256::ZERO);
    }

    #[test]
    fn test_w_mul_and_div() {
        let half = WAD / U256::from(2);
        assert_eq!(w_mul_down(half, U256::from(10) * WAD), U256::from(5) * WAD);
        assert_eq!(w_div_down(U256::from(5) * WAD, U256::from(10) * WAD), half);
    }

    #[test]
    fn test_signed_round_trip_clamps_negative() {
        assert_eq!(to_unsigned(to_signed(WAD)), WAD);
        assert_eq!(to_unsigned(-to_signed(WAD)), U256::ZERO);
    }

    #[test]
    fn test_apr_conversions() {
        // 1% APR is 317_097_919 wei per second after truncation
        assert_eq!(apr_to_rate(0.01), U256::from(317_097_919u64));
        assert!((rate_to_apr(U256::from(317_097_920u64)) - 0.01).abs() < 1e-9);
        assert_eq!(apr_to_rate(-1.0), U256::ZERO);
        assert_eq!(apr_to_rate(f64::NAN), U256::ZERO);
    }

    #[test]
    fn test_fraction_to_wad() {
        assert_eq!(
            fraction_to_wad(0.85),
            U256::from(850_000_000_000_000_000u64)
        );
        assert_eq!(fraction_to_wad(7.2), U256::from(7_200_000_000_000_000_000u128));
        assert_eq!(fraction_to_wad(-0.5), U256::ZERO);
    }
}
