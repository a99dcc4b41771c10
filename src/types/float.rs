//! # Tolerant Float Comparison
//!
//! REAL equality uses an absolute-plus-relative tolerance so that values
//! that differ only by accumulated rounding error compare equal. Hashing
//! quantizes before mixing so the `equals(a, b) => hash(a) == hash(b)` law
//! holds for tolerance-equal values.
//!
//! Ordering (`<`) stays bitwise via `partial_cmp`; only equality and
//! hashing are tolerant.

/// Absolute and relative tolerance applied by [`approx_eq`].
pub const TOLERANCE: f64 = 1e-9;

/// Bucket width for hashing reals below unit magnitude, where the
/// absolute tolerance term dominates. Three orders of magnitude coarser
/// than [`TOLERANCE`].
const HASH_QUANTUM: f64 = 1e-6;

/// Significant digits kept when hashing reals of unit magnitude and
/// above, where the relative tolerance term dominates.
const HASH_SIG_DIGITS: i32 = 6;

/// Returns true if `a` and `b` are equal within absolute-plus-relative
/// tolerance. NaN never compares equal to anything, including itself.
pub fn approx_eq(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    diff <= TOLERANCE + TOLERANCE * a.abs().max(b.abs())
}

/// Canonical bit pattern for hashing a real.
///
/// Finite values are bucketed with a width that tracks the shape of
/// [`approx_eq`]'s tolerance: a fixed quantum below unit magnitude,
/// significant-digit rounding (packed with the decimal exponent) at unit
/// magnitude and above. `0.0` and `-0.0` collapse to the same bits.
/// Non-finite values hash their raw bit pattern.
pub fn hash_bits(value: f64) -> u64 {
    if !value.is_finite() {
        return value.to_bits();
    }
    if value.abs() < 1.0 {
        let bucket = (value / HASH_QUANTUM).round() as i64;
        // low bits stay zero here; the significant-digit encoding below
        // always sets them, so the two ranges cannot collide
        return (bucket << 11) as u64;
    }
    let mut exponent = value.abs().log10().floor() as i32;
    let mut mantissa = (value / 10f64.powi(exponent - (HASH_SIG_DIGITS - 1))).round() as i64;
    // rounding can carry into an extra digit (999999.99995 -> 1000000)
    if mantissa.abs() >= 10i64.pow(HASH_SIG_DIGITS as u32) {
        mantissa /= 10;
        exponent += 1;
    }
    ((mantissa << 11) | (exponent + 1) as i64) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_tolerant_equality() {
        assert!(approx_eq(1.0, 1.0));
        assert!(approx_eq(1.0, 1.0 + 1e-12));
        assert!(approx_eq(1e10, 1e10 * (1.0 + 1e-12)));
        assert!(!approx_eq(1.0, 1.0001));
    }

    #[test]
    fn nan_is_never_equal() {
        assert!(!approx_eq(f64::NAN, f64::NAN));
        assert!(!approx_eq(f64::NAN, 0.0));
    }

    #[test]
    fn tolerant_equality_implies_hash_equality() {
        assert_eq!(hash_bits(1.0), hash_bits(1.0 + 1e-12));
        assert_eq!(hash_bits(0.0), hash_bits(-0.0));
        assert_ne!(hash_bits(1.0), hash_bits(2.0));
    }

    #[test]
    fn hash_bucket_width_scales_with_magnitude() {
        // tolerance-equal at large magnitude must still share a bucket
        assert!(approx_eq(1_000_000.0, 1_000_000.0005));
        assert_eq!(hash_bits(1_000_000.0), hash_bits(1_000_000.0005));

        assert!(approx_eq(1000.0, 1000.0000005));
        assert_eq!(hash_bits(1000.0), hash_bits(1000.0000005));

        assert!(!approx_eq(1_000_000.0, 1_000_100.0));
        assert_ne!(hash_bits(1_000_000.0), hash_bits(1_000_100.0));
    }

    #[test]
    fn infinities_keep_distinct_bits() {
        assert_ne!(hash_bits(f64::INFINITY), hash_bits(f64::NEG_INFINITY));
    }
}
