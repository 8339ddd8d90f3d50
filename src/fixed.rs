//! Fixed point coordinates
//!
//! Device coordinates are stored as `i32` values scaled by [FIXED_SCALE],
//! giving 8 bits of sub-pixel precision.
//!
//!     use scanc::fixed::*;
//!
//!     let x = float2fixed(2.75);
//!     assert_eq!(x, 704);
//!     assert_eq!(fixed2int(x), 2);
//!     assert_eq!(fixed_ceil(x), 3);
//!     assert_eq!(fixed2int(-1), -1);
//!

/// Fixed point coordinate
pub type Fixed = i32;

/// Number of fractional bits
pub const FIXED_SHIFT: u32 = 8;
/// One pixel
pub const FIXED_SCALE: i32 = 1 << FIXED_SHIFT;
/// Mask of the fractional bits
pub const FIXED_MASK: i32 = FIXED_SCALE - 1;
/// One pixel, named for readability in expressions
pub const FIXED_1: Fixed = FIXED_SCALE;
/// Half a pixel
pub const FIXED_HALF: Fixed = FIXED_SCALE / 2;

/// Integer part, rounding toward negative infinity
pub fn fixed2int(v: Fixed) -> i32 {
    v >> FIXED_SHIFT
}

/// Smallest integer not less than `v`
pub fn fixed_ceil(v: Fixed) -> i32 {
    ((i64::from(v) + i64::from(FIXED_MASK)) >> FIXED_SHIFT) as i32
}

/// Nearest integer, halves rounding up
pub fn fixed_round(v: Fixed) -> i32 {
    ((i64::from(v) + i64::from(FIXED_HALF)) >> FIXED_SHIFT) as i32
}

/// Fractional part, always in `0 .. FIXED_SCALE`
pub fn fixed_fraction(v: Fixed) -> i32 {
    v & FIXED_MASK
}

/// Integer to fixed
pub fn int2fixed(v: i32) -> Fixed {
    v << FIXED_SHIFT
}

/// Integer to fixed in 64 bits, for row boundaries that may not fit `i32`
pub fn int2fixed_wide(v: i64) -> i64 {
    v << FIXED_SHIFT
}

/// Floating point to fixed, rounding to nearest
pub fn float2fixed(v: f64) -> Fixed {
    (v * f64::from(FIXED_SCALE)).round() as Fixed
}

/// Fixed to floating point
pub fn fixed2float(v: Fixed) -> f64 {
    f64::from(v) / f64::from(FIXED_SCALE)
}

/// Whether adding any two of `coords` may leave the `i32` range
///
/// A value whose top two bits differ has a magnitude of at least 2^30, so
/// the sum of two such values can overflow. The test folds
/// `v ^ (v << 1)` over all values; a negative result flags the risk.
///
///     use scanc::fixed::sum_may_overflow;
///     assert!(!sum_may_overflow(&[0, 100, -100, 1 << 29]));
///     assert!(sum_may_overflow(&[0, 1 << 30]));
///     assert!(sum_may_overflow(&[-(1 << 30) - 1]));
///
pub fn sum_may_overflow(coords: &[Fixed]) -> bool {
    coords.iter().fold(0, |acc, &v| acc | (v ^ v.wrapping_shl(1))) < 0
}

/// Midpoint of `a` and `b`, rounding toward negative infinity
///
/// When `wide` is set the sum is formed in 64 bits. The result always fits
/// in `i32` since it lies between `a` and `b`.
pub fn midpoint(a: Fixed, b: Fixed, wide: bool) -> Fixed {
    if wide {
        ((i64::from(a) + i64::from(b)) >> 1) as Fixed
    } else {
        (a + b) >> 1
    }
}

/// Compute `floor(a * b / c)` and the remainder, `c > 0`
///
/// The product is formed in 128 bits; the remainder is in `0 .. c`.
pub fn mul_div_floor(a: i64, b: i64, c: i64) -> (i64, i64) {
    debug_assert!(c > 0);
    let p = i128::from(a) * i128::from(b);
    let c = i128::from(c);
    (p.div_euclid(c) as i64, p.rem_euclid(c) as i64)
}
