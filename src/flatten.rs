//! Curve Flattening
//!
//! Cubic Bezier curves are bisected at their parametric midpoint a fixed
//! number of times, chosen from the curve's shape and the flatness. The
//! leaves of the subdivision are traced as lines.
//!
//! The table builder and the tracers walk curves with the same function so
//! that every leaf counted when sizing the edge table is a leaf traced into
//! it.

use crate::error::Result;
use crate::fixed::midpoint;
use crate::fixed::sum_may_overflow;
use crate::fixed::Fixed;
use crate::fixed::FIXED_1;
use crate::path::Point;

/// Number of bisections needed to flatten a curve
///
/// Returns `k` such that `2^k` line segments approximate the curve from
/// `p0` through control points `p1`, `p2` to `p3` within `flat`.
/// Short curves, less than 16 pixels across, use half the flatness.
pub fn curve_log2_samples(p0: Point, p1: Point, p2: Point, p3: Point, flat: Fixed) -> u32 {
    let w = |v: Fixed| i64::from(v);
    let x03 = (w(p3.x) - w(p0.x)).abs();
    let y03 = (w(p3.y) - w(p0.y)).abs();
    let mut flat = i64::from(flat.max(0));
    if (x03 | y03) < 16 * i64::from(FIXED_1) {
        flat >>= 1;
    }
    let mut k = 0;
    if flat == 0 {
        let mut m = x03.max(y03);
        k = 1;
        while m > i64::from(FIXED_1) {
            k += 1;
            m >>= 1;
        }
    } else {
        let x12 = w(p1.x) - w(p2.x);
        let y12 = w(p1.y) - w(p2.y);
        let dx0 = w(p0.x) - w(p1.x) - x12;
        let dy0 = w(p0.y) - w(p1.y) - y12;
        let dx1 = x12 - w(p2.x) + w(p3.x);
        let dy1 = y12 - w(p2.y) + w(p3.y);
        let d = dx0.abs().max(dx1.abs()) + dy0.abs().max(dy1.abs());
        let mut q = (d - (d >> 2) + flat - 1) / flat;
        while q > 1 {
            k += 1;
            q = (q + 3) >> 2;
        }
    }
    k
}

/// Split a curve at its parametric midpoint
///
/// Sums are formed in 64 bits when any coordinate is large enough for a
/// pairwise sum to overflow.
pub fn split_curve(p0: Point, p1: Point, p2: Point, p3: Point) -> ([Point; 4], [Point; 4]) {
    let wide = sum_may_overflow(&[p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y]);
    let mid = |a: Point, b: Point| Point::new(midpoint(a.x, b.x, wide), midpoint(a.y, b.y, wide));
    let a = mid(p0, p1);
    let b = mid(p1, p2);
    let c = mid(p2, p3);
    let d = mid(a, b);
    let f = mid(b, c);
    let g = mid(d, f);
    ([p0, a, d, g], [g, f, c, p3])
}

/// Vertical extent of the curve's control polygon, a bound on the curve
fn hull_y(p: &[Point; 4]) -> (Fixed, Fixed) {
    let lo = p.iter().map(|p| p.y).min().unwrap_or(0);
    let hi = p.iter().map(|p| p.y).max().unwrap_or(0);
    (lo, hi)
}

/// Visit the leaf lines of a curve bisected `depth` times
///
/// Subcurves whose hull misses `[ylo, yhi]` (fixed, inclusive) are skipped
/// along with all of their leaves.
pub fn for_each_leaf<F>(curve: [Point; 4], depth: u32, ylo: i64, yhi: i64, f: &mut F) -> Result<()>
    where F: FnMut(Point, Point) -> Result<()>
{
    let (lo, hi) = hull_y(&curve);
    if i64::from(hi) < ylo || i64::from(lo) > yhi {
        return Ok(());
    }
    if depth == 0 {
        return f(curve[0], curve[3]);
    }
    let (left, right) = split_curve(curve[0], curve[1], curve[2], curve[3]);
    for_each_leaf(left, depth - 1, ylo, yhi, f)?;
    for_each_leaf(right, depth - 1, ylo, yhi, f)
}
