//! Centre Crossing Marking
//!
//! With pixel-centre coverage a pixel is painted when its centre lies
//! inside the path, so each row only needs the x positions where the
//! path's edges cross the row's centre line. An edge from `sy` to `ey`
//! (after ordering them so `sy < ey`) crosses the centre of row `r` when
//! `sy < r + 1/2 <= ey`.
//!
//! The crossing on the first row is computed exactly, the following rows
//! step along the edge with an integer DDA.

use log::trace;

use crate::error::Result;
use crate::fixed::mul_div_floor;
use crate::fixed::int2fixed_wide;
use crate::fixed::Fixed;
use crate::fixed::FIXED_HALF;
use crate::fixed::FIXED_SCALE;
use crate::fixed::FIXED_SHIFT;
use crate::flatten::curve_log2_samples;
use crate::flatten::for_each_leaf;
use crate::path::Edge;
use crate::path::Path;
use crate::path::Point;
use crate::table::curve_window;
use crate::table::CrossingRecord;
use crate::table::Dir;
use crate::table::EdgeTable;

/// Steps x along a line in equal increments of y
///
/// The exact position is `x0 + q + r / den`, with `0 <= r < den`
#[derive(Debug,Copy,Clone)]
pub(crate) struct Dda {
    x0: i64,
    q: i64,
    r: i64,
    den: i64,
    step_q: i64,
    step_r: i64,
}

impl Dda {
    /// Position on the line from `(x0, y0)` with slope `dx / dy` at `y`,
    /// advancing by `ystep` each step; `dy > 0`
    pub(crate) fn new(x0: Fixed, y0: i64, dx: i64, dy: i64, y: i64, ystep: i64) -> Self {
        let (q, r) = mul_div_floor(y - y0, dx, dy);
        let (step_q, step_r) = mul_div_floor(ystep, dx, dy);
        Self { x0: i64::from(x0), q, r, den: dy, step_q, step_r }
    }
    /// Current x, rounded to nearest
    pub(crate) fn x(&self) -> Fixed {
        let half = if 2 * self.r >= self.den { 1 } else { 0 };
        (self.x0 + self.q + half) as Fixed
    }
    pub(crate) fn advance(&mut self) {
        self.q += self.step_q;
        self.r += self.step_r;
        if self.r >= self.den {
            self.r -= self.den;
            self.q += 1;
        }
    }
}

/// Mark the row centres of the table crossed by the line from `a` to `b`
pub fn mark_line<R: CrossingRecord>(table: &mut EdgeTable<R>, a: Point, b: Point, id: u32) -> Result<()> {
    if a.y == b.y {
        return Ok(());
    }
    let (p, q, dir) = if a.y < b.y { (a, b, Dir::Rising) } else { (b, a, Dir::Falling) };
    let (y0, y1) = (i64::from(p.y), i64::from(q.y));
    let half = i64::from(FIXED_HALF);
    let base = i64::from(table.base());
    let r0 = ((y0 + half) >> FIXED_SHIFT).max(base);
    let r1 = ((y1 + half) >> FIXED_SHIFT).min(base + i64::from(table.height()));
    if r0 >= r1 {
        return Ok(());
    }
    let dx = i64::from(q.x) - i64::from(p.x);
    let mut dda = Dda::new(p.x, y0, dx, y1 - y0, int2fixed_wide(r0) + half, i64::from(FIXED_SCALE));
    for r in r0 .. r1 {
        table.push((r - base) as i32, R::crossing(dda.x(), id, dir))?;
        dda.advance();
    }
    Ok(())
}

/// Mark every edge of the path, giving each line and curve leaf a new id
pub fn mark_path<R: CrossingRecord>(table: &mut EdgeTable<R>, path: &Path, flatness: Fixed) -> Result<()> {
    let (ylo, yhi) = curve_window(table.base(), table.height());
    let mut id = 0u32;
    for sp in path.subpaths() {
        for edge in sp.edges() {
            match edge {
                Edge::Line(a, b) => {
                    id = id.wrapping_add(1);
                    mark_line(table, a, b, id)?;
                },
                Edge::Curve(p0, p1, p2, p3) => {
                    let k = curve_log2_samples(p0, p1, p2, p3, flatness);
                    trace!("curve {:?} {:?} {:?} {:?} split {} times", p0, p1, p2, p3, k);
                    for_each_leaf([p0, p1, p2, p3], k, ylo, yhi, &mut |a, b| {
                        id = id.wrapping_add(1);
                        mark_line(table, a, b, id)
                    })?;
                }
            }
        }
    }
    Ok(())
}
