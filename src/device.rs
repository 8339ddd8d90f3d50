//! Device Interface
//!
//! A device receives the output of a fill as axis aligned rectangles in
//! whole pixels, and, for the trapezoid scan converters, as trapezoids with
//! fixed point edges.
//!
//! A trapezoid paints the pixels whose centres `(cx, cy)` satisfy
//! `ytop <= cy < ybottom` and `xl(cy) <= cx < xr(cy)`, where `xl` and `xr`
//! are the left and right edges extended as lines. [trapezoid_rows] applies
//! this rule and is shared by the devices in this crate.

use crate::error::Result;
use crate::fixed::Fixed;
use crate::fixed::FIXED_HALF;
use crate::fixed::FIXED_SCALE;
use crate::path::Point;

/// Raster operation of three operands, texture, source and destination
///
/// Bit `t << 2 | s << 1 | d` of the code is the result for those inputs.
#[derive(Debug,Copy,Clone,PartialEq,Eq,Hash)]
pub struct LogicalOp(pub u8);

impl LogicalOp {
    /// Source replaces destination
    pub const COPY: LogicalOp = LogicalOp(0xcc);
    /// Source or destination
    pub const OR: LogicalOp = LogicalOp(0xee);
    /// Source and destination
    pub const AND: LogicalOp = LogicalOp(0x88);
    /// Source exclusive or destination
    pub const XOR: LogicalOp = LogicalOp(0x66);
    /// Inverted destination
    pub const INVERT: LogicalOp = LogicalOp(0x55);

    /// Result for one bit of texture, source and destination
    pub fn apply(self, t: bool, s: bool, d: bool) -> bool {
        let i = (t as u8) << 2 | (s as u8) << 1 | d as u8;
        (self.0 >> i) & 1 == 1
    }
    /// Applying the operation twice gives the same result as once
    pub fn is_idempotent(self) -> bool {
        (0 .. 8u8).all(|i| {
            let (t, s, d) = (i & 4 != 0, i & 2 != 0, i & 1 != 0);
            let r = self.apply(t, s, d);
            self.apply(t, s, r) == r
        })
    }
}

impl Default for LogicalOp {
    fn default() -> LogicalOp {
        LogicalOp::COPY
    }
}

/// Line through two points, bounding one side of a trapezoid
#[derive(Debug,Default,Copy,Clone,PartialEq,Eq)]
pub struct FixedEdge {
    pub start: Point,
    pub end: Point,
}

impl FixedEdge {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
    /// x at `y` as the fraction `num / den`, with `den > 0`
    fn x_at(&self, y: i64) -> (i128, i128) {
        let (x0, y0) = (i128::from(self.start.x), i128::from(self.start.y));
        let dx = i128::from(self.end.x) - x0;
        let dy = i128::from(self.end.y) - y0;
        if dy == 0 {
            return (x0, 1);
        }
        let (dx, dy) = if dy < 0 { (-dx, -dy) } else { (dx, dy) };
        (x0 * dy + (i128::from(y) - y0) * dx, dy)
    }
    /// First pixel column whose centre is at or right of the edge at `y`
    fn column_at(&self, y: i64) -> i64 {
        let (num, den) = self.x_at(y);
        let half = i128::from(FIXED_HALF);
        let scale = i128::from(FIXED_SCALE);
        ceil_div(num - half * den, scale * den) as i64
    }
}

fn ceil_div(a: i128, b: i128) -> i128 {
    -((-a).div_euclid(b))
}

/// Visit the pixel runs `(y, x0, x1)` painted by a trapezoid
pub fn trapezoid_rows<F>(left: &FixedEdge, right: &FixedEdge, ytop: Fixed, ybottom: Fixed, mut f: F) -> Result<()>
    where F: FnMut(i32, i32, i32) -> Result<()>
{
    let half = i128::from(FIXED_HALF);
    let scale = i128::from(FIXED_SCALE);
    let y0 = ceil_div(i128::from(ytop) - half, scale) as i64;
    let y1 = ceil_div(i128::from(ybottom) - half, scale) as i64;
    for y in y0 .. y1 {
        let cy = y * i64::from(FIXED_SCALE) + i64::from(FIXED_HALF);
        let x0 = left.column_at(cy);
        let x1 = right.column_at(cy);
        if x0 < x1 {
            f(y as i32, x0 as i32, x1 as i32)?;
        }
    }
    Ok(())
}

/// Receiver of filled areas
pub trait Device {
    type Color;
    /// Fill `w` by `h` pixels at (x,y)
    fn fill_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32, color: &Self::Color) -> Result<()>;
    /// Fill a rectangle under a raster operation
    fn fill_rectangle_rop(&mut self, x: i32, y: i32, w: i32, h: i32, color: &Self::Color, lop: LogicalOp) -> Result<()> {
        let _ = lop;
        self.fill_rectangle(x, y, w, h, color)
    }
    /// Fill the trapezoid between two edges from `ytop` to `ybottom`
    fn fill_trapezoid(&mut self, left: &FixedEdge, right: &FixedEdge, ytop: Fixed, ybottom: Fixed,
                      color: &Self::Color, lop: Option<LogicalOp>) -> Result<()>;
    /// Height in rows that trapezoids may not cross, 0 for none
    fn max_fill_band(&self) -> i32 {
        0
    }
}

/// Call received by a [Recorder]
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum Call {
    Rectangle { x: i32, y: i32, w: i32, h: i32, lop: Option<LogicalOp> },
    Trapezoid { left: FixedEdge, right: FixedEdge, ytop: Fixed, ybottom: Fixed, lop: Option<LogicalOp> },
}

/// Device keeping every call it receives
#[derive(Debug,Default,Clone)]
pub struct Recorder {
    pub calls: Vec<Call>,
    band: i32,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }
    /// Recorder reporting a maximum fill band of `band` rows
    pub fn with_band(band: i32) -> Self {
        Self { calls: vec![], band }
    }
    pub fn rectangles(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Rectangle { .. })).count()
    }
    pub fn trapezoids(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Trapezoid { .. })).count()
    }
    /// Pixels painted by all calls, in call order, repeats included
    pub fn pixels(&self) -> Result<Vec<(i32, i32)>> {
        let mut out = vec![];
        for c in &self.calls {
            match *c {
                Call::Rectangle { x, y, w, h, .. } => {
                    for j in y .. y + h {
                        out.extend((x .. x + w).map(|i| (i, j)));
                    }
                },
                Call::Trapezoid { left, right, ytop, ybottom, .. } => {
                    trapezoid_rows(&left, &right, ytop, ybottom, |y, x0, x1| {
                        out.extend((x0 .. x1).map(|i| (i, y)));
                        Ok(())
                    })?;
                }
            }
        }
        Ok(out)
    }
}

impl Device for Recorder {
    type Color = ();
    fn fill_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32, _color: &()) -> Result<()> {
        self.calls.push(Call::Rectangle { x, y, w, h, lop: None });
        Ok(())
    }
    fn fill_rectangle_rop(&mut self, x: i32, y: i32, w: i32, h: i32, _color: &(), lop: LogicalOp) -> Result<()> {
        self.calls.push(Call::Rectangle { x, y, w, h, lop: Some(lop) });
        Ok(())
    }
    fn fill_trapezoid(&mut self, left: &FixedEdge, right: &FixedEdge, ytop: Fixed, ybottom: Fixed,
                      _color: &(), lop: Option<LogicalOp>) -> Result<()> {
        self.calls.push(Call::Trapezoid { left: *left, right: *right, ytop, ybottom, lop });
        Ok(())
    }
    fn max_fill_band(&self) -> i32 {
        self.band
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::int2fixed;

    #[test]
    fn idempotent_ops() {
        assert!(LogicalOp::COPY.is_idempotent());
        assert!(LogicalOp::OR.is_idempotent());
        assert!(LogicalOp::AND.is_idempotent());
        assert!(!LogicalOp::XOR.is_idempotent());
        assert!(!LogicalOp::INVERT.is_idempotent());
        assert!(LogicalOp::COPY.apply(false, true, false));
        assert!(!LogicalOp::COPY.apply(true, false, true));
    }

    fn rows(left: FixedEdge, right: FixedEdge, ytop: Fixed, ybottom: Fixed) -> Vec<(i32, i32, i32)> {
        let mut v = vec![];
        trapezoid_rows(&left, &right, ytop, ybottom, |y, a, b| { v.push((y, a, b)); Ok(()) }).unwrap();
        v
    }

    #[test]
    fn rectangle_as_trapezoid() {
        let l = FixedEdge::new(Point::new(int2fixed(2), 0), Point::new(int2fixed(2), int2fixed(9)));
        let r = FixedEdge::new(Point::new(int2fixed(5), 0), Point::new(int2fixed(5), int2fixed(9)));
        assert_eq!(rows(l, r, int2fixed(1), int2fixed(3)), vec![(1, 2, 5), (2, 2, 5)]);
        // Centres must be inside the vertical range
        assert_eq!(rows(l, r, int2fixed(1) + 129, int2fixed(3) + 128), vec![(2, 2, 5)]);
    }

    #[test]
    fn slanted_edge_samples_centres() {
        // x = y along the left edge
        let l = FixedEdge::new(Point::new(0, 0), Point::new(int2fixed(8), int2fixed(8)));
        let r = FixedEdge::new(Point::new(int2fixed(10), 0), Point::new(int2fixed(10), int2fixed(8)));
        let v = rows(l, r, 0, int2fixed(3));
        assert_eq!(v, vec![(0, 0, 10), (1, 1, 10), (2, 2, 10)]);
        // Edge given bottom to top gives the same result
        let l2 = FixedEdge::new(l.end, l.start);
        assert_eq!(rows(l2, r, 0, int2fixed(3)), v);
    }

    #[test]
    fn recorder_pixels() {
        let mut rec = Recorder::with_band(4);
        rec.fill_rectangle(1, 1, 2, 1, &()).unwrap();
        rec.fill_rectangle_rop(0, 3, 1, 2, &(), LogicalOp::OR).unwrap();
        assert_eq!(rec.max_fill_band(), 4);
        assert_eq!(rec.rectangles(), 2);
        assert_eq!(rec.trapezoids(), 0);
        assert_eq!(rec.pixels().unwrap(), vec![(1, 1), (2, 1), (0, 3), (0, 4)]);
    }
}
