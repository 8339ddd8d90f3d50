//! Span Emission
//!
//! Turns the filtered spans of a band into device calls. The span scan
//! converters paint one rectangle per span. The trapezoid scan converters
//! collapse runs of rows bounded by the same edges into a trapezoid per
//! span, painting only the first and last rows of a run as rectangles.
//! A trapezoid is only sent when its edges sample to exactly the columns
//! of every interior row; otherwise the span's rows are painted one by one.

use log::trace;

use crate::device::Device;
use crate::device::FixedEdge;
use crate::device::LogicalOp;
use crate::device::trapezoid_rows;
use crate::error::Result;
use crate::filter::Span;
use crate::filter::SpanRows;
use crate::fixed::fixed2int;
use crate::fixed::fixed_ceil;
use crate::fixed::fixed_round;
use crate::fixed::int2fixed;
use crate::fixed::Fixed;
use crate::fixed::FIXED_HALF;
use crate::path::Point;
use crate::variant::Coverage;

/// Pixel columns `[x0, x1)` painted for a span
pub fn pixel_bounds(span: &Span, coverage: Coverage) -> (i32, i32) {
    match coverage {
        Coverage::PixelCentre => (fixed_round(span.left), fixed_round(span.right)),
        Coverage::AnyPart => (fixed2int(span.left), fixed_ceil(span.right)),
    }
}

/// Emits spans of one band to a device
pub struct Emitter<'a, D: Device> {
    dev: &'a mut D,
    color: &'a D::Color,
    lop: Option<LogicalOp>,
    coverage: Coverage,
    xmin: i32,
    xmax: i32,
}

impl<'a, D: Device> Emitter<'a, D> {
    pub fn new(dev: &'a mut D, color: &'a D::Color, lop: Option<LogicalOp>,
               coverage: Coverage, xmin: i32, xmax: i32) -> Self {
        Self { dev, color, lop, coverage, xmin, xmax }
    }

    /// Paint columns `[x0, x1)` of row `y`, clamped to the band's columns
    pub fn rectangle(&mut self, x0: i32, x1: i32, y: i32) -> Result<()> {
        let x0 = x0.max(self.xmin);
        let x1 = x1.min(self.xmax);
        if x1 <= x0 {
            return Ok(());
        }
        match self.lop {
            Some(lop) => self.dev.fill_rectangle_rop(x0, y, x1 - x0, 1, self.color, lop),
            None => self.dev.fill_rectangle(x0, y, x1 - x0, 1, self.color),
        }
    }

    fn span_rectangle(&mut self, span: &Span, y: i32) -> Result<()> {
        let (x0, x1) = pixel_bounds(span, self.coverage);
        self.rectangle(x0, x1, y)
    }

    /// One rectangle per span
    pub fn spans(&mut self, rows: &SpanRows) -> Result<()> {
        for (i, row) in rows.rows().enumerate() {
            let y = rows.base() + i as i32;
            for span in row {
                self.span_rectangle(span, y)?;
            }
        }
        Ok(())
    }

    /// Trapezoids for runs of rows sharing their edges
    ///
    /// A run ends where the edges bounding the spans change, and never
    /// crosses a multiple of `band` rows when `band` is positive.
    pub fn trapezoids(&mut self, rows: &SpanRows, band: i32) -> Result<()> {
        let height = rows.height();
        let mut i = 0;
        while i < height {
            let mut j = i + 1;
            while j < height && same_edges(rows.row(i), rows.row(j))
                && !(band > 0 && (rows.base() + j).rem_euclid(band) == 0) {
                j += 1;
            }
            self.run(rows, i, j)?;
            i = j;
        }
        Ok(())
    }

    /// Emit rows `[i, j)` of a run
    fn run(&mut self, rows: &SpanRows, i: i32, j: i32) -> Result<()> {
        let base = rows.base();
        if j - i < 3 {
            for y in i .. j {
                for span in rows.row(y) {
                    self.span_rectangle(span, base + y)?;
                }
            }
            return Ok(());
        }
        trace!("run of {} rows at {} with {} spans", j - i, base + i, rows.row(i).len());
        for (k, first) in rows.row(i).iter().enumerate() {
            self.span_rectangle(first, base + i)?;
            let (left, right) = self.edges(rows, i, j, k);
            let ytop = int2fixed(base + i + 1);
            let ybottom = int2fixed(base + j - 1);
            if self.inside(rows, i, j, k) && self.matches(rows, i, j, k, &left, &right)? {
                self.dev.fill_trapezoid(&left, &right, ytop, ybottom, self.color, self.lop)?;
            } else {
                for y in i + 1 .. j - 1 {
                    self.span_rectangle(&rows.row(y)[k], base + y)?;
                }
            }
            self.span_rectangle(&rows.row(j - 1)[k], base + j - 1)?;
        }
        Ok(())
    }

    /// Span `k` stays within the band's columns on every interior row
    fn inside(&self, rows: &SpanRows, i: i32, j: i32, k: usize) -> bool {
        (i + 1 .. j - 1).all(|y| {
            let (x0, x1) = pixel_bounds(&rows.row(y)[k], self.coverage);
            x0 >= self.xmin && x1 <= self.xmax
        })
    }

    /// The trapezoid between `left` and `right` paints the same columns as
    /// span `k` on each interior row of run `[i, j)`
    fn matches(&self, rows: &SpanRows, i: i32, j: i32, k: usize,
               left: &FixedEdge, right: &FixedEdge) -> Result<bool> {
        let base = rows.base();
        let expected: Vec<(i32, i32, i32)> = (i + 1 .. j - 1)
            .map(|y| {
                let (x0, x1) = pixel_bounds(&rows.row(y)[k], self.coverage);
                (base + y, x0, x1)
            })
            .filter(|&(_, x0, x1)| x0 < x1)
            .collect();
        let mut sampled = Vec::with_capacity(expected.len());
        trapezoid_rows(left, right, int2fixed(base + i + 1), int2fixed(base + j - 1), |y, x0, x1| {
            sampled.push((y, x0, x1));
            Ok(())
        })?;
        if sampled != expected {
            trace!("span {} of run at {} falls back to rows", k, base + i);
            return Ok(false);
        }
        Ok(true)
    }

    /// Edges of span `k` through the interior of run `[i, j)`
    fn edges(&self, rows: &SpanRows, i: i32, j: i32, k: usize) -> (FixedEdge, FixedEdge) {
        let base = rows.base();
        let at = |y: i32| rows.row(y)[k];
        let centre = |y: i32| int2fixed(base + y) + FIXED_HALF;
        let edge = |a: i32, b: i32, x: &dyn Fn(&Span) -> Fixed| {
            FixedEdge::new(Point::new(x(&at(a)), centre(a)), Point::new(x(&at(b)), centre(b)))
        };
        match self.coverage {
            Coverage::PixelCentre => {
                (edge(i, j - 1, &|s: &Span| s.left.saturating_add(1)),
                 edge(i, j - 1, &|s: &Span| s.right.saturating_add(1)))
            },
            Coverage::AnyPart => {
                let lx = |s: &Span| s.left.saturating_sub(FIXED_HALF - 1);
                let rx = |s: &Span| s.right.saturating_add(FIXED_HALF);
                let left = if at(i).left <= at(j - 1).left {
                    edge(i + 1, j - 1, &lx)
                } else {
                    edge(i, j - 2, &lx)
                };
                let right = if at(i).right <= at(j - 1).right {
                    edge(i, j - 2, &rx)
                } else {
                    edge(i + 1, j - 1, &rx)
                };
                (left, right)
            }
        }
    }
}

/// Rows are bounded by the same sequence of edges
fn same_edges(a: &[Span], b: &[Span]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(s, t)| s.lid == t.lid && s.rid == t.rid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Call;
    use crate::device::Recorder;

    #[test]
    fn bounds_per_coverage() {
        let s = Span::new(int2fixed(2) + 128, int2fixed(5) + 127);
        assert_eq!(pixel_bounds(&s, Coverage::PixelCentre), (3, 5));
        assert_eq!(pixel_bounds(&s, Coverage::AnyPart), (2, 6));
    }

    #[test]
    fn rectangles_are_clamped() {
        let mut rec = Recorder::new();
        let mut e = Emitter::new(&mut rec, &(), None, Coverage::AnyPart, 0, 10);
        e.rectangle(-5, 4, 7).unwrap();
        e.rectangle(8, 20, 7).unwrap();
        e.rectangle(12, 20, 7).unwrap();
        e.rectangle(3, 3, 7).unwrap();
        assert_eq!(rec.calls, vec![
            Call::Rectangle { x: 0, y: 7, w: 4, h: 1, lop: None },
            Call::Rectangle { x: 8, y: 7, w: 2, h: 1, lop: None },
        ]);
    }

    #[test]
    fn logical_op_uses_rop_call() {
        let mut rec = Recorder::new();
        let mut e = Emitter::new(&mut rec, &(), Some(LogicalOp::XOR), Coverage::AnyPart, 0, 10);
        e.rectangle(1, 2, 0).unwrap();
        assert_eq!(rec.calls, vec![Call::Rectangle { x: 1, y: 0, w: 1, h: 1, lop: Some(LogicalOp::XOR) }]);
    }

    fn ramp(row2: Fixed) -> SpanRows {
        let span = |left: Fixed| Span { left, lid: 1, right: int2fixed(10), rid: 2 };
        let lefts = [0, 256, row2, 768, 1024];
        SpanRows::from_rows(0, lefts.iter().map(|&l| vec![span(l)]).collect())
    }

    #[test]
    fn trapezoid_when_rows_line_up() {
        let mut rec = Recorder::new();
        let mut e = Emitter::new(&mut rec, &(), None, Coverage::PixelCentre, 0, 100);
        e.trapezoids(&ramp(512), 0).unwrap();
        assert_eq!(rec.trapezoids(), 1);
        assert_eq!(rec.rectangles(), 2);
        let mut px = rec.pixels().unwrap();
        px.sort();
        let mut expected: Vec<_> = (0 .. 5).flat_map(|y| (y .. 10).map(move |x| (x, y))).collect();
        expected.sort();
        assert_eq!(px, expected);
    }

    #[test]
    fn rows_when_rounding_leaves_the_edge() {
        // Row 2 rounds to column 3 while the edge through rows 0 and 4
        // samples column 2
        let mut rec = Recorder::new();
        let mut e = Emitter::new(&mut rec, &(), None, Coverage::PixelCentre, 0, 100);
        e.trapezoids(&ramp(640), 0).unwrap();
        assert_eq!(rec.trapezoids(), 0);
        assert_eq!(rec.rectangles(), 5);
        assert!(rec.calls.contains(&Call::Rectangle { x: 3, y: 2, w: 7, h: 1, lop: None }));
    }

    #[test]
    fn same_edges_compares_ids_only() {
        let a = [Span { left: 0, lid: 1, right: 5, rid: 2 }];
        let b = [Span { left: 3, lid: 1, right: 9, rid: 2 }];
        let c = [Span { left: 3, lid: 1, right: 9, rid: 3 }];
        assert!(same_edges(&a, &b));
        assert!(!same_edges(&a, &c));
        assert!(!same_edges(&a, &[]));
    }
}
