//! Any-Part Cursor
//!
//! With any-part-of-pixel coverage a pixel is painted when the path touches
//! any of its interior, so each row needs the full x range the path's edges
//! cover inside it. A segment contributes to row `k` when it meets the open
//! band `k < y < k + 1`; its contribution is the x range it covers there.
//! A horizontal segment lying exactly on a row boundary touches no row.
//!
//! The cursor walks one subpath at a time. Consecutive contributions to the
//! same row in the same vertical direction merge into a single record, which
//! is written once the path moves to another row or changes direction. The
//! first record of a subpath is held back until the subpath ends, where it
//! may merge with the last one since both meet at the subpath's start.

use std::marker::PhantomData;

use log::trace;

use crate::error::Result;
use crate::fixed::fixed2int;
use crate::fixed::int2fixed_wide;
use crate::fixed::Fixed;
use crate::fixed::FIXED_MASK;
use crate::fixed::FIXED_SCALE;
use crate::fixed::FIXED_SHIFT;
use crate::flatten::curve_log2_samples;
use crate::flatten::for_each_leaf;
use crate::mark::Dda;
use crate::path::Edge;
use crate::path::Path;
use crate::path::Point;
use crate::table::curve_window;
use crate::table::Dir;
use crate::table::EdgeTable;
use crate::table::IntervalRecord;

/// Record being accumulated
#[derive(Debug,Copy,Clone,PartialEq)]
struct Pending {
    /// Row relative to the table base
    row: i32,
    left: Fixed,
    lid: u32,
    right: Fixed,
    rid: u32,
    /// Unset while only horizontal motion has been seen
    dir: Option<Dir>,
}

impl Pending {
    fn compatible(&self, row: i32, dir: Option<Dir>) -> bool {
        self.row == row && (self.dir.is_none() || dir.is_none() || self.dir == dir)
    }
    fn merge(&mut self, o: &Pending) {
        if o.left < self.left {
            self.left = o.left;
            self.lid = o.lid;
        }
        if o.right > self.right {
            self.right = o.right;
            self.rid = o.rid;
        }
        if self.dir.is_none() {
            self.dir = o.dir;
        }
    }
}

/// Accumulates the rows covered by a subpath
#[derive(Debug)]
pub struct Cursor<R> {
    pending: Option<Pending>,
    /// First record of the subpath
    held: Option<Pending>,
    /// No record has been flushed in this subpath yet
    first: bool,
    marker: PhantomData<R>,
}

impl<R: IntervalRecord> Default for Cursor<R> {
    fn default() -> Self {
        Self { pending: None, held: None, first: true, marker: PhantomData }
    }
}

impl<R: IntervalRecord> Cursor<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new subpath
    pub fn start(&mut self) {
        self.pending = None;
        self.held = None;
        self.first = true;
    }

    fn write(table: &mut EdgeTable<R>, p: Pending) -> Result<()> {
        match p.dir {
            Some(dir) => table.push(p.row, R::interval(p.left, p.lid, p.right, p.rid, dir)),
            None => {
                trace!("dropping horizontal record {:?}", p);
                Ok(())
            }
        }
    }

    fn flush(&mut self, table: &mut EdgeTable<R>, p: Pending) -> Result<()> {
        if self.first {
            self.first = false;
            self.held = Some(p);
            Ok(())
        } else {
            Self::write(table, p)
        }
    }

    /// Add the range `[left, right]` of row `row` (relative to the table)
    pub fn contribute(&mut self, table: &mut EdgeTable<R>, row: i32, left: Fixed, right: Fixed,
                      dir: Option<Dir>, id: u32) -> Result<()> {
        let c = Pending { row, left, lid: id, right, rid: id, dir };
        if let Some(p) = self.pending.as_mut() {
            if p.compatible(row, dir) {
                p.merge(&c);
                return Ok(());
            }
        }
        if let Some(p) = self.pending.take() {
            self.flush(table, p)?;
        }
        self.pending = Some(c);
        Ok(())
    }

    /// The path has moved outside of the table's rows
    pub fn touch_outside(&mut self, table: &mut EdgeTable<R>) -> Result<()> {
        match self.pending.take() {
            Some(p) => self.flush(table, p),
            None => Ok(()),
        }
    }

    /// End the subpath, joining its last record with its first if they meet
    pub fn finish(&mut self, table: &mut EdgeTable<R>) -> Result<()> {
        let pending = self.pending.take();
        let held = self.held.take();
        self.first = true;
        match (held, pending) {
            (Some(mut h), Some(p)) => {
                if h.compatible(p.row, p.dir) {
                    h.merge(&p);
                    Self::write(table, h)
                } else {
                    Self::write(table, h)?;
                    Self::write(table, p)
                }
            },
            (Some(h), None) => Self::write(table, h),
            (None, Some(p)) => Self::write(table, p),
            (None, None) => Ok(()),
        }
    }

    /// Trace the line from `a` to `b`
    pub fn line(&mut self, table: &mut EdgeTable<R>, a: Point, b: Point, id: u32) -> Result<()> {
        let base = i64::from(table.base());
        let top = base + i64::from(table.height());
        if a.y == b.y {
            if a.y & FIXED_MASK == 0 {
                return Ok(());
            }
            let row = i64::from(fixed2int(a.y));
            if row < base || row >= top {
                return self.touch_outside(table);
            }
            return self.contribute(table, (row - base) as i32, a.x.min(b.x), a.x.max(b.x), None, id);
        }
        let rising = a.y < b.y;
        let (p, q, dir) = if rising { (a, b, Dir::Rising) } else { (b, a, Dir::Falling) };
        let (y0, y1) = (i64::from(p.y), i64::from(q.y));
        let (ka, kb) = (y0 >> FIXED_SHIFT, (y1 - 1) >> FIXED_SHIFT);
        let (ia, ib) = (ka.max(base), kb.min(top - 1));
        if ia > ib {
            return self.touch_outside(table);
        }
        let dx = i64::from(q.x) - i64::from(p.x);
        let dy = y1 - y0;
        let step = i64::from(FIXED_SCALE);
        let x_at = |y: i64| -> Fixed {
            if y <= y0 {
                p.x
            } else if y >= y1 {
                q.x
            } else {
                Dda::new(p.x, y0, dx, dy, y, 0).x()
            }
        };
        let dir = Some(dir);
        if rising {
            if ka < ia {
                self.touch_outside(table)?;
            }
            let mut dda = Dda::new(p.x, y0, dx, dy, int2fixed_wide(ia + 1), step);
            let mut xa = x_at(int2fixed_wide(ia));
            for k in ia ..= ib {
                let xb = if int2fixed_wide(k + 1) >= y1 {
                    q.x
                } else {
                    let x = dda.x();
                    dda.advance();
                    x
                };
                self.contribute(table, (k - base) as i32, xa.min(xb), xa.max(xb), dir, id)?;
                xa = xb;
            }
            if kb > ib {
                self.touch_outside(table)?;
            }
        } else {
            if kb > ib {
                self.touch_outside(table)?;
            }
            let mut dda = Dda::new(p.x, y0, dx, dy, int2fixed_wide(ib), -step);
            let mut xb = x_at(int2fixed_wide(ib + 1));
            for k in (ia ..= ib).rev() {
                let xa = if int2fixed_wide(k) <= y0 {
                    p.x
                } else {
                    let x = dda.x();
                    dda.advance();
                    x
                };
                self.contribute(table, (k - base) as i32, xa.min(xb), xa.max(xb), dir, id)?;
                xb = xa;
            }
            if ka < ia {
                self.touch_outside(table)?;
            }
        }
        Ok(())
    }

    /// Trace every subpath of the path, giving each line and curve leaf a new id
    pub fn trace_path(&mut self, table: &mut EdgeTable<R>, path: &Path, flatness: Fixed) -> Result<()> {
        let (ylo, yhi) = curve_window(table.base(), table.height());
        let mut id = 0u32;
        for sp in path.subpaths() {
            self.start();
            for edge in sp.edges() {
                match edge {
                    Edge::Line(a, b) => {
                        id = id.wrapping_add(1);
                        self.line(table, a, b, id)?;
                    },
                    Edge::Curve(p0, p1, p2, p3) => {
                        let k = curve_log2_samples(p0, p1, p2, p3, flatness);
                        trace!("curve {:?} {:?} {:?} {:?} split {} times", p0, p1, p2, p3, k);
                        // Skipped leaves lie a full row away from the band,
                        // so the leaves next to them already left it
                        for_each_leaf([p0, p1, p2, p3], k, ylo, yhi, &mut |a, b| {
                            id = id.wrapping_add(1);
                            self.line(table, a, b, id)
                        })?;
                    }
                }
            }
            self.finish(table)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::Rectangle;
    use crate::fixed::int2fixed;
    use crate::table::Interval;
    use crate::table::Plan;
    use crate::table::Record;
    use crate::table::TableBuilder;
    use crate::table::TrapInterval;
    use crate::variant::Coverage;

    fn traced<R: IntervalRecord>(path: &Path, y0: i32, y1: i32) -> EdgeTable<R> {
        let tb = TableBuilder::new(path, Coverage::AnyPart, 256, 1 << 20, 1);
        let mut t = match tb.plan(&Rectangle::new(0, y0, 100, y1)) {
            Plan::Ready(t) => t,
            other => panic!("unexpected {:?}", other),
        };
        Cursor::new().trace_path(&mut t, path, 256).unwrap();
        t
    }

    fn px(x: i32, y: i32) -> (Fixed, Fixed) {
        (int2fixed(x), int2fixed(y))
    }

    #[test]
    fn aligned_square() {
        let mut path = Path::new();
        path.rect(int2fixed(2), int2fixed(2), int2fixed(6), int2fixed(6));
        let t: EdgeTable<Interval> = traced(&path, 0, 10);
        for y in 0 .. 10 {
            let row = t.row(y);
            if y < 2 || y >= 6 {
                assert!(row.is_empty(), "row {}", y);
            } else {
                assert_eq!(row.len(), 2, "row {}", y);
                assert!(row.contains(&Interval { left: 512, right: 512, dir: Dir::Falling }));
                assert!(row.contains(&Interval { left: 1536, right: 1536, dir: Dir::Rising }));
            }
        }
    }

    #[test]
    fn start_inside_edge_joins_first_and_last() {
        let mut path = Path::new();
        path.polygon(&[(int2fixed(2), int2fixed(4) + 128), px(2, 2), px(6, 2), px(6, 6), px(2, 6)]);
        let t: EdgeTable<Interval> = traced(&path, 0, 10);
        for y in 2 .. 6 {
            assert_eq!(t.row(y).len(), 2, "row {}", y);
        }
    }

    #[test]
    fn sloped_edge_covers_row_range() {
        let mut path = Path::new();
        path.polygon(&[px(0, 0), px(8, 4), px(0, 4)]);
        let t: EdgeTable<Interval> = traced(&path, 0, 4);
        for y in 0 .. 4 {
            let r = t.row(y).iter().find(|r| r.dir == Dir::Rising).unwrap();
            assert_eq!((r.left, r.right), (int2fixed(2 * y), int2fixed(2 * y + 2)));
        }
    }

    #[test]
    fn apex_keeps_both_directions() {
        let mut path = Path::new();
        path.polygon(&[(int2fixed(5), 128), (int2fixed(9), int2fixed(4) + 128),
                       (int2fixed(5), int2fixed(8) + 128), (int2fixed(1), int2fixed(4) + 128)]);
        let t: EdgeTable<TrapInterval> = traced(&path, 0, 10);
        let row = t.row(0);
        assert_eq!(row.len(), 2);
        assert!(row.iter().any(|r| r.dir == Dir::Rising && r.lid == 1 && r.left == 1280));
        assert!(row.iter().any(|r| r.dir == Dir::Falling && r.rid == 4 && r.right == 1280));
    }

    #[test]
    fn horizontal_subpath_is_dropped() {
        let mut path = Path::new();
        path.polygon(&[(0, 384), (int2fixed(5), 384)]);
        let t: EdgeTable<Interval> = traced(&path, 0, 3);
        assert!(t.is_empty());
    }

    #[test]
    fn rows_outside_band_are_skipped() {
        let mut path = Path::new();
        path.rect(0, 0, int2fixed(10), int2fixed(100));
        let t: EdgeTable<Interval> = traced(&path, 40, 50);
        assert_eq!(t.len(), 20);
        assert!(t.rows().all(|r| r.len() == 2));
        assert!(t.rows().all(|r| r.iter().map(|i| i.dir().winding()).sum::<i32>() == 0));
    }
}
