//! Edge Table
//!
//! The edge table holds, for every device row of a band, the records left
//! by the path's edges on that row. Records of all rows share one buffer;
//! `index` gives the first slot of each row and `counts` the slots used.
//!
//! Tables are sized before tracing by [TableBuilder], which counts an upper
//! bound of the records every row can receive. A record pushed past that
//! bound is an internal error.

use std::fmt;

use log::error;
use log::trace;

use crate::clip::Rectangle;
use crate::error::Result;
use crate::error::ScanError;
use crate::fixed::Fixed;
use crate::fixed::FIXED_HALF;
use crate::fixed::FIXED_SCALE;
use crate::fixed::FIXED_SHIFT;
use crate::fixed::int2fixed_wide;
use crate::flatten::curve_log2_samples;
use crate::flatten::for_each_leaf;
use crate::path::Edge;
use crate::path::Path;
use crate::path::Point;
use crate::variant::Coverage;

/// Integer device box, rows `[y1, y2)` and columns `[x1, x2)`
pub type IntBox = Rectangle<i32>;

/// Vertical direction of an edge along the path
#[derive(Debug,Copy,Clone,PartialEq,Eq,PartialOrd,Ord,Hash)]
pub enum Dir {
    /// Moving toward increasing y
    Rising,
    /// Moving toward decreasing y
    Falling,
}
impl Default for Dir {
    fn default() -> Dir {
        Dir::Rising
    }
}
impl Dir {
    /// Contribution to the winding number
    pub fn winding(self) -> i32 {
        match self {
            Dir::Rising => 1,
            Dir::Falling => -1,
        }
    }
}

/// Entry of an edge table row
pub trait Record: Copy + Default + fmt::Debug {
    /// Size of the record in 32 bit words
    const WIDTH: usize;
    /// Ordering of records within a row
    type Key: Ord;
    fn key(&self) -> Self::Key;
    fn left(&self) -> Fixed;
    fn right(&self) -> Fixed;
    fn dir(&self) -> Dir;
    /// Edge at the left of the record
    fn lid(&self) -> u32 { 0 }
    /// Edge at the right of the record
    fn rid(&self) -> u32 { 0 }
}

/// Record of an edge crossing a row's centre line
pub trait CrossingRecord: Record {
    fn crossing(x: Fixed, id: u32, dir: Dir) -> Self;
}

/// Record of the x range an edge covers within a row
pub trait IntervalRecord: Record {
    fn interval(left: Fixed, lid: u32, right: Fixed, rid: u32, dir: Dir) -> Self;
}

/// Crossing of a row centre
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Crossing {
    pub x: Fixed,
    pub dir: Dir,
}
impl Record for Crossing {
    const WIDTH: usize = 1;
    type Key = (Fixed, Dir);
    fn key(&self) -> Self::Key { (self.x, self.dir) }
    fn left(&self) -> Fixed { self.x }
    fn right(&self) -> Fixed { self.x }
    fn dir(&self) -> Dir { self.dir }
}
impl CrossingRecord for Crossing {
    fn crossing(x: Fixed, _id: u32, dir: Dir) -> Self {
        Self { x, dir }
    }
}

/// Range covered within a row
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Interval {
    pub left: Fixed,
    pub right: Fixed,
    pub dir: Dir,
}
impl Record for Interval {
    const WIDTH: usize = 2;
    type Key = (Fixed, Fixed, Dir);
    fn key(&self) -> Self::Key { (self.left, self.right, self.dir) }
    fn left(&self) -> Fixed { self.left }
    fn right(&self) -> Fixed { self.right }
    fn dir(&self) -> Dir { self.dir }
}
impl IntervalRecord for Interval {
    fn interval(left: Fixed, _lid: u32, right: Fixed, _rid: u32, dir: Dir) -> Self {
        Self { left, right, dir }
    }
}

/// Crossing of a row centre by a known edge
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct TrapCrossing {
    pub x: Fixed,
    pub id: u32,
    pub dir: Dir,
}
impl Record for TrapCrossing {
    const WIDTH: usize = 2;
    type Key = (Fixed, u32, Dir);
    fn key(&self) -> Self::Key { (self.x, self.id, self.dir) }
    fn left(&self) -> Fixed { self.x }
    fn right(&self) -> Fixed { self.x }
    fn dir(&self) -> Dir { self.dir }
    fn lid(&self) -> u32 { self.id }
    fn rid(&self) -> u32 { self.id }
}
impl CrossingRecord for TrapCrossing {
    fn crossing(x: Fixed, id: u32, dir: Dir) -> Self {
        Self { x, id, dir }
    }
}

/// Range covered within a row, with the edges at either end
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct TrapInterval {
    pub left: Fixed,
    pub lid: u32,
    pub right: Fixed,
    pub rid: u32,
    pub dir: Dir,
}
impl Record for TrapInterval {
    const WIDTH: usize = 4;
    type Key = (Fixed, Fixed, u32, Dir, u32);
    fn key(&self) -> Self::Key { (self.left, self.right, self.lid, self.dir, self.rid) }
    fn left(&self) -> Fixed { self.left }
    fn right(&self) -> Fixed { self.right }
    fn dir(&self) -> Dir { self.dir }
    fn lid(&self) -> u32 { self.lid }
    fn rid(&self) -> u32 { self.rid }
}
impl IntervalRecord for TrapInterval {
    fn interval(left: Fixed, lid: u32, right: Fixed, rid: u32, dir: Dir) -> Self {
        Self { left, lid, right, rid, dir }
    }
}

/// Records of every row in a band
#[derive(Debug,Clone)]
pub struct EdgeTable<R> {
    /// Device row of the first table row
    base: i32,
    /// Number of rows
    height: i32,
    /// First device column that may be painted
    xmin: i32,
    /// Column past the last that may be painted
    xmax: i32,
    /// First slot of each row, with one extra entry marking the end
    index: Vec<usize>,
    /// Slots used in each row
    counts: Vec<usize>,
    /// Record storage
    table: Vec<R>,
}

impl<R: Record> EdgeTable<R> {
    pub fn base(&self) -> i32 {
        self.base
    }
    pub fn height(&self) -> i32 {
        self.height
    }
    pub fn xmin(&self) -> i32 {
        self.xmin
    }
    pub fn xmax(&self) -> i32 {
        self.xmax
    }
    fn slot(&self, row: i32) -> Option<usize> {
        if row < 0 || row >= self.height {
            None
        } else {
            Some(row as usize)
        }
    }
    /// Planned number of records for a row, relative to `base`
    pub fn capacity(&self, row: i32) -> usize {
        self.slot(row).map(|i| self.index[i+1] - self.index[i]).unwrap_or(0)
    }
    /// Append a record to a row, relative to `base`
    pub fn push(&mut self, row: i32, rec: R) -> Result<()> {
        let i = match self.slot(row) {
            Some(i) => i,
            None => {
                error!("record {:?} written to row {} outside band of {} rows", rec, row, self.height);
                return Err(ScanError::Inconsistent { row: row.saturating_add(self.base), capacity: 0 });
            }
        };
        let start = self.index[i];
        let capacity = self.index[i+1] - start;
        let n = self.counts[i];
        if n >= capacity {
            error!("row {} is full ({} records) when adding {:?}", row + self.base, capacity, rec);
            return Err(ScanError::Inconsistent { row: row + self.base, capacity });
        }
        self.table[start + n] = rec;
        self.counts[i] = n + 1;
        Ok(())
    }
    /// Records of a row, relative to `base`
    pub fn row(&self, row: i32) -> &[R] {
        match self.slot(row) {
            Some(i) => &self.table[self.index[i] .. self.index[i] + self.counts[i]],
            None => &[],
        }
    }
    /// Mutable records of a row, relative to `base`
    pub fn row_mut(&mut self, row: i32) -> &mut [R] {
        match self.slot(row) {
            Some(i) => {
                let start = self.index[i];
                &mut self.table[start .. start + self.counts[i]]
            },
            None => &mut [],
        }
    }
    /// Records of all rows, in order
    pub fn rows(&self) -> impl Iterator<Item = &[R]> {
        (0 .. self.height).map(move |y| self.row(y))
    }
    /// Number of records in the table
    pub fn len(&self) -> usize {
        self.counts.iter().sum()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Winding contributions of every row sum to zero
    ///
    /// Holds for the crossing records of closed paths
    pub fn is_balanced(&self) -> bool {
        self.rows().all(|r| r.iter().map(|c| c.dir().winding()).sum::<i32>() == 0)
    }
}

impl<R: Record> fmt::Display for EdgeTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "edge table: base {} height {} x [{}, {})",
                 self.base, self.height, self.xmin, self.xmax)?;
        for (y, row) in self.rows().enumerate() {
            if row.is_empty() {
                continue;
            }
            write!(f, "{:6}:", self.base + y as i32)?;
            for r in row {
                write!(f, " {:?}", r)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Outcome of sizing an edge table
#[derive(Debug)]
pub enum Plan<R> {
    /// Table allocated with all rows empty
    Ready(EdgeTable<R>),
    /// Table exceeds the limit; retry with a band of this many rows
    RetryWithHeight(i32),
    /// Table cannot be allocated
    Failed(ScanError),
}

/// Fixed y range outside of which curves are not subdivided
pub fn curve_window(base: i32, height: i32) -> (i64, i64) {
    let lo = int2fixed_wide(i64::from(base)) - i64::from(FIXED_SCALE);
    let hi = int2fixed_wide(i64::from(base) + i64::from(height)) + i64::from(FIXED_SCALE);
    (lo, hi)
}

/// Vertical offset applied before rounding y to a row
fn row_adjust(coverage: Coverage) -> i64 {
    match coverage {
        Coverage::PixelCentre => i64::from(FIXED_HALF),
        Coverage::AnyPart => 0,
    }
}

fn allocate<T: Clone>(n: usize, value: T, bytes: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(n).map_err(|_| ScanError::Alloc { bytes })?;
    v.resize(n, value);
    Ok(v)
}

/// Sizes and allocates edge tables for one path
#[derive(Debug)]
pub struct TableBuilder<'a> {
    path: &'a Path,
    coverage: Coverage,
    flatness: Fixed,
    limit: usize,
    band_unit: i32,
}

/// Per row record counts, accumulated as a difference array
struct RowCounter {
    base: i32,
    height: i32,
    adj: i64,
    diff: Vec<i64>,
}

impl RowCounter {
    fn row_of(&self, y: Fixed) -> i64 {
        (i64::from(y) + self.adj) >> FIXED_SHIFT
    }
    /// Count one record in each row of `[a, b]`, device rows
    fn add_rows(&mut self, a: i64, b: i64, n: i64) {
        let a = a.max(i64::from(self.base)) - i64::from(self.base);
        let b = b.min(i64::from(self.base) + i64::from(self.height) - 1) - i64::from(self.base);
        if a > b {
            return;
        }
        self.diff[a as usize] += n;
        self.diff[b as usize + 1] -= n;
    }
    fn add_line(&mut self, p: Point, q: Point) {
        let (lo, hi) = if p.y < q.y { (p.y, q.y) } else { (q.y, p.y) };
        let (a, b) = (self.row_of(lo), self.row_of(hi));
        self.add_rows(a, b, 1);
    }
}

impl<'a> TableBuilder<'a> {
    pub fn new(path: &'a Path, coverage: Coverage, flatness: Fixed, limit: usize, band_unit: i32) -> Self {
        Self { path, coverage, flatness, limit, band_unit: band_unit.max(1) }
    }

    /// Count, for each row of `band`, the records the path can leave there
    pub fn row_counts(&self, band: &IntBox) -> Result<Vec<usize>> {
        let height = (band.y2 - band.y1).max(0);
        let rows = height as usize;
        let diff = allocate(rows + 1, 0i64, (rows + 1) * std::mem::size_of::<i64>())?;
        let mut counter = RowCounter { base: band.y1, height, adj: row_adjust(self.coverage), diff };
        let (ylo, yhi) = curve_window(band.y1, height);
        for sp in self.path.subpaths() {
            let bbox = sp.bounding_box();
            let (a, b) = (counter.row_of(bbox.y1), counter.row_of(bbox.y2));
            if a == b {
                counter.add_rows(a, a, 2);
            }
            for edge in sp.edges() {
                match edge {
                    Edge::Line(p, q) => counter.add_line(p, q),
                    Edge::Curve(p0, p1, p2, p3) => {
                        let k = curve_log2_samples(p0, p1, p2, p3, self.flatness);
                        for_each_leaf([p0, p1, p2, p3], k, ylo, yhi, &mut |p, q| {
                            counter.add_line(p, q);
                            Ok(())
                        })?;
                    }
                }
            }
        }
        let mut counts = Vec::with_capacity(rows);
        let mut run = 0i64;
        for d in &counter.diff[..rows] {
            run += d;
            counts.push(run.max(0) as usize);
        }
        Ok(counts)
    }

    /// Table size in bytes for the given row counts of records `width` words wide
    fn table_bytes(counts: &[usize], width: usize) -> Option<usize> {
        counts.iter().try_fold(0usize, |acc, &n| {
            n.checked_mul(width)?.checked_add(1)?.checked_mul(4)?.checked_add(acc)
        })
    }

    /// Size and allocate the table for `band`
    pub fn plan<R: Record>(&self, band: &IntBox) -> Plan<R> {
        let height = band.y2 - band.y1;
        // Each row costs at least one index word
        let fits = self.limit / 4;
        if height > 0 && height as usize > fits {
            let unit = self.band_unit as usize;
            let n = (fits / unit * unit).min(std::i32::MAX as usize) as i32;
            trace!("band [{}, {}) has more rows than the limit allows, capping at {}", band.y1, band.y2, n);
            return Plan::RetryWithHeight(n);
        }
        let counts = match self.row_counts(band) {
            Ok(c) => c,
            Err(e) => return Plan::Failed(e),
        };
        let bytes = match Self::table_bytes(&counts, R::WIDTH) {
            Some(b) => b,
            None => return Plan::Failed(ScanError::SizeOverflow),
        };
        trace!("band [{}, {}) needs {} bytes for {} records", band.y1, band.y2,
               bytes, counts.iter().sum::<usize>());
        if bytes > self.limit {
            let factor = bytes / self.limit + if bytes % self.limit != 0 { 1 } else { 0 };
            let factor = factor.min(std::i32::MAX as usize) as i32;
            let rows = height / factor + if height % factor != 0 { 1 } else { 0 };
            let unit = self.band_unit;
            let n = ((rows + unit - 1) / unit).saturating_mul(unit);
            return Plan::RetryWithHeight(n);
        }
        match Self::allocate_table(band, &counts) {
            Ok(table) => Plan::Ready(table),
            Err(e) => Plan::Failed(e),
        }
    }

    fn allocate_table<R: Record>(band: &IntBox, counts: &[usize]) -> Result<EdgeTable<R>> {
        let rows = counts.len();
        let total: usize = counts.iter().sum();
        let word = std::mem::size_of::<usize>();
        let mut index = allocate(rows + 1, 0usize, (rows + 1) * word)?;
        let mut off = 0;
        for (i, n) in counts.iter().enumerate() {
            index[i] = off;
            off += n;
        }
        index[rows] = off;
        let table = allocate(total, R::default(), total.saturating_mul(std::mem::size_of::<R>()))?;
        let counts = allocate(rows, 0usize, rows * word)?;
        Ok(EdgeTable {
            base: band.y1,
            height: rows as i32,
            xmin: band.x1,
            xmax: band.x2,
            index,
            counts,
            table,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::int2fixed;

    fn square() -> Path {
        let mut p = Path::new();
        p.rect(int2fixed(2), int2fixed(2), int2fixed(6), int2fixed(6));
        p
    }

    #[test]
    fn counts_cover_rows() {
        let path = square();
        let tb = TableBuilder::new(&path, Coverage::PixelCentre, 256, 1 << 20, 1);
        let band = IntBox::new(0, 0, 10, 10);
        let c = tb.row_counts(&band).unwrap();
        // Two vertical edges in every row the square spans, plus the rows of
        // the horizontal edges
        assert_eq!(c[1], 0);
        assert_eq!(c[2], 3);
        assert_eq!(c[3], 2);
        assert_eq!(c[5], 2);
        assert_eq!(c[6], 3);
        assert_eq!(c[7], 0);
    }

    #[test]
    fn push_past_capacity_fails() {
        let path = square();
        let tb = TableBuilder::new(&path, Coverage::AnyPart, 256, 1 << 20, 1);
        let band = IntBox::new(0, 0, 10, 10);
        let mut t: EdgeTable<Interval> = match tb.plan(&band) {
            Plan::Ready(t) => t,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(t.capacity(0), 0);
        assert!(matches!(t.push(0, Interval::default()), Err(ScanError::Inconsistent { row: 0, capacity: 0 })));
        let cap = t.capacity(3);
        for _ in 0 .. cap {
            t.push(3, Interval::default()).unwrap();
        }
        assert!(t.push(3, Interval::default()).is_err());
        assert!(t.push(42, Interval::default()).is_err());
        assert_eq!(t.row(3).len(), cap);
        assert_eq!(t.len(), cap);
        assert!(t.row(-1).is_empty());
    }

    #[test]
    fn over_limit_asks_for_smaller_band() {
        let mut path = Path::new();
        for i in 0 .. 50 {
            path.rect(int2fixed(i), 0, int2fixed(i) + 128, int2fixed(100));
        }
        let band = IntBox::new(0, 0, 100, 100);
        let tb = TableBuilder::new(&path, Coverage::PixelCentre, 256, 4096, 8);
        match tb.plan::<Crossing>(&band) {
            Plan::RetryWithHeight(n) => {
                assert!(n < 100);
                assert_eq!(n % 8, 0);
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn tall_band_is_capped_before_counting() {
        let mut path = Path::new();
        path.rect(0, 0, int2fixed(4), int2fixed(1 << 22));
        let band = IntBox::new(0, 0, 4, 1 << 22);
        let tb = TableBuilder::new(&path, Coverage::AnyPart, 256, 1000, 8);
        match tb.plan::<Interval>(&band) {
            Plan::RetryWithHeight(n) => assert_eq!(n, 248),
            other => panic!("unexpected {:?}", other),
        }
        let tb = TableBuilder::new(&path, Coverage::AnyPart, 256, 16, 8);
        match tb.plan::<Interval>(&band) {
            Plan::RetryWithHeight(n) => assert_eq!(n, 0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn flat_subpath_gets_slack() {
        let mut path = Path::new();
        path.rect(0, 10, int2fixed(3), 20);
        let band = IntBox::new(0, 0, 10, 2);
        let tb = TableBuilder::new(&path, Coverage::AnyPart, 256, 1 << 20, 1);
        let c = tb.row_counts(&band).unwrap();
        assert_eq!(c, vec![6, 0]);
    }

    #[test]
    fn display_lists_rows() {
        let path = square();
        let tb = TableBuilder::new(&path, Coverage::PixelCentre, 256, 1 << 20, 1);
        let mut t: EdgeTable<Crossing> = match tb.plan(&IntBox::new(0, 0, 10, 10)) {
            Plan::Ready(t) => t,
            other => panic!("unexpected {:?}", other),
        };
        t.push(4, Crossing { x: 512, dir: Dir::Falling }).unwrap();
        t.push(4, Crossing { x: 1536, dir: Dir::Rising }).unwrap();
        assert!(t.is_balanced());
        let s = format!("{}", t);
        assert!(s.starts_with("edge table: base 0 height 10"));
        assert!(s.contains("     4: Crossing { x: 512, dir: Falling }"));
    }
}
