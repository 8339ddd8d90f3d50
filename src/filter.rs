//! Winding Filter
//!
//! Reduces the sorted records of each row to the spans that are inside the
//! path under the fill rule.
//!
//! Spans produced from any-part records may overlap, since each record
//! covers a range of x. A watermark tracks how far the row has been filled;
//! a span starting at or before it, or inside the pixel it ends in, is
//! joined to the previous span so no pixel is painted twice.

use crate::fixed::fixed2int;
use crate::fixed::fixed_ceil;
use crate::fixed::Fixed;
use crate::params::FillRule;
use crate::table::EdgeTable;
use crate::table::Record;

/// Filled interval of a row, with the edges bounding it
#[derive(Debug,Default,Copy,Clone,PartialEq,Eq)]
pub struct Span {
    pub left: Fixed,
    pub lid: u32,
    pub right: Fixed,
    pub rid: u32,
}

impl Span {
    pub fn new(left: Fixed, right: Fixed) -> Self {
        Self { left, lid: 0, right, rid: 0 }
    }
}

/// Spans of every row of a band
#[derive(Debug,Clone,PartialEq)]
pub struct SpanRows {
    base: i32,
    spans: Vec<Span>,
    /// First span of each row, with one extra entry marking the end
    index: Vec<usize>,
}

impl SpanRows {
    pub fn base(&self) -> i32 {
        self.base
    }
    pub fn height(&self) -> i32 {
        (self.index.len() - 1) as i32
    }
    /// Spans of a row relative to `base`
    pub fn row(&self, y: i32) -> &[Span] {
        if y < 0 || y >= self.height() {
            return &[];
        }
        let y = y as usize;
        &self.spans[self.index[y] .. self.index[y+1]]
    }
    pub fn rows(&self) -> impl Iterator<Item = &[Span]> {
        (0 .. self.height()).map(move |y| self.row(y))
    }
    pub fn len(&self) -> usize {
        self.spans.len()
    }
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
    #[cfg(test)]
    pub(crate) fn from_rows(base: i32, rows: Vec<Vec<Span>>) -> Self {
        let mut index = vec![0];
        let mut spans = vec![];
        for row in rows {
            spans.extend(row);
            index.push(spans.len());
        }
        Self { base, spans, index }
    }
}

/// Filter one sorted row, appending its spans to `out`
///
/// Records left over once the row no longer closes a span are ignored.
pub fn filter_row<R: Record>(row: &[R], rule: FillRule, merge: bool, out: &mut Vec<Span>) {
    let start = out.len();
    let mut watermark: Option<Fixed> = None;
    let mut i = 0;
    while i < row.len() {
        let first = &row[i];
        i += 1;
        let (mut left, mut lid) = (first.left(), first.lid());
        let (mut right, mut rid) = (first.right(), first.rid());
        let mut wind = match rule {
            FillRule::EvenOdd => 1,
            FillRule::NonZero => first.dir().winding(),
        };
        let mut closed = false;
        while i < row.len() {
            let r = &row[i];
            i += 1;
            if r.right() > right {
                right = r.right();
                rid = r.rid();
            }
            wind = match rule {
                FillRule::EvenOdd => wind ^ 1,
                FillRule::NonZero => wind + r.dir().winding(),
            };
            if wind == 0 {
                closed = true;
                break;
            }
        }
        if !closed {
            break;
        }
        if merge {
            if let Some(m) = watermark {
                if right <= m {
                    continue;
                }
                let touches = left <= m || fixed2int(left) < fixed_ceil(m);
                if touches && out.len() > start {
                    if let Some(prev) = out.pop() {
                        left = prev.left;
                        lid = prev.lid;
                    }
                }
            }
        }
        if right > left {
            out.push(Span { left, lid, right, rid });
            watermark = Some(right);
        }
    }
}

/// Filter every row of a sorted table
pub fn filter_table<R: Record>(table: &EdgeTable<R>, rule: FillRule, merge: bool) -> SpanRows {
    let mut spans = Vec::with_capacity(table.len() / 2);
    let mut index = Vec::with_capacity(table.height() as usize + 1);
    for row in table.rows() {
        index.push(spans.len());
        filter_row(row, rule, merge, &mut spans);
    }
    index.push(spans.len());
    SpanRows { base: table.base(), spans, index }
}
