//! Path Extent
//!
//! Finds the device rows and columns a fill can touch, before any table is
//! built. Paths with no area under the coverage rule are recognised here.

use crate::clip::ClipRect;
use crate::fixed::fixed2int;
use crate::fixed::fixed_ceil;
use crate::fixed::fixed_fraction;
use crate::fixed::fixed_round;
use crate::path::Path;
use crate::table::IntBox;
use crate::variant::Coverage;

/// Rows and columns touched by a fill
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum Extent {
    /// Nothing to paint
    Empty,
    /// Path of zero height covering columns `[x0, x1)` of one row
    Degenerate { row: i32, x0: i32, x1: i32 },
    /// Rows `[y1, y2)` and columns `[x1, x2)`
    Rows(IntBox),
}

/// Classify the path's extent under a coverage rule, limited to `clip`
pub fn classify(path: &Path, clip: Option<&ClipRect>, coverage: Coverage) -> Extent {
    let bbox = match path.bounding_box() {
        Some(b) => b,
        None => return Extent::Empty,
    };
    let (cy0, cy1, cx0, cx1) = match clip {
        Some(c) if c.is_inverted() => return Extent::Empty,
        Some(c) => {
            let (y0, y1) = c.pixel_rows();
            let (x0, x1) = c.pixel_cols();
            (y0, y1, x0, x1)
        },
        None => (std::i32::MIN, std::i32::MAX, std::i32::MIN, std::i32::MAX),
    };
    let x0 = fixed2int(bbox.x1).max(cx0);
    let x1 = fixed_ceil(bbox.x2).min(cx1);
    if bbox.y1 == bbox.y2 {
        let y = bbox.y1;
        if coverage == Coverage::PixelCentre || fixed_fraction(y) == 0 {
            return Extent::Empty;
        }
        let row = fixed2int(y);
        if row < cy0 || row >= cy1 || x0 >= x1 {
            return Extent::Empty;
        }
        return Extent::Degenerate { row, x0, x1 };
    }
    let (y0, y1) = match coverage {
        Coverage::PixelCentre => (fixed_round(bbox.y1), fixed_round(bbox.y2)),
        Coverage::AnyPart => (fixed2int(bbox.y1), fixed_ceil(bbox.y2)),
    };
    let (y0, y1) = (y0.max(cy0), y1.min(cy1));
    if y0 >= y1 || x0 >= x1 {
        return Extent::Empty;
    }
    Extent::Rows(IntBox { x1: x0, y1: y0, x2: x1, y2: y1 })
}
