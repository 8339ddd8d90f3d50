//! Scan Converters
//!
//! Four scan converters share the banding, sorting and filtering steps and
//! differ in two choices:
//!
//! - Coverage: a pixel is painted when its centre is inside the path, or
//!   when any part of it is
//! - Shape: output as rectangles only, or as trapezoids where rows of
//!   spans share their edges
//!
//! The choice is fixed once per fill; each converter is a type so the
//! record layout of its edge table is known statically.

use crate::cursor::Cursor;
use crate::device::LogicalOp;
use crate::error::Result;
use crate::fixed::Fixed;
use crate::fixed::FIXED_SCALE;
use crate::mark::mark_path;
use crate::path::Path;
use crate::table::Crossing;
use crate::table::EdgeTable;
use crate::table::Interval;
use crate::table::Record;
use crate::table::TrapCrossing;
use crate::table::TrapInterval;

/// Pixels painted by a fill
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum Coverage {
    /// Pixels whose centre is inside
    PixelCentre,
    /// Pixels any part of which is inside
    AnyPart,
}

/// Form of the device calls
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum Shape {
    Spans,
    Trapezoids,
}

/// Traces a path into an edge table
pub trait ScanConverter {
    type Record: Record;
    const COVERAGE: Coverage;
    const SHAPE: Shape;
    fn trace(table: &mut EdgeTable<Self::Record>, path: &Path, flatness: Fixed) -> Result<()>;
}

/// Pixel centre coverage, rectangles
#[derive(Debug,Copy,Clone)]
pub struct CentreSpans;
/// Any-part coverage, rectangles
#[derive(Debug,Copy,Clone)]
pub struct AnyPartSpans;
/// Pixel centre coverage, trapezoids
#[derive(Debug,Copy,Clone)]
pub struct CentreTrapezoids;
/// Any-part coverage, trapezoids
#[derive(Debug,Copy,Clone)]
pub struct AnyPartTrapezoids;

impl ScanConverter for CentreSpans {
    type Record = Crossing;
    const COVERAGE: Coverage = Coverage::PixelCentre;
    const SHAPE: Shape = Shape::Spans;
    fn trace(table: &mut EdgeTable<Crossing>, path: &Path, flatness: Fixed) -> Result<()> {
        mark_path(table, path, flatness)
    }
}

impl ScanConverter for AnyPartSpans {
    type Record = Interval;
    const COVERAGE: Coverage = Coverage::AnyPart;
    const SHAPE: Shape = Shape::Spans;
    fn trace(table: &mut EdgeTable<Interval>, path: &Path, flatness: Fixed) -> Result<()> {
        Cursor::new().trace_path(table, path, flatness)
    }
}

impl ScanConverter for CentreTrapezoids {
    type Record = TrapCrossing;
    const COVERAGE: Coverage = Coverage::PixelCentre;
    const SHAPE: Shape = Shape::Trapezoids;
    fn trace(table: &mut EdgeTable<TrapCrossing>, path: &Path, flatness: Fixed) -> Result<()> {
        mark_path(table, path, flatness)
    }
}

impl ScanConverter for AnyPartTrapezoids {
    type Record = TrapInterval;
    const COVERAGE: Coverage = Coverage::AnyPart;
    const SHAPE: Shape = Shape::Trapezoids;
    fn trace(table: &mut EdgeTable<TrapInterval>, path: &Path, flatness: Fixed) -> Result<()> {
        Cursor::new().trace_path(table, path, flatness)
    }
}

/// Scan converter chosen at run time
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum Variant {
    CentreSpans,
    AnyPartSpans,
    CentreTrapezoids,
    AnyPartTrapezoids,
}

impl Default for Variant {
    fn default() -> Variant {
        Variant::AnyPartSpans
    }
}

impl Variant {
    pub fn new(coverage: Coverage, shape: Shape) -> Self {
        match (coverage, shape) {
            (Coverage::PixelCentre, Shape::Spans) => Variant::CentreSpans,
            (Coverage::AnyPart, Shape::Spans) => Variant::AnyPartSpans,
            (Coverage::PixelCentre, Shape::Trapezoids) => Variant::CentreTrapezoids,
            (Coverage::AnyPart, Shape::Trapezoids) => Variant::AnyPartTrapezoids,
        }
    }
    pub fn coverage(self) -> Coverage {
        match self {
            Variant::CentreSpans | Variant::CentreTrapezoids => Coverage::PixelCentre,
            Variant::AnyPartSpans | Variant::AnyPartTrapezoids => Coverage::AnyPart,
        }
    }
    pub fn shape(self) -> Shape {
        match self {
            Variant::CentreSpans | Variant::AnyPartSpans => Shape::Spans,
            Variant::CentreTrapezoids | Variant::AnyPartTrapezoids => Shape::Trapezoids,
        }
    }
    /// Choose a scan converter from the fill adjustment and raster operation
    ///
    /// An adjustment of a quarter pixel or more asks for any-part coverage.
    /// Trapezoids paint some pixels twice where they meet the rectangles
    /// around them, so they are only used with idempotent operations.
    pub fn select(fill_adjust: Fixed, by_trapezoids: bool, lop: Option<LogicalOp>) -> Self {
        let coverage = if fill_adjust >= FIXED_SCALE / 4 {
            Coverage::AnyPart
        } else {
            Coverage::PixelCentre
        };
        let shape = if by_trapezoids && lop.map_or(true, |l| l.is_idempotent()) {
            Shape::Trapezoids
        } else {
            Shape::Spans
        };
        Variant::new(coverage, shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection() {
        assert_eq!(Variant::select(0, false, None), Variant::CentreSpans);
        assert_eq!(Variant::select(63, true, None), Variant::CentreTrapezoids);
        assert_eq!(Variant::select(64, false, None), Variant::AnyPartSpans);
        assert_eq!(Variant::select(128, true, Some(LogicalOp::COPY)), Variant::AnyPartTrapezoids);
        assert_eq!(Variant::select(128, true, Some(LogicalOp::XOR)), Variant::AnyPartSpans);
    }

    #[test]
    fn parts() {
        for &v in &[Variant::CentreSpans, Variant::AnyPartSpans,
                    Variant::CentreTrapezoids, Variant::AnyPartTrapezoids] {
            assert_eq!(Variant::new(v.coverage(), v.shape()), v);
        }
        assert_eq!(<AnyPartTrapezoids as ScanConverter>::COVERAGE, Coverage::AnyPart);
        assert_eq!(<CentreTrapezoids as ScanConverter>::SHAPE, Shape::Trapezoids);
    }
}
