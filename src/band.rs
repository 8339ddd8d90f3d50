//! Banded Filling
//!
//! A fill is processed in horizontal bands. Each band builds its edge
//! table, traces the path into it, sorts and filters the rows and sends the
//! spans to the device, then drops the table before the next band.
//!
//! The first band covers every row of the path. When its table would exceed
//! the size limit the table builder proposes a shorter band and the same
//! band is retried; later bands keep the shorter height. When the height
//! cannot shrink any further the fill fails.
//!
//! # Example
//!
//!     use scanc::{fill_path, Bitmap, FillParams, Path};
//!     use scanc::fixed::int2fixed;
//!
//!     let mut path = Path::new();
//!     path.rect(int2fixed(1), int2fixed(1), int2fixed(4), int2fixed(3));
//!
//!     let mut bmp = Bitmap::new(8, 8);
//!     fill_path(&mut bmp, &path, None, &FillParams::default(), &255).unwrap();
//!     assert_eq!(bmp.filled(), 6);
//!

use log::debug;
use log::log_enabled;
use log::trace;
use log::Level;

use crate::bbox::classify;
use crate::bbox::Extent;
use crate::clip::ClipRect;
use crate::device::Device;
use crate::emit::Emitter;
use crate::error::Result;
use crate::error::ScanError;
use crate::filter::filter_table;
use crate::params::FillParams;
use crate::path::Path;
use crate::sort::sort_table;
use crate::table::IntBox;
use crate::table::Plan;
use crate::table::TableBuilder;
use crate::variant::AnyPartSpans;
use crate::variant::AnyPartTrapezoids;
use crate::variant::CentreSpans;
use crate::variant::CentreTrapezoids;
use crate::variant::Coverage;
use crate::variant::ScanConverter;
use crate::variant::Shape;
use crate::variant::Variant;

/// Fill a path on a device
///
/// The path is filled under the rule and scan converter of `params`,
/// limited to `clip` when given.
pub fn fill_path<D: Device>(dev: &mut D, path: &Path, clip: Option<&ClipRect>,
                            params: &FillParams, color: &D::Color) -> Result<()> {
    match params.scan_variant() {
        Variant::CentreSpans => fill_with::<CentreSpans, D>(dev, path, clip, params, color),
        Variant::AnyPartSpans => fill_with::<AnyPartSpans, D>(dev, path, clip, params, color),
        Variant::CentreTrapezoids => fill_with::<CentreTrapezoids, D>(dev, path, clip, params, color),
        Variant::AnyPartTrapezoids => fill_with::<AnyPartTrapezoids, D>(dev, path, clip, params, color),
    }
}

/// Fill a path with a scan converter known at compile time
pub fn fill_with<S: ScanConverter, D: Device>(dev: &mut D, path: &Path, clip: Option<&ClipRect>,
                                              params: &FillParams, color: &D::Color) -> Result<()> {
    let ibox = match classify(path, clip, S::COVERAGE) {
        Extent::Empty => {
            debug!("fill is empty");
            return Ok(());
        },
        Extent::Degenerate { row, x0, x1 } => {
            debug!("zero height fill on row {} [{}, {})", row, x0, x1);
            let mut em = Emitter::new(dev, color, params.logical_op(), S::COVERAGE, x0, x1);
            return em.rectangle(x0, x1, row);
        },
        Extent::Rows(b) => b,
    };
    let unit = dev.max_fill_band().max(0);
    let band_unit = unit.max(1);
    let builder = TableBuilder::new(path, S::COVERAGE, params.curve_flatness(),
                                    params.max_table_bytes(), band_unit);
    let end = ibox.y2;
    let mut y = ibox.y1 - ibox.y1.rem_euclid(band_unit);
    let rows = end - y;
    let mut h = rows + (band_unit - rows.rem_euclid(band_unit)) % band_unit;
    debug!("filling rows [{}, {}) columns [{}, {}) with {:?}",
           ibox.y1, ibox.y2, ibox.x1, ibox.x2, params.scan_variant());
    while y < end {
        let band = IntBox {
            x1: ibox.x1,
            y1: y.max(ibox.y1),
            x2: ibox.x2,
            y2: y.saturating_add(h).min(end),
        };
        match builder.plan::<S::Record>(&band) {
            Plan::RetryWithHeight(n) => {
                if n < band_unit || n >= h {
                    debug!("band at {} cannot shrink below {} rows", y, h);
                    return Err(ScanError::OutOfMemory { height: h });
                }
                debug!("band at {} of {} rows exceeds the table limit, retrying with {}", y, h, n);
                h = n;
            },
            Plan::Failed(e) => return Err(e),
            Plan::Ready(mut table) => {
                S::trace(&mut table, path, params.curve_flatness())?;
                sort_table(&mut table);
                if log_enabled!(Level::Trace) {
                    trace!("{}", table);
                }
                let spans = filter_table(&table, params.fill_rule(), S::COVERAGE == Coverage::AnyPart);
                drop(table);
                let mut em = Emitter::new(dev, color, params.logical_op(), S::COVERAGE, ibox.x1, ibox.x2);
                match S::SHAPE {
                    Shape::Spans => em.spans(&spans)?,
                    Shape::Trapezoids => em.trapezoids(&spans, unit)?,
                }
                y = y.saturating_add(h);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Call;
    use crate::device::Recorder;
    use crate::fixed::int2fixed;

    fn square() -> Path {
        let mut p = Path::new();
        p.rect(int2fixed(1), int2fixed(1), int2fixed(5), int2fixed(9));
        p
    }

    #[test]
    fn empty_path_makes_no_calls() {
        let mut rec = Recorder::new();
        fill_path(&mut rec, &Path::new(), None, &FillParams::default(), &()).unwrap();
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn bands_tile_rows() {
        let path = square();
        let mut params = FillParams::new();
        params.table_limit(64);
        let mut rec = Recorder::new();
        fill_path(&mut rec, &path, None, &params, &()).unwrap();
        let ys: Vec<i32> = rec.calls.iter().map(|c| match *c {
            Call::Rectangle { y, .. } => y,
            _ => -1,
        }).collect();
        assert_eq!(ys, (1 .. 9).collect::<Vec<_>>());
    }

    #[test]
    fn unshrinkable_band_fails() {
        let path = square();
        let mut params = FillParams::new();
        params.table_limit(8);
        let mut rec = Recorder::new();
        let r = fill_path(&mut rec, &path, None, &params, &());
        assert!(matches!(r, Err(ScanError::OutOfMemory { height: 1 })));
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn bands_align_to_device() {
        let path = square();
        let mut params = FillParams::new();
        params.variant(Variant::AnyPartTrapezoids).table_limit(200);
        let mut rec = Recorder::with_band(4);
        fill_path(&mut rec, &path, None, &params, &()).unwrap();
        let pixels = rec.pixels().unwrap();
        assert_eq!(pixels.len(), 32);
    }
}
