//! Edge buffer scan conversion
//!
//! Fills paths given in fixed point device coordinates by working out
//! exactly which pixels are inside, and handing them to a device as
//! rectangles and trapezoids.
//!
//! How does this work
//!    fill_path(dev, path, clip, params, color)
//!      classify()        -- rows and columns the path can touch
//!      per band
//!        TableBuilder    -- count records per row, allocate edge table
//!        trace           -- centre crossings (mark) or covered ranges (cursor)
//!        sort_table()
//!        filter_table()  -- nonzero / even-odd reduction to spans
//!        Emitter         -- rectangles, or trapezoids over runs of rows
//!
//! # Example
//!
//!     use scanc::{fill_path, Bitmap, FillParams, FillRule, Path};
//!     use scanc::fixed::int2fixed;
//!
//!     let mut path = Path::new();
//!     path.polygon(&[(int2fixed(1), int2fixed(1)),
//!                    (int2fixed(9), int2fixed(1)),
//!                    (int2fixed(9), int2fixed(9))]);
//!
//!     let mut params = FillParams::new();
//!     params.rule(FillRule::EvenOdd);
//!
//!     let mut bmp = Bitmap::new(10, 10);
//!     fill_path(&mut bmp, &path, None, &params, &255).unwrap();
//!     assert_eq!(bmp.max_hits(), 1);
//!

pub mod fixed;
pub mod error;
pub mod params;
pub mod path;
pub mod clip;
pub mod bbox;
pub mod table;
pub mod flatten;
pub mod mark;
pub mod cursor;
pub mod sort;
pub mod filter;
pub mod emit;
pub mod device;
pub mod bitmap;
pub mod variant;
pub mod band;

pub use error::ScanError;
pub use params::*;
pub use path::*;
pub use clip::*;
pub use bbox::*;
pub use table::*;
pub use flatten::*;
pub use mark::*;
pub use cursor::*;
pub use sort::*;
pub use filter::*;
pub use emit::*;
pub use device::*;
pub use bitmap::*;
pub use variant::*;
pub use band::*;
