//! Coverage Bitmap
//!
//! A gray scale device, one byte per pixel, that also counts how many times
//! each pixel was painted. Bitmaps can be written to and read from PNG
//! files.
//!
//! # Example
//!
//!     use scanc::{Bitmap, Device};
//!
//!     let mut bmp = Bitmap::new(4, 3);
//!     bmp.fill_rectangle(1, 1, 2, 1, &255).unwrap();
//!     assert_eq!(bmp[(1, 1)], 255);
//!     assert_eq!(bmp.filled(), 2);
//!

use std::ops::Index;
use std::path::Path;

use crate::device::trapezoid_rows;
use crate::device::Device;
use crate::device::FixedEdge;
use crate::device::LogicalOp;
use crate::error::Result;
use crate::fixed::Fixed;

/// Gray scale pixel buffer
///
/// Data is stored in row-major order
#[derive(Debug,Default,Clone,PartialEq)]
pub struct Bitmap {
    /// Pixel values
    data: Vec<u8>,
    /// Times each pixel was painted
    hits: Vec<u32>,
    /// Width in pixels
    width: usize,
    /// Height in pixels
    height: usize,
    /// Rows trapezoids may not cross, 0 for none
    band: i32,
}

/// Apply a raster operation to every bit of a byte, the color as both
/// texture and source
fn rop_byte(lop: LogicalOp, s: u8, d: u8) -> u8 {
    (0 .. 8).fold(0u8, |acc, bit| {
        let sb = (s >> bit) & 1 == 1;
        let db = (d >> bit) & 1 == 1;
        if lop.apply(sb, sb, db) { acc | (1 << bit) } else { acc }
    })
}

impl Bitmap {
    /// Create a new bitmap of width and height, all zero
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0u8; width * height],
            hits: vec![0; width * height],
            width, height, band: 0,
        }
    }
    /// Report a maximum fill band of `band` rows to the filler
    pub fn set_band(&mut self, band: i32) {
        self.band = band;
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    /// Pixel values, row-major
    pub fn data(&self) -> &[u8] {
        &self.data
    }
    /// Number of times (x,y) was painted
    pub fn hits(&self, x: usize, y: usize) -> u32 {
        self.hits[y * self.width + x]
    }
    /// Largest number of times any pixel was painted
    pub fn max_hits(&self) -> u32 {
        self.hits.iter().cloned().max().unwrap_or(0)
    }
    /// Number of pixels painted at least once
    pub fn filled(&self) -> usize {
        self.hits.iter().filter(|&&h| h > 0).count()
    }
    /// Set every pixel to zero and forget all paint
    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|v| *v = 0);
        self.hits.iter_mut().for_each(|v| *v = 0);
    }
    /// Paint columns `[x0, x1)` of row `y`, clipped to the bitmap
    fn span(&mut self, x0: i32, x1: i32, y: i32, value: u8, lop: Option<LogicalOp>) {
        if y < 0 || y as usize >= self.height {
            return;
        }
        let x0 = x0.max(0) as usize;
        let x1 = x1.max(0).min(self.width as i32) as usize;
        let row = y as usize * self.width;
        for i in row + x0 .. row + x1.max(x0) {
            self.data[i] = match lop {
                Some(lop) => rop_byte(lop, value, self.data[i]),
                None => value,
            };
            self.hits[i] += 1;
        }
    }
    /// Write the bitmap as an 8 bit gray scale PNG
    pub fn to_png<P: AsRef<Path>>(&self, filename: P) -> Result<()> {
        image::save_buffer(filename, &self.data, self.width as u32, self.height as u32, image::Gray(8))?;
        Ok(())
    }
    /// Read a gray scale image; other formats are converted
    pub fn from_png<P: AsRef<Path>>(filename: P) -> Result<Self> {
        let img = image::open(filename)?.to_luma();
        let (w, h) = img.dimensions();
        let data = img.into_raw();
        let hits = data.iter().map(|&v| if v > 0 { 1 } else { 0 }).collect();
        Ok(Self { data, hits, width: w as usize, height: h as usize, band: 0 })
    }
    /// Pixels whose values differ, or every pixel if the sizes differ
    pub fn diff(&self, other: &Bitmap) -> Vec<(usize, usize)> {
        if self.width != other.width || self.height != other.height {
            return (0 .. self.height.max(other.height))
                .flat_map(|y| (0 .. self.width.max(other.width)).map(move |x| (x, y)))
                .collect();
        }
        self.data.iter().zip(other.data.iter()).enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| (i % self.width, i / self.width))
            .collect()
    }
}

impl Index<(usize,usize)> for Bitmap {
    type Output = u8;
    fn index(&self, index: (usize, usize)) -> &u8 {
        assert!(index.0 < self.width, "request {} >= {} width :: index", index.0, self.width);
        assert!(index.1 < self.height, "request {} >= {} height :: index", index.1, self.height);
        &self.data[index.1 * self.width + index.0]
    }
}

impl Device for Bitmap {
    type Color = u8;
    fn fill_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32, color: &u8) -> Result<()> {
        for j in y .. y.saturating_add(h) {
            self.span(x, x.saturating_add(w), j, *color, None);
        }
        Ok(())
    }
    fn fill_rectangle_rop(&mut self, x: i32, y: i32, w: i32, h: i32, color: &u8, lop: LogicalOp) -> Result<()> {
        for j in y .. y.saturating_add(h) {
            self.span(x, x.saturating_add(w), j, *color, Some(lop));
        }
        Ok(())
    }
    fn fill_trapezoid(&mut self, left: &FixedEdge, right: &FixedEdge, ytop: Fixed, ybottom: Fixed,
                      color: &u8, lop: Option<LogicalOp>) -> Result<()> {
        let value = *color;
        trapezoid_rows(left, right, ytop, ybottom, |y, x0, x1| {
            self.span(x0, x1, y, value, lop);
            Ok(())
        })
    }
    fn max_fill_band(&self) -> i32 {
        self.band
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangles_clip_to_bitmap() {
        let mut b = Bitmap::new(5, 5);
        b.fill_rectangle(-2, -2, 4, 4, &9).unwrap();
        assert_eq!(b.filled(), 4);
        assert_eq!(b[(1, 1)], 9);
        assert_eq!(b[(2, 2)], 0);
        b.fill_rectangle(4, 4, 10, 10, &1).unwrap();
        assert_eq!(b.filled(), 5);
    }

    #[test]
    fn rop_xor_twice_restores() {
        let mut b = Bitmap::new(2, 1);
        b.fill_rectangle(0, 0, 2, 1, &0b1010_1010).unwrap();
        b.fill_rectangle_rop(0, 0, 1, 1, &0xff, LogicalOp::XOR).unwrap();
        assert_eq!(b[(0, 0)], 0b0101_0101);
        b.fill_rectangle_rop(0, 0, 1, 1, &0xff, LogicalOp::XOR).unwrap();
        assert_eq!(b[(0, 0)], 0b1010_1010);
        assert_eq!(b.hits(0, 0), 3);
        assert_eq!(b.max_hits(), 3);
    }

    #[test]
    fn diff_sizes() {
        let a = Bitmap::new(2, 2);
        let mut b = Bitmap::new(2, 2);
        assert!(a.diff(&b).is_empty());
        b.fill_rectangle(1, 0, 1, 1, &3).unwrap();
        assert_eq!(a.diff(&b), vec![(1, 0)]);
        assert_eq!(a.diff(&Bitmap::new(3, 1)).len(), 6);
    }
}
