//! Clipping Region

use crate::fixed::Fixed;
use crate::fixed::fixed2int;
use crate::fixed::fixed_ceil;

/// Rectangle
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Rectangle<T: std::cmp::PartialOrd + Copy> {
    /// Minimum x value
    pub x1: T,
    /// Minimum y value
    pub y1: T,
    /// Maximum x value
    pub x2: T,
    /// Maximum y value
    pub y2: T,
}

impl<T> Rectangle<T> where T: std::cmp::PartialOrd + Copy {
    /// Create a new Rectangle
    ///
    /// Values are sorted before storing
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        let (x1, x2) = if x1 > x2 { (x2,x1) } else { (x1,x2) };
        let (y1, y2) = if y1 > y2 { (y2,y1) } else { (y1,y2) };
        Self { x1,y1,x2,y2 }
    }
    /// Rectangle containing only the point (x,y)
    pub fn at(x: T, y: T) -> Self {
        Self { x1: x, y1: y, x2: x, y2: y }
    }
    /// Expand if the point (x,y) is outside
    pub fn expand(&mut self, x: T, y: T) {
        if x < self.x1 { self.x1 = x; }
        if x > self.x2 { self.x2 = x; }
        if y < self.y1 { self.y1 = y; }
        if y > self.y2 { self.y2 = y; }
    }
    /// Expand if the rectangle is outside
    pub fn expand_rect(&mut self, r: &Rectangle<T>) {
        self.expand(r.x1, r.y1);
        self.expand(r.x2, r.y2);
    }
    /// Overlap of two rectangles
    ///
    /// The result may be inverted (x1 > x2 or y1 > y2) when they do not meet
    pub fn intersect(&self, r: &Rectangle<T>) -> Self {
        let pick_max = |a: T, b: T| if a > b { a } else { b };
        let pick_min = |a: T, b: T| if a < b { a } else { b };
        Self {
            x1: pick_max(self.x1, r.x1),
            y1: pick_max(self.y1, r.y1),
            x2: pick_min(self.x2, r.x2),
            y2: pick_min(self.y2, r.y2),
        }
    }
    /// Rectangle is inverted in either direction
    pub fn is_inverted(&self) -> bool {
        self.x1 > self.x2 || self.y1 > self.y2
    }
}

/// Clip rectangle in fixed device coordinates
pub type ClipRect = Rectangle<Fixed>;

impl Rectangle<Fixed> {
    /// Device rows touched by the clip, `[floor(y1), ceil(y2))`
    pub fn pixel_rows(&self) -> (i32, i32) {
        (fixed2int(self.y1), fixed_ceil(self.y2))
    }
    /// Device columns touched by the clip, `[floor(x1), ceil(x2))`
    pub fn pixel_cols(&self) -> (i32, i32) {
        (fixed2int(self.x1), fixed_ceil(self.x2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sorts() {
        let r = Rectangle::new(10, 20, 0, 5);
        assert_eq!(r, Rectangle { x1: 0, y1: 5, x2: 10, y2: 20 });
    }

    #[test]
    fn intersect() {
        let a = Rectangle::new(0, 0, 10, 10);
        let b = Rectangle::new(5, -5, 20, 7);
        assert_eq!(a.intersect(&b), Rectangle::new(5, 0, 10, 7));
        let c = Rectangle::new(11, 0, 12, 1);
        assert!(a.intersect(&c).is_inverted());
    }

    #[test]
    fn pixel_extent() {
        let r = Rectangle::new(-1, 256, 513, 1024);
        assert_eq!(r.pixel_cols(), (-1, 3));
        assert_eq!(r.pixel_rows(), (1, 4));
    }
}
