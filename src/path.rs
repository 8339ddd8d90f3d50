//! Path Storage
//!
//! Paths are stored in fixed device coordinates as a list of subpaths.
//! Every subpath is implicitly closed when filled.
//!
//!     use scanc::Path;
//!     use scanc::fixed::int2fixed;
//!
//!     let mut path = Path::new();
//!     path.move_to(int2fixed(1), int2fixed(1));
//!     path.line_to(int2fixed(5), int2fixed(1));
//!     path.line_to(int2fixed(5), int2fixed(4));
//!     path.close_path();
//!
//!     let bbox = path.bounding_box().unwrap();
//!     assert_eq!((bbox.x1, bbox.y2), (int2fixed(1), int2fixed(4)));
//!

use crate::clip::Rectangle;
use crate::fixed::Fixed;

/// Point in fixed device coordinates
#[derive(Debug,Default,Copy,Clone,PartialEq,Eq)]
pub struct Point {
    pub x: Fixed,
    pub y: Fixed,
}

impl Point {
    pub fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }
}

/// Segment of a subpath, holding its end point
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum Segment {
    Line(Point),
    /// Invisible part of a dashed line
    Gap(Point),
    /// Visible part of a dashed line
    Dash(Point),
    /// Cubic Bezier with two control points
    Curve { c1: Point, c2: Point, end: Point },
}

impl Segment {
    /// End point of the segment
    pub fn end(&self) -> Point {
        match *self {
            Segment::Line(p) | Segment::Gap(p) | Segment::Dash(p) => p,
            Segment::Curve { end, .. } => end,
        }
    }
}

/// Geometry traced for a fill, segments reduced to lines and curves
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum Edge {
    Line(Point, Point),
    Curve(Point, Point, Point, Point),
}

/// Connected sequence of segments
#[derive(Debug,Clone,PartialEq)]
pub struct Subpath {
    start: Point,
    segments: Vec<Segment>,
    closed: bool,
}

impl Subpath {
    fn new(start: Point) -> Self {
        Self { start, segments: vec![], closed: false }
    }
    pub fn start(&self) -> Point {
        self.start
    }
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
    /// Subpath ended with an explicit close
    pub fn is_closed(&self) -> bool {
        self.closed
    }
    /// Last point of the subpath
    pub fn last(&self) -> Point {
        self.segments.last().map(|s| s.end()).unwrap_or(self.start)
    }
    /// Edges of the subpath, ending with the line back to the start
    ///
    /// The closing line is skipped when the subpath already ends on its start
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let start = self.start;
        let last = self.last();
        let close = if last != start { Some(Edge::Line(last, start)) } else { None };
        let mut p0 = start;
        self.segments.iter().map(move |s| {
            let e = match *s {
                Segment::Line(p) | Segment::Gap(p) | Segment::Dash(p) => Edge::Line(p0, p),
                Segment::Curve { c1, c2, end } => Edge::Curve(p0, c1, c2, end),
            };
            p0 = s.end();
            e
        }).chain(close)
    }
    /// Bounding box of all points, including curve control points
    pub fn bounding_box(&self) -> Rectangle<Fixed> {
        let mut r = Rectangle::at(self.start.x, self.start.y);
        for s in &self.segments {
            if let Segment::Curve { c1, c2, .. } = *s {
                r.expand(c1.x, c1.y);
                r.expand(c2.x, c2.y);
            }
            let p = s.end();
            r.expand(p.x, p.y);
        }
        r
    }
}

/// Path made of subpaths
#[derive(Debug,Default,Clone,PartialEq)]
pub struct Path {
    subpaths: Vec<Subpath>,
    /// Subpath receiving new segments
    open: bool,
    /// Current point
    current: Point,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn remove_all(&mut self) {
        self.subpaths.clear();
        self.open = false;
        self.current = Point::default();
    }
    /// Begin a new subpath at (x,y)
    pub fn move_to(&mut self, x: Fixed, y: Fixed) {
        let p = Point::new(x, y);
        if self.open {
            if let Some(sp) = self.subpaths.last_mut() {
                if sp.segments.is_empty() {
                    sp.start = p;
                    self.current = p;
                    return;
                }
            }
        }
        self.subpaths.push(Subpath::new(p));
        self.open = true;
        self.current = p;
    }
    fn push(&mut self, seg: Segment) {
        if !self.open {
            let p = self.current;
            self.subpaths.push(Subpath::new(p));
            self.open = true;
        }
        self.current = seg.end();
        if let Some(sp) = self.subpaths.last_mut() {
            sp.segments.push(seg);
        }
    }
    pub fn line_to(&mut self, x: Fixed, y: Fixed) {
        self.push(Segment::Line(Point::new(x, y)));
    }
    pub fn gap_to(&mut self, x: Fixed, y: Fixed) {
        self.push(Segment::Gap(Point::new(x, y)));
    }
    pub fn dash_to(&mut self, x: Fixed, y: Fixed) {
        self.push(Segment::Dash(Point::new(x, y)));
    }
    /// Cubic Bezier from the current point to (x3,y3)
    pub fn curve_to(&mut self, x1: Fixed, y1: Fixed, x2: Fixed, y2: Fixed, x3: Fixed, y3: Fixed) {
        self.push(Segment::Curve {
            c1: Point::new(x1, y1),
            c2: Point::new(x2, y2),
            end: Point::new(x3, y3),
        });
    }
    /// Close the current subpath; the current point returns to its start
    pub fn close_path(&mut self) {
        if !self.open {
            return;
        }
        if let Some(sp) = self.subpaths.last_mut() {
            sp.closed = true;
            self.current = sp.start;
        }
        self.open = false;
    }
    /// Add a closed axis aligned rectangle
    pub fn rect(&mut self, x1: Fixed, y1: Fixed, x2: Fixed, y2: Fixed) {
        self.move_to(x1, y1);
        self.line_to(x2, y1);
        self.line_to(x2, y2);
        self.line_to(x1, y2);
        self.close_path();
    }
    /// Add a closed polygon through `points`
    pub fn polygon(&mut self, points: &[(Fixed, Fixed)]) {
        let mut pts = points.iter();
        if let Some(&(x, y)) = pts.next() {
            self.move_to(x, y);
            for &(x, y) in pts {
                self.line_to(x, y);
            }
            self.close_path();
        }
    }
    /// Subpaths holding at least one segment
    pub fn subpaths(&self) -> impl Iterator<Item = &Subpath> {
        self.subpaths.iter().filter(|sp| !sp.segments.is_empty())
    }
    /// Total number of segments
    pub fn total_segments(&self) -> usize {
        self.subpaths.iter().map(|sp| sp.segments.len()).sum()
    }
    /// Bounding box of the subpaths holding segments
    pub fn bounding_box(&self) -> Option<Rectangle<Fixed>> {
        let mut boxes = self.subpaths().map(|sp| sp.bounding_box());
        let mut r = boxes.next()?;
        for b in boxes {
            r.expand_rect(&b);
        }
        Some(r)
    }
}
