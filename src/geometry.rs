//! Geometry Module
//! Plane points, line segments and top-left anchored rectangles shared by the
//! run files, the scene layout and the planner.

use serde::{Deserialize, Serialize};

/// A position in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Move at most `max_step` toward `goal`.
    ///
    /// Returns `goal` itself when it is already within reach.
    pub fn move_towards(&self, goal: &Point, max_step: f64) -> Point {
        let dist = self.distance(goal);
        if dist <= max_step {
            return *goal;
        }
        let t = max_step / dist;
        Point::new(self.x + t * (goal.x - self.x), self.y + t * (goal.y - self.y))
    }
}

/// A closed line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Parametric intersection test.
    ///
    /// Both segment parameters must fall in `[0, 1]`. Parallel (and collinear)
    /// segments are reported as not intersecting.
    pub fn intersects(&self, other: &Segment) -> bool {
        let (x1, y1) = (self.start.x, self.start.y);
        let (x2, y2) = (self.end.x, self.end.y);
        let (x3, y3) = (other.start.x, other.start.y);
        let (x4, y4) = (other.end.x, other.end.y);

        let denom = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
        if denom.abs() < f64::EPSILON {
            return false;
        }

        let ua = ((x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3)) / denom;
        let ub = ((x2 - x1) * (y1 - y3) - (y2 - y1) * (x1 - x3)) / denom;

        (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
///
/// `(x, y)` is the top-left corner; the rectangle extends `width` to the
/// right and `height` downward, covering `[x, x + width] × [y - height, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y - self.height
    }

    /// Closed containment test (points on the boundary are inside).
    pub fn contains(&self, p: &Point) -> bool {
        let x_check = p.x >= self.left() && p.x <= self.right();
        let y_check = p.y <= self.top() && p.y >= self.bottom();
        x_check && y_check
    }

    /// The four corners: top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left(), self.top()),
            Point::new(self.right(), self.top()),
            Point::new(self.left(), self.bottom()),
            Point::new(self.right(), self.bottom()),
        ]
    }

    pub fn edges(&self) -> [Segment; 4] {
        let [tl, tr, bl, br] = self.corners();
        [
            Segment::new(tl, tr),
            Segment::new(tl, bl),
            Segment::new(tr, br),
            Segment::new(bl, br),
        ]
    }

    /// Whether `segment` crosses any of the four edges.
    pub fn crossed_by(&self, segment: &Segment) -> bool {
        self.edges().iter().any(|edge| segment.intersects(edge))
    }
}
