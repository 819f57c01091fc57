//! Slope-intercept line model `y = a * x + b`.
//!
//! A [`Line`] keeps the segment it was built from (`point1`, `point2`) and
//! the two points where it crosses the frame boundary (`edge1`, `edge2`).
//! Lines with an infinite slope (constant row) are outside the model; any
//! operation on them yields non-finite values that callers must treat as
//! "no solution".

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{FrameSize, Point};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Slope.
    pub a: f64,
    /// Intercept.
    pub b: f64,
    pub point1: Point,
    pub point2: Point,
    pub edge1: Point,
    pub edge2: Point,
}

impl Line {
    /// Full-frame line; the segment endpoints are the frame crossings.
    pub fn from_slope_intercept(a: f64, b: f64, frame: &FrameSize) -> Self {
        let (edge1, edge2) = clip_edges(a, b, frame);
        Self {
            a,
            b,
            point1: edge1,
            point2: edge2,
            edge1,
            edge2,
        }
    }

    /// Line whose segment degenerates to `anchor`.
    ///
    /// Used for sampling lines that have no detected segment of their own;
    /// `center()` returns `anchor` and `length()` is zero.
    pub fn with_anchor(a: f64, b: f64, anchor: Point, frame: &FrameSize) -> Self {
        let (edge1, edge2) = clip_edges(a, b, frame);
        Self {
            a,
            b,
            point1: anchor,
            point2: anchor,
            edge1,
            edge2,
        }
    }

    /// Line through two segment endpoints.
    pub fn from_points(p1: Point, p2: Point, frame: &FrameSize) -> Self {
        let a = (p1.y - p2.y) / (p1.x - p2.x);
        let b = p1.y - a * p1.x;
        let (edge1, edge2) = clip_edges(a, b, frame);
        Self {
            a,
            b,
            point1: p1,
            point2: p2,
            edge1,
            edge2,
        }
    }

    #[inline]
    pub fn y(&self, x: f64) -> f64 {
        self.a * x + self.b
    }

    #[inline]
    pub fn x(&self, y: f64) -> f64 {
        (y - self.b) / self.a
    }

    /// Signed perpendicular distance from `p`.
    ///
    /// Positive when `p` lies on the side of larger `y`; the sign drives
    /// left/right lane assignment.
    pub fn distance_from_point(&self, p: &Point) -> f64 {
        (-self.a * p.x + p.y - self.b) / (self.a * self.a + 1.0).sqrt()
    }

    /// Length of the originating segment.
    pub fn length(&self) -> f64 {
        self.point1.distance(&self.point2)
    }

    pub fn center(&self) -> Point {
        Point::center(self.point1, self.point2)
    }

    /// Midpoint of the frame crossings, independent of the detected
    /// segment length.
    pub fn edges_center(&self) -> Point {
        Point::center(self.edge1, self.edge2)
    }

    /// Recompute the frame crossings, e.g. after changing `a` or `b`.
    pub fn calc_edges(&mut self, frame: &FrameSize) {
        let (edge1, edge2) = clip_edges(self.a, self.b, frame);
        self.edge1 = edge1;
        self.edge2 = edge2;
    }

    /// Perpendicular line through `p`.
    ///
    /// Requires `a != 0`: the normal of a constant-`y` line has an infinite
    /// slope, which this model cannot represent, and the returned line would
    /// carry non-finite coefficients.
    pub fn normal(&self, p: Point, frame: &FrameSize) -> Line {
        debug_assert!(self.a != 0.0, "normal() of a line with zero slope");
        let a = -1.0 / self.a;
        let b = -a * p.x + p.y;
        Line::from_slope_intercept(a, b, frame)
    }

    /// Unit-normalised implicit coefficients `(A, B, C)` of
    /// `A*x + B*y + C = 0`, with `A = -a`, `B = 1`, `C = -b`.
    pub fn implicit_normalized(&self) -> Vector3<f64> {
        let r = (self.a * self.a + 1.0).sqrt();
        Vector3::new(-self.a, 1.0, -self.b) / r
    }

    /// Intersection of two lines.
    ///
    /// Parallel lines produce a non-finite point. The result does not depend
    /// on argument order.
    pub fn intersect(l1: &Line, l2: &Line) -> Point {
        let (p, q) = if canonical_order(l1, l2) {
            (l1, l2)
        } else {
            (l2, l1)
        };
        let x = (p.b - q.b) / (q.a - p.a);
        let y = p.a * x + p.b;
        Point::new(x, y)
    }

    /// Angle bisector obtained by adding the unit normals of both lines.
    ///
    /// For `y = x` and `y = -x` this is `y = 0`, never the perpendicular
    /// alternative.
    pub fn angle_bisector(l1: &Line, l2: &Line, frame: &FrameSize) -> Line {
        let sum = l1.implicit_normalized() + l2.implicit_normalized();
        let a = -sum.x / sum.y;
        let b = -sum.z / sum.y;
        Line::from_slope_intercept(a, b, frame)
    }
}

/// `true` when `(l1.a, l1.b)` sorts before or equal to `(l2.a, l2.b)`.
fn canonical_order(l1: &Line, l2: &Line) -> bool {
    l1.a.total_cmp(&l2.a)
        .then(l1.b.total_cmp(&l2.b))
        .is_le()
}

/// Frame crossings of `y = a*x + b`.
///
/// The row boundaries (`x = 0`, `x = H`) are tried first, then the column
/// boundaries (`y = 0`, `y = W`), keeping the first two crossings inside the
/// clip rectangle. A slot with no valid crossing falls back to the raw
/// evaluation at `x = 0` (first) or `x = H` (second).
pub fn clip_edges(a: f64, b: f64, frame: &FrameSize) -> (Point, Point) {
    let h = frame.height as f64;
    let w = frame.width as f64;
    let eval_y = |x: f64| a * x + b;
    let eval_x = |y: f64| (y - b) / a;

    let mut edges: [Option<Point>; 2] = [None, None];
    let mut found = 0;

    let row_hits = [0.0, h].into_iter().map(|x| Point::new(x, eval_y(x)));
    let col_hits = [0.0, w].into_iter().map(|y| Point::new(eval_x(y), y));
    for p in row_hits.chain(col_hits) {
        if found == 2 {
            break;
        }
        if frame.clip_contains(&p) {
            edges[found] = Some(p);
            found += 1;
        }
    }

    let edge1 = edges[0].unwrap_or_else(|| Point::new(0.0, eval_y(0.0)));
    let edge2 = edges[1].unwrap_or_else(|| Point::new(h, eval_y(h)));
    (edge1, edge2)
}
