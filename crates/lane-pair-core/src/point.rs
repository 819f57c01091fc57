use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// 2D point in the lane geometry frame.
///
/// Coordinates follow the axis-swapped convention used across the
/// workspace: `x` is the image row and `y` is the image column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint of `p1` and `p2`.
    pub fn center(p1: Point, p2: Point) -> Self {
        Self::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0)
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.to_vector() - other.to_vector()).norm()
    }

    /// Same point with `x` and `y` exchanged.
    ///
    /// Converts between the `(row, col)` geometry frame and `(col, row)`
    /// image/drawing coordinates.
    pub fn axis_swapped(&self) -> Self {
        Self::new(self.y, self.x)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}
