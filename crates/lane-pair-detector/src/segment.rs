use lane_pair_core::{FrameSize, Line, Point};
use serde::{Deserialize, Serialize};

/// Raw segment reported by the external line detector, in the geometry
/// frame (`x` = row, `y` = column).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p1: Point,
    pub p2: Point,
}

impl Segment {
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// Build from a detector row `[x1, y1, x2, y2]` in image `(col, row)`
    /// order; the endpoints are axis-swapped into the geometry frame.
    pub fn from_detector(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(
            Point::new(x1, y1).axis_swapped(),
            Point::new(x2, y2).axis_swapped(),
        )
    }

    pub fn length(&self) -> f64 {
        self.p1.distance(&self.p2)
    }

    pub fn to_line(&self, frame: &FrameSize) -> Line {
        Line::from_points(self.p1, self.p2, frame)
    }
}
