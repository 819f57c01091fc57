use serde::{Deserialize, Serialize};

use crate::Point;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSizeError {
    #[error("frame dimensions must be non-zero (width={width}, height={height})")]
    Empty { width: u32, height: u32 },
}

/// Dimensions of the camera frame in pixels.
///
/// In the geometry frame rows run along `x` (`0..=height`) and columns
/// along `y` (`0..=width`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Result<Self, FrameSizeError> {
        if width == 0 || height == 0 {
            return Err(FrameSizeError::Empty { width, height });
        }
        Ok(Self { width, height })
    }

    /// Whether `p` lies in the half-open clip rectangle
    /// `[0, height + 1) x [0, width + 1)`.
    ///
    /// Non-finite points are never inside.
    pub fn clip_contains(&self, p: &Point) -> bool {
        let rows = self.height as f64 + 1.0;
        let cols = self.width as f64 + 1.0;
        p.x >= 0.0 && p.x < rows && p.y >= 0.0 && p.y < cols
    }

    /// Whether `p` lies in the frame grown by `pad` on every side.
    pub fn padded_contains(&self, p: &Point, pad: f64) -> bool {
        let h = self.height as f64;
        let w = self.width as f64;
        !(p.x < -pad || p.x > h + pad || p.y < -pad || p.y > w + pad)
    }
}
