//! Geometric core for lane-pair detection.
//!
//! Slope-intercept lines clipped to a camera frame, their intersections and
//! angle bisectors, plus grayscale sampling used to validate painted
//! markings. The crate does not detect segments itself.
//!
//! All geometry uses the axis-swapped convention: `x` is the image row and
//! `y` is the image column. Use [`Point::axis_swapped`] when handing points
//! to drawing code that expects `(col, row)`.

mod frame;
mod image;
mod line;
mod logger;
mod point;
mod threshold;

pub use frame::{FrameSize, FrameSizeError};
pub use image::{GrayImage, GrayImageView, ImageViewError, LuminanceSource};
pub use line::{clip_edges, Line};
pub use point::Point;
pub use threshold::{otsu_threshold, otsu_threshold_from_samples};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_filtered, init_with_level};
