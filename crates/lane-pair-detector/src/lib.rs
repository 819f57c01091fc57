//! Road lane pair detector built on top of `lane-pair-core`.
//!
//! ## Quickstart
//!
//! ```
//! use lane_pair_core::GrayImage;
//! use lane_pair_detector::{LaneDetector, Segment, Side};
//!
//! let mut detector = LaneDetector::with_size(640, 480).unwrap();
//! let gray = GrayImage::filled(640, 480, 0);
//!
//! // detector rows in image (col, row) order
//! let segments = vec![Segment::from_detector(80.0, 470.0, 300.0, 30.0)];
//! let frame = detector.process_frame(&segments, &gray).unwrap();
//! println!("left lane: {:?}", frame.lane(Side::Left, 0));
//! ```
//!
//! Per frame:
//! 1. Drop all lanes and bisectors from the previous frame.
//! 2. Turn every raw segment into a slope-intercept line, keeping segments
//!    longer than `height / 20`.
//! 3. Scan line pairs in detection order; the first two pairs that pass the
//!    candidate filter fill lane slots 0 and 1.
//! 4. Split each accepted pair into LEFT/RIGHT by signed distance from the
//!    top-center reference point.
//! 5. Compute the angle bisector of every found pair.
//!
//! Geometry follows the axis-swapped convention of `lane-pair-core`: `x` is
//! the image row, `y` the image column.

mod brightness;
mod edge_bounds;
mod error;
mod extractor;
mod filter;
mod params;
mod pipeline;
mod segment;
mod slots;

pub use brightness::BrightnessValidator;
pub use edge_bounds::EdgeBounds;
pub use error::LaneDetectError;
pub use extractor::extract_lanes;
pub use filter::{CandidateFilter, Rejection};
pub use params::{LaneParams, SegmentDetectorHints};
pub use pipeline::{LaneDetector, LaneFrame};
pub use segment::Segment;
pub use slots::{LanePair, LaneSlots, Side, SLOT_COUNT};
