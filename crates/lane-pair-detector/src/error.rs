use lane_pair_core::{FrameSizeError, ImageViewError};

/// Errors returned by the lane detector.
///
/// A frame without lanes is not an error; see `LaneFrame::lanes_found`.
#[derive(thiserror::Error, Debug)]
pub enum LaneDetectError {
    #[error(transparent)]
    Frame(#[from] FrameSizeError),
    #[error(transparent)]
    Image(#[from] ImageViewError),
    #[error("luminance source is {width}x{height}, detector frame is {frame_width}x{frame_height}")]
    ImageSizeMismatch {
        width: usize,
        height: usize,
        frame_width: u32,
        frame_height: u32,
    },
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParams {
        name: &'static str,
        reason: &'static str,
    },
}
