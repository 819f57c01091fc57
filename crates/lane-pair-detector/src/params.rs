use lane_pair_core::{FrameSize, Point};
use serde::{Deserialize, Serialize};

use crate::error::LaneDetectError;

/// Calibrated thresholds of the lane-pair heuristic.
///
/// Defaults are the values the detector was tuned with on forward-facing
/// dash camera footage. Quantities derived from the frame size use integer
/// division of the pixel dimensions (`width / spread_divisor`, ...).
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LaneParams {
    /// Segments must be longer than `height / length_divisor` pixels.
    pub length_divisor: u32,

    /// A candidate is a duplicate of an accepted lane when
    /// `|da| * dedup_slope_weight + |db| < dedup_threshold`.
    pub dedup_threshold: f64,
    pub dedup_slope_weight: f64,

    /// Minimal intercept difference between the two candidates.
    pub min_intercept_gap: f64,

    /// Slopes with magnitude at or above this are treated as vertical.
    pub vertical_slope_threshold: f64,

    /// Frame-crossing centers must be further apart than
    /// `width / spread_divisor`.
    pub spread_divisor: u32,

    /// The vanishing point must lie outside the frame padded by
    /// `padding_factor * height` on every side.
    pub padding_factor: f64,

    /// The vanishing point row must be negative and closer than this.
    pub max_vanishing_distance: f64,

    /// Sampling lines sit `(width / brightness_offset_divisor) * sqrt(a^2 + 1)`
    /// intercept units away from the candidate, truncated to whole pixels.
    pub brightness_offset_divisor: u32,

    /// Number of samples taken along each sampling line.
    pub brightness_window: u32,

    /// Both candidates need at least this much contrast across the line.
    pub min_brightness_difference: f64,

    /// Contrast magnitudes of the two candidates must differ by less than this.
    pub max_brightness_mismatch: f64,

    /// Spread factor of the mean-brightness edge detector bounds.
    pub edge_sigma: f64,

    /// Row of the heading probe as a fraction of the frame height.
    pub reference_row_fraction: f64,
}

impl Default for LaneParams {
    fn default() -> Self {
        Self {
            length_divisor: 20,
            dedup_threshold: 20.0,
            dedup_slope_weight: 10.0,
            min_intercept_gap: 5.0,
            vertical_slope_threshold: 4.0,
            spread_divisor: 3,
            padding_factor: 0.5,
            max_vanishing_distance: 400.0,
            brightness_offset_divisor: 40,
            brightness_window: 20,
            min_brightness_difference: 15.0,
            max_brightness_mismatch: 20.0,
            edge_sigma: 0.33,
            reference_row_fraction: 0.5,
        }
    }
}

impl LaneParams {
    pub fn validate(&self) -> Result<(), LaneDetectError> {
        let divisors = [
            ("length_divisor", self.length_divisor),
            ("spread_divisor", self.spread_divisor),
            ("brightness_offset_divisor", self.brightness_offset_divisor),
        ];
        for (name, value) in divisors {
            if value == 0 {
                return Err(LaneDetectError::InvalidParams {
                    name,
                    reason: "must be non-zero",
                });
            }
        }
        if self.brightness_window == 0 {
            return Err(LaneDetectError::InvalidParams {
                name: "brightness_window",
                reason: "must sample at least one pixel",
            });
        }
        if !(0.0..=1.0).contains(&self.reference_row_fraction) {
            return Err(LaneDetectError::InvalidParams {
                name: "reference_row_fraction",
                reason: "must be within [0, 1]",
            });
        }
        Ok(())
    }

    /// Minimal segment length in pixels (exclusive).
    pub fn length_threshold(&self, frame: &FrameSize) -> u32 {
        frame.height / self.length_divisor
    }

    /// Minimal distance between the frame-crossing centers of a pair.
    pub fn spread_threshold(&self, frame: &FrameSize) -> f64 {
        (frame.width / self.spread_divisor) as f64
    }

    /// Padding around the frame that the vanishing point must leave.
    pub fn padding(&self, frame: &FrameSize) -> f64 {
        frame.height as f64 * self.padding_factor
    }

    /// Point the signed lane distances are measured from: top row,
    /// center column, i.e. `(height / 2, 0)` in the geometry frame.
    pub fn side_reference(&self, frame: &FrameSize) -> Point {
        Point::new((frame.height / 2) as f64, 0.0)
    }

    /// Rows at which heading deviation is probed: the reference row and
    /// half of it.
    pub fn probe_rows(&self, frame: &FrameSize) -> [f64; 2] {
        let row = frame.height as f64 * self.reference_row_fraction;
        [row, row * 0.5]
    }

    pub fn segment_hints(&self, frame: &FrameSize) -> SegmentDetectorHints {
        SegmentDetectorHints {
            min_line_length: self.length_threshold(frame),
            ..SegmentDetectorHints::default()
        }
    }
}

/// Probabilistic Hough settings the host application should use for its
/// external segment detector so that its output matches what the lane
/// heuristic was tuned on.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct SegmentDetectorHints {
    /// Distance resolution in pixels.
    pub rho: f64,
    /// Angle resolution in radians.
    pub theta: f64,
    /// Accumulator votes needed to report a segment.
    pub votes: u32,
    pub min_line_length: u32,
    pub max_line_gap: u32,
}

impl Default for SegmentDetectorHints {
    fn default() -> Self {
        Self {
            rho: 1.0,
            theta: std::f64::consts::PI / 180.0,
            votes: 30,
            min_line_length: 0,
            max_line_gap: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> FrameSize {
        FrameSize::new(650, 490).unwrap()
    }

    #[test]
    fn derived_thresholds_use_integer_division() {
        let p = LaneParams::default();
        let f = frame();
        assert_eq!(p.length_threshold(&f), 24);
        assert_eq!(p.spread_threshold(&f), 216.0);
        assert_eq!(p.padding(&f), 245.0);
        assert_eq!(p.side_reference(&f), Point::new(245.0, 0.0));
        assert_eq!(p.probe_rows(&f), [245.0, 122.5]);
        assert_eq!(p.segment_hints(&f).min_line_length, 24);
    }

    #[test]
    fn zero_divisors_are_rejected() {
        let p = LaneParams {
            spread_divisor: 0,
            ..LaneParams::default()
        };
        assert!(matches!(
            p.validate(),
            Err(LaneDetectError::InvalidParams {
                name: "spread_divisor",
                ..
            })
        ));
        assert!(LaneParams::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_calibrated_defaults() {
        let p: LaneParams = serde_json::from_str(r#"{ "max_vanishing_distance": 550.0 }"#).unwrap();
        assert_eq!(p.max_vanishing_distance, 550.0);
        assert_eq!(p.dedup_threshold, 20.0);
        assert_eq!(p.brightness_window, 20);
    }
}
