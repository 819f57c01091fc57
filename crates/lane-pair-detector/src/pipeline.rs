//! Per-frame orchestration.
//!
//! Each call starts from an empty [`LaneFrame`] and walks the same stages:
//! ingest raw segments, build length-filtered lines, extract lane pairs,
//! compute one bisector per found pair. Nothing carries over between
//! frames; two detectors never share lane state.

use lane_pair_core::{FrameSize, GrayImageView, Line, LuminanceSource, Point};
use log::debug;
use serde::Serialize;

use crate::brightness::BrightnessValidator;
use crate::edge_bounds::EdgeBounds;
use crate::error::LaneDetectError;
use crate::extractor::extract_lanes;
use crate::filter::CandidateFilter;
use crate::params::{LaneParams, SegmentDetectorHints};
use crate::segment::Segment;
use crate::slots::{LanePair, LaneSlots, Side, SLOT_COUNT};

/// Lanes, bisectors and filtered lines of one processed frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LaneFrame {
    pub frame: FrameSize,
    pub slots: LaneSlots,
    pub bisectors: [Option<Line>; SLOT_COUNT],
    /// Lines that passed the length filter, in detection order.
    pub lines: Vec<Line>,
}

impl LaneFrame {
    pub fn empty(frame: FrameSize) -> Self {
        Self {
            frame,
            slots: LaneSlots::default(),
            bisectors: [None; SLOT_COUNT],
            lines: Vec::new(),
        }
    }

    pub fn lanes_found(&self, index: usize) -> bool {
        self.slots.lanes_found(index)
    }

    pub fn lane(&self, side: Side, index: usize) -> Option<&Line> {
        self.slots.lane(side, index)
    }

    pub fn pair(&self, index: usize) -> Option<&LanePair> {
        self.slots.get(index)
    }

    pub fn bisector(&self, index: usize) -> Option<&Line> {
        self.bisectors.get(index).and_then(Option::as_ref)
    }

    pub fn bisectors(&self) -> &[Option<Line>; SLOT_COUNT] {
        &self.bisectors
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Signed column offset of slot `index`'s bisector from the frame's
    /// center column at `row`. Positive when the bisector is right of center.
    pub fn deviation_at(&self, index: usize, row: f64) -> Option<f64> {
        let bisector = self.bisector(index)?;
        Some(bisector.y(row) - (self.frame.width / 2) as f64)
    }
}

/// Lane-pair detector for a fixed camera frame size.
pub struct LaneDetector {
    frame: FrameSize,
    params: LaneParams,
    state: LaneFrame,
}

impl LaneDetector {
    pub fn new(frame: FrameSize, params: LaneParams) -> Result<Self, LaneDetectError> {
        params.validate()?;
        Ok(Self {
            frame,
            params,
            state: LaneFrame::empty(frame),
        })
    }

    /// Detector for a `width` x `height` frame with the calibrated defaults.
    pub fn with_size(width: u32, height: u32) -> Result<Self, LaneDetectError> {
        Self::new(FrameSize::new(width, height)?, LaneParams::default())
    }

    pub fn frame(&self) -> FrameSize {
        self.frame
    }

    pub fn params(&self) -> &LaneParams {
        &self.params
    }

    pub fn length_threshold(&self) -> u32 {
        self.params.length_threshold(&self.frame)
    }

    pub fn segment_hints(&self) -> SegmentDetectorHints {
        self.params.segment_hints(&self.frame)
    }

    pub fn edge_bounds(
        &self,
        gray: &GrayImageView<'_>,
        channel_mean: Option<f64>,
    ) -> Option<EdgeBounds> {
        EdgeBounds::compute(gray, channel_mean, self.params.edge_sigma)
    }

    /// Lines whose originating segment is longer than the length threshold.
    pub fn build_lines(&self, segments: &[Segment]) -> Vec<Line> {
        let threshold = self.length_threshold() as f64;
        segments
            .iter()
            .map(|s| s.to_line(&self.frame))
            .filter(|l| l.length() > threshold)
            .collect()
    }

    /// Run the candidate filter against the lanes in `accepted`.
    pub fn qualify_as_lanes<S: LuminanceSource + ?Sized>(
        &self,
        l1: &Line,
        l2: &Line,
        accepted: &LaneSlots,
        image: &S,
    ) -> bool {
        CandidateFilter::new(self.frame, &self.params, image).qualify_as_lanes(l1, l2, accepted)
    }

    pub fn brightness_difference_around_line<S: LuminanceSource + ?Sized>(
        &self,
        line: &Line,
        image: &S,
    ) -> Option<f64> {
        BrightnessValidator::new(self.frame, &self.params, image).difference_around_line(line)
    }

    pub fn brightness_difference_qualifies<S: LuminanceSource + ?Sized>(
        &self,
        l1: &Line,
        l2: &Line,
        image: &S,
    ) -> bool {
        BrightnessValidator::new(self.frame, &self.params, image).qualifies(l1, l2)
    }

    /// Process one frame without touching the detector's stored state.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip_all, fields(segments = segments.len()))
    )]
    pub fn detect<S: LuminanceSource + ?Sized>(
        &self,
        segments: &[Segment],
        image: &S,
    ) -> Result<LaneFrame, LaneDetectError> {
        self.check_source(image)?;
        let mut out = LaneFrame::empty(self.frame);

        out.lines = self.build_lines(segments);
        debug!(
            "{} of {} segments longer than {} px",
            out.lines.len(),
            segments.len(),
            self.length_threshold()
        );

        let filter = CandidateFilter::new(self.frame, &self.params, image);
        let reference = self.side_reference();
        let found = extract_lanes(&out.lines, &reference, &mut out.slots, |l1, l2, slots| {
            filter.qualify_as_lanes(l1, l2, slots)
        });
        debug!("{found} lane pair(s) found");

        for (index, pair) in out.slots.iter().enumerate() {
            let Some(pair) = pair else {
                continue;
            };
            let bisector = Line::angle_bisector(&pair.left, &pair.right, &self.frame);
            self.log_contrast(index, pair, &bisector, filter.brightness());
            out.bisectors[index] = Some(bisector);
        }

        Ok(out)
    }

    /// Process one frame and keep its result as the detector's current
    /// state. The previous frame's lanes are dropped first, also on error.
    pub fn process_frame<S: LuminanceSource + ?Sized>(
        &mut self,
        segments: &[Segment],
        image: &S,
    ) -> Result<&LaneFrame, LaneDetectError> {
        self.state = LaneFrame::empty(self.frame);
        self.state = self.detect(segments, image)?;
        Ok(&self.state)
    }

    /// [`process_frame`](Self::process_frame) over a row-major grayscale
    /// buffer of the detector's frame size.
    pub fn process_buffer(
        &mut self,
        segments: &[Segment],
        gray: &[u8],
    ) -> Result<&LaneFrame, LaneDetectError> {
        self.state = LaneFrame::empty(self.frame);
        let view = GrayImageView::new(self.frame.width as usize, self.frame.height as usize, gray)?;
        self.process_frame(segments, &view)
    }

    pub fn current(&self) -> &LaneFrame {
        &self.state
    }

    pub fn lanes_found(&self, index: usize) -> bool {
        self.state.lanes_found(index)
    }

    pub fn lane(&self, side: Side, index: usize) -> Option<&Line> {
        self.state.lane(side, index)
    }

    pub fn bisector(&self, index: usize) -> Option<&Line> {
        self.state.bisector(index)
    }

    pub fn bisectors(&self) -> &[Option<Line>; SLOT_COUNT] {
        self.state.bisectors()
    }

    pub fn lines(&self) -> &[Line] {
        self.state.lines()
    }

    fn side_reference(&self) -> Point {
        self.params.side_reference(&self.frame)
    }

    fn check_source<S: LuminanceSource + ?Sized>(&self, image: &S) -> Result<(), LaneDetectError> {
        match image.dimensions() {
            Some((width, height))
                if width != self.frame.width as usize || height != self.frame.height as usize =>
            {
                Err(LaneDetectError::ImageSizeMismatch {
                    width,
                    height,
                    frame_width: self.frame.width,
                    frame_height: self.frame.height,
                })
            }
            _ => Ok(()),
        }
    }

    fn log_contrast<S: LuminanceSource + ?Sized>(
        &self,
        index: usize,
        pair: &LanePair,
        bisector: &Line,
        brightness: &BrightnessValidator<'_, S>,
    ) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        debug!(
            "slot {index}: left={:?} right={:?} center={:?}",
            brightness.difference_around_line(&pair.left),
            brightness.difference_around_line(&pair.right),
            brightness.difference_around_line(bisector)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_pair_core::GrayImage;

    #[test]
    fn length_filter_is_strict() {
        let det = LaneDetector::with_size(640, 480).unwrap();
        assert_eq!(det.length_threshold(), 24);
        let segments = [
            Segment::new(Point::new(0.0, 0.0), Point::new(24.0, 0.0)),
            Segment::new(Point::new(0.0, 0.0), Point::new(0.0, 24.5)),
            Segment::new(Point::new(10.0, 10.0), Point::new(40.0, 50.0)),
        ];
        let lines = det.build_lines(&segments);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].point2, Point::new(40.0, 50.0));
    }

    #[test]
    fn mismatched_image_is_rejected() {
        let mut det = LaneDetector::with_size(640, 480).unwrap();
        let img = GrayImage::filled(480, 640, 0);
        let err = det.process_frame(&[], &img).unwrap_err();
        assert!(matches!(
            err,
            LaneDetectError::ImageSizeMismatch {
                width: 480,
                height: 640,
                ..
            }
        ));
        assert!(matches!(
            det.process_buffer(&[], &[0u8; 10]),
            Err(LaneDetectError::Image(_))
        ));
    }

    #[test]
    fn invalid_construction_fails() {
        assert!(matches!(
            LaneDetector::with_size(0, 480),
            Err(LaneDetectError::Frame(_))
        ));
        let params = LaneParams {
            length_divisor: 0,
            ..LaneParams::default()
        };
        let frame = FrameSize::new(640, 480).unwrap();
        assert!(LaneDetector::new(frame, params).is_err());
    }

    #[test]
    fn empty_frame_has_no_lanes() {
        let mut det = LaneDetector::with_size(64, 48).unwrap();
        let img = GrayImage::filled(64, 48, 10);
        let out = det.process_frame(&[], &img).unwrap();
        assert!(out.lines().is_empty());
        assert!(!out.lanes_found(0) && !out.lanes_found(1));
        assert_eq!(out.bisectors(), &[None, None]);
        assert_eq!(out.deviation_at(0, 10.0), None);
    }

    #[test]
    fn deviation_is_measured_from_center_column() {
        let frame = FrameSize::new(640, 480).unwrap();
        let mut out = LaneFrame::empty(frame);
        out.bisectors[1] = Some(Line::from_slope_intercept(0.1, 300.0, &frame));
        assert_eq!(out.deviation_at(1, 100.0), Some(-10.0));
        assert_eq!(out.deviation_at(0, 100.0), None);
    }
}
