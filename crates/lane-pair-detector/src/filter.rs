//! Heuristic deciding whether two detected lines form a lane pair.
//!
//! Gates run in a fixed order and the first failing one rejects the pair:
//!
//! 1. neither line duplicates a lane already accepted this frame,
//! 2. intercepts differ and neither line is near-vertical,
//! 3. the frame-crossing centers are spread across the frame,
//! 4. the lines meet outside the padded frame,
//! 5. that vanishing point lies above the frame within range,
//! 6. both lines sit on a similar light/dark boundary.
//!
//! Every gate is symmetric in its two lines. Parallel lines are not special
//! cased: their non-finite intersection fails gates 4 and 5.

use lane_pair_core::{FrameSize, Line, LuminanceSource, Point};
use log::trace;
use serde::Serialize;

use crate::brightness::BrightnessValidator;
use crate::params::LaneParams;
use crate::slots::LaneSlots;

/// Gate that rejected a candidate pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Duplicate,
    Shape,
    Spread,
    Convergence,
    VanishingRange,
    Brightness,
}

pub struct CandidateFilter<'a, S: ?Sized> {
    frame: FrameSize,
    params: &'a LaneParams,
    brightness: BrightnessValidator<'a, S>,
}

impl<'a, S: LuminanceSource + ?Sized> CandidateFilter<'a, S> {
    pub fn new(frame: FrameSize, params: &'a LaneParams, source: &'a S) -> Self {
        Self {
            frame,
            params,
            brightness: BrightnessValidator::new(frame, params, source),
        }
    }

    pub fn brightness(&self) -> &BrightnessValidator<'a, S> {
        &self.brightness
    }

    pub fn qualify_as_lanes(&self, l1: &Line, l2: &Line, accepted: &LaneSlots) -> bool {
        match self.evaluate(l1, l2, accepted) {
            Ok(()) => true,
            Err(gate) => {
                trace!(
                    "rejected ({:.3}, {:.1}) / ({:.3}, {:.1}): {gate:?}",
                    l1.a,
                    l1.b,
                    l2.a,
                    l2.b
                );
                false
            }
        }
    }

    /// Run all gates, reporting the first one that fails.
    pub fn evaluate(&self, l1: &Line, l2: &Line, accepted: &LaneSlots) -> Result<(), Rejection> {
        if accepted
            .accepted_lines()
            .any(|lane| self.is_duplicate(lane, l1) || self.is_duplicate(lane, l2))
        {
            return Err(Rejection::Duplicate);
        }
        if !self.shape_ok(l1, l2) {
            return Err(Rejection::Shape);
        }
        if !self.spread_ok(l1, l2) {
            return Err(Rejection::Spread);
        }
        let vanishing = Line::intersect(l1, l2);
        if !self.converges_outside_frame(&vanishing) {
            return Err(Rejection::Convergence);
        }
        if !self.vanishing_point_in_range(&vanishing) {
            return Err(Rejection::VanishingRange);
        }
        if !self.brightness.qualifies(l1, l2) {
            return Err(Rejection::Brightness);
        }
        Ok(())
    }

    /// `candidate` is numerically close to the already accepted `lane`.
    pub fn is_duplicate(&self, lane: &Line, candidate: &Line) -> bool {
        (lane.a - candidate.a).abs() * self.params.dedup_slope_weight
            + (lane.b - candidate.b).abs()
            < self.params.dedup_threshold
    }

    pub fn shape_ok(&self, l1: &Line, l2: &Line) -> bool {
        let vertical = self.params.vertical_slope_threshold;
        (l1.b - l2.b).abs() > self.params.min_intercept_gap
            && l1.a.abs() < vertical
            && l2.a.abs() < vertical
    }

    pub fn spread_ok(&self, l1: &Line, l2: &Line) -> bool {
        l1.edges_center().distance(&l2.edges_center()) > self.params.spread_threshold(&self.frame)
    }

    /// The intersection lies outside the frame grown by the padding.
    pub fn converges_outside_frame(&self, vanishing: &Point) -> bool {
        !self
            .frame
            .padded_contains(vanishing, self.params.padding(&self.frame))
    }

    /// The intersection is above the top row and not too far from it.
    pub fn vanishing_point_in_range(&self, vanishing: &Point) -> bool {
        vanishing.x < 0.0 && vanishing.x.abs() < self.params.max_vanishing_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::LanePair;
    use lane_pair_core::GrayImage;

    const W: usize = 640;
    const H: usize = 480;

    fn frame() -> FrameSize {
        FrameSize::new(W as u32, H as u32).unwrap()
    }

    /// Line through the vanishing point `(vx, vy)` and `(H, bottom_col)`.
    fn lane(vx: f64, vy: f64, bottom_col: f64) -> Line {
        Line::from_points(Point::new(vx, vy), Point::new(H as f64, bottom_col), &frame())
    }

    /// Bright 30 px stripe on the inner side of each lane line.
    fn painted(lanes: &[(Line, f64)]) -> GrayImage {
        let mut img = GrayImage::filled(W, H, 50);
        for row in 0..H {
            for col in 0..W {
                let c = col as f64;
                let inside = lanes.iter().any(|(l, dir)| {
                    let edge = l.y(row as f64);
                    let off = (c - edge) * dir;
                    off > 0.0 && off < 30.0
                });
                if inside {
                    *img.pixel_mut(row, col).unwrap() = 200;
                }
            }
        }
        img
    }

    /// Segment-backed lines that span rows 100..460.
    fn segment_of(l: &Line) -> Line {
        Line::from_points(Point::new(100.0, l.y(100.0)), Point::new(460.0, l.y(460.0)), &frame())
    }

    fn scene() -> (Line, Line, GrayImage) {
        let left = lane(-300.0, 320.0, 80.0);
        let right = lane(-300.0, 320.0, 560.0);
        let img = painted(&[(left, 1.0), (right, -1.0)]);
        (segment_of(&left), segment_of(&right), img)
    }

    #[test]
    fn accepts_converging_painted_pair() {
        let params = LaneParams::default();
        let (left, right, img) = scene();
        let filter = CandidateFilter::new(frame(), &params, &img);
        let slots = LaneSlots::default();
        assert_eq!(filter.evaluate(&left, &right, &slots), Ok(()));
        assert!(filter.qualify_as_lanes(&right, &left, &slots));
    }

    #[test]
    fn duplicates_of_accepted_lanes_are_rejected() {
        let params = LaneParams::default();
        let (left, right, img) = scene();
        let filter = CandidateFilter::new(frame(), &params, &img);
        let mut slots = LaneSlots::default();
        slots.fill(0, LanePair::assign(left, right, &Point::new(240.0, 0.0)));

        let mut nudged = left;
        nudged.b += 5.0;
        assert!(filter.is_duplicate(&left, &nudged));
        assert_eq!(filter.evaluate(&nudged, &right, &slots), Err(Rejection::Duplicate));

        let far = lane(-350.0, 320.0, 20.0);
        assert!(!filter.is_duplicate(&left, &far));
    }

    #[test]
    fn shape_gate_rejects_steep_and_equal_intercepts() {
        let params = LaneParams::default();
        let img = GrayImage::filled(W, H, 0);
        let filter = CandidateFilter::new(frame(), &params, &img);
        let f = frame();
        let gentle = Line::from_slope_intercept(0.3, 100.0, &f);
        let steep = Line::from_slope_intercept(4.0, 400.0, &f);
        let close = Line::from_slope_intercept(-0.3, 104.0, &f);
        assert!(!filter.shape_ok(&gentle, &steep));
        assert!(!filter.shape_ok(&gentle, &close));
        assert_eq!(
            filter.evaluate(&gentle, &close, &LaneSlots::default()),
            Err(Rejection::Shape)
        );
    }

    #[test]
    fn nearby_fragments_fail_spread() {
        let params = LaneParams::default();
        let img = GrayImage::filled(W, H, 0);
        let filter = CandidateFilter::new(frame(), &params, &img);
        let a = lane(-300.0, 320.0, 80.0);
        let b = lane(-300.0, 320.0, 200.0);
        assert_eq!(
            filter.evaluate(&a, &b, &LaneSlots::default()),
            Err(Rejection::Spread)
        );
    }

    #[test]
    fn intersection_inside_padded_frame_is_always_rejected() {
        let params = LaneParams::default();
        let (_, _, img) = scene();
        let filter = CandidateFilter::new(frame(), &params, &img);
        let f = frame();
        // both cross the frame center (240, 320)
        let l1 = Line::from_slope_intercept(2.0, -160.0, &f);
        let l2 = Line::from_slope_intercept(-2.0, 800.0, &f);
        let vanishing = Line::intersect(&l1, &l2);
        assert_eq!(vanishing, Point::new(240.0, 320.0));
        assert!(!filter.converges_outside_frame(&vanishing));
        assert!(!filter.qualify_as_lanes(&l1, &l2, &LaneSlots::default()));

        // lanes converging just below the padded bottom edge stay rejected
        let below_l = lane(700.0, 320.0, 0.0);
        let below_r = lane(700.0, 320.0, 640.0);
        assert!(!filter.qualify_as_lanes(&below_l, &below_r, &LaneSlots::default()));
    }

    #[test]
    fn vanishing_point_must_be_above_and_near() {
        let params = LaneParams::default();
        let img = GrayImage::filled(W, H, 0);
        let filter = CandidateFilter::new(frame(), &params, &img);
        assert!(filter.vanishing_point_in_range(&Point::new(-300.0, 320.0)));
        assert!(!filter.vanishing_point_in_range(&Point::new(-450.0, 320.0)));
        assert!(!filter.vanishing_point_in_range(&Point::new(900.0, 320.0)));
        assert!(!filter.vanishing_point_in_range(&Point::new(f64::NEG_INFINITY, 0.0)));

        let far_l = lane(-500.0, 320.0, 60.0);
        let far_r = lane(-500.0, 320.0, 580.0);
        assert_eq!(
            filter.evaluate(&far_l, &far_r, &LaneSlots::default()),
            Err(Rejection::VanishingRange)
        );
    }

    #[test]
    fn parallel_lines_fall_through_to_rejection() {
        let params = LaneParams::default();
        let img = GrayImage::filled(W, H, 0);
        let filter = CandidateFilter::new(frame(), &params, &img);
        let f = frame();
        let l1 = Line::from_slope_intercept(0.2, 50.0, &f);
        let l2 = Line::from_slope_intercept(0.2, 500.0, &f);
        assert!(!filter.qualify_as_lanes(&l1, &l2, &LaneSlots::default()));
    }

    #[test]
    fn unpainted_pair_fails_brightness() {
        let params = LaneParams::default();
        let (left, right, _) = scene();
        let img = GrayImage::filled(W, H, 120);
        let filter = CandidateFilter::new(frame(), &params, &img);
        assert_eq!(
            filter.evaluate(&left, &right, &LaneSlots::default()),
            Err(Rejection::Brightness)
        );
    }

    #[test]
    fn qualification_is_order_independent() {
        let params = LaneParams::default();
        let (left, right, img) = scene();
        let filter = CandidateFilter::new(frame(), &params, &img);
        let f = frame();
        let candidates = [
            left,
            right,
            lane(-320.0, 300.0, 40.0),
            lane(-250.0, 330.0, 610.0),
            Line::from_slope_intercept(2.0, -160.0, &f),
            Line::from_slope_intercept(0.2, 50.0, &f),
            Line::from_slope_intercept(0.2, 500.0, &f),
            Line::from_slope_intercept(5.0, 0.0, &f),
        ];
        let mut slots = LaneSlots::default();
        for pass in 0..2 {
            for l1 in &candidates {
                for l2 in &candidates {
                    assert_eq!(
                        filter.qualify_as_lanes(l1, l2, &slots),
                        filter.qualify_as_lanes(l2, l1, &slots),
                        "pass {pass}"
                    );
                }
            }
            slots.fill(0, LanePair::assign(left, right, &Point::new(240.0, 0.0)));
        }
    }
}
