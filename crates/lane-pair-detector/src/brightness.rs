//! Contrast check across candidate lines.
//!
//! A painted marking edge separates bright paint from darker asphalt. For a
//! candidate line two short sampling lines are placed parallel to it, one on
//! each side, and their mean luminance is compared.

use lane_pair_core::{FrameSize, Line, LuminanceSource};
use log::trace;

use crate::params::LaneParams;

pub struct BrightnessValidator<'a, S: ?Sized> {
    frame: FrameSize,
    params: &'a LaneParams,
    source: &'a S,
}

impl<'a, S: LuminanceSource + ?Sized> BrightnessValidator<'a, S> {
    pub fn new(frame: FrameSize, params: &'a LaneParams, source: &'a S) -> Self {
        Self {
            frame,
            params,
            source,
        }
    }

    /// Intercept offset of the sampling lines, truncated to whole pixels.
    pub fn offset(&self, line: &Line) -> f64 {
        let base = (self.frame.width / self.params.brightness_offset_divisor) as f64;
        (base * (line.a * line.a + 1.0).sqrt()).trunc()
    }

    /// Sampling lines at `b + d` and `b - d`, both anchored at the center of
    /// `line`.
    pub fn sampling_lines(&self, line: &Line) -> (Line, Line) {
        let d = self.offset(line);
        let center = line.center();
        (
            Line::with_anchor(line.a, line.b + d, center, &self.frame),
            Line::with_anchor(line.a, line.b - d, center, &self.frame),
        )
    }

    /// Mean luminance along `line` around its center.
    ///
    /// Samples rows `center.x - window/2 .. center.x + window/2` in unit
    /// steps. Pixels outside the source are skipped; `None` when no sample
    /// landed inside.
    pub fn line_brightness(&self, line: &Line) -> Option<f64> {
        let center = line.center();
        let window = self.params.brightness_window;
        let start = center.x - (window / 2) as f64;

        let mut sum = 0.0;
        let mut samples = 0u32;
        for k in 0..window {
            let x = start + k as f64;
            let y = line.y(x);
            let (Some(row), Some(col)) = (round_half_up(x), round_half_up(y)) else {
                continue;
            };
            if let Some(v) = self.source.luminance(row, col) {
                sum += v as f64;
                samples += 1;
            }
        }

        (samples > 0).then(|| sum / samples as f64)
    }

    /// Luminance above the line minus luminance below it.
    pub fn difference_around_line(&self, line: &Line) -> Option<f64> {
        let (upper, lower) = self.sampling_lines(line);
        Some(self.line_brightness(&upper)? - self.line_brightness(&lower)?)
    }

    /// Both lines show strong and similar contrast.
    ///
    /// Lines without brightness data never qualify.
    pub fn qualifies(&self, l1: &Line, l2: &Line) -> bool {
        let (Some(d1), Some(d2)) = (
            self.difference_around_line(l1),
            self.difference_around_line(l2),
        ) else {
            trace!("brightness: no samples inside the frame");
            return false;
        };
        let (d1, d2) = (d1.abs(), d2.abs());
        let min = self.params.min_brightness_difference;
        let ok = d1 > min && d2 > min && (d1 - d2).abs() < self.params.max_brightness_mismatch;
        if !ok {
            trace!("brightness: |d1|={d1:.1} |d2|={d2:.1}");
        }
        ok
    }
}

/// Pixel index nearest to `v`, halves rounding up.
fn round_half_up(v: f64) -> Option<i64> {
    v.is_finite().then(|| (v + 0.5).floor() as i64)
}
