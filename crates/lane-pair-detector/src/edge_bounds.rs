//! Hysteresis bounds for the host application's edge detector.
//!
//! The bounds come from a mean-brightness heuristic:
//! `lower = max(0, (1 - sigma) * mean)`, `upper = min(255, (1 + sigma) * mean)`.
//! The Otsu threshold of the grayscale frame is computed alongside and
//! reported, but it does not feed the bounds. Which of the two the edge
//! detector was meant to use is unresolved, so both are exposed unchanged.

use lane_pair_core::{otsu_threshold, GrayImageView};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeBounds {
    pub lower: f64,
    pub upper: f64,
    /// Otsu threshold of the grayscale frame (informational).
    pub otsu: u8,
}

impl EdgeBounds {
    pub fn from_mean(mean: f64, sigma: f64, otsu: u8) -> Self {
        Self {
            lower: ((1.0 - sigma) * mean).max(0.0),
            upper: ((1.0 + sigma) * mean).min(255.0),
            otsu,
        }
    }

    /// Bounds for `gray`.
    ///
    /// `channel_mean` overrides the brightness the heuristic is based on,
    /// e.g. the mean of the first channel of the color frame; otherwise the
    /// grayscale mean is used. `None` for an empty frame.
    pub fn compute(
        gray: &GrayImageView<'_>,
        channel_mean: Option<f64>,
        sigma: f64,
    ) -> Option<Self> {
        let mean = match channel_mean {
            Some(m) => m,
            None => gray.mean()?,
        };
        let bounds = Self::from_mean(mean, sigma, otsu_threshold(gray));
        debug!(
            "edge bounds [{:.1}, {:.1}] from mean {mean:.1}, otsu {}",
            bounds.lower, bounds.upper, bounds.otsu
        );
        Some(bounds)
    }

    /// The `(otsu / 2, otsu)` pair an Otsu-driven edge detector would use.
    pub fn otsu_bounds(&self) -> (f64, f64) {
        let t = self.otsu as f64;
        (t / 2.0, t)
    }
}
