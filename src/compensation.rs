//! Skill score to compensation mapping.
//!
//! Piecewise linear through the percentile anchors up to score 90, then a quadratic
//! blend from the 90th percentile towards the maximum (diminishing returns).

use serde::Serialize;

use crate::config::Settings;
use crate::model::clamp_score;

/// Offer adjustments are clamped into this range.
pub const MIN_ADJUSTMENT: f64 = -0.5;
pub const MAX_ADJUSTMENT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompensationCurve {
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub p90: f64,
    pub max: f64,
}

impl CompensationCurve {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            min: settings.min_compensation,
            p25: settings.p25_compensation,
            median: settings.median_compensation,
            p75: settings.p75_compensation,
            p90: settings.p90_compensation,
            max: settings.max_compensation,
        }
    }

    /// Compensation for a score; scores outside `[1, 100]` are clamped.
    pub fn map_skill_to_compensation(&self, score: i32) -> f64 {
        let score = clamp_score(i64::from(score));
        let x = f64::from(score);
        match score {
            1..=25 => linear_interpolation(x, 1.0, 25.0, self.min, self.p25),
            26..=50 => linear_interpolation(x, 25.0, 50.0, self.p25, self.median),
            51..=75 => linear_interpolation(x, 50.0, 75.0, self.median, self.p75),
            76..=90 => linear_interpolation(x, 75.0, 90.0, self.p75, self.p90),
            _ => {
                let fraction = (x - 90.0) / 10.0;
                self.p90 + (self.max - self.p90) * fraction.powi(2)
            }
        }
    }

    /// `map_skill_to_compensation(score) * (1 + adjustment)`, never negative.
    /// The adjustment is clamped into `[-0.5, 5]`.
    pub fn make_offer(&self, score: i32, adjustment: f64) -> f64 {
        let adjustment = if adjustment.is_nan() {
            0.0
        } else {
            adjustment.clamp(MIN_ADJUSTMENT, MAX_ADJUSTMENT)
        };
        (self.map_skill_to_compensation(score) * (1.0 + adjustment)).max(0.0)
    }

    /// Offer for a fractional score such as an interview mean, truncated toward zero.
    pub fn make_offer_for_mean(&self, mean_score: f64, adjustment: f64) -> f64 {
        self.make_offer(clamp_score(mean_score as i64), adjustment)
    }
}

impl Default for CompensationCurve {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Straight line through `(x1, y1)` and `(x2, y2)` evaluated at `x`.
pub fn linear_interpolation(x: f64, x1: f64, x2: f64, y1: f64, y2: f64) -> f64 {
    y1 + (y2 - y1) * (x - x1) / (x2 - x1)
}
