//! Perception model: a noisy, biased read of a true skill value that sharpens with
//! observation time. Shared by self-assessment and by evaluators scoring candidates.

use rand::distributions::Distribution;
use rand::Rng;
use serde::Serialize;
use statrs::distribution::Normal;

use crate::config::Settings;

pub const SCORE_MIN: i32 = 1;
pub const SCORE_MAX: i32 = 100;

/// Clamp any integer score into `[SCORE_MIN, SCORE_MAX]`.
pub fn clamp_score(score: i64) -> i32 {
    score.clamp(i64::from(SCORE_MIN), i64::from(SCORE_MAX)) as i32
}

/// Immutable per-engineer perception parameters.
///
/// Out-of-range inputs are clamped at construction: true skill into `[1, 100]`,
/// noise scales to `>= 0`. Biases may take any sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerceptionParams {
    true_skill: i32,
    own_noise_scale: f64,
    own_bias: f64,
    eval_noise_scale: f64,
    eval_bias: f64,
}

impl PerceptionParams {
    pub fn new(
        true_skill: i32,
        own_noise_scale: f64,
        own_bias: f64,
        eval_noise_scale: f64,
        eval_bias: f64,
    ) -> Self {
        Self {
            true_skill: clamp_score(i64::from(true_skill)),
            own_noise_scale: non_negative(own_noise_scale),
            own_bias: finite_or_zero(own_bias),
            eval_noise_scale: non_negative(eval_noise_scale),
            eval_bias: finite_or_zero(eval_bias),
        }
    }

    pub fn true_skill(&self) -> i32 {
        self.true_skill
    }

    pub fn own_noise_scale(&self) -> f64 {
        self.own_noise_scale
    }

    pub fn own_bias(&self) -> f64 {
        self.own_bias
    }

    pub fn eval_noise_scale(&self) -> f64 {
        self.eval_noise_scale
    }

    pub fn eval_bias(&self) -> f64 {
        self.eval_bias
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Draw from `N(mean, std_dev)`. A zero, negative or non-finite deviation yields `mean`.
pub fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    if !(std_dev.is_finite() && std_dev > 0.0) {
        return mean;
    }
    Normal::new(mean, std_dev)
        .map(|normal| normal.sample(rng))
        .unwrap_or(mean)
}

/// Estimate `true_value` after observing it for `duration` hours.
///
/// The duration is clamped into the configured interview bounds. Both the noise
/// deviation (`noise_scale / duration`) and the bias (`bias / duration`) shrink as
/// the observation gets longer. The estimate is truncated toward zero and clamped
/// into `[1, 100]`.
pub fn estimate_skill<R: Rng + ?Sized>(
    true_value: f64,
    noise_scale: f64,
    bias: f64,
    duration: f64,
    settings: &Settings,
    rng: &mut R,
) -> i32 {
    let duration = settings.clamp_duration(duration);
    let noise = sample_normal(rng, 0.0, noise_scale / duration);
    let estimate = true_value + noise + bias / duration;
    // `as` saturates at the i64 range and maps NaN to 0.
    clamp_score(estimate as i64)
}
