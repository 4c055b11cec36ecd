//! Engineers: the entities that get interviewed and that do the interviewing.

use rand::Rng;
use serde::Serialize;

use crate::config::Settings;
use crate::model::perception::{clamp_score, estimate_skill, sample_normal, PerceptionParams};

/// Population mean and spread of true skill.
pub const SKILL_MEAN: f64 = 50.0;
pub const SKILL_STD_DEV: f64 = 25.0;
/// Population mean and spread of estimation noise scales.
pub const NOISE_SCALE_MEAN: f64 = 10.0;
pub const NOISE_SCALE_STD_DEV: f64 = 3.0;
/// Estimation bias is centred on zero.
pub const BIAS_STD_DEV: f64 = 5.0;

/// `round(N(50, 25))` clamped into `[1, 100]`.
pub fn random_skill_score<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    let draw = sample_normal(rng, SKILL_MEAN, SKILL_STD_DEV).round();
    clamp_score(draw as i64)
}

/// `max(0, N(10, 3))`.
pub fn random_noise_scale<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    sample_normal(rng, NOISE_SCALE_MEAN, NOISE_SCALE_STD_DEV).max(0.0)
}

/// `N(0, 5)`.
pub fn random_bias<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    sample_normal(rng, 0.0, BIAS_STD_DEV)
}

impl PerceptionParams {
    /// Draw every parameter from the population distributions.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let true_skill = random_skill_score(rng);
        let own_noise_scale = random_noise_scale(rng);
        let own_bias = random_bias(rng);
        let eval_noise_scale = random_noise_scale(rng);
        let eval_bias = random_bias(rng);
        Self::new(true_skill, own_noise_scale, own_bias, eval_noise_scale, eval_bias)
    }

    /// Fixed skill and evaluation behaviour; self-estimation parameters are drawn at random.
    pub fn with_eval<R: Rng + ?Sized>(
        true_skill: i32,
        eval_noise_scale: f64,
        eval_bias: f64,
        rng: &mut R,
    ) -> Self {
        let own_noise_scale = random_noise_scale(rng);
        let own_bias = random_bias(rng);
        Self::new(true_skill, own_noise_scale, own_bias, eval_noise_scale, eval_bias)
    }
}

/// An engineer with a cached self-assessment. Acts as a candidate or as an evaluator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Engineer {
    params: PerceptionParams,
    self_perceived_skill: i32,
}

impl Engineer {
    /// Build an engineer and compute their self-perceived skill once, at the
    /// configured self-assessment duration.
    pub fn new<R: Rng + ?Sized>(params: PerceptionParams, settings: &Settings, rng: &mut R) -> Self {
        let self_perceived_skill = estimate_skill(
            f64::from(params.true_skill()),
            params.own_noise_scale(),
            params.own_bias(),
            settings.default_self_assessment_time,
            settings,
            rng,
        );
        Self {
            params,
            self_perceived_skill,
        }
    }

    /// A fresh engineer drawn from the population.
    pub fn random<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> Self {
        let params = PerceptionParams::random(rng);
        Self::new(params, settings, rng)
    }

    pub fn params(&self) -> &PerceptionParams {
        &self.params
    }

    pub fn true_skill(&self) -> i32 {
        self.params.true_skill()
    }

    pub fn self_perceived_skill(&self) -> i32 {
        self.self_perceived_skill
    }

    /// A fresh self-assessment over `duration`; does not touch the cached value.
    pub fn estimate_own_skill<R: Rng + ?Sized>(
        &self,
        duration: f64,
        settings: &Settings,
        rng: &mut R,
    ) -> i32 {
        estimate_skill(
            f64::from(self.params.true_skill()),
            self.params.own_noise_scale(),
            self.params.own_bias(),
            duration,
            settings,
            rng,
        )
    }

    /// Score `other` using this engineer's evaluation noise and bias.
    pub fn estimate_other_skill<R: Rng + ?Sized>(
        &self,
        other: &Engineer,
        duration: f64,
        settings: &Settings,
        rng: &mut R,
    ) -> i32 {
        estimate_skill(
            f64::from(other.true_skill()),
            self.params.eval_noise_scale(),
            self.params.eval_bias(),
            duration,
            settings,
            rng,
        )
    }

    /// This engineer's read of an arbitrary score, using evaluation noise and bias.
    pub fn estimate_value<R: Rng + ?Sized>(
        &self,
        value: f64,
        duration: f64,
        settings: &Settings,
        rng: &mut R,
    ) -> i32 {
        estimate_skill(
            value,
            self.params.eval_noise_scale(),
            self.params.eval_bias(),
            duration,
            settings,
            rng,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rng::SimRng;

    #[test]
    fn self_perceived_skill_uses_own_parameters() {
        let settings = Settings::default();
        let mut rng = SimRng::new(3);
        let engineer = Engineer::new(PerceptionParams::new(70, 0.0, -10.0, 0.0, 25.0), &settings, &mut rng);
        assert_eq!(engineer.self_perceived_skill(), 60);
        assert_eq!(engineer.true_skill(), 70);
    }

    #[test]
    fn fresh_self_assessment_uses_own_parameters_and_keeps_cached_value() {
        let settings = Settings::default();
        let mut rng = SimRng::new(3);
        let engineer = Engineer::new(PerceptionParams::new(70, 0.0, -10.0, 0.0, 25.0), &settings, &mut rng);
        // Own bias -10 over 2 hours is -5; the eval bias of +25 must not leak in.
        assert_eq!(engineer.estimate_own_skill(2.0, &settings, &mut rng), 65);
        assert_eq!(engineer.estimate_own_skill(0.5, &settings, &mut rng), 50);
        assert_eq!(engineer.self_perceived_skill(), 60);
    }

    #[test]
    fn fresh_self_assessments_vary_with_own_noise() {
        let settings = Settings::default();
        let mut rng = SimRng::new(12);
        let engineer = Engineer::new(PerceptionParams::new(50, 15.0, 0.0, 0.0, 0.0), &settings, &mut rng);
        let cached = engineer.self_perceived_skill();
        let draws: Vec<i32> = (0..20)
            .map(|_| engineer.estimate_own_skill(0.5, &settings, &mut rng))
            .collect();
        assert!(draws.iter().any(|&d| d != draws[0]));
        assert_eq!(engineer.self_perceived_skill(), cached);
    }

    #[test]
    fn other_skill_uses_evaluator_eval_parameters_and_candidate_true_skill() {
        let settings = Settings::default();
        let mut rng = SimRng::new(3);
        let evaluator = Engineer::new(PerceptionParams::new(90, 0.0, 30.0, 0.0, 4.0), &settings, &mut rng);
        let candidate = Engineer::new(PerceptionParams::new(40, 0.0, -30.0, 0.0, -30.0), &settings, &mut rng);
        assert_eq!(evaluator.estimate_other_skill(&candidate, 2.0, &settings, &mut rng), 42);
    }

    #[test]
    fn random_parameters_respect_population_bounds() {
        let mut rng = SimRng::new(21);
        for _ in 0..2000 {
            let params = PerceptionParams::random(&mut rng);
            assert!((1..=100).contains(&params.true_skill()));
            assert!(params.own_noise_scale() >= 0.0);
            assert!(params.eval_noise_scale() >= 0.0);
        }
    }

    #[test]
    fn random_skill_scores_centre_near_population_mean() {
        let mut rng = SimRng::new(8);
        let n = 5000;
        let total: i64 = (0..n).map(|_| i64::from(random_skill_score(&mut rng))).sum();
        let mean = total as f64 / n as f64;
        assert!((mean - SKILL_MEAN).abs() < 3.0, "mean={mean}");
    }

    #[test]
    fn with_eval_keeps_fixed_fields() {
        let mut rng = SimRng::new(4);
        let params = PerceptionParams::with_eval(80, 10.0, -5.0, &mut rng);
        assert_eq!(params.true_skill(), 80);
        assert_eq!(params.eval_noise_scale(), 10.0);
        assert_eq!(params.eval_bias(), -5.0);
    }
}
