//! One interview stage: a duration and the interviewers who score the candidate.

use rand::Rng;
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::config::Settings;
use crate::error::PipelineError;
use crate::model::Engineer;

/// Summary statistics of the interviewers' scores for one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StepResult {
    pub min: i32,
    pub max: i32,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (Bessel's correction); 0 for a single score.
    pub std: f64,
}

impl StepResult {
    /// Summarize a set of scores. Returns `None` for an empty slice.
    pub fn from_scores(scores: &[i32]) -> Option<Self> {
        let (&first, rest) = scores.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((first, first), |(lo, hi), &s| (lo.min(s), hi.max(s)));

        let values: Vec<f64> = scores.iter().map(|&s| f64::from(s)).collect();
        let mean = values.iter().mean();
        // statrs' sample deviation is NaN below two values.
        let std = if values.len() > 1 {
            values.iter().std_dev()
        } else {
            0.0
        };

        let mut sorted = scores.to_vec();
        sorted.sort_unstable();
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
        } else {
            f64::from(sorted[mid])
        };

        Some(Self {
            min,
            max,
            mean,
            median,
            std,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterviewStep {
    duration: f64,
    interviewers: Vec<Engineer>,
}

impl InterviewStep {
    /// Build a step; `duration` is clamped into the configured interview bounds.
    pub fn new(
        duration: f64,
        interviewers: Vec<Engineer>,
        settings: &Settings,
    ) -> Result<Self, PipelineError> {
        if interviewers.is_empty() {
            return Err(PipelineError::NoInterviewers);
        }
        Ok(Self {
            duration: settings.clamp_duration(duration),
            interviewers,
        })
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn interviewers(&self) -> &[Engineer] {
        &self.interviewers
    }

    /// Every interviewer scores the candidate independently, in order.
    pub fn conduct<R: Rng + ?Sized>(
        &self,
        candidate: &Engineer,
        settings: &Settings,
        rng: &mut R,
    ) -> StepResult {
        let scores: Vec<i32> = self
            .interviewers
            .iter()
            .map(|interviewer| {
                interviewer.estimate_other_skill(candidate, self.duration, settings, rng)
            })
            .collect();
        // `interviewers` is non-empty by construction.
        StepResult::from_scores(&scores).unwrap_or_default()
    }
}
