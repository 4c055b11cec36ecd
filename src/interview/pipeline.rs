//! Multi-step interview pipeline with early elimination.

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::config::Settings;
use crate::error::PipelineError;
use crate::interview::elimination::EliminationPolicy;
use crate::interview::step::{InterviewStep, StepResult};
use crate::model::Engineer;

/// Terminal state of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Eliminated,
    Completed,
}

/// Result of running one candidate through a pipeline. Only steps actually
/// conducted contribute to `elapsed_time` and `step_results`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutcome {
    pub elapsed_time: f64,
    pub step_results: Vec<StepResult>,
    pub status: RunStatus,
}

impl PipelineOutcome {
    /// Mean of the last conducted step, or 0 when no step ran.
    pub fn final_score(&self) -> f64 {
        self.step_results.last().map_or(0.0, |last| last.mean)
    }

    pub fn steps_run(&self) -> usize {
        self.step_results.len()
    }

    pub fn was_eliminated(&self) -> bool {
        self.status == RunStatus::Eliminated
    }
}

/// Ordered, validated interview steps. Runs never mutate the pipeline, so one
/// instance can screen any number of candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewPipeline {
    steps: Vec<InterviewStep>,
}

impl InterviewPipeline {
    pub fn new(steps: Vec<InterviewStep>) -> Result<Self, PipelineError> {
        if steps.is_empty() {
            return Err(PipelineError::NoSteps);
        }
        if steps.iter().any(|step| step.interviewers().is_empty()) {
            return Err(PipelineError::NoInterviewers);
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[InterviewStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Duration of the full pipeline if no elimination happens.
    pub fn total_duration(&self) -> f64 {
        self.steps.iter().map(InterviewStep::duration).sum()
    }

    /// Run `candidate` through the steps in order, checking `policy` after each one.
    pub fn run<R: Rng + ?Sized>(
        &self,
        target_score: f64,
        policy: EliminationPolicy,
        candidate: &Engineer,
        settings: &Settings,
        rng: &mut R,
    ) -> PipelineOutcome {
        let mut elapsed_time = 0.0;
        let mut step_results = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            elapsed_time += step.duration();
            let result = step.conduct(candidate, settings, rng);
            debug!(
                step = index,
                mean = result.mean,
                min = result.min,
                max = result.max,
                "interview step conducted"
            );
            step_results.push(result);

            if policy.should_eliminate(&step_results, target_score) {
                debug!(step = index, %policy, target_score, "candidate eliminated");
                return PipelineOutcome {
                    elapsed_time,
                    step_results,
                    status: RunStatus::Eliminated,
                };
            }
        }

        PipelineOutcome {
            elapsed_time,
            step_results,
            status: RunStatus::Completed,
        }
    }
}
