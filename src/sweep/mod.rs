//! Bulk simulation sweeps: for each scenario, build a fresh pipeline of random
//! interviewers per run and search for a hire, then summarize the runs.
//!
//! Every run draws from its own stream seeded by `derive_seed(base, scenario, run)`,
//! so sequential and parallel sweeps produce identical, input-ordered records.

pub mod export_csv;
pub mod summary;

use rand::{Rng, RngCore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::compensation::CompensationCurve;
use crate::config::Settings;
use crate::error::PipelineError;
use crate::interview::{EliminationPolicy, InterviewPipeline, InterviewStep};
use crate::model::{derive_seed, Engineer, SimRng};
use crate::parallel::{batch_ranges, WorkerPool};
use crate::search::{find_suitable_candidate, SearchCriteria};

pub use export_csv::write_records_csv;
pub use summary::{summarize, ScenarioResult, SweepReport, SweepSummary};

/// Number of progress-reporting batches per scenario.
const SWEEP_PROGRESS_BATCH_COUNT: usize = 20;

/// Runs per scenario in the reference sweep.
pub const DEFAULT_RUNS: usize = 100;

/// One step of a pipeline shape: how many random interviewers, for how long.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepSpec {
    pub interviewers: usize,
    pub duration: f64,
}

impl StepSpec {
    pub const fn new(interviewers: usize, duration: f64) -> Self {
        Self {
            interviewers,
            duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepScenario {
    pub name: String,
    pub structure: Vec<StepSpec>,
    pub elimination: EliminationPolicy,
    pub runs: usize,
}

/// Hiring targets shared by every scenario of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepParams {
    pub target_score: f64,
    /// Adjustment applied to the target score's offer to get the compensation ceiling.
    pub adjustment: f64,
    pub seed: u64,
    /// Self-select applicants at this tolerance; `None` draws from the whole population.
    pub self_selection_tolerance: Option<f64>,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            target_score: 85.0,
            adjustment: 0.0,
            seed: 0,
            self_selection_tolerance: None,
        }
    }
}

/// One run of one scenario. `true_skill` is 0 when nobody was hired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepRecord {
    pub run: usize,
    pub total_time: f64,
    pub final_score: f64,
    pub true_skill: i32,
    pub candidates_screened: usize,
    pub hired: bool,
}

/// The four reference pipeline shapes, `runs` runs each.
pub fn default_scenarios(runs: usize) -> Vec<SweepScenario> {
    let screens_then_panel = || {
        vec![
            StepSpec::new(1, 0.5),
            StepSpec::new(1, 0.5),
            StepSpec::new(1, 0.5),
            StepSpec::new(1, 0.5),
            StepSpec::new(3, 1.5),
        ]
    };
    vec![
        SweepScenario {
            name: "pipeline1".to_string(),
            structure: vec![StepSpec::new(1, 0.5), StepSpec::new(1, 1.5)],
            elimination: EliminationPolicy::Immediate,
            runs,
        },
        SweepScenario {
            name: "pipeline2".to_string(),
            structure: screens_then_panel(),
            elimination: EliminationPolicy::Immediate,
            runs,
        },
        SweepScenario {
            name: "pipeline3".to_string(),
            structure: screens_then_panel(),
            elimination: EliminationPolicy::Aggregate,
            runs,
        },
        SweepScenario {
            name: "pipeline4".to_string(),
            structure: vec![
                StepSpec::new(1, 0.25),
                StepSpec::new(1, 0.5),
                StepSpec::new(3, 1.5),
            ],
            elimination: EliminationPolicy::Immediate,
            runs,
        },
    ]
}

/// Build a pipeline of the given shape staffed by random engineers.
pub fn build_random_pipeline<R: Rng + ?Sized>(
    structure: &[StepSpec],
    settings: &Settings,
    rng: &mut R,
) -> Result<InterviewPipeline, PipelineError> {
    let steps = structure
        .iter()
        .map(|spec| {
            let interviewers = (0..spec.interviewers)
                .map(|_| Engineer::random(settings, rng))
                .collect();
            InterviewStep::new(spec.duration, interviewers, settings)
        })
        .collect::<Result<Vec<_>, _>>()?;
    InterviewPipeline::new(steps)
}

pub fn run_sweep(
    scenarios: &[SweepScenario],
    params: &SweepParams,
    settings: &Settings,
    curve: &CompensationCurve,
) -> Result<Vec<ScenarioResult>, PipelineError> {
    run_sweep_with_parallelism(scenarios, params, settings, curve, false)
}

/// Like [run_sweep] but distributes runs across a Rayon pool. Results match [run_sweep].
pub fn run_sweep_parallel(
    scenarios: &[SweepScenario],
    params: &SweepParams,
    settings: &Settings,
    curve: &CompensationCurve,
    pool: &WorkerPool,
) -> Result<Vec<ScenarioResult>, PipelineError> {
    pool.install(|| run_sweep_with_parallelism(scenarios, params, settings, curve, true))
}

fn run_sweep_with_parallelism(
    scenarios: &[SweepScenario],
    params: &SweepParams,
    settings: &Settings,
    curve: &CompensationCurve,
    parallel: bool,
) -> Result<Vec<ScenarioResult>, PipelineError> {
    scenarios
        .iter()
        .map(|scenario| {
            info!(scenario = %scenario.name, runs = scenario.runs, elimination = %scenario.elimination, "sweep scenario started");
            let records = run_range(scenario, params, settings, curve, 0, scenario.runs, parallel)?;
            let summary = summarize(scenario, &records, params.target_score);
            info!(
                scenario = %scenario.name,
                successful_hires = summary.successful_hires,
                average_candidates_screened = summary.average_candidates_screened,
                "sweep scenario finished"
            );
            Ok(ScenarioResult {
                scenario: scenario.clone(),
                records,
                summary,
            })
        })
        .collect()
}

/// Like [run_sweep_parallel] but runs each scenario in batches and invokes
/// `on_progress(scenario_index, done, total)` after every batch.
pub fn run_sweep_with_progress<F>(
    scenarios: &[SweepScenario],
    params: &SweepParams,
    settings: &Settings,
    curve: &CompensationCurve,
    pool: &WorkerPool,
    mut on_progress: F,
) -> Result<Vec<ScenarioResult>, PipelineError>
where
    F: FnMut(usize, usize, usize) + Send,
{
    pool.install(|| {
        let mut results = Vec::with_capacity(scenarios.len());
        for (index, scenario) in scenarios.iter().enumerate() {
            let total = scenario.runs;
            on_progress(index, 0, total);
            let mut records = Vec::with_capacity(total);
            for (start, end) in batch_ranges(total, SWEEP_PROGRESS_BATCH_COUNT) {
                records.extend(run_range(scenario, params, settings, curve, start, end, true)?);
                on_progress(index, end, total);
            }
            let summary = summarize(scenario, &records, params.target_score);
            results.push(ScenarioResult {
                scenario: scenario.clone(),
                records,
                summary,
            });
        }
        Ok(results)
    })
}

fn run_range(
    scenario: &SweepScenario,
    params: &SweepParams,
    settings: &Settings,
    curve: &CompensationCurve,
    start: usize,
    end: usize,
    parallel: bool,
) -> Result<Vec<SweepRecord>, PipelineError> {
    let mut criteria = SearchCriteria::new(
        params.target_score,
        params.adjustment,
        scenario.elimination,
        curve,
    );
    if let Some(tolerance) = params.self_selection_tolerance {
        criteria = criteria.with_self_selection(tolerance);
    }

    let run_one = |run: usize| -> Result<SweepRecord, PipelineError> {
        let mut rng = SimRng::new(derive_seed(params.seed, &scenario.name, run as u64));
        let pipeline = build_random_pipeline(&scenario.structure, settings, &mut rng)?;
        let outcome = find_suitable_candidate(&pipeline, &criteria, settings, curve, rng.next_u64());
        Ok(SweepRecord {
            run,
            total_time: outcome.elapsed_time,
            final_score: outcome.final_score,
            true_skill: outcome.candidate.as_ref().map_or(0, Engineer::true_skill),
            candidates_screened: outcome.candidates_screened,
            hired: outcome.candidate.is_some(),
        })
    };

    if parallel {
        (start..end).into_par_iter().map(run_one).collect()
    } else {
        (start..end).map(run_one).collect()
    }
}
