use serde::Serialize;

use crate::compensation::CompensationCurve;
use crate::interview::EliminationPolicy;
use crate::sweep::{StepSpec, SweepParams, SweepRecord, SweepScenario};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepSummary {
    pub scenario: String,
    pub elimination: EliminationPolicy,
    pub structure: Vec<StepSpec>,
    pub runs: usize,
    pub total_time: f64,
    pub average_time: f64,
    pub average_final_score: f64,
    pub average_true_skill: f64,
    /// Runs whose final score reached the target.
    pub successful_hires: usize,
    pub fraction_above_target: f64,
    pub average_candidates_screened: f64,
    pub total_candidates_screened: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub scenario: SweepScenario,
    pub records: Vec<SweepRecord>,
    pub summary: SweepSummary,
}

pub fn summarize(scenario: &SweepScenario, records: &[SweepRecord], target_score: f64) -> SweepSummary {
    let runs = records.len();
    let mean = |total: f64| if runs == 0 { 0.0 } else { total / runs as f64 };

    let total_time: f64 = records.iter().map(|r| r.total_time).sum();
    let final_scores: f64 = records.iter().map(|r| r.final_score).sum();
    let true_skills: f64 = records.iter().map(|r| f64::from(r.true_skill)).sum();
    let successful_hires = records
        .iter()
        .filter(|r| r.final_score >= target_score)
        .count();
    let total_candidates_screened: usize = records.iter().map(|r| r.candidates_screened).sum();

    SweepSummary {
        scenario: scenario.name.clone(),
        elimination: scenario.elimination,
        structure: scenario.structure.clone(),
        runs,
        total_time,
        average_time: mean(total_time),
        average_final_score: mean(final_scores),
        average_true_skill: mean(true_skills),
        successful_hires,
        fraction_above_target: mean(successful_hires as f64),
        average_candidates_screened: mean(total_candidates_screened as f64),
        total_candidates_screened,
    }
}

/// Serializable sweep output for the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub generated_at: String,
    pub params: SweepParams,
    pub target_compensation: f64,
    pub summaries: Vec<SweepSummary>,
}

impl SweepReport {
    pub fn new(params: SweepParams, curve: &CompensationCurve, results: &[ScenarioResult]) -> Self {
        Self {
            generated_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            params,
            target_compensation: curve.make_offer_for_mean(params.target_score, params.adjustment),
            summaries: results.iter().map(|r| r.summary.clone()).collect(),
        }
    }
}
