//! Early-elimination rules consulted after every interview step.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::interview::step::StepResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EliminationPolicy {
    /// Reject as soon as the latest step's mean falls below target.
    Immediate,
    /// Reject when the running average of step means falls below target.
    Aggregate,
}

impl EliminationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Aggregate => "aggregate",
        }
    }

    /// `true` means stop the pipeline and reject. No results means nothing to judge yet.
    pub fn should_eliminate(self, results: &[StepResult], target_score: f64) -> bool {
        match self {
            Self::Immediate => immediate(results, target_score),
            Self::Aggregate => aggregate(results, target_score),
        }
    }
}

fn immediate(results: &[StepResult], target_score: f64) -> bool {
    results
        .last()
        .map_or(false, |latest| latest.mean < target_score)
}

fn aggregate(results: &[StepResult], target_score: f64) -> bool {
    if results.is_empty() {
        return false;
    }
    let running = results.iter().map(|r| r.mean).sum::<f64>() / results.len() as f64;
    running < target_score
}

impl fmt::Display for EliminationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EliminationPolicy {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" => Ok(Self::Immediate),
            "aggregate" => Ok(Self::Aggregate),
            _ => Err(PipelineError::UnknownEliminationPolicy(s.to_string())),
        }
    }
}
