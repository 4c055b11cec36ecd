//! Hiring funnel simulation.
//!
//! Synthetic engineers with a hidden true skill and biased perception interview one
//! another through multi-step pipelines with early elimination. A search draws
//! candidates from an unbounded population until one clears a skill bar and a
//! compensation bar, or the draw budget runs out.

pub mod cli;
pub mod compensation;
pub mod config;
pub mod error;
pub mod interview;
pub mod model;
pub mod parallel;
pub mod search;
pub mod sweep;
pub mod telemetry;

pub use compensation::CompensationCurve;
pub use config::Settings;
pub use error::{ConfigError, HiresimError, PipelineError};
pub use interview::{
    EliminationPolicy, InterviewPipeline, InterviewStep, PipelineOutcome, RunStatus, StepResult,
};
pub use model::{Engineer, PerceptionParams, SimRng};
pub use search::{
    find_suitable_candidate, CandidateSearch, CandidateStream, SearchCriteria, SearchOutcome,
    SelfSelection,
};
