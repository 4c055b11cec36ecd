pub mod elimination;
pub mod pipeline;
pub mod step;

pub use elimination::EliminationPolicy;
pub use pipeline::{InterviewPipeline, PipelineOutcome, RunStatus};
pub use step::{InterviewStep, StepResult};
