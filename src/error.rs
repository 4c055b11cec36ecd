//! Error types for configuration loading, pipeline assembly and report export.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or validating [`crate::config::Settings`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse yaml settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unable to parse json settings: {0}")]
    Json(#[from] serde_json::Error),

    /// An environment override could not be parsed for its field type.
    #[error("invalid override {key}='{value}'")]
    InvalidOverride { key: String, value: String },

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Structural problems with an interview pipeline or its elimination policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("interview pipeline must have at least one step")]
    NoSteps,

    #[error("interview step must have at least one interviewer")]
    NoInterviewers,

    #[error("unknown elimination policy '{0}', expected 'immediate' or 'aggregate'")]
    UnknownEliminationPolicy(String),
}

/// Top-level error used by the sweep exporter and the CLI.
#[derive(Error, Debug)]
pub enum HiresimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
