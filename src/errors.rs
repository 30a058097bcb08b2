//! Error types for the summarization pipeline

use crate::pipeline::errors::PipelineSpecError;
use thiserror::Error;

/// Errors surfaced by the summarizer.
///
/// Degenerate documents (every token a stopword, identical sentences) are
/// not errors; they are handled by the clustering fallbacks.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// No sentences were supplied
    #[error("empty input: at least one sentence is required")]
    EmptyInput,

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A JSON pipeline spec failed validation
    #[error("invalid pipeline spec: {}", format_spec_errors(.0))]
    InvalidSpec(Vec<PipelineSpecError>),

    /// A JSON pipeline spec could not be parsed
    #[error("failed to parse pipeline spec: {0}")]
    SpecParse(#[from] serde_json::Error),
}

impl SummarizeError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

fn format_spec_errors(errors: &[PipelineSpecError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SummarizeError>;
