//! Simulator error types.
//!
//! Every failure happens during setup: option validation, loading the
//! process list, validating it, or building the job arena. Once a
//! [`Simulation`](crate::simulation::Simulation) exists, ticking it cannot fail.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// Missing or invalid options (e.g. zero processors).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A process-list line could not be parsed.
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// An allocation for jobs, sub-units or processors could not be satisfied.
    #[error("resource exhaustion: {0}")]
    ResourceExhaustion(String),

    /// The parsed workload failed semantic checks.
    #[error("invalid workload: {}", format_issues(.0))]
    InvalidWorkload(Vec<ValidationError>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            reason: reason.into(),
        }
    }
}

fn format_issues(issues: &[ValidationError]) -> String {
    issues
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
