//! Input validation for process lists.
//!
//! Checks the parsed job specs before any job is split or any processor
//! is built. Detects:
//! - Duplicate job IDs
//! - Jobs with zero execution time
//!
//! A zero-length job would never put a sub-unit on a processor that could
//! complete, and its overhead ratio is undefined.

use std::collections::HashSet;
use std::fmt;

use tracing::warn;

use crate::models::JobSpec;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two jobs share the same ID.
    DuplicateId,
    /// A job declares no work.
    ZeroExecTime,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a parsed process list.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with every detected issue.
pub fn validate_jobs(specs: &[JobSpec]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for spec in specs {
        if !ids.insert(spec.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate job ID: {}", spec.id),
            ));
        }

        if spec.exec_time == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroExecTime,
                format!("Job {} has zero execution time", spec.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        warn!(issues = errors.len(), "process list rejected");
        Err(errors)
    }
}
