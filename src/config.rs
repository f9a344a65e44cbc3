//! Run configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dispatching::StrategyKind;
use crate::error::{Result, SimError};

/// How the final report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Three human-readable lines.
    #[default]
    Text,
    /// One JSON object.
    Json,
}

/// Everything needed to start a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Path of the process list.
    pub process_list: PathBuf,
    /// Number of simulated processors.
    pub processors: usize,
    /// Dispatching strategy.
    pub strategy: StrategyKind,
    /// Final report format.
    pub report_format: ReportFormat,
}

impl SimConfig {
    /// Creates a config with the default strategy and text report.
    pub fn new(process_list: impl Into<PathBuf>, processors: usize) -> Self {
        Self {
            process_list: process_list.into(),
            processors,
            strategy: StrategyKind::default(),
            report_format: ReportFormat::default(),
        }
    }

    /// Sets the dispatching strategy.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the report format.
    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    /// Path of the process list.
    pub fn process_list(&self) -> &Path {
        &self.process_list
    }

    /// Checks the options before any file is touched.
    ///
    /// # Errors
    /// [`SimError::Configuration`] for zero processors or an empty path.
    pub fn validate(&self) -> Result<()> {
        if self.process_list.as_os_str().is_empty() {
            return Err(SimError::Configuration(
                "a process list file is required".into(),
            ));
        }
        if self.processors == 0 {
            return Err(SimError::Configuration("no processor to be made".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = SimConfig::new("jobs.txt", 4)
            .with_strategy(StrategyKind::WaitBalanced)
            .with_report_format(ReportFormat::Json);

        assert_eq!(config.process_list(), Path::new("jobs.txt"));
        assert_eq!(config.processors, 4);
        assert_eq!(config.strategy, StrategyKind::WaitBalanced);
        assert_eq!(config.report_format, ReportFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_processors() {
        let err = SimConfig::new("jobs.txt", 0).validate().unwrap_err();
        assert!(matches!(err, SimError::Configuration(_)));
        assert_eq!(err.to_string(), "configuration error: no processor to be made");
    }

    #[test]
    fn test_empty_path() {
        assert!(SimConfig::new("", 2).validate().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = SimConfig::new("jobs.txt", 1);
        assert_eq!(config.strategy, StrategyKind::ShortestRemaining);
        assert_eq!(config.report_format, ReportFormat::Text);
    }
}
