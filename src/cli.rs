use std::path::PathBuf;

use clap::Parser;

use procsim::config::{ReportFormat, SimConfig};
use procsim::dispatching::StrategyKind;

/// Multi-processor scheduling simulator.
///
/// Prints one trace line per event per tick, then the turnaround,
/// overhead and makespan statistics.
#[derive(Parser, Debug)]
#[command(name = "procsim", version, about = "Multi-processor scheduling simulator")]
pub struct CliArgs {
    /// Process list: one "<arrival> <pid> <exec> <tag>" per line
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,

    /// Number of simulated processors (must be > 0)
    #[arg(short = 'p', long, env = "PROCSIM_PROCESSORS")]
    pub processors: usize,

    /// Use the waiting-time balanced strategy instead of shortest remaining time
    #[arg(short = 'c', long)]
    pub custom: bool,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Converts parsed arguments into a run configuration.
    pub fn into_config(self) -> SimConfig {
        let format = if self.json {
            ReportFormat::Json
        } else {
            ReportFormat::Text
        };
        SimConfig::new(self.file, self.processors)
            .with_strategy(StrategyKind::from_custom_flag(self.custom))
            .with_report_format(format)
    }
}
