mod cli;

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use procsim::config::ReportFormat;
use procsim::simulation::Simulation;

use crate::cli::CliArgs;

fn main() -> Result<()> {
    // Trace lines own stdout; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = CliArgs::parse().into_config();
    info!(
        file = %config.process_list.display(),
        processors = config.processors,
        strategy = ?config.strategy,
        "starting"
    );

    let mut sim = Simulation::from_config(&config).with_context(|| {
        format!(
            "failed to set up simulation from {}",
            config.process_list.display()
        )
    })?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut write_error = None;
    let report = sim.run(|event| {
        if write_error.is_none() {
            if let Err(e) = writeln!(out, "{event}") {
                write_error = Some(e);
            }
        }
    });
    if let Some(e) = write_error {
        return Err(e).context("failed to write trace");
    }

    match config.report_format {
        ReportFormat::Text => writeln!(out, "{report}")?,
        ReportFormat::Json => {
            serde_json::to_writer(&mut out, &report).context("failed to write report")?;
            writeln!(out)?;
        }
    }
    out.flush().context("failed to flush output")?;

    Ok(())
}
