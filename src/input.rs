//! Process-list loader.
//!
//! One job per line:
//!
//! ```text
//! <arrival> <pid> <exec> <tag>
//! ```
//!
//! Fields are whitespace separated; the three numbers are unsigned
//! integers and tag `p` marks a parallelizable job (any other tag is
//! sequential). Blank lines are skipped. Any other deviation aborts the
//! load with [`SimError::MalformedInput`].

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, SimError};
use crate::models::{ExecutionMode, JobSpec};

/// Parses process-list text.
///
/// # Example
/// ```
/// use procsim::input::parse_process_list;
/// use procsim::models::ExecutionMode;
///
/// let specs = parse_process_list("0 1 5 n\n2 7 4 p\n").unwrap();
/// assert_eq!(specs.len(), 2);
/// assert_eq!(specs[1].id, 7);
/// assert_eq!(specs[1].mode, ExecutionMode::Parallel);
/// ```
pub fn parse_process_list(text: &str) -> Result<Vec<JobSpec>> {
    let mut specs = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let &[arrival, pid, exec, tag] = fields.as_slice() else {
            return Err(SimError::malformed(
                line_no,
                format!("expected 4 fields, found {}", fields.len()),
            ));
        };

        let arrival = parse_field(arrival, "arrival time", line_no)?;
        let id = parse_field(pid, "pid", line_no)?;
        let exec_time = parse_field(exec, "execution time", line_no)?;
        let mode = ExecutionMode::from_tag(tag);
        if mode == ExecutionMode::Sequential && tag != ExecutionMode::Sequential.as_tag() {
            debug!(line = line_no, tag, "unrecognised tag treated as sequential");
        }

        specs.push(JobSpec::new(id, arrival, exec_time).with_mode(mode));
    }

    if let Some(gap) = largest_arrival_gap(&specs) {
        if gap > 10_000 {
            warn!(gap, "process list has a long idle stretch between arrivals");
        }
    }

    Ok(specs)
}

/// Reads and parses a process-list file.
pub fn load_process_list(path: impl AsRef<Path>) -> Result<Vec<JobSpec>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let specs = parse_process_list(&text)?;
    debug!(path = %path.display(), jobs = specs.len(), "process list loaded");
    Ok(specs)
}

/// Renders specs in process-list format, one line per job.
pub fn to_process_list(specs: &[JobSpec]) -> String {
    specs
        .iter()
        .map(|s| format!("{} {} {} {}\n", s.arrival, s.id, s.exec_time, s.mode.as_tag()))
        .collect()
}

fn parse_field(raw: &str, name: &str, line: usize) -> Result<u64> {
    raw.parse()
        .map_err(|e| SimError::malformed(line, format!("invalid {name} '{raw}': {e}")))
}

fn largest_arrival_gap(specs: &[JobSpec]) -> Option<u64> {
    let mut arrivals: Vec<u64> = specs.iter().map(|s| s.arrival).collect();
    arrivals.sort_unstable();
    arrivals.windows(2).map(|w| w[1] - w[0]).max()
}
