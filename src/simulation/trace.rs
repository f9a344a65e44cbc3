//! Trace events.
//!
//! One event per newly finished job and one per processor that picked up
//! a sub-unit on a tick. The text rendering is the line format the
//! command-line tool prints.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{JobId, ProcessorId, Tick};

/// Something observable that happened on a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Every sub-unit of a job is done.
    Finished {
        /// Tick on which the completion was observed.
        tick: Tick,
        /// Job identifier.
        job: JobId,
        /// Jobs still unfinished after this one.
        unfinished: usize,
    },
    /// A processor took a sub-unit from its queue and worked on it.
    Running {
        /// Tick of the dispatch.
        tick: Tick,
        /// Owning job.
        job: JobId,
        /// Local id, present only for jobs split into several sub-units.
        sub_unit: Option<u32>,
        /// Work left after this tick's step.
        remaining: u64,
        /// Processor that runs it.
        cpu: ProcessorId,
    },
}

impl TraceEvent {
    /// Tick the event belongs to.
    pub fn tick(&self) -> Tick {
        match self {
            Self::Finished { tick, .. } | Self::Running { tick, .. } => *tick,
        }
    }

    /// Job the event is about.
    pub fn job(&self) -> JobId {
        match self {
            Self::Finished { job, .. } | Self::Running { job, .. } => *job,
        }
    }
}

impl fmt::Display for TraceEvent {
    /// `remaining_time` is printed one higher than the work left after the
    /// step, i.e. the work left when the tick began.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finished {
                tick,
                job,
                unfinished,
            } => write!(f, "{tick},FINISHED,pid={job},proc_remaining={unfinished}"),
            Self::Running {
                tick,
                job,
                sub_unit,
                remaining,
                cpu,
            } => {
                write!(f, "{tick},RUNNING,pid={job}")?;
                if let Some(local) = sub_unit {
                    write!(f, ".{local}")?;
                }
                write!(f, ",remaining_time={},cpu={cpu}", remaining + 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_line() {
        let event = TraceEvent::Finished {
            tick: 12,
            job: 4,
            unfinished: 3,
        };
        assert_eq!(event.to_string(), "12,FINISHED,pid=4,proc_remaining=3");
        assert_eq!(event.tick(), 12);
        assert_eq!(event.job(), 4);
    }

    #[test]
    fn test_running_line_sequential() {
        let event = TraceEvent::Running {
            tick: 0,
            job: 1,
            sub_unit: None,
            remaining: 4,
            cpu: 0,
        };
        assert_eq!(event.to_string(), "0,RUNNING,pid=1,remaining_time=5,cpu=0");
    }

    #[test]
    fn test_running_line_split() {
        let event = TraceEvent::Running {
            tick: 7,
            job: 3,
            sub_unit: Some(1),
            remaining: 0,
            cpu: 2,
        };
        assert_eq!(event.to_string(), "7,RUNNING,pid=3.1,remaining_time=1,cpu=2");
    }

    #[test]
    fn test_json_shape() {
        let event = TraceEvent::Finished {
            tick: 1,
            job: 2,
            unfinished: 0,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "finished");
        assert_eq!(value["job"], 2);
    }
}
