//! Simulation domain models.
//!
//! Provides the data types the scheduling engine works on: the declared
//! jobs, the sub-units they are split into, the arena that owns them,
//! and the processors that run them.
//!
//! # Domain Mappings
//!
//! | procsim | Process list | Scheduler view |
//! |---------|--------------|----------------|
//! | JobSpec | One input line | Not yet split |
//! | Job | Process | Owner of sub-units |
//! | SubUnit | Process fragment | Unit placed on a lane |
//! | Processor | CPU | Current slot + pending queue |

mod job;
mod processor;
mod sub_unit;
mod workload;

pub use job::{ExecutionMode, Job, JobSpec};
pub use processor::{Processor, ProcessorId};
pub use sub_unit::{Progress, SubUnit};
pub use workload::{UnitRef, Workload};

/// Simulated time, in ticks from the start of the run.
pub type Tick = u64;

/// Job identifier as given in the process list.
pub type JobId = u64;
