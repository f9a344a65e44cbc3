//! Dispatching context passed to strategies.

use crate::models::{Tick, Workload};

/// Read-only view of the run at the moment a strategy is consulted.
///
/// Strategies reorder queues but never do work, so the arena is borrowed
/// immutably for the whole scheduling pass.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    /// Current tick.
    pub now: Tick,
    /// Every job of the run.
    pub workload: &'a Workload,
}

impl<'a> DispatchContext<'a> {
    /// Creates a context at `now`.
    pub fn at_time(now: Tick, workload: &'a Workload) -> Self {
        Self { now, workload }
    }
}
