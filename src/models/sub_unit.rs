//! Sub-unit model.
//!
//! A sub-unit is the smallest schedulable piece of work: the thing a
//! processor actually runs. Sequential jobs own exactly one; parallel jobs
//! own one per processor they are split across.
//!
//! The parent job is reached through the [`UnitRef`](super::UnitRef) that
//! processors hold, never through the sub-unit itself.

use serde::{Deserialize, Serialize};

use super::Tick;

/// One fragment of a job's work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubUnit {
    /// Position within the parent job (0-indexed).
    pub local_id: u32,
    /// Ticks of work this fragment needs.
    pub exec_time: u64,
    /// Ticks of work done so far (`0..=exec_time`).
    worked: u64,
    /// Tick on which `worked` first reached `exec_time`.
    completion: Option<Tick>,
}

/// Outcome of advancing a sub-unit by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// One tick of work done; more remains.
    Worked,
    /// The last tick of work was done in this call.
    Completed,
    /// Nothing left to do; the call was a no-op.
    AlreadyFinished,
}

impl SubUnit {
    /// Creates a fresh sub-unit.
    pub fn new(local_id: u32, exec_time: u64) -> Self {
        Self {
            local_id,
            exec_time,
            worked: 0,
            completion: None,
        }
    }

    /// Ticks of work done so far.
    pub fn worked(&self) -> u64 {
        self.worked
    }

    /// Ticks of work left.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.exec_time - self.worked
    }

    /// Whether all work is done.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    /// Tick on which this sub-unit finished, once it has.
    pub fn completion(&self) -> Option<Tick> {
        self.completion
    }

    /// Performs one tick of work at `now`.
    ///
    /// The completion tick is recorded exactly once, on the call that
    /// does the final tick of work.
    pub fn advance(&mut self, now: Tick) -> Progress {
        if self.worked >= self.exec_time {
            return Progress::AlreadyFinished;
        }

        self.worked += 1;
        if self.worked == self.exec_time {
            self.completion = Some(now);
            Progress::Completed
        } else {
            Progress::Worked
        }
    }

    /// Time spent waiting since the parent arrived: `now - arrival - worked`.
    ///
    /// Negative before the parent's arrival; callers only ask for arrived work.
    pub fn waiting_time(&self, parent_arrival: Tick, now: Tick) -> i64 {
        now as i64 - parent_arrival as i64 - self.worked as i64
    }
}
