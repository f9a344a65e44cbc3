//! Job model.
//!
//! A job is a unit of work from the process list: an arrival tick, a
//! declared execution time, and whether it may be split across processors.
//! The job owns its sub-units; the sub-units are what processors run.
//!
//! # Parallel Split
//!
//! A parallelizable job with execution time `e` on `p` processors becomes
//! `k = min(p, e)` sub-units, each with `1 + ceil(e / p)` ticks when
//! `p <= e`, or `2` ticks otherwise. The extra tick per fragment is a
//! synchronization allowance, so total sub-unit work exceeds `e`.

use serde::{Deserialize, Serialize};

use super::{JobId, SubUnit, Tick};
use crate::error::{Result, SimError};

/// Whether a job may be split across processors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Runs as a single sub-unit.
    Sequential,
    /// Split into one sub-unit per processor (bounded by execution time).
    Parallel,
}

impl ExecutionMode {
    /// Maps a process-list tag: `"p"` is parallel, anything else sequential.
    pub fn from_tag(tag: &str) -> Self {
        if tag == "p" {
            Self::Parallel
        } else {
            Self::Sequential
        }
    }

    /// The canonical process-list tag.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Parallel => "p",
            Self::Sequential => "n",
        }
    }
}

/// A job as declared in the process list, before it is split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Unique job identifier (the `pid` column).
    pub id: JobId,
    /// Tick on which the job becomes visible to the scheduler.
    pub arrival: Tick,
    /// Declared execution time in ticks.
    pub exec_time: u64,
    /// Sequential or parallelizable.
    pub mode: ExecutionMode,
}

impl JobSpec {
    /// Creates a sequential job spec.
    pub fn new(id: JobId, arrival: Tick, exec_time: u64) -> Self {
        Self {
            id,
            arrival,
            exec_time,
            mode: ExecutionMode::Sequential,
        }
    }

    /// Marks the job as parallelizable.
    pub fn parallel(mut self) -> Self {
        self.mode = ExecutionMode::Parallel;
        self
    }

    /// Sets the execution mode.
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }
}

/// A job and the sub-units it was split into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    arrival: Tick,
    exec_time: u64,
    mode: ExecutionMode,
    sub_units: Vec<SubUnit>,
    finished_at: Option<Tick>,
}

impl Job {
    /// Builds a job from its spec, splitting it for `processors` lanes.
    ///
    /// # Errors
    /// [`SimError::ResourceExhaustion`] if the sub-unit list cannot be allocated.
    pub fn build(spec: &JobSpec, processors: usize) -> Result<Self> {
        let (count, slice) = match spec.mode {
            ExecutionMode::Parallel => parallel_split(spec.exec_time, processors as u64),
            ExecutionMode::Sequential => (1, spec.exec_time),
        };

        let mut sub_units = Vec::new();
        sub_units.try_reserve_exact(count as usize).map_err(|e| {
            SimError::ResourceExhaustion(format!(
                "sub-units for job {} ({count} requested): {e}",
                spec.id
            ))
        })?;
        sub_units.extend((0..count).map(|i| SubUnit::new(i as u32, slice)));

        Ok(Self {
            id: spec.id,
            arrival: spec.arrival,
            exec_time: spec.exec_time,
            mode: spec.mode,
            sub_units,
            finished_at: None,
        })
    }

    /// Job identifier.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Arrival tick.
    pub fn arrival(&self) -> Tick {
        self.arrival
    }

    /// Declared execution time (not the inflated sub-unit total).
    pub fn exec_time(&self) -> u64 {
        self.exec_time
    }

    /// Declared execution mode.
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Whether the job actually runs as more than one sub-unit.
    ///
    /// A parallel job of length 1 still has a single fragment.
    pub fn is_split(&self) -> bool {
        self.sub_units.len() > 1
    }

    /// The job's sub-units, in local-id order.
    pub fn sub_units(&self) -> &[SubUnit] {
        &self.sub_units
    }

    pub(crate) fn sub_unit_mut(&mut self, index: usize) -> &mut SubUnit {
        &mut self.sub_units[index]
    }

    /// Execution time of the first sub-unit; the arrival ranking key.
    pub fn first_exec_time(&self) -> u64 {
        self.sub_units.first().map_or(0, |u| u.exec_time)
    }

    /// Work left across all sub-units.
    pub fn remaining(&self) -> u64 {
        self.sub_units.iter().map(SubUnit::remaining).sum()
    }

    /// Whether every sub-unit is finished.
    pub fn is_complete(&self) -> bool {
        self.sub_units.iter().all(SubUnit::is_finished)
    }

    /// Latest sub-unit completion minus arrival, plus one.
    ///
    /// `None` until every sub-unit has finished.
    pub fn turnaround_time(&self) -> Option<Tick> {
        let completion = self
            .sub_units
            .iter()
            .map(SubUnit::completion)
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .max()?;
        Some(completion.saturating_sub(self.arrival) + 1)
    }

    /// Turnaround divided by declared execution time.
    pub fn overhead(&self) -> Option<f64> {
        let turnaround = self.turnaround_time()?;
        if self.exec_time == 0 {
            return None;
        }
        Some(turnaround as f64 / self.exec_time as f64)
    }

    /// Tick on which the driver reported this job finished.
    pub fn finished_at(&self) -> Option<Tick> {
        self.finished_at
    }

    /// Records the finished transition. Returns `false` if it already happened.
    pub(crate) fn mark_finished(&mut self, now: Tick) -> bool {
        if self.finished_at.is_some() {
            return false;
        }
        self.finished_at = Some(now);
        true
    }
}

/// Fragment count and per-fragment length for a parallel job.
fn parallel_split(exec_time: u64, processors: u64) -> (u64, u64) {
    if processors <= exec_time {
        (processors, 1 + exec_time.div_ceil(processors))
    } else {
        (exec_time, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_single_unit() {
        let job = Job::build(&JobSpec::new(1, 0, 5), 4).unwrap();
        assert_eq!(job.sub_units().len(), 1);
        assert_eq!(job.sub_units()[0].exec_time, 5);
        assert_eq!(job.remaining(), 5);
        assert!(!job.is_split());
    }

    #[test]
    fn test_parallel_split_inflates() {
        // 2 processors, 4 ticks: 2 fragments of 1 + ceil(4/2) = 3
        let job = Job::build(&JobSpec::new(1, 0, 4).parallel(), 2).unwrap();
        assert_eq!(job.sub_units().len(), 2);
        assert!(job.sub_units().iter().all(|u| u.exec_time == 3));
        assert_eq!(job.remaining(), 6);
        assert!(job.is_split());

        // 3 processors, 7 ticks: 1 + ceil(7/3) = 4
        let job = Job::build(&JobSpec::new(2, 0, 7).parallel(), 3).unwrap();
        assert_eq!(job.sub_units().len(), 3);
        assert_eq!(job.first_exec_time(), 4);
    }

    #[test]
    fn test_parallel_more_processors_than_work() {
        let job = Job::build(&JobSpec::new(9, 0, 3).parallel(), 8).unwrap();
        assert_eq!(job.sub_units().len(), 3);
        assert!(job.sub_units().iter().all(|u| u.exec_time == 2));
        let ids: Vec<u32> = job.sub_units().iter().map(|u| u.local_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_parallel_length_one_is_not_split() {
        let job = Job::build(&JobSpec::new(3, 0, 1).parallel(), 4).unwrap();
        assert_eq!(job.sub_units().len(), 1);
        assert!(!job.is_split());
        assert_eq!(job.mode(), ExecutionMode::Parallel);
    }

    #[test]
    fn test_turnaround_uses_latest_completion() {
        let mut job = Job::build(&JobSpec::new(1, 2, 2).parallel(), 2).unwrap();
        assert_eq!(job.turnaround_time(), None);

        // fragment 0 finishes at tick 3, fragment 1 at tick 5
        job.sub_unit_mut(0).advance(2);
        job.sub_unit_mut(0).advance(3);
        job.sub_unit_mut(1).advance(4);
        assert_eq!(job.turnaround_time(), None);
        job.sub_unit_mut(1).advance(5);

        assert!(job.is_complete());
        assert_eq!(job.turnaround_time(), Some(4));
        assert!((job.overhead().unwrap() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_mark_finished_once() {
        let mut job = Job::build(&JobSpec::new(1, 0, 1), 1).unwrap();
        assert!(job.mark_finished(3));
        assert!(!job.mark_finished(4));
        assert_eq!(job.finished_at(), Some(3));
    }

    #[test]
    fn test_tag_mapping() {
        assert_eq!(ExecutionMode::from_tag("p"), ExecutionMode::Parallel);
        assert_eq!(ExecutionMode::from_tag("n"), ExecutionMode::Sequential);
        assert_eq!(ExecutionMode::from_tag("P"), ExecutionMode::Sequential);
        assert_eq!(ExecutionMode::Parallel.as_tag(), "p");
    }
}
