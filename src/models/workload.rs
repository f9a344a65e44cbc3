//! Job arena.
//!
//! All jobs are built once, up front, and live until the simulation ends.
//! Processors and rankings refer to sub-units through [`UnitRef`] handles
//! (job index + sub-unit index), so no sub-unit ever outlives its job.

use serde::{Deserialize, Serialize};

use super::{Job, JobSpec, Progress, SubUnit, Tick};
use crate::error::{Result, SimError};

/// Handle to one sub-unit: its job's arena index and its position in that job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitRef {
    /// Index of the parent job in the arena.
    pub job: usize,
    /// Index of the sub-unit within the job.
    pub unit: usize,
}

impl UnitRef {
    /// Creates a handle.
    pub fn new(job: usize, unit: usize) -> Self {
        Self { job, unit }
    }
}

/// Owning arena of every job in a run, in process-list order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workload {
    jobs: Vec<Job>,
}

impl Workload {
    /// Builds every job from its spec, splitting parallel jobs for `processors` lanes.
    ///
    /// # Errors
    /// - [`SimError::Configuration`] if `processors` is zero.
    /// - [`SimError::ResourceExhaustion`] if the arena or any sub-unit list
    ///   cannot be allocated; everything built so far is dropped.
    pub fn build(specs: &[JobSpec], processors: usize) -> Result<Self> {
        if processors == 0 {
            return Err(SimError::Configuration("no processor to be made".into()));
        }

        let mut jobs = Vec::new();
        jobs.try_reserve_exact(specs.len()).map_err(|e| {
            SimError::ResourceExhaustion(format!("job list ({} jobs): {e}", specs.len()))
        })?;
        for spec in specs {
            jobs.push(Job::build(spec, processors)?);
        }

        Ok(Self { jobs })
    }

    /// Number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the arena holds no jobs.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// All jobs, in process-list order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// The job at arena index `index`.
    pub fn job(&self, index: usize) -> &Job {
        &self.jobs[index]
    }

    pub(crate) fn job_mut(&mut self, index: usize) -> &mut Job {
        &mut self.jobs[index]
    }

    /// The sub-unit behind a handle.
    pub fn unit(&self, r: UnitRef) -> &SubUnit {
        &self.jobs[r.job].sub_units()[r.unit]
    }

    /// The job owning a sub-unit.
    pub fn parent(&self, r: UnitRef) -> &Job {
        &self.jobs[r.job]
    }

    /// Work left on a sub-unit.
    pub fn remaining(&self, r: UnitRef) -> u64 {
        self.unit(r).remaining()
    }

    /// Waiting time of a sub-unit at `now`, measured from its parent's arrival.
    pub fn waiting_time(&self, r: UnitRef, now: Tick) -> i64 {
        self.unit(r).waiting_time(self.parent(r).arrival(), now)
    }

    /// Performs one tick of work on a sub-unit.
    pub fn advance(&mut self, r: UnitRef, now: Tick) -> Progress {
        self.jobs[r.job].sub_unit_mut(r.unit).advance(now)
    }

    /// Arena indices of jobs arriving exactly at `now`, in process-list order.
    pub fn arrivals_at(&self, now: Tick) -> impl Iterator<Item = usize> + '_ {
        self.jobs
            .iter()
            .enumerate()
            .filter(move |(_, job)| job.arrival() == now)
            .map(|(index, _)| index)
    }

    /// Handles to every sub-unit of a job, in local-id order.
    pub fn unit_refs(&self, job: usize) -> impl Iterator<Item = UnitRef> {
        (0..self.jobs[job].sub_units().len()).map(move |unit| UnitRef::new(job, unit))
    }
}
