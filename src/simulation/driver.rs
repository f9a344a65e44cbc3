//! Tick-driven simulation loop.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{SimulationReport, TraceEvent};
use crate::config::SimConfig;
use crate::container::OrderedList;
use crate::dispatching::{DispatchContext, SchedulingStrategy, StrategyKind};
use crate::error::{Result, SimError};
use crate::input::load_process_list;
use crate::models::{JobSpec, Processor, Tick, UnitRef, Workload};
use crate::validation::validate_jobs;

/// Whether the simulation has more ticks to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimState {
    /// Some job is unfinished.
    Running,
    /// Every job has been reported finished.
    Terminal,
}

/// Everything one tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Tick that was simulated.
    pub tick: Tick,
    /// Finished events first, then running events by processor id.
    pub events: Vec<TraceEvent>,
    /// State after the tick.
    pub state: SimState,
}

/// A multi-processor scheduling simulation.
///
/// # Example
/// ```
/// use procsim::dispatching::StrategyKind;
/// use procsim::models::JobSpec;
/// use procsim::simulation::Simulation;
///
/// let specs = vec![JobSpec::new(1, 0, 5)];
/// let mut sim = Simulation::new(&specs, 1, StrategyKind::ShortestRemaining).unwrap();
///
/// let mut lines = Vec::new();
/// let report = sim.run(|event| lines.push(event.to_string()));
///
/// assert_eq!(lines[0], "0,RUNNING,pid=1,remaining_time=5,cpu=0");
/// assert_eq!(report.makespan, 5);
/// ```
#[derive(Debug)]
pub struct Simulation {
    workload: Workload,
    processors: Vec<Processor>,
    strategy: Box<dyn SchedulingStrategy>,
    unfinished: usize,
    finished: usize,
    now: Tick,
    state: SimState,
}

impl Simulation {
    /// Builds the job arena and `processors` idle lanes.
    ///
    /// # Errors
    /// - [`SimError::InvalidWorkload`] for duplicate ids or zero-length jobs.
    /// - [`SimError::Configuration`] if `processors` is zero.
    /// - [`SimError::ResourceExhaustion`] if any allocation fails.
    pub fn new(specs: &[JobSpec], processors: usize, strategy: StrategyKind) -> Result<Self> {
        validate_jobs(specs).map_err(SimError::InvalidWorkload)?;
        let workload = Workload::build(specs, processors)?;

        let mut lanes = Vec::new();
        lanes.try_reserve_exact(processors).map_err(|e| {
            SimError::ResourceExhaustion(format!("{processors} processors: {e}"))
        })?;
        lanes.extend((0..processors).map(Processor::new));

        let strategy = strategy.build();
        info!(
            jobs = workload.len(),
            processors,
            strategy = strategy.name(),
            description = strategy.description(),
            "simulation initialised"
        );

        Ok(Self {
            workload,
            processors: lanes,
            strategy,
            unfinished: 0,
            finished: 0,
            now: 0,
            state: SimState::Running,
        })
    }

    /// Validates the config, loads its process list and builds the simulation.
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let specs = load_process_list(config.process_list())?;
        Self::new(&specs, config.processors, config.strategy)
    }

    /// Current tick. After the terminal tick this is the makespan.
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Current state.
    pub fn state(&self) -> SimState {
        self.state
    }

    /// Whether every job has been reported finished.
    pub fn is_complete(&self) -> bool {
        self.state == SimState::Terminal
    }

    /// The job arena.
    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    /// The processors, indexed by id.
    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    /// The active strategy.
    pub fn strategy(&self) -> &dyn SchedulingStrategy {
        self.strategy.as_ref()
    }

    /// Simulates the current tick.
    ///
    /// 1. Jobs arriving now are placed by the strategy.
    /// 2. Each processor's current sub-unit is checked before stepping; a
    ///    job with no work left is reported finished, once.
    /// 3. Every processor steps in id order.
    /// 4. The clock advances unless every job is finished.
    ///
    /// Calling this after the terminal tick does nothing.
    pub fn tick(&mut self) -> TickReport {
        let now = self.now;
        if self.state == SimState::Terminal {
            return TickReport {
                tick: now,
                events: Vec::new(),
                state: SimState::Terminal,
            };
        }

        let ctx = DispatchContext::at_time(now, &self.workload);
        let arrived = self.strategy.schedule(&mut self.processors, &ctx);
        self.unfinished += arrived;

        let mut events = Vec::new();
        let mut done: OrderedList<usize> = OrderedList::new();
        for processor in &self.processors {
            let Some(current) = processor.current() else {
                continue;
            };
            if self.workload.parent(current).remaining() != 0 {
                continue;
            }
            if self.workload.job_mut(current.job).mark_finished(now) {
                done.push(current.job);
                self.unfinished -= 1;
                self.finished += 1;
                events.push(TraceEvent::Finished {
                    tick: now,
                    job: self.workload.job(current.job).id(),
                    unfinished: self.unfinished,
                });
            }
        }

        let mut running: Vec<Option<UnitRef>> = vec![None; self.processors.len()];
        for processor in &mut self.processors {
            processor.step(&mut self.workload, now, &mut running);
        }

        for (cpu, slot) in running.iter().enumerate() {
            let Some(unit) = *slot else {
                continue;
            };
            let parent = self.workload.parent(unit);
            events.push(TraceEvent::Running {
                tick: now,
                job: parent.id(),
                sub_unit: parent.is_split().then(|| self.workload.unit(unit).local_id),
                remaining: self.workload.remaining(unit),
                cpu,
            });
        }

        if arrived > 0 || !done.is_empty() {
            debug!(
                now,
                arrived,
                finished = ?done.as_slice(),
                unfinished = self.unfinished,
                "tick"
            );
        }

        if self.finished == self.workload.len() {
            self.state = SimState::Terminal;
            info!(makespan = now, jobs = self.finished, "simulation complete");
        } else {
            self.now += 1;
        }

        TickReport {
            tick: now,
            events,
            state: self.state,
        }
    }

    /// Runs to the terminal tick, handing every event to `sink`.
    pub fn run(&mut self, mut sink: impl FnMut(&TraceEvent)) -> SimulationReport {
        while !self.is_complete() {
            for event in &self.tick().events {
                sink(event);
            }
        }
        self.report()
    }

    /// Statistics over the jobs finished so far.
    pub fn report(&self) -> SimulationReport {
        SimulationReport::calculate(self.workload.jobs(), self.now)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::generator::WorkloadGenerator;

    fn trace(specs: &[JobSpec], processors: usize, strategy: StrategyKind) -> (Vec<String>, SimulationReport) {
        let mut sim = Simulation::new(specs, processors, strategy).unwrap();
        let mut lines = Vec::new();
        let report = sim.run(|event| lines.push(event.to_string()));
        (lines, report)
    }

    #[test]
    fn test_single_sequential_job() {
        let (lines, report) = trace(&[JobSpec::new(1, 0, 5)], 1, StrategyKind::default());
        assert_eq!(
            lines,
            vec![
                "0,RUNNING,pid=1,remaining_time=5,cpu=0",
                "5,FINISHED,pid=1,proc_remaining=0",
            ]
        );
        assert_eq!(report.makespan, 5);
        assert_eq!(report.to_string(), "Turnaround time 5\nTime overhead 1 1\nMakespan 5");
    }

    #[test]
    fn test_parallel_job_on_two_processors() {
        let (lines, report) = trace(&[JobSpec::new(1, 0, 4).parallel()], 2, StrategyKind::default());
        assert_eq!(
            lines,
            vec![
                "0,RUNNING,pid=1.0,remaining_time=3,cpu=0",
                "0,RUNNING,pid=1.1,remaining_time=3,cpu=1",
                "3,FINISHED,pid=1,proc_remaining=0",
            ]
        );
        assert_eq!(report.mean_turnaround, 3);
        assert!((report.mean_overhead - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_equal_arrivals_lower_id_first() {
        let specs = [JobSpec::new(2, 0, 3), JobSpec::new(1, 0, 3)];
        for kind in [StrategyKind::ShortestRemaining, StrategyKind::WaitBalanced] {
            let (lines, report) = trace(&specs, 1, kind);
            assert_eq!(
                lines,
                vec![
                    "0,RUNNING,pid=1,remaining_time=3,cpu=0",
                    "3,FINISHED,pid=1,proc_remaining=1",
                    "3,RUNNING,pid=2,remaining_time=3,cpu=0",
                    "6,FINISHED,pid=2,proc_remaining=0",
                ]
            );
            assert_eq!(
                report.to_string(),
                "Turnaround time 5\nTime overhead 2 1.5\nMakespan 6"
            );
        }
    }

    #[test]
    fn test_shorter_arrival_preempts() {
        let specs = [JobSpec::new(1, 0, 10), JobSpec::new(2, 2, 3)];
        let (lines, report) = trace(&specs, 1, StrategyKind::ShortestRemaining);
        assert_eq!(
            lines,
            vec![
                "0,RUNNING,pid=1,remaining_time=10,cpu=0",
                "2,RUNNING,pid=2,remaining_time=3,cpu=0",
                "5,FINISHED,pid=2,proc_remaining=1",
                "5,RUNNING,pid=1,remaining_time=8,cpu=0",
                "13,FINISHED,pid=1,proc_remaining=0",
            ]
        );
        assert_eq!(report.makespan, 13);
    }

    #[test]
    fn test_wait_balanced_does_not_preempt() {
        let specs = [JobSpec::new(1, 0, 10), JobSpec::new(2, 2, 3)];
        let (lines, report) = trace(&specs, 1, StrategyKind::WaitBalanced);
        assert_eq!(
            lines,
            vec![
                "0,RUNNING,pid=1,remaining_time=10,cpu=0",
                "10,FINISHED,pid=1,proc_remaining=1",
                "10,RUNNING,pid=2,remaining_time=3,cpu=0",
                "13,FINISHED,pid=2,proc_remaining=0",
            ]
        );
        assert_eq!(report.makespan, 13);
    }

    #[test]
    fn test_overhead_rounds_half_up_in_report() {
        // job 2 waits one tick behind job 1: turnaround 201 for 200 ticks of work
        let specs = [JobSpec::new(1, 0, 2), JobSpec::new(2, 1, 200)];
        let mut sim = Simulation::new(&specs, 1, StrategyKind::WaitBalanced).unwrap();
        let report = sim.run(|_| {});

        let turnarounds: Vec<Option<u64>> =
            sim.workload().jobs().iter().map(|j| j.turnaround_time()).collect();
        assert_eq!(turnarounds, vec![Some(2), Some(201)]);

        assert_eq!(report.max_overhead, 1.01);
        // mean of 1 and 1.005 is 1.0025
        assert_eq!(report.mean_overhead, 1.0);
        assert_eq!(report.to_string(), "Turnaround time 102\nTime overhead 1.01 1\nMakespan 202");
    }

    #[test]
    fn test_tick_reports() {
        let mut sim = Simulation::new(&[JobSpec::new(1, 1, 1)], 1, StrategyKind::default()).unwrap();
        assert_eq!(sim.strategy().name(), "SRT");
        assert_eq!(sim.state(), SimState::Running);

        let first = sim.tick();
        assert_eq!(first.tick, 0);
        assert!(first.events.is_empty());
        assert_eq!(first.state, SimState::Running);

        let second = sim.tick();
        assert_eq!(second.tick, 1);
        assert_eq!(second.events.len(), 1);

        let third = sim.tick();
        assert_eq!(third.state, SimState::Terminal);
        assert_eq!(sim.state(), SimState::Terminal);
        assert_eq!(sim.now(), 2);
        assert!(sim.is_complete());
        assert_eq!(sim.workload().job(0).finished_at(), Some(2));

        // further ticks are inert
        assert!(sim.tick().events.is_empty());
        assert_eq!(sim.now(), 2);
    }

    #[test]
    fn test_empty_workload_terminates_immediately() {
        let (lines, report) = trace(&[], 3, StrategyKind::default());
        assert!(lines.is_empty());
        assert_eq!(report.makespan, 0);
        assert_eq!(report.mean_turnaround, 0);
    }

    #[test]
    fn test_zero_processors() {
        let err = Simulation::new(&[JobSpec::new(1, 0, 1)], 0, StrategyKind::default()).unwrap_err();
        assert!(matches!(err, SimError::Configuration(_)));
    }

    #[test]
    fn test_invalid_workload() {
        let err = Simulation::new(&[JobSpec::new(1, 0, 0)], 1, StrategyKind::default()).unwrap_err();
        assert!(matches!(err, SimError::InvalidWorkload(_)));
    }

    #[test]
    fn test_reruns_are_identical() {
        let specs = WorkloadGenerator::with_seed(42).with_ticks(40).generate();
        for kind in [StrategyKind::ShortestRemaining, StrategyKind::WaitBalanced] {
            let first = trace(&specs, 3, kind);
            let second = trace(&specs, 3, kind);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_generated_workloads_hold_invariants() {
        for seed in 0..8 {
            let specs = WorkloadGenerator::with_seed(seed)
                .with_ticks(30)
                .with_arrival_probability(0.5)
                .with_parallel_probability(0.5)
                .generate();

            for kind in [StrategyKind::ShortestRemaining, StrategyKind::WaitBalanced] {
                let mut sim = Simulation::new(&specs, 3, kind).unwrap();
                let mut finished = HashSet::new();

                while !sim.is_complete() {
                    let report = sim.tick();
                    for event in &report.events {
                        if let TraceEvent::Finished { job, .. } = event {
                            assert!(finished.insert(*job), "job {job} finished twice");
                        }
                    }

                    // every sub-unit sits on at most one processor
                    let mut seen = HashSet::new();
                    for processor in sim.processors() {
                        for &unit in processor.current().iter().chain(processor.pending().iter()) {
                            assert!(seen.insert(unit), "{unit:?} held twice");
                        }
                    }

                    // and unfinished work of an arrived job is never dropped
                    let workload = sim.workload();
                    for (index, job) in workload.jobs().iter().enumerate() {
                        if job.arrival() > report.tick || job.finished_at().is_some() {
                            continue;
                        }
                        for unit in workload.unit_refs(index) {
                            assert!(
                                seen.contains(&unit) || workload.unit(unit).is_finished(),
                                "{unit:?} lost at tick {}",
                                report.tick
                            );
                        }
                    }
                    assert!(report.tick < 10_000);
                }

                assert_eq!(finished.len(), specs.len());
                for job in sim.workload().jobs() {
                    let turnaround = job.turnaround_time().unwrap();
                    // split jobs can beat their declared time, never their fragment length
                    assert!(turnaround >= job.first_exec_time());
                    if !job.is_split() {
                        assert!(turnaround >= job.exec_time());
                    }
                    assert!(job.finished_at().unwrap() > job.arrival());
                }
            }
        }
    }

    #[test]
    fn test_from_config_missing_file() {
        let config = SimConfig::new("/nonexistent/procsim/jobs.txt", 2);
        assert!(matches!(Simulation::from_config(&config), Err(SimError::Io(_))));

        let config = SimConfig::new("/nonexistent/procsim/jobs.txt", 0);
        assert!(matches!(
            Simulation::from_config(&config),
            Err(SimError::Configuration(_))
        ));
    }
}
