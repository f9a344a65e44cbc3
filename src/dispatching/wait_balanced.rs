//! Waiting-time balancing strategy (`-c`).
//!
//! Shortest-remaining-time starves long jobs: every short arrival jumps
//! ahead of them. This strategy spreads work by how long the queued work
//! has already waited instead of by how much is left.
//!
//! - Arrivals: shortest first sub-unit first, lower job id on a tie.
//! - Processors: least summed waiting time of queued work first, then
//!   least remaining work, then lower id.
//! - Queue: ordered by waiting time, then remaining time, then job id.
//!   The running sub-unit is never preempted.

use tracing::debug;

use super::ranking::{rank_arrivals_by_insertion, rank_processors_by};
use super::{DispatchContext, SchedulingStrategy};
use crate::container::OrderedList;
use crate::models::{Processor, ProcessorId, UnitRef};

/// Waiting-time balanced placement without preemption.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitBalanced;

impl SchedulingStrategy for WaitBalanced {
    fn name(&self) -> &'static str {
        "WAIT"
    }

    fn description(&self) -> &'static str {
        "Waiting-Time Balanced"
    }

    fn rank_arrivals(&self, ctx: &DispatchContext<'_>) -> OrderedList<usize> {
        rank_arrivals_by_insertion(ctx)
    }

    /// Waiting loads are recomputed on every comparison.
    fn rank_processors(
        &self,
        processors: &[Processor],
        ctx: &DispatchContext<'_>,
    ) -> OrderedList<ProcessorId> {
        let (workload, now) = (ctx.workload, ctx.now);

        rank_processors_by(processors, |candidate, existing| {
            let load = candidate.waiting_load(workload, now);
            let load2 = existing.waiting_load(workload, now);
            if load != load2 {
                return load < load2;
            }

            let rem = candidate.remaining_time(workload);
            let rem2 = existing.remaining_time(workload);
            rem < rem2 || (rem == rem2 && candidate.id() < existing.id())
        })
    }

    fn place(&self, unit: UnitRef, processor: &mut Processor, ctx: &DispatchContext<'_>) {
        let (workload, now) = (ctx.workload, ctx.now);
        // zero for a sub-unit arriving now
        let waiting = workload.waiting_time(unit, now);
        let rem = workload.remaining(unit);
        let id = workload.parent(unit).id();

        let at = processor.pending().insertion_point(|&queued| {
            let waiting2 = workload.waiting_time(queued, now);
            if waiting != waiting2 {
                return waiting < waiting2;
            }

            let rem2 = workload.remaining(queued);
            rem < rem2 || (rem == rem2 && id < workload.parent(queued).id())
        });

        debug!(cpu = processor.id(), job = id, position = at, "queued");
        processor.pending_mut().insert_at(at, unit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::ShortestRemaining;
    use crate::models::{JobSpec, Workload};

    /// P0 runs a long job with nothing queued; P1 has a short job that has
    /// been waiting since tick 0. A new job arrives at tick 3.
    fn contested() -> (Workload, Vec<Processor>) {
        let workload = Workload::build(
            &[
                JobSpec::new(1, 0, 10),
                JobSpec::new(2, 0, 1),
                JobSpec::new(3, 3, 2),
            ],
            2,
        )
        .unwrap();
        let mut processors: Vec<Processor> = (0..2).map(Processor::new).collect();
        processors[0].set_current(Some(UnitRef::new(0, 0)));
        processors[1].pending_mut().push(UnitRef::new(1, 0));
        (workload, processors)
    }

    #[test]
    fn test_prefers_least_waiting_over_least_work() {
        let (workload, mut processors) = contested();
        let ctx = DispatchContext::at_time(3, &workload);

        assert_eq!(WaitBalanced.schedule(&mut processors, &ctx), 1);
        // never preempts the running job
        assert_eq!(processors[0].current(), Some(UnitRef::new(0, 0)));
        assert_eq!(processors[0].pending().as_slice(), &[UnitRef::new(2, 0)]);
        assert_eq!(processors[1].pending().len(), 1);
    }

    #[test]
    fn test_default_strategy_diverges_on_same_state() {
        let (workload, mut processors) = contested();
        let ctx = DispatchContext::at_time(3, &workload);

        ShortestRemaining.schedule(&mut processors, &ctx);
        assert!(processors[0].pending().is_empty());
        assert_eq!(
            processors[1].pending().as_slice(),
            &[UnitRef::new(1, 0), UnitRef::new(2, 0)]
        );
    }

    #[test]
    fn test_ties_fall_back_to_remaining_then_id() {
        let workload = Workload::build(
            &[
                JobSpec::new(1, 0, 5),
                JobSpec::new(2, 0, 5),
                JobSpec::new(3, 0, 5),
            ],
            2,
        )
        .unwrap();
        let mut processors: Vec<Processor> = (0..2).map(Processor::new).collect();
        let ctx = DispatchContext::at_time(0, &workload);
        WaitBalanced.schedule(&mut processors, &ctx);

        // job 1 → P0 (all tied), job 2 → P1 (less work), job 3 → P0 (tied, lower id)
        assert_eq!(
            processors[0].pending().as_slice(),
            &[UnitRef::new(0, 0), UnitRef::new(2, 0)]
        );
        assert_eq!(processors[1].pending().as_slice(), &[UnitRef::new(1, 0)]);
    }

    #[test]
    fn test_fresh_arrival_goes_ahead_of_waiting_work() {
        let workload =
            Workload::build(&[JobSpec::new(1, 0, 2), JobSpec::new(2, 4, 9)], 1).unwrap();
        let ctx = DispatchContext::at_time(4, &workload);
        let mut cpu = Processor::new(0);
        cpu.pending_mut().push(UnitRef::new(0, 0));

        WaitBalanced.place(UnitRef::new(1, 0), &mut cpu, &ctx);
        assert_eq!(
            cpu.pending().as_slice(),
            &[UnitRef::new(1, 0), UnitRef::new(0, 0)]
        );
    }
}
