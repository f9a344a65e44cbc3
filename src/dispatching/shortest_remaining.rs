//! Shortest-remaining-time strategy (the default).
//!
//! - Arrivals: shortest first sub-unit first, lower job id on a tie.
//! - Processors: least total remaining work first, lower id on a tie.
//! - Queue: ordered by remaining time, lower job id on a tie. An incoming
//!   sub-unit shorter than the running one (or equal, from a lower job id)
//!   preempts it.

use tracing::debug;

use super::ranking::{arrives_before, rank_processors_by};
use super::{DispatchContext, SchedulingStrategy};
use crate::container::OrderedList;
use crate::models::{Processor, ProcessorId, UnitRef};

/// Shortest Remaining Time with preemption.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestRemaining;

impl SchedulingStrategy for ShortestRemaining {
    fn name(&self) -> &'static str {
        "SRT"
    }

    fn description(&self) -> &'static str {
        "Shortest Remaining Time"
    }

    /// Keeps the fastest and slowest keys seen so far, so a new minimum or
    /// maximum is placed without scanning.
    fn rank_arrivals(&self, ctx: &DispatchContext<'_>) -> OrderedList<usize> {
        let workload = ctx.workload;
        let mut ranked = OrderedList::new();
        let (mut fastest, mut slowest) = (0, 0);

        for job in workload.arrivals_at(ctx.now) {
            let exec = workload.job(job).first_exec_time();

            let at = if ranked.is_empty() {
                fastest = exec;
                slowest = exec;
                0
            } else if exec < fastest {
                fastest = exec;
                0
            } else if exec > slowest {
                slowest = exec;
                ranked.len()
            } else {
                ranked.insertion_point(|&existing| arrives_before(workload, job, existing))
            };

            ranked.insert_at(at, job);
        }

        ranked
    }

    fn rank_processors(
        &self,
        processors: &[Processor],
        ctx: &DispatchContext<'_>,
    ) -> OrderedList<ProcessorId> {
        rank_processors_by(processors, |candidate, existing| {
            let rem = candidate.remaining_time(ctx.workload);
            let rem2 = existing.remaining_time(ctx.workload);
            rem < rem2 || (rem == rem2 && candidate.id() < existing.id())
        })
    }

    fn place(&self, unit: UnitRef, processor: &mut Processor, ctx: &DispatchContext<'_>) {
        let workload = ctx.workload;
        let incoming = workload.unit(unit).exec_time;
        let incoming_id = workload.parent(unit).id();

        if let Some(current) = processor.current() {
            let held = workload.remaining(current);
            let held_id = workload.parent(current).id();

            if held > 0 && (incoming < held || (incoming == held && incoming_id < held_id)) {
                debug!(
                    cpu = processor.id(),
                    job = incoming_id,
                    preempted = held_id,
                    "preempting current sub-unit"
                );
                processor.preempt_with(unit);
                return;
            }
        }

        let at = processor.pending().insertion_point(|&queued| {
            let rem = workload.remaining(queued);
            incoming < rem || (incoming == rem && incoming_id < workload.parent(queued).id())
        });
        debug!(cpu = processor.id(), job = incoming_id, position = at, "queued");
        processor.pending_mut().insert_at(at, unit);
    }
}
