//! Insertion rankings shared by the strategies.
//!
//! Rankings are rebuilt from scratch by linear insertion whenever they are
//! needed: candidates are visited in a fixed order (process-list order for
//! jobs, id order for processors) and each lands in front of the first
//! entry it beats. Ties that survive every criterion keep visiting order.

use super::DispatchContext;
use crate::container::OrderedList;
use crate::models::{Processor, ProcessorId, Workload};

/// Whether arriving job `job` ranks ahead of `existing`.
///
/// Shorter first sub-unit first; lower job id on a tie.
pub(crate) fn arrives_before(workload: &Workload, job: usize, existing: usize) -> bool {
    let (candidate, other) = (workload.job(job), workload.job(existing));
    let (exec, exec2) = (candidate.first_exec_time(), other.first_exec_time());
    exec < exec2 || (exec == exec2 && candidate.id() < other.id())
}

/// Ranks this tick's arrivals with a full insertion scan.
pub(crate) fn rank_arrivals_by_insertion(ctx: &DispatchContext<'_>) -> OrderedList<usize> {
    let mut ranked = OrderedList::new();
    for job in ctx.workload.arrivals_at(ctx.now) {
        let at = ranked.insertion_point(|&existing| arrives_before(ctx.workload, job, existing));
        ranked.insert_at(at, job);
    }
    ranked
}

/// Ranks processors, visiting them in id order.
///
/// `before(candidate, existing)` decides whether `candidate` goes in front.
pub(crate) fn rank_processors_by<F>(processors: &[Processor], mut before: F) -> OrderedList<ProcessorId>
where
    F: FnMut(&Processor, &Processor) -> bool,
{
    let mut ranked: OrderedList<ProcessorId> = OrderedList::with_capacity(processors.len());
    for candidate in processors {
        let at = ranked.insertion_point(|&existing| before(candidate, &processors[existing]));
        ranked.insert_at(at, candidate.id());
    }
    ranked
}
