//! Processor model.
//!
//! A processor is one simulated execution lane: at most one current
//! sub-unit plus an ordered pending queue. Strategies decide the queue
//! order; the processor itself only ever takes from the head.

use tracing::trace;

use super::{Progress, Tick, UnitRef, Workload};
use crate::container::OrderedList;

/// Processor identifier, `0..N-1` in creation order.
pub type ProcessorId = usize;

/// One simulated execution lane.
#[derive(Debug, Clone)]
pub struct Processor {
    id: ProcessorId,
    current: Option<UnitRef>,
    pending: OrderedList<UnitRef>,
}

impl Processor {
    /// Creates an idle processor.
    pub fn new(id: ProcessorId) -> Self {
        Self {
            id,
            current: None,
            pending: OrderedList::new(),
        }
    }

    /// Processor identifier.
    pub fn id(&self) -> ProcessorId {
        self.id
    }

    /// The sub-unit occupying this lane, if any.
    ///
    /// May be a sub-unit that finished on the previous tick; it is cleared
    /// at the start of the next step.
    pub fn current(&self) -> Option<UnitRef> {
        self.current
    }

    /// Sub-units waiting for this lane, head first.
    pub fn pending(&self) -> &OrderedList<UnitRef> {
        &self.pending
    }

    pub(crate) fn pending_mut(&mut self) -> &mut OrderedList<UnitRef> {
        &mut self.pending
    }

    #[cfg(test)]
    pub(crate) fn set_current(&mut self, unit: Option<UnitRef>) {
        self.current = unit;
    }

    /// Displaces the current sub-unit in favour of `incoming`.
    ///
    /// The old current goes to the head of the queue and `incoming` in
    /// front of it; the lane is left empty so the next step picks
    /// `incoming` up from the queue.
    pub fn preempt_with(&mut self, incoming: UnitRef) {
        if let Some(old) = self.current.take() {
            self.pending.insert_at(0, old);
        }
        self.pending.insert_at(0, incoming);
    }

    /// Whether `unit` is current or pending here.
    pub fn holds(&self, unit: UnitRef) -> bool {
        self.current == Some(unit) || self.pending.find_first(&unit).is_some()
    }

    /// Advances the lane by one tick.
    ///
    /// 1. A current sub-unit with nothing left is dropped.
    /// 2. A remaining current sub-unit gets one tick of work.
    /// 3. Otherwise the queue head becomes current, gets one tick of work,
    ///    and is recorded in `running[self.id()]`.
    ///
    /// Only this processor's slot of `running` is written.
    pub fn step(&mut self, workload: &mut Workload, now: Tick, running: &mut [Option<UnitRef>]) {
        if let Some(current) = self.current {
            if workload.remaining(current) == 0 {
                self.current = None;
            }
        }

        if let Some(current) = self.current {
            let progress = workload.advance(current, now);
            trace!(cpu = self.id, ?current, ?progress, "continued");
        } else if let Some(next) = self.pending.pop_front() {
            self.current = Some(next);
            let progress = workload.advance(next, now);
            running[self.id] = Some(next);
            trace!(cpu = self.id, unit = ?next, ?progress, "dispatched");
            debug_assert_ne!(progress, Progress::AlreadyFinished);
        }
    }

    /// Work left on this lane: current remaining plus every queued remaining.
    pub fn remaining_time(&self, workload: &Workload) -> u64 {
        self.current
            .iter()
            .chain(self.pending.iter())
            .map(|&r| workload.remaining(r))
            .sum()
    }

    /// Largest `parent arrival + sub-unit exec time` over current and queued work.
    ///
    /// Despite the name this is the farthest deadline on the lane; neither
    /// strategy consults it. `None` when the lane is idle and empty.
    pub fn nearest_deadline(&self, workload: &Workload) -> Option<Tick> {
        self.current
            .iter()
            .chain(self.pending.iter())
            .map(|&r| workload.parent(r).arrival() + workload.unit(r).exec_time)
            .max()
    }

    /// Summed waiting time of every queued sub-unit at `now`.
    ///
    /// The current sub-unit is not counted.
    pub fn waiting_load(&self, workload: &Workload, now: Tick) -> i64 {
        self.pending
            .iter()
            .map(|&r| workload.waiting_time(r, now))
            .sum()
    }
}
