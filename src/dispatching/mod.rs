//! Dispatching strategies.
//!
//! A strategy answers three questions every tick, for the jobs whose
//! arrival tick is now:
//!
//! 1. In which order are the arriving jobs placed?
//! 2. Which processor receives each sub-unit of a job?
//! 3. Where in that processor's pending queue does the sub-unit go?
//!
//! Two strategies are built in:
//!
//! | Strategy | Arrival order | Processor choice | Queue position |
//! |----------|---------------|------------------|----------------|
//! | [`ShortestRemaining`] (default) | shortest first sub-unit, lower id | least remaining work | shortest remaining; may preempt |
//! | [`WaitBalanced`] (`-c`) | shortest first sub-unit, lower id | least accumulated waiting | least waiting; never preempts |
//!
//! # Usage
//!
//! ```
//! use procsim::dispatching::{DispatchContext, StrategyKind};
//! use procsim::models::{JobSpec, Processor, Workload};
//!
//! let workload = Workload::build(&[JobSpec::new(1, 0, 3)], 2).unwrap();
//! let mut processors: Vec<Processor> = (0..2).map(Processor::new).collect();
//!
//! let strategy = StrategyKind::ShortestRemaining.build();
//! let ctx = DispatchContext::at_time(0, &workload);
//! assert_eq!(strategy.schedule(&mut processors, &ctx), 1);
//! assert_eq!(processors[0].pending().len(), 1);
//! ```

mod context;
mod ranking;
mod shortest_remaining;
mod wait_balanced;

pub use context::DispatchContext;
pub use shortest_remaining::ShortestRemaining;
pub use wait_balanced::WaitBalanced;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::debug;

use crate::container::OrderedList;
use crate::models::{Processor, ProcessorId, UnitRef};

/// A policy for placing newly arrived work onto processors.
///
/// Processors must be indexed by their id. Strategies only reorder
/// queues; they never advance work.
pub trait SchedulingStrategy: Send + Sync + Debug {
    /// Short name (e.g. "SRT").
    fn name(&self) -> &'static str;

    /// Strategy description.
    fn description(&self) -> &'static str {
        self.name()
    }

    /// Arena indices of the jobs arriving at `ctx.now`, in placement order.
    fn rank_arrivals(&self, ctx: &DispatchContext<'_>) -> OrderedList<usize>;

    /// Every processor id, best target first.
    fn rank_processors(&self, processors: &[Processor], ctx: &DispatchContext<'_>)
        -> OrderedList<ProcessorId>;

    /// Places one sub-unit on its target processor.
    fn place(&self, unit: UnitRef, processor: &mut Processor, ctx: &DispatchContext<'_>);

    /// Assigns every job arriving at `ctx.now`.
    ///
    /// The processor ranking is rebuilt for each job, so later arrivals see
    /// the placements of earlier ones. The i-th sub-unit of a job goes to
    /// the i-th ranked processor. Returns the number of arriving jobs.
    fn schedule(&self, processors: &mut [Processor], ctx: &DispatchContext<'_>) -> usize {
        let arrivals = self.rank_arrivals(ctx);

        for &job in &arrivals {
            let ranking = self.rank_processors(processors, ctx);
            debug!(
                strategy = self.name(),
                now = ctx.now,
                job = ctx.workload.job(job).id(),
                ranking = ?ranking.as_slice(),
                "assigning arrival"
            );

            for (unit, &cpu) in ctx.workload.unit_refs(job).zip(ranking.iter()) {
                self.place(unit, &mut processors[cpu], ctx);
            }
        }

        arrivals.len()
    }
}

/// Selects one of the built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Shortest-remaining-time with preemption.
    #[default]
    ShortestRemaining,
    /// Waiting-time balancing without preemption.
    WaitBalanced,
}

impl StrategyKind {
    /// Maps the `-c` command-line flag.
    pub fn from_custom_flag(custom: bool) -> Self {
        if custom {
            Self::WaitBalanced
        } else {
            Self::ShortestRemaining
        }
    }

    /// Instantiates the strategy.
    pub fn build(self) -> Box<dyn SchedulingStrategy> {
        match self {
            Self::ShortestRemaining => Box::new(ShortestRemaining),
            Self::WaitBalanced => Box::new(WaitBalanced),
        }
    }
}
