//! Simulation driver.
//!
//! Advances a discrete clock one tick at a time. Each tick the active
//! strategy places new arrivals, completed jobs are detected, every
//! processor steps, and the tick's trace events are collected.
//!
//! # State Machine
//!
//! | State | Meaning | Transition |
//! |-------|---------|-----------|
//! | `Running` | some job unfinished | to `Terminal` when the last job is reported |
//! | `Terminal` | every job reported | none |
//!
//! A job is reported finished on the tick after its last sub-unit did its
//! final tick of work, when the processor holding it is inspected.
//! Only dispatches produce running events; a processor that keeps working
//! on the same sub-unit stays silent.

mod driver;
mod report;
mod trace;

pub use driver::{SimState, Simulation, TickReport};
pub use report::SimulationReport;
pub use trace::TraceEvent;
