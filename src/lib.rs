//! Discrete-time multi-processor scheduling simulator.
//!
//! Reads a static process list, splits parallelizable jobs into
//! per-processor sub-units, and steps a set of simulated processors one
//! tick at a time under a pluggable dispatching strategy. Produces a
//! per-tick trace and turnaround/overhead statistics.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Job`, `SubUnit`, `Processor`, and the
//!   `Workload` arena that owns them
//! - **`container`**: `OrderedList`, the positional sequence behind queues
//!   and rankings
//! - **`dispatching`**: `SchedulingStrategy` and the two built-in strategies
//! - **`simulation`**: The tick loop, trace events, and final report
//! - **`input`**: Process-list parsing
//! - **`validation`**: Input integrity checks (duplicate IDs, empty jobs)
//! - **`config`**: Run configuration
//! - **`generator`**: Seeded random workloads
//!
//! # Example
//!
//! ```
//! use procsim::dispatching::StrategyKind;
//! use procsim::input::parse_process_list;
//! use procsim::simulation::Simulation;
//!
//! let specs = parse_process_list("0 1 4 p\n").unwrap();
//! let mut sim = Simulation::new(&specs, 2, StrategyKind::default()).unwrap();
//!
//! let mut trace = Vec::new();
//! let report = sim.run(|event| trace.push(event.to_string()));
//!
//! assert_eq!(trace.len(), 3);
//! assert_eq!(report.makespan, 3);
//! ```
//!
//! # References
//!
//! - Arpaci-Dusseau & Arpaci-Dusseau (2018), "Operating Systems: Three Easy
//!   Pieces", Ch. 7 (STCF and turnaround time) and Ch. 10 (multiprocessor scheduling)
//! - Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5:
//!   CPU Scheduling

pub mod config;
pub mod container;
pub mod dispatching;
pub mod error;
pub mod generator;
pub mod input;
pub mod models;
pub mod simulation;
pub mod validation;

pub use error::{Result, SimError};
