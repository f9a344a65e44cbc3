//! Seeded random workloads.
//!
//! Produces Bernoulli arrival streams: on each tick a job arrives with
//! probability `arrival_probability`, is parallelizable with probability
//! `parallel_probability`, and needs a uniformly drawn execution time.
//! The same seed always yields the same list.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::input::to_process_list;
use crate::models::{ExecutionMode, JobSpec};

/// Parameters of a generated workload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadGenerator {
    /// Ticks over which arrivals are drawn.
    pub ticks: u64,
    /// Chance of an arrival on any tick (0.0..=1.0).
    pub arrival_probability: f64,
    /// Chance an arriving job is parallelizable (0.0..=1.0).
    pub parallel_probability: f64,
    /// Shortest execution time drawn.
    pub min_exec: u64,
    /// Longest execution time drawn.
    pub max_exec: u64,
    /// RNG seed.
    pub seed: u64,
}

impl Default for WorkloadGenerator {
    fn default() -> Self {
        Self {
            ticks: 50,
            arrival_probability: 0.3,
            parallel_probability: 0.3,
            min_exec: 1,
            max_exec: 10,
            seed: 0,
        }
    }
}

impl WorkloadGenerator {
    /// Creates a generator with default parameters and the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Sets the arrival window.
    pub fn with_ticks(mut self, ticks: u64) -> Self {
        self.ticks = ticks;
        self
    }

    /// Sets the per-tick arrival probability.
    pub fn with_arrival_probability(mut self, p: f64) -> Self {
        self.arrival_probability = probability(p);
        self
    }

    /// Sets the probability that an arrival is parallelizable.
    pub fn with_parallel_probability(mut self, p: f64) -> Self {
        self.parallel_probability = probability(p);
        self
    }

    /// Sets the execution time range (inclusive). Zero is raised to one.
    pub fn with_exec_range(mut self, min_exec: u64, max_exec: u64) -> Self {
        self.min_exec = min_exec.max(1);
        self.max_exec = max_exec.max(self.min_exec);
        self
    }

    /// Draws the job list. Ids are `1..` in arrival order.
    pub fn generate(&self) -> Vec<JobSpec> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let min_exec = self.min_exec.max(1);
        let max_exec = self.max_exec.max(min_exec);
        let arrival_p = probability(self.arrival_probability);
        let parallel_p = probability(self.parallel_probability);
        let mut specs = Vec::new();

        for tick in 0..self.ticks {
            if !rng.random_bool(arrival_p) {
                continue;
            }

            let exec_time = rng.random_range(min_exec..=max_exec);
            let mode = if rng.random_bool(parallel_p) {
                ExecutionMode::Parallel
            } else {
                ExecutionMode::Sequential
            };

            let id = specs.len() as u64 + 1;
            specs.push(JobSpec::new(id, tick, exec_time).with_mode(mode));
        }

        specs
    }

    /// Draws the job list and renders it as process-list text.
    pub fn generate_process_list(&self) -> String {
        to_process_list(&self.generate())
    }
}

/// Clamps to `0.0..=1.0`; NaN and infinities become 0.
fn probability(p: f64) -> f64 {
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_process_list;

    #[test]
    fn test_same_seed_same_workload() {
        let a = WorkloadGenerator::with_seed(7).generate();
        let b = WorkloadGenerator::with_seed(7).generate();
        assert_eq!(a, b);
    }

    #[test]
    fn test_respects_bounds() {
        let specs = WorkloadGenerator::with_seed(3)
            .with_ticks(200)
            .with_arrival_probability(0.5)
            .with_exec_range(2, 6)
            .generate();

        assert!(!specs.is_empty());
        assert!(specs.iter().all(|s| (2..=6).contains(&s.exec_time)));
        assert!(specs.iter().all(|s| s.arrival < 200));
        // one arrival per tick at most, ids follow arrival order
        assert!(specs.windows(2).all(|w| w[0].arrival < w[1].arrival));
        assert!(specs.iter().enumerate().all(|(i, s)| s.id == i as u64 + 1));
    }

    #[test]
    fn test_probability_extremes() {
        let none = WorkloadGenerator::with_seed(1)
            .with_arrival_probability(0.0)
            .generate();
        assert!(none.is_empty());

        let all = WorkloadGenerator::with_seed(1)
            .with_ticks(20)
            .with_arrival_probability(1.0)
            .with_parallel_probability(1.0)
            .generate();
        assert_eq!(all.len(), 20);
        assert!(all.iter().all(|s| s.mode == ExecutionMode::Parallel));
    }

    #[test]
    fn test_non_finite_probabilities_draw_nothing() {
        let specs = WorkloadGenerator::with_seed(2)
            .with_arrival_probability(f64::NAN)
            .generate();
        assert!(specs.is_empty());

        // fields are public, so the builder can be bypassed
        let generator = WorkloadGenerator {
            arrival_probability: 1.0,
            parallel_probability: f64::INFINITY,
            ..WorkloadGenerator::with_seed(2).with_ticks(5)
        };
        let specs = generator.generate();
        assert_eq!(specs.len(), 5);
        assert!(specs.iter().all(|s| s.mode == ExecutionMode::Sequential));

        assert_eq!(probability(f64::NEG_INFINITY), 0.0);
        assert_eq!(probability(1.5), 1.0);
    }

    #[test]
    fn test_zero_exec_range_is_raised() {
        let specs = WorkloadGenerator::with_seed(5)
            .with_arrival_probability(1.0)
            .with_exec_range(0, 0)
            .generate();
        assert!(specs.iter().all(|s| s.exec_time == 1));
    }

    #[test]
    fn test_process_list_round_trip() {
        let generator = WorkloadGenerator::with_seed(11);
        let parsed = parse_process_list(&generator.generate_process_list()).unwrap();
        assert_eq!(parsed, generator.generate());
    }
}
