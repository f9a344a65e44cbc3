//! End-of-run statistics.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Turnaround | latest sub-unit completion - arrival + 1 |
//! | Mean turnaround | ceiling of the mean over all jobs |
//! | Overhead | turnaround / declared execution time |
//! | Max / mean overhead | rounded to two decimals |
//! | Makespan | tick on which the last job was reported finished |
//!
//! # Reference
//! Arpaci-Dusseau & Arpaci-Dusseau (2018), "Operating Systems: Three Easy
//! Pieces", Ch. 7.2: Scheduling Metrics

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Job, Tick};

/// Aggregate statistics of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Jobs included in the statistics.
    pub job_count: usize,
    /// Mean turnaround time, rounded up.
    pub mean_turnaround: u64,
    /// Largest overhead ratio (2 decimals).
    pub max_overhead: f64,
    /// Mean overhead ratio (2 decimals).
    pub mean_overhead: f64,
    /// Terminal tick.
    pub makespan: Tick,
}

impl SimulationReport {
    /// Computes the statistics over every completed job.
    ///
    /// Jobs with unfinished sub-units are skipped. With nothing to count
    /// every statistic except the makespan is zero.
    pub fn calculate(jobs: &[Job], makespan: Tick) -> Self {
        let mut counted: usize = 0;
        let mut total_turnaround: u64 = 0;
        let mut max_overhead = Ratio::ZERO;
        // exact while it fits, float sum as the fallback
        let mut exact_total = Some(Ratio::ZERO);
        let mut float_total: f64 = 0.0;

        for job in jobs {
            let Some(turnaround) = job.turnaround_time() else {
                continue;
            };
            if job.exec_time() == 0 {
                continue;
            }
            let overhead = Ratio::new(turnaround.into(), job.exec_time().into());

            counted += 1;
            total_turnaround += turnaround;
            float_total += overhead.to_f64();
            exact_total = exact_total.and_then(|total| total.checked_add(overhead));
            if overhead.exceeds(max_overhead) {
                max_overhead = overhead;
            }
        }

        if counted == 0 {
            return Self {
                job_count: 0,
                mean_turnaround: 0,
                max_overhead: 0.0,
                mean_overhead: 0.0,
                makespan,
            };
        }

        let mean_overhead = exact_total
            .and_then(|total| total.checked_div(counted as u128))
            .and_then(Ratio::rounded_hundredths)
            .map_or_else(|| round2(float_total / counted as f64), hundredths_to_f64);

        Self {
            job_count: counted,
            mean_turnaround: total_turnaround.div_ceil(counted as u64),
            max_overhead: max_overhead
                .rounded_hundredths()
                .map_or_else(|| round2(max_overhead.to_f64()), hundredths_to_f64),
            mean_overhead,
            makespan,
        }
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Turnaround time {}", self.mean_turnaround)?;
        writeln!(f, "Time overhead {} {}", self.max_overhead, self.mean_overhead)?;
        write!(f, "Makespan {}", self.makespan)
    }
}

/// Non-negative fraction in lowest terms.
///
/// Overheads are ratios of integers; rounding them through `f64` loses
/// exact halves such as 201/200.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ratio {
    num: u128,
    den: u128,
}

impl Ratio {
    const ZERO: Self = Self { num: 0, den: 1 };

    /// `den` must be non-zero.
    fn new(num: u128, den: u128) -> Self {
        let g = gcd(num, den);
        Self {
            num: num / g,
            den: den / g,
        }
    }

    fn checked_add(self, other: Self) -> Option<Self> {
        let g = gcd(self.den, other.den);
        let den = (self.den / g).checked_mul(other.den)?;
        let num = self
            .num
            .checked_mul(other.den / g)?
            .checked_add(other.num.checked_mul(self.den / g)?)?;
        Some(Self::new(num, den))
    }

    fn checked_div(self, divisor: u128) -> Option<Self> {
        Some(Self::new(self.num, self.den.checked_mul(divisor)?))
    }

    /// Strictly greater than `other`.
    fn exceeds(self, other: Self) -> bool {
        match (self.num.checked_mul(other.den), other.num.checked_mul(self.den)) {
            (Some(lhs), Some(rhs)) => lhs > rhs,
            _ => self.to_f64() > other.to_f64(),
        }
    }

    /// `self * 100` rounded half away from zero.
    fn rounded_hundredths(self) -> Option<u128> {
        let doubled = self.num.checked_mul(200)?.checked_add(self.den)?;
        Some(doubled / self.den.checked_mul(2)?)
    }

    fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

fn hundredths_to_f64(hundredths: u128) -> f64 {
    hundredths as f64 / 100.0
}

/// Rounds half away from zero to two decimals.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
