//! Side-by-side kernel comparison
//!
//! Runs several kernels over the same grid, times each one and checks
//! its output against a known sum.

use super::julia::{checksum, JuliaGrid, JuliaKernel};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Outcome of running one kernel over a grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelRun {
    /// Kernel that produced the counts
    pub kernel: JuliaKernel,
    /// Wall time in seconds
    pub elapsed_secs: f64,
    /// Sum of all escape counts
    pub sum: u64,
    /// Whether the sum matched the expected value (if one was given)
    pub correct: Option<bool>,
}

impl KernelRun {
    /// Wall time as a duration
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_secs)
    }
}

/// Timings for a set of kernels over one grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Grid size
    pub points: usize,
    /// Iteration cap used for every run
    pub max_iter: i64,
    /// Expected sum, if checked
    pub expected_sum: Option<u64>,
    /// Worker threads available to the parallel kernel
    pub threads: usize,
    /// One entry per kernel, in run order
    pub runs: Vec<KernelRun>,
}

impl ComparisonReport {
    /// Reference run for speedups: the baseline kernel if present, else the first run
    pub fn baseline(&self) -> Option<&KernelRun> {
        self.runs
            .iter()
            .find(|r| r.kernel == JuliaKernel::Baseline)
            .or_else(|| self.runs.first())
    }

    /// How many times faster `run` was than the reference run
    pub fn speedup(&self, run: &KernelRun) -> Option<f64> {
        let baseline = self.baseline()?;
        if run.elapsed_secs > 0.0 {
            Some(baseline.elapsed_secs / run.elapsed_secs)
        } else {
            None
        }
    }

    /// Check that no run produced a wrong sum
    pub fn all_correct(&self) -> bool {
        self.runs.iter().all(|r| r.correct != Some(false))
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        println!("\n=== Julia Set Comparison ===");
        println!("Points:       {}", self.points);
        println!("Max iter:     {}", self.max_iter);
        println!("Threads:      {}", self.threads);
        if let Some(expected) = self.expected_sum {
            println!("Expected sum: {}", expected);
        }

        println!();
        for run in &self.runs {
            let verdict = match run.correct {
                Some(true) => "✓",
                Some(false) => "✗",
                None => "-",
            };
            let speedup = self
                .speedup(run)
                .map(|s| format!("{:.1}x", s))
                .unwrap_or_else(|| "n/a".to_string());

            println!(
                "{:14} {:>12.4?}  sum {:>10}  {}  {:>7}",
                run.kernel.name(),
                run.elapsed(),
                run.sum,
                verdict,
                speedup
            );
        }
    }
}

/// Time a single kernel over a grid
pub fn run_kernel(
    kernel: JuliaKernel,
    grid: &JuliaGrid,
    maxiter: i64,
    expected_sum: Option<u64>,
) -> Result<KernelRun> {
    let start = Instant::now();
    let counts = grid.escape_counts(kernel, maxiter)?;
    let elapsed = start.elapsed();

    let sum = checksum(&counts);
    let correct = expected_sum.map(|expected| expected == sum);

    tracing::info!("{} kernel: {:.4?}, sum {}", kernel, elapsed, sum);
    if correct == Some(false) {
        tracing::warn!("{} kernel sum {} differs from expected {:?}", kernel, sum, expected_sum);
    }

    Ok(KernelRun {
        kernel,
        elapsed_secs: elapsed.as_secs_f64(),
        sum,
        correct,
    })
}

/// Run each kernel in turn over the same grid
pub fn compare_kernels(
    grid: &JuliaGrid,
    maxiter: i64,
    kernels: &[JuliaKernel],
    expected_sum: Option<u64>,
) -> Result<ComparisonReport> {
    let runs = kernels
        .iter()
        .map(|&kernel| run_kernel(kernel, grid, maxiter, expected_sum))
        .collect::<Result<Vec<_>>>()?;

    Ok(ComparisonReport {
        points: grid.len(),
        max_iter: maxiter,
        expected_sum,
        threads: rayon::current_num_threads(),
        runs,
    })
}
