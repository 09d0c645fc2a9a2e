//! Allocation-heavy workloads for exercising the profiler

use super::hooks::{Measurement, Profiler};
use crate::error::Result;
use serde::Serialize;
use std::hint::black_box;

/// Build a thousand-element vector and sum it
pub fn allocate_small_list() -> i64 {
    let data: Vec<i64> = black_box((0..1_000).collect());
    data.iter().sum()
}

/// Build a million-element vector and sum it
pub fn allocate_large_list() -> i64 {
    let data: Vec<i64> = black_box((0..1_000_000).collect());
    data.iter().sum()
}

/// Build 100 rows of 10,000 products and return the row count
pub fn create_nested_structure() -> usize {
    let mut outer = Vec::with_capacity(100);
    for i in 0..100i64 {
        let inner: Vec<i64> = (0..10_000).map(|j| j * i).collect();
        outer.push(inner);
    }
    black_box(&outer).len()
}

/// Results and measurements from one pass over the workloads
#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    /// Sum from [`allocate_small_list`]
    pub small_sum: i64,
    /// Sum from [`allocate_large_list`]
    pub large_sum: i64,
    /// Row count from [`create_nested_structure`]
    pub nested_rows: usize,
    /// Whatever the profiler recorded
    pub measurements: Vec<Measurement>,
}

impl DemoReport {
    /// Print summary to console
    pub fn print_summary(&self) {
        println!("\n=== Profiling Demo ===");
        println!("Small list sum:   {}", self.small_sum);
        println!("Large list sum:   {}", self.large_sum);
        println!("Nested rows:      {}", self.nested_rows);

        if self.measurements.is_empty() {
            println!("\n(profiling disabled, no measurements)");
        } else {
            println!("\nMeasurements:");
            for m in &self.measurements {
                println!("  {}", m.describe());
            }
        }
    }
}

/// Run every workload through the profiler
pub fn run_demo(profiler: &mut Profiler) -> Result<DemoReport> {
    tracing::info!(
        "Running profiling demo ({})",
        if profiler.is_enabled() { "measuring" } else { "not measuring" }
    );

    let small_sum = profiler.run("allocate_small_list", allocate_small_list)?;
    let large_sum = profiler.run("allocate_large_list", allocate_large_list)?;
    let nested_rows = profiler.run("create_nested_structure", create_nested_structure)?;

    Ok(DemoReport {
        small_sum,
        large_sum,
        nested_rows,
        measurements: profiler.take_measurements(),
    })
}
