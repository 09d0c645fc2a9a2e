//! Escape-time fractal module
//!
//! Provides the Julia-set kernels, the coordinate grid they run over,
//! and a harness for timing kernels against each other.

mod julia;
pub mod compare;

pub use julia::*;
pub use compare::{compare_kernels, run_kernel, ComparisonReport, KernelRun};
