//! Profiling module
//!
//! Provides injectable measurement hooks (timing, resident memory),
//! the profiler that applies them, and demo workloads to measure.

mod hooks;
pub mod workloads;

pub use hooks::*;
pub use workloads::{run_demo, DemoReport};
