//! # PerfLab - Measuring Small Numeric Kernels
//!
//! PerfLab collects a few small numeric routines together with the tools
//! used to measure them. Each routine comes in several variants that
//! produce identical results at different speeds, so the measurements are
//! meaningful and the variants can be checked against one another.
//!
//! ## Features
//!
//! - **Primality Testing**: Trial division with three interchangeable
//!   strategies and an integer-exact square-root bound
//! - **Julia Set Kernels**: Escape-time computation as a plain baseline,
//!   a squared-norm variant, and a parallel variant
//! - **Regression Checking**: Known output sums for the reference grid
//! - **Measurement Hooks**: Injected timing or memory hooks instead of
//!   environment-detected profilers
//! - **Repeat Timing**: Automatic loop-count selection and best-of-N timing
//!
//! ## Quick Start
//!
//! ```no_run
//! use perflab::prime::{is_prime, is_prime_with, PrimeStrategy};
//! use perflab::fractal::escape_counts;
//! use num_complex::Complex64;
//!
//! assert!(is_prime(97));
//! assert!(is_prime_with(10_000_019, PrimeStrategy::Modulo));
//!
//! let zs = [Complex64::new(0.0, 0.0), Complex64::new(3.0, 0.0)];
//! let cs = [Complex64::new(0.0, 0.0); 2];
//! let counts = escape_counts(10, &zs, &cs).unwrap();
//! assert_eq!(counts, vec![10, 0]);
//! ```
//!
//! ## Comparing Kernels
//!
//! ```no_run
//! use perflab::fractal::{compare_kernels, JuliaGrid, JuliaKernel, DEFAULT_MAX_ITER, EXPECTED_SUM};
//!
//! let grid = JuliaGrid::regression().unwrap();
//! let report = compare_kernels(&grid, DEFAULT_MAX_ITER, &JuliaKernel::ALL, Some(EXPECTED_SUM)).unwrap();
//! report.print_summary();
//! ```
//!
//! ## Profiling
//!
//! ```no_run
//! use perflab::profile::{Profiler, TimingHook};
//!
//! let mut profiler = Profiler::new(Box::new(TimingHook::new()));
//! let total = profiler.run("sum", || (0..1_000_000u64).sum::<u64>()).unwrap();
//! for m in profiler.measurements() {
//!     println!("{} -> {}", m.describe(), total);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod fractal;
pub mod prime;
pub mod profile;
pub mod timing;

// Re-export commonly used types
pub use error::{PerfLabError, Result};
pub use fractal::{escape_counts, JuliaGrid, JuliaKernel};
pub use prime::{is_prime, PrimeStrategy};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use perflab::prelude::*;
    //! ```

    pub use crate::error::{PerfLabError, Result};
    pub use crate::fractal::{
        compare_kernels, escape_counts, escape_counts_with, ComparisonReport, JuliaGrid, JuliaKernel, Region,
    };
    pub use crate::prime::{is_prime, is_prime_with, PrimeStrategy};
    pub use crate::profile::{MeasurementHook, MemoryHook, NoopHook, ProfileConfig, Profiler, TimingHook};
    pub use crate::timing::{Timer, TimerConfig, TimingReport};
}
