//! Configuration settings for PerfLab
//!
//! Defines CLI arguments, subcommands, and the runtime configuration
//! each subcommand is built from.

use crate::error::{PerfLabError, Result};
use crate::fractal::{JuliaKernel, Region, DEFAULT_C, DEFAULT_MAX_ITER, DEFAULT_WIDTH, EXPECTED_SUM};
use crate::prime::PrimeStrategy;
use crate::profile::{ProfileConfig, ProfileMode};
use crate::timing::{Routine, TimerConfig};
use clap::{Parser, Subcommand, ValueEnum};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// PerfLab - measure and compare small numeric kernels
#[derive(Parser, Debug, Clone)]
#[command(name = "perflab")]
#[command(author = "PerfLab Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Measure and compare the performance of small numeric kernels")]
#[command(long_about = r#"
PerfLab times small numeric routines and checks that faster variants still
produce the same answers.

Examples:
  perflab prime 10_000_019 --strategy all     # Compare primality strategies
  perflab julia                               # Julia set regression run
  perflab julia --kernel parallel --width 500 # Single kernel, smaller grid
  perflab timeit slow-loop                    # Repeat-time a routine
  perflab profile --enabled --mode memory     # Memory-profile demo workloads
"#)]
pub struct CliArgs {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Output format for reports
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub output_format: OutputFormat,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Test a number for primality
    #[command(name = "prime")]
    Prime {
        /// Number to test (underscores allowed, e.g. 10_000_019)
        #[arg(allow_negative_numbers = true)]
        number: String,
        /// Divisor-testing strategy
        #[arg(short, long, value_enum, default_value = "skip-evens")]
        strategy: StrategyChoice,
    },

    /// Run Julia set kernels and check the regression sum
    #[command(name = "julia")]
    Julia {
        /// Grid width in pixels
        #[arg(short, long, default_value_t = DEFAULT_WIDTH)]
        width: usize,
        /// Iteration cap per point
        #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_ITER, allow_negative_numbers = true)]
        max_iter: i64,
        /// Kernels to run (repeatable; default: all)
        #[arg(short, long, value_enum)]
        kernel: Vec<JuliaKernel>,
        /// Expected sum of all counts (default: the regression value when
        /// the grid and constant are unchanged)
        #[arg(long)]
        expected_sum: Option<u64>,
        /// Real part of the constant c
        #[arg(long, default_value_t = DEFAULT_C.re, allow_negative_numbers = true)]
        real: f64,
        /// Imaginary part of the constant c
        #[arg(long, default_value_t = DEFAULT_C.im, allow_negative_numbers = true)]
        imag: f64,
    },

    /// Time a routine with automatic loop-count selection
    #[command(name = "timeit")]
    Timeit {
        /// Routine to time
        #[arg(value_enum)]
        routine: Routine,
        /// Number of timed batches
        #[arg(short, long, default_value = "5")]
        repeat: usize,
        /// Minimum batch duration while choosing the loop count (e.g. 200ms)
        #[arg(long, default_value = "200ms")]
        target: String,
        /// Number for check-prime
        #[arg(long, default_value = "97", allow_negative_numbers = true)]
        number: String,
        /// Strategy for check-prime
        #[arg(long, value_enum, default_value = "skip-evens")]
        strategy: PrimeStrategy,
    },

    /// Run the allocation demo workloads under a profiler
    #[command(name = "profile")]
    Profile {
        /// Record measurements (off: workloads run unobserved)
        #[arg(long)]
        enabled: bool,
        /// What to measure
        #[arg(long, value_enum, default_value = "timing")]
        mode: ProfileMode,
    },
}

/// Strategy selection for the `prime` subcommand
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyChoice {
    /// Division with an integral-quotient check
    Division,
    /// Remainder test on every candidate
    Modulo,
    /// Remainder test on odd candidates only
    #[default]
    SkipEvens,
    /// Every strategy, with timings
    All,
}

impl StrategyChoice {
    /// Strategies this choice expands to
    pub fn strategies(&self) -> Vec<PrimeStrategy> {
        match self {
            Self::Division => vec![PrimeStrategy::Division],
            Self::Modulo => vec![PrimeStrategy::Modulo],
            Self::SkipEvens => vec![PrimeStrategy::SkipEvens],
            Self::All => PrimeStrategy::ALL.to_vec(),
        }
    }
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Runtime configuration for a Julia set run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JuliaConfig {
    /// Area of the complex plane
    pub region: Region,
    /// Grid width in pixels
    pub width: usize,
    /// Iteration cap
    pub max_iter: i64,
    /// Constant added each iteration
    pub c: Complex64,
    /// Kernels to compare, in run order
    pub kernels: Vec<JuliaKernel>,
    /// Sum to check against
    pub expected_sum: Option<u64>,
}

impl Default for JuliaConfig {
    fn default() -> Self {
        Self {
            region: Region::default(),
            width: DEFAULT_WIDTH,
            max_iter: DEFAULT_MAX_ITER,
            c: DEFAULT_C,
            kernels: JuliaKernel::ALL.to_vec(),
            expected_sum: Some(EXPECTED_SUM),
        }
    }
}

impl JuliaConfig {
    /// Check if this configuration is the regression fixture
    pub fn is_regression_fixture(&self) -> bool {
        self.region == Region::default()
            && self.width == DEFAULT_WIDTH
            && self.max_iter == DEFAULT_MAX_ITER
            && self.c == DEFAULT_C
    }

    /// Create config from the `julia` subcommand
    pub fn from_cli(command: &Commands) -> Result<Self> {
        let Commands::Julia { width, max_iter, kernel, expected_sum, real, imag } = command else {
            return Err(PerfLabError::config("not a julia command"));
        };

        if *width == 0 {
            return Err(PerfLabError::config("width must be at least 1"));
        }
        if *max_iter < 0 {
            return Err(PerfLabError::config(format!("max-iter must be non-negative, got {}", max_iter)));
        }

        let mut config = Self {
            width: *width,
            max_iter: *max_iter,
            c: Complex64::new(*real, *imag),
            ..Self::default()
        };

        if !kernel.is_empty() {
            let mut kernels = Vec::with_capacity(kernel.len());
            for k in kernel {
                if !kernels.contains(k) {
                    kernels.push(*k);
                }
            }
            config.kernels = kernels;
        }

        // The known sum only applies to the fixture grid
        config.expected_sum = match expected_sum {
            Some(sum) => Some(*sum),
            None if config.is_regression_fixture() => Some(EXPECTED_SUM),
            None => None,
        };

        Ok(config)
    }
}

/// Parse a duration such as `200ms` or `1s`
pub fn parse_duration(value: &str) -> Result<Duration> {
    let duration = humantime::parse_duration(value.trim())
        .map_err(|e| PerfLabError::config(format!("Invalid duration '{}': {}", value, e)))?;
    if duration.is_zero() {
        return Err(PerfLabError::config("duration must be greater than zero"));
    }
    Ok(duration)
}

impl TimerConfig {
    /// Create config from the `timeit` subcommand
    pub fn from_cli(command: &Commands) -> Result<Self> {
        let Commands::Timeit { repeat, target, .. } = command else {
            return Err(PerfLabError::config("not a timeit command"));
        };

        if *repeat == 0 {
            return Err(PerfLabError::config("repeat must be at least 1"));
        }

        Ok(Self {
            repeat: *repeat,
            target: parse_duration(target)?,
            ..Self::default()
        })
    }
}

impl ProfileConfig {
    /// Create config from the `profile` subcommand
    pub fn from_cli(command: &Commands) -> Result<Self> {
        match command {
            Commands::Profile { enabled, mode } => Ok(Self {
                enabled: *enabled,
                mode: *mode,
            }),
            _ => Err(PerfLabError::config("not a profile command")),
        }
    }
}

/// Log filter directive for a verbosity level
pub fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        let mut full = vec!["perflab"];
        full.extend_from_slice(args);
        CliArgs::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_julia_defaults_are_regression_fixture() {
        let args = parse(&["julia"]);
        let config = JuliaConfig::from_cli(&args.command).unwrap();

        assert!(config.is_regression_fixture());
        assert_eq!(config.expected_sum, Some(EXPECTED_SUM));
        assert_eq!(config.kernels, JuliaKernel::ALL.to_vec());
    }

    #[test]
    fn test_julia_custom_grid_drops_expected_sum() {
        let args = parse(&["julia", "--width", "200", "-k", "parallel", "-k", "parallel"]);
        let config = JuliaConfig::from_cli(&args.command).unwrap();

        assert_eq!(config.width, 200);
        assert!(!config.is_regression_fixture());
        assert_eq!(config.expected_sum, None);
        assert_eq!(config.kernels, vec![JuliaKernel::Parallel]);
    }

    #[test]
    fn test_julia_rejects_bad_values() {
        let args = parse(&["julia", "--max-iter", "-1"]);
        assert!(matches!(
            JuliaConfig::from_cli(&args.command),
            Err(PerfLabError::ConfigError(_))
        ));

        let args = parse(&["julia", "--width", "0"]);
        assert!(JuliaConfig::from_cli(&args.command).is_err());
    }

    #[test]
    fn test_prime_accepts_negative_numbers() {
        let args = parse(&["prime", "-7", "--strategy", "all"]);
        match args.command {
            Commands::Prime { number, strategy } => {
                assert_eq!(number, "-7");
                assert_eq!(strategy.strategies().len(), 3);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_timer_config_from_cli() {
        let args = parse(&["timeit", "fast", "--repeat", "3", "--target", "50ms"]);
        let config = TimerConfig::from_cli(&args.command).unwrap();
        assert_eq!(config.repeat, 3);
        assert_eq!(config.target, Duration::from_millis(50));

        let args = parse(&["timeit", "fast", "--target", "soon"]);
        assert!(TimerConfig::from_cli(&args.command).is_err());
    }

    #[test]
    fn test_profile_config_from_cli() {
        let args = parse(&["profile", "--enabled", "--mode", "memory"]);
        let config = ProfileConfig::from_cli(&args.command).unwrap();
        assert!(config.enabled);
        assert_eq!(config.mode, ProfileMode::Memory);

        assert!(ProfileConfig::from_cli(&parse(&["julia"]).command).is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1s").unwrap(), Duration::from_secs(1));
        assert!(parse_duration("0ms").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0, false), "warn");
        assert_eq!(log_level(2, false), "debug");
        assert_eq!(log_level(3, true), "error");
    }
}
