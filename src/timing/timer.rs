//! Repeat-timing harness
//!
//! Picks a loop count large enough that one batch takes a measurable
//! amount of time, then times several batches and keeps the best.
//! Faster functions therefore run many more times than slow ones.

use crate::error::{PerfLabError, Result};
use serde::{Deserialize, Serialize};
use std::hint::black_box;
use std::time::{Duration, Instant};

/// Timer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Number of timed batches
    pub repeat: usize,
    /// Minimum duration of one batch during loop-count selection
    pub target: Duration,
    /// Upper bound on the loop count
    pub max_loops: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            repeat: 5,
            target: Duration::from_millis(200),
            max_loops: 1_000_000_000,
        }
    }
}

/// Result of timing one function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingReport {
    /// What was timed
    pub label: String,
    /// Calls per batch
    pub loops: u64,
    /// Number of batches
    pub repeat: usize,
    /// Fastest batch, per call, in seconds
    pub best_secs: f64,
    /// Slowest batch, per call, in seconds
    pub worst_secs: f64,
    /// Mean over batches, per call, in seconds
    pub mean_secs: f64,
}

impl TimingReport {
    /// Fastest time per call
    pub fn best(&self) -> Duration {
        Duration::from_secs_f64(self.best_secs)
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        println!(
            "{}: {} loops, best of {}: {:.3?} per loop (worst {:.3?}, mean {:.3?})",
            self.label,
            self.loops,
            self.repeat,
            self.best(),
            Duration::from_secs_f64(self.worst_secs),
            Duration::from_secs_f64(self.mean_secs),
        );
    }
}

/// Timing harness
#[derive(Debug, Clone, Default)]
pub struct Timer {
    config: TimerConfig,
}

impl Timer {
    /// Create a timer, rejecting settings that cannot produce a measurement
    pub fn new(config: TimerConfig) -> Result<Self> {
        if config.repeat == 0 {
            return Err(PerfLabError::config("repeat must be at least 1"));
        }
        if config.max_loops == 0 {
            return Err(PerfLabError::config("max_loops must be at least 1"));
        }
        Ok(Self { config })
    }

    /// Timer settings
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Time `loops` back-to-back calls
    pub fn time_batch<R>(&self, loops: u64, f: &mut impl FnMut() -> R) -> Duration {
        let start = Instant::now();
        for _ in 0..loops {
            black_box(f());
        }
        start.elapsed()
    }

    /// Choose a loop count from the sequence 1, 2, 5, 10, 20, 50, ...
    ///
    /// Returns the first count whose batch reaches the target duration (or
    /// the largest count allowed) together with that batch's time.
    pub fn autorange<R>(&self, f: &mut impl FnMut() -> R) -> (u64, Duration) {
        let mut scale: u64 = 1;
        loop {
            for step in [1u64, 2, 5] {
                let loops = scale.saturating_mul(step).min(self.config.max_loops);
                let elapsed = self.time_batch(loops, f);
                if elapsed >= self.config.target || loops >= self.config.max_loops {
                    return (loops, elapsed);
                }
            }
            scale = scale.saturating_mul(10);
        }
    }

    /// Time a function: autorange, then `repeat` batches
    pub fn time<R>(&self, label: &str, mut f: impl FnMut() -> R) -> TimingReport {
        let (loops, _) = self.autorange(&mut f);

        let per_loop: Vec<f64> = (0..self.config.repeat)
            .map(|_| self.time_batch(loops, &mut f).as_secs_f64() / loops as f64)
            .collect();

        let best_secs = per_loop.iter().copied().fold(f64::INFINITY, f64::min);
        let worst_secs = per_loop.iter().copied().fold(0.0, f64::max);
        let mean_secs = per_loop.iter().sum::<f64>() / per_loop.len() as f64;

        tracing::debug!("{}: {} loops x {} repeats", label, loops, self.config.repeat);

        TimingReport {
            label: label.to_string(),
            loops,
            repeat: self.config.repeat,
            best_secs,
            worst_secs,
            mean_secs,
        }
    }
}
