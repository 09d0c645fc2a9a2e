//! Measurement hooks and the profiler that drives them
//!
//! A hook is injected into a [`Profiler`] rather than discovered from the
//! environment. A disabled profiler runs the wrapped closure and nothing
//! else, so instrumented code behaves identically with profiling off.

use crate::error::{PerfLabError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use sysinfo::{Pid, System};

/// What a hook records around a call
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProfileMode {
    /// Wall-clock time
    #[default]
    Timing,
    /// Resident memory before and after
    Memory,
}

/// Profiler settings
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Record measurements at all
    pub enabled: bool,
    /// Which hook to install when enabled
    pub mode: ProfileMode,
}

/// A recorded value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Metric {
    /// Elapsed wall time
    WallTime {
        /// Seconds
        secs: f64,
    },
    /// Resident set size around the call
    Memory {
        /// Bytes before the call
        before: u64,
        /// Bytes after the call
        after: u64,
    },
}

/// One measurement of one labelled call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Label passed to [`Profiler::run`]
    pub label: String,
    /// Recorded value
    pub metric: Metric,
}

impl Measurement {
    /// Signed change in resident memory, for memory measurements
    pub fn memory_delta(&self) -> Option<i64> {
        match self.metric {
            Metric::Memory { before, after } => Some(after as i64 - before as i64),
            Metric::WallTime { .. } => None,
        }
    }

    /// One-line human-readable form
    pub fn describe(&self) -> String {
        match &self.metric {
            Metric::WallTime { secs } => {
                format!("{}: {:.3?}", self.label, std::time::Duration::from_secs_f64(*secs))
            }
            Metric::Memory { before, after } => {
                let delta = after.abs_diff(*before);
                let sign = if after >= before { "+" } else { "-" };
                format!(
                    "{}: {} -> {} ({}{})",
                    self.label,
                    humansize::format_size(*before, humansize::BINARY),
                    humansize::format_size(*after, humansize::BINARY),
                    sign,
                    humansize::format_size(delta, humansize::BINARY)
                )
            }
        }
    }
}

/// Something that can observe a call from the outside
pub trait MeasurementHook: Send {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Called immediately before the measured call
    fn before(&mut self, label: &str) -> Result<()>;

    /// Called immediately after the measured call
    fn after(&mut self, label: &str) -> Result<Option<Measurement>>;
}

/// Hook that records nothing
#[derive(Debug, Default)]
pub struct NoopHook;

impl MeasurementHook for NoopHook {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn before(&mut self, _label: &str) -> Result<()> {
        Ok(())
    }

    fn after(&mut self, _label: &str) -> Result<Option<Measurement>> {
        Ok(None)
    }
}

/// Hook that records wall-clock time
#[derive(Debug, Default)]
pub struct TimingHook {
    started: Option<Instant>,
}

impl TimingHook {
    /// Create a new timing hook
    pub fn new() -> Self {
        Self::default()
    }
}

impl MeasurementHook for TimingHook {
    fn name(&self) -> &'static str {
        "timing"
    }

    fn before(&mut self, _label: &str) -> Result<()> {
        self.started = Some(Instant::now());
        Ok(())
    }

    fn after(&mut self, label: &str) -> Result<Option<Measurement>> {
        let started = self.started.take().ok_or_else(|| {
            PerfLabError::MeasurementError(format!("'{}' finished without being started", label))
        })?;

        Ok(Some(Measurement {
            label: label.to_string(),
            metric: Metric::WallTime {
                secs: started.elapsed().as_secs_f64(),
            },
        }))
    }
}

/// Hook that samples this process's resident memory
pub struct MemoryHook {
    system: System,
    pid: Pid,
    before: Option<u64>,
}

impl MemoryHook {
    /// Create a memory hook for the current process
    pub fn new() -> Result<Self> {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| PerfLabError::MeasurementError(format!("Cannot determine process id: {}", e)))?;

        Ok(Self {
            system: System::new(),
            pid,
            before: None,
        })
    }

    /// Current resident set size in bytes
    pub fn resident_bytes(&mut self) -> Result<u64> {
        self.system.refresh_all();
        self.system
            .process(self.pid)
            .map(|p| p.memory())
            .ok_or_else(|| PerfLabError::MeasurementError(format!("Process {} not visible", self.pid)))
    }
}

impl MeasurementHook for MemoryHook {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn before(&mut self, _label: &str) -> Result<()> {
        self.before = Some(self.resident_bytes()?);
        Ok(())
    }

    fn after(&mut self, label: &str) -> Result<Option<Measurement>> {
        let before = self.before.take().ok_or_else(|| {
            PerfLabError::MeasurementError(format!("'{}' finished without being started", label))
        })?;
        let after = self.resident_bytes()?;

        Ok(Some(Measurement {
            label: label.to_string(),
            metric: Metric::Memory { before, after },
        }))
    }
}

/// Wraps calls with an injected measurement hook
pub struct Profiler {
    hook: Box<dyn MeasurementHook>,
    enabled: bool,
    measurements: Vec<Measurement>,
}

impl Profiler {
    /// Create an enabled profiler around a hook
    pub fn new(hook: Box<dyn MeasurementHook>) -> Self {
        Self {
            hook,
            enabled: true,
            measurements: Vec::new(),
        }
    }

    /// Create a profiler that only runs the wrapped calls
    pub fn disabled() -> Self {
        Self {
            hook: Box::new(NoopHook),
            enabled: false,
            measurements: Vec::new(),
        }
    }

    /// Build a profiler from settings
    pub fn from_config(config: &ProfileConfig) -> Result<Self> {
        if !config.enabled {
            return Ok(Self::disabled());
        }

        let hook: Box<dyn MeasurementHook> = match config.mode {
            ProfileMode::Timing => Box::new(TimingHook::new()),
            ProfileMode::Memory => Box::new(MemoryHook::new()?),
        };
        Ok(Self::new(hook))
    }

    /// Check if measurements are being recorded
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Run `f`, measuring it when enabled, and return its value
    pub fn run<T>(&mut self, label: &str, f: impl FnOnce() -> T) -> Result<T> {
        if !self.enabled {
            return Ok(f());
        }

        self.hook.before(label)?;
        let value = f();
        if let Some(measurement) = self.hook.after(label)? {
            tracing::debug!("[{}] {}", self.hook.name(), measurement.describe());
            self.measurements.push(measurement);
        }

        Ok(value)
    }

    /// Measurements recorded so far
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Take the recorded measurements, leaving none behind
    pub fn take_measurements(&mut self) -> Vec<Measurement> {
        std::mem::take(&mut self.measurements)
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::disabled()
    }
}
