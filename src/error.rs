//! Error types for PerfLab
//!
//! Every fallible operation in the crate reports through [`PerfLabError`].
//! The kernels only fail on numeric domain violations; the remaining
//! variants cover configuration and measurement.

use thiserror::Error;

/// Main error type for PerfLab operations
#[derive(Error, Debug)]
pub enum PerfLabError {
    /// Primality input could not be read as an integer
    #[error("Not an integer: '{0}'")]
    NotAnInteger(String),

    /// Starting values and constants are not index-aligned
    #[error("Length mismatch: {zs} starting values but {cs} constants")]
    LengthMismatch { zs: usize, cs: usize },

    /// Iteration cap below zero
    #[error("Maximum iteration count must be non-negative, got {0}")]
    NegativeMaxIter(i64),

    /// Iteration cap larger than a count can hold
    #[error("Maximum iteration count {0} exceeds {max}", max = u32::MAX)]
    MaxIterOutOfRange(i64),

    /// Grid region or width cannot produce any points
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Resource sampling failed
    #[error("Measurement error: {0}")]
    MeasurementError(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PerfLabError>,
    },
}

impl PerfLabError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this error comes from a numeric domain check
    pub fn is_domain_error(&self) -> bool {
        match self {
            Self::NotAnInteger(_)
            | Self::LengthMismatch { .. }
            | Self::NegativeMaxIter(_)
            | Self::MaxIterOutOfRange(_)
            | Self::InvalidRegion(_) => true,
            Self::WithContext { source, .. } => source.is_domain_error(),
            _ => false,
        }
    }
}

/// Result type alias for PerfLab operations
pub type Result<T> = std::result::Result<T, PerfLabError>;

impl From<serde_json::Error> for PerfLabError {
    fn from(err: serde_json::Error) -> Self {
        PerfLabError::ConfigError(err.to_string())
    }
}
