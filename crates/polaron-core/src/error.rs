//! Error types for Polaron operations.
//!
//! Configuration and topology problems are fatal and detected before or
//! during construction; nothing in the tick loop itself is expected to
//! fail. Routine transport conditions (contention, saturation, a carrier
//! with no viable neighbor) are not errors and never surface here.

use std::error::Error;
use std::fmt;

/// Result type for Polaron operations.
pub type Result<T> = std::result::Result<T, PolaronError>;

/// Errors that can occur while setting up or reporting on a run.
#[derive(Debug, Clone)]
pub enum PolaronError {
    /// Configuration errors — rejected before any component is built.
    Config(ConfigError),
    /// Topology errors — a construction-time defect in lattice setup.
    Topology(TopologyError),
    /// I/O errors (wrapped).
    Io(String),
    /// Serialization errors.
    Serialization(String),
}

impl fmt::Display for PolaronError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolaronError::Config(e) => write!(f, "Configuration error: {}", e),
            PolaronError::Topology(e) => write!(f, "Topology error: {}", e),
            PolaronError::Io(msg) => write!(f, "I/O error: {}", msg),
            PolaronError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl Error for PolaronError {}

impl From<std::io::Error> for PolaronError {
    fn from(e: std::io::Error) -> Self {
        PolaronError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for PolaronError {
    fn from(e: serde_json::Error) -> Self {
        PolaronError::Serialization(e.to_string())
    }
}

/// Configuration errors.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Invalid value with a reason.
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    /// Numeric value outside its allowed range.
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
    /// A grid dimension of zero.
    EmptyGrid { field: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { field, value, reason } => {
                write!(f, "Invalid value for {}: {} ({})", field, value, reason)
            }
            ConfigError::OutOfRange { field, min, max, value } => {
                write!(f, "{} out of range: {} (must be {}-{})", field, value, min, max)
            }
            ConfigError::EmptyGrid { field } => {
                write!(f, "{} must be at least 1", field)
            }
        }
    }
}

/// Topology errors.
#[derive(Debug, Clone)]
pub enum TopologyError {
    /// Site index beyond the lattice (grid plus electrode pseudo-sites).
    SiteOutOfRange { site: usize, volume: usize },
    /// Grid coordinate beyond its dimension.
    CoordinateOutOfRange {
        axis: &'static str,
        value: usize,
        limit: usize,
    },
    /// Neighbor query on an electrode pseudo-site; electrodes carry
    /// precomputed neighbor lists instead.
    ElectrodeNeighborQuery { site: usize },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyError::SiteOutOfRange { site, volume } => {
                write!(f, "Site index {} out of range (volume {})", site, volume)
            }
            TopologyError::CoordinateOutOfRange { axis, value, limit } => {
                write!(f, "{} coordinate {} out of range (limit {})", axis, value, limit)
            }
            TopologyError::ElectrodeNeighborQuery { site } => {
                write!(f, "Neighbor query on electrode pseudo-site {}", site)
            }
        }
    }
}

// Convenience constructors
impl PolaronError {
    pub fn invalid_config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PolaronError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }

    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, value: f64) -> Self {
        PolaronError::Config(ConfigError::OutOfRange {
            field: field.into(),
            min,
            max,
            value,
        })
    }

    pub fn site_out_of_range(site: usize, volume: usize) -> Self {
        PolaronError::Topology(TopologyError::SiteOutOfRange { site, volume })
    }
}
