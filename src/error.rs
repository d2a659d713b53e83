//! Error types for the simulation core.
//!
//! Configuration problems are reported when a session is built or spawned,
//! never halfway through a tick.

use std::fmt;

/// Invalid session or entity parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A quantity that divides the state (mass, step size, spread) must be > 0.
    NonPositive { field: &'static str, value: f64 },
    /// A parameter is NaN or infinite.
    NotFinite { field: &'static str },
    /// A parameter is outside its valid range.
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// A count parameter (neighbor k) must be positive.
    InvalidCount { field: &'static str, value: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive { field, value } => {
                write!(f, "{} must be > 0, got {}", field, value)
            }
            ConfigError::NotFinite { field } => write!(f, "{} must be finite", field),
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{} must be in [{}, {}], got {}", field, min, max, value),
            ConfigError::InvalidCount { field, value } => {
                write!(f, "{} must be > 0, got {}", field, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Requested surface does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    Unknown(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::Unknown(name) => write!(
                f,
                "no surface named '{}' (expected parabola, banana or binorm)",
                name
            ),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Shape and divisor errors from the slice and matrix helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    LengthMismatch { left: usize, right: usize },
    DivisionByZero { index: usize },
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::LengthMismatch { left, right } => {
                write!(f, "vector lengths differ: {} vs {}", left, right)
            }
            MathError::DivisionByZero { index } => {
                write!(f, "division by zero at component {}", index)
            }
            MathError::ShapeMismatch { left, right } => write!(
                f,
                "cannot multiply {}x{} by {}x{}",
                left.0, left.1, right.0, right.1
            ),
        }
    }
}

impl std::error::Error for MathError {}

/// Errors surfaced by the orchestrators and the page-facing `Sim` handle.
#[derive(Debug)]
pub enum ModelError {
    Config(ConfigError),
    Surface(SurfaceError),
    /// Configuration JSON from the page could not be parsed.
    Json(serde_json::Error),
    /// The selected model has no such operation.
    Unsupported(&'static str),
    /// Entropy for an unseeded session could not be obtained.
    Entropy(getrandom::Error),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Config(e) => write!(f, "invalid configuration: {}", e),
            ModelError::Surface(e) => write!(f, "{}", e),
            ModelError::Json(e) => write!(f, "malformed configuration JSON: {}", e),
            ModelError::Unsupported(op) => write!(f, "{} is not supported by this model", op),
            ModelError::Entropy(e) => write!(f, "failed to obtain a random seed: {}", e),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Config(e) => Some(e),
            ModelError::Surface(e) => Some(e),
            ModelError::Json(e) => Some(e),
            ModelError::Entropy(e) => Some(e),
            ModelError::Unsupported(_) => None,
        }
    }
}

impl From<ConfigError> for ModelError {
    fn from(e: ConfigError) -> Self {
        ModelError::Config(e)
    }
}

impl From<SurfaceError> for ModelError {
    fn from(e: SurfaceError) -> Self {
        ModelError::Surface(e)
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        ModelError::Json(e)
    }
}

impl From<getrandom::Error> for ModelError {
    fn from(e: getrandom::Error) -> Self {
        ModelError::Entropy(e)
    }
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field })
    }
}

pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    ensure_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    ensure_finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: f64::INFINITY,
        })
    }
}
