//! Error types for the sand-garden core.

use thiserror::Error;

/// Errors produced by field, configuration and engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Field size was too small to simulate, or `size * size` overflowed.
    #[error("invalid dimensions: field size must be at least 2 and size * size must fit in memory")]
    InvalidDimensions,

    /// A configuration value was rejected before any frame ran.
    #[error("invalid configuration for '{name}': {reason}")]
    InvalidConfig { name: String, reason: String },

    /// Two fields had incompatible dimensions.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// An engine name did not match any registered engine.
    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    /// A snapshot or seed file could not be read or written.
    #[error("i/o error: {0}")]
    Io(String),
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidConfig`].
    pub fn config(name: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidConfig {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
