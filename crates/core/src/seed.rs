//! Reproducible description of a simulation run.
//!
//! A [`Seed`] captures everything needed to replay a run bit for bit: engine
//! name, field size, parameter overrides, the noise/PRNG seed, how many
//! frames to advance, the frame length, and the frames at which a layout
//! change is requested.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Default frame length: one 60 Hz frame, in milliseconds.
pub const DEFAULT_FRAME_MS: f64 = 1000.0 / 60.0;

fn default_frame_ms() -> f64 {
    DEFAULT_FRAME_MS
}

/// Reproducible run specification. Two identical seeds fed to the same
/// binary produce bit-identical fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub engine: String,
    pub size: usize,
    pub params: serde_json::Value,
    pub seed: u64,
    pub frames: usize,
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f64,
    /// Frame indices (0-based) before which a layout change is requested.
    #[serde(default)]
    pub layout_changes: Vec<usize>,
}

impl Seed {
    /// Creates a seed with empty params, zero frames and 60 Hz frames.
    pub fn new(engine: &str, size: usize, seed: u64) -> Self {
        Self {
            engine: engine.to_string(),
            size,
            params: serde_json::Value::Object(serde_json::Map::new()),
            seed,
            frames: 0,
            frame_ms: DEFAULT_FRAME_MS,
            layout_changes: Vec::new(),
        }
    }

    /// Rejects sizes below 2, overflowing sizes and non-positive frame lengths.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.size < 2 {
            return Err(EngineError::InvalidDimensions);
        }
        self.size
            .checked_mul(self.size)
            .ok_or(EngineError::InvalidDimensions)?;
        if !(self.frame_ms.is_finite() && self.frame_ms > 0.0) {
            return Err(EngineError::config(
                "frame_ms",
                format!("must be a positive number of milliseconds, got {}", self.frame_ms),
            ));
        }
        Ok(())
    }

    /// True if a layout change is scheduled before `frame`.
    pub fn changes_layout_at(&self, frame: usize) -> bool {
        self.layout_changes.contains(&frame)
    }
}
