//! The `Engine` trait every frame-driven height-field simulation implements.
//!
//! The trait is object-safe so the registry and CLI can drive engines as
//! `dyn Engine` without knowing the concrete type.

use crate::error::EngineError;
use crate::field::Field;
use serde_json::Value;

/// A height-field simulation advanced once per frame.
///
/// Callers advance the engine with the frame's elapsed time and read the
/// current [`Field`] for display or physics.
pub trait Engine {
    /// Advance the simulation by one frame of `dt_ms` milliseconds.
    fn advance(&mut self, dt_ms: f64) -> Result<(), EngineError>;

    /// The current, fully written height field.
    fn field(&self) -> &Field;

    /// Current parameter values (and observable state) as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;
}
