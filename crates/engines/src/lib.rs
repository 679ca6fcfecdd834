#![deny(unsafe_code)]
//! Engine registry: maps engine names to implementations and provides
//! CPU-side snapshot rendering.
//!
//! This crate sits between `sand-garden-core` (which defines the `Engine`
//! trait) and the engine crates (`sand-garden-sim`), so the CLI does not
//! duplicate dispatch logic.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use sand_garden_core::error::EngineError;
use sand_garden_core::field::Field;
use sand_garden_core::Engine;
use sand_garden_sim::{SandConfig, SimulationContext};
use serde_json::Value;

/// All available engine names.
const ENGINE_NAMES: &[&str] = &["sand-garden"];

/// Enumeration of all available engines.
///
/// Wraps each engine implementation and delegates `Engine` trait methods.
/// Use [`EngineKind::from_name`] for string-based construction.
#[derive(Debug)]
pub enum EngineKind {
    /// Raked sand garden with layout transitions.
    SandGarden(Box<SimulationContext>),
}

impl EngineKind {
    /// Constructs an engine by name on a `size × size` field.
    ///
    /// Returns `EngineError::UnknownEngine` if the name is not recognized.
    pub fn from_name(name: &str, size: usize, seed: u64, params: &Value) -> Result<Self, EngineError> {
        match name {
            "sand-garden" => {
                let config = SandConfig::from_json(size, params);
                Ok(EngineKind::SandGarden(Box::new(SimulationContext::new(config, seed)?)))
            }
            _ => Err(EngineError::UnknownEngine(name.to_string())),
        }
    }

    /// Returns a slice of all recognized engine names.
    pub fn list_engines() -> &'static [&'static str] {
        ENGINE_NAMES
    }

    /// Requests a layout change at a random anchor. Returns `false` when the
    /// engine is already changing.
    pub fn request_layout_change(&mut self) -> bool {
        match self {
            EngineKind::SandGarden(e) => e.request_layout_change(None),
        }
    }

    /// The sand-garden context, for callers that drive its inputs directly.
    pub fn sand_mut(&mut self) -> &mut SimulationContext {
        match self {
            EngineKind::SandGarden(e) => e,
        }
    }
}

impl Engine for EngineKind {
    fn advance(&mut self, dt_ms: f64) -> Result<(), EngineError> {
        match self {
            EngineKind::SandGarden(e) => Engine::advance(e.as_mut(), dt_ms),
        }
    }

    fn field(&self) -> &Field {
        match self {
            EngineKind::SandGarden(e) => e.current_field(),
        }
    }

    fn params(&self) -> Value {
        match self {
            EngineKind::SandGarden(e) => e.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            EngineKind::SandGarden(e) => e.param_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn small() -> EngineKind {
        EngineKind::from_name("sand-garden", 16, 42, &json!({"octaves": 4})).unwrap()
    }

    #[test]
    fn from_name_sand_garden_succeeds() {
        let engine = EngineKind::from_name("sand-garden", 32, 42, &json!({}));
        assert!(engine.is_ok());
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = EngineKind::from_name("nonexistent", 32, 42, &json!({}));
        assert!(matches!(result, Err(EngineError::UnknownEngine(_))));
    }

    #[test]
    fn from_name_propagates_config_errors() {
        let result = EngineKind::from_name("sand-garden", 32, 42, &json!({"pointer_radius": 0.0}));
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
        let result = EngineKind::from_name("sand-garden", 1, 42, &json!({}));
        assert!(matches!(result, Err(EngineError::InvalidDimensions)));
    }

    #[test]
    fn list_engines_includes_sand_garden() {
        assert!(EngineKind::list_engines().contains(&"sand-garden"));
    }

    #[test]
    fn trait_delegation_advance_and_field() {
        let mut engine = small();
        assert_eq!(engine.field().width(), 16);
        assert_eq!(engine.field().height(), 16);
        engine.advance(16.0).unwrap();
        assert_eq!(engine.params()["state"]["frame"], 1);
    }

    #[test]
    fn trait_delegation_params_and_schema() {
        let engine = small();
        assert_eq!(engine.params()["octaves"], 4);
        assert!(engine.param_schema().get("bump_amplitude").is_some());
    }

    #[test]
    fn layout_change_is_guarded() {
        let mut engine = small();
        assert!(engine.request_layout_change());
        assert!(!engine.request_layout_change());
        assert!(engine.sand_mut().is_changing());
    }

    #[test]
    fn determinism_same_seed() {
        let mut a = EngineKind::from_name("sand-garden", 32, 99, &json!({})).unwrap();
        let mut b = EngineKind::from_name("sand-garden", 32, 99, &json!({})).unwrap();
        a.request_layout_change();
        b.request_layout_change();
        for _ in 0..10 {
            a.advance(100.0).unwrap();
            b.advance(100.0).unwrap();
        }
        assert!(a
            .field()
            .data()
            .iter()
            .zip(b.field().data().iter())
            .all(|(va, vb)| va.to_bits() == vb.to_bits()));
    }

    #[test]
    fn object_safety() {
        let engine = small();
        let boxed: Box<dyn Engine> = Box::new(engine);
        assert_eq!(boxed.field().width(), 16);
    }
}
