#![deny(unsafe_code)]
//! Core types for the sand-garden height-field simulation.
//!
//! Provides the `Engine` trait, the `Field` height grid and its double-buffered
//! `FieldPair`, the seeded `NoiseSource` (fractal initial field plus the
//! coherent-noise primitive), the `Xorshift64` PRNG, the reproducible `Seed`,
//! and JSON parameter helpers.

pub mod buffer;
pub mod engine;
pub mod error;
pub mod field;
pub mod fractal;
pub mod params;
pub mod prng;
pub mod seed;

pub use buffer::FieldPair;
pub use engine::Engine;
pub use error::EngineError;
pub use field::Field;
pub use fractal::{FractalParams, NoiseSource};
pub use prng::Xorshift64;
pub use seed::Seed;
