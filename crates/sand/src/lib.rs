#![deny(unsafe_code)]
//! Sand-garden height-field engine.
//!
//! A [`SimulationContext`] owns a double-buffered height field and
//! recomposes it every frame from raked background waves, three circular
//! wave bands, bump noise and a pointer disturbance. Layout changes fade the
//! pattern out, swap in a new arrangement and fade it back in, while a
//! decorative body and the display groups follow along.

pub mod animators;
pub mod compose;
pub mod config;
pub mod context;
pub mod easing;
pub mod sampler;
pub mod transition;
pub mod tween;
pub mod wave;

pub use animators::{DecorativeBody, SceneCrossFade};
pub use compose::{CellComposer, PointerInput};
pub use config::SandConfig;
pub use context::SimulationContext;
pub use easing::Easing;
pub use sampler::{FloatingBody, PointSampler, ProbeResult};
pub use transition::{LayoutTransition, TransitionEvent, TransitionPhase};
pub use tween::Tween;
pub use wave::{CircularWave, Layout, WaveState};
