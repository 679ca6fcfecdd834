//! Per-cell height composition.
//!
//! [`CellComposer::compose`] maps a normalized cell coordinate, the frame's
//! [`WaveState`] and the pointer input to a single height. Terms are applied
//! in a fixed order and the wave terms *replace* the running height rather
//! than adding to it:
//!
//! 1. background raked waves along `u`
//! 2. a rotated interference overlay, inside the band `(-20π, 10π)`, or,
//!    with the grid overlay enabled and `grid_unit >= 2`, a checkerboard
//!    of `u` and `v` rakes
//! 3. circular wave annuli, index 0 → 2, later indices winning overlaps
//! 4. optional master fade around the anchor wave
//! 5. bump noise (added)
//! 6. pointer disturbance (added, raised-cosine falloff)
//!
//! The function is pure: the only time input is `state.elapsed_time`.

use crate::wave::WaveState;
use glam::DVec2;
use sand_garden_core::NoiseSource;
use std::f64::consts::PI;

/// Height scale of every raked wave term.
const WAVE_HEIGHT: f64 = 10.0;
/// Spatial frequency of the raked ripples.
const RIPPLE_FREQUENCY: f64 = 200.0;
/// Interference overlay: frequency and amplitude of the cross wobble.
const WOBBLE_FREQUENCY: f64 = 10.0;
const WOBBLE_AMPLITUDE: f64 = 8.0;
/// Open band of the overlay's phase sum where it overrides the base.
const OVERLAY_BAND: (f64, f64) = (-20.0 * PI, 10.0 * PI);

/// Sign-preserving square root of `sin(x)`: a sharpened ripple profile.
pub fn ripple(x: f64) -> f64 {
    let s = x.sin();
    s.signum() * s.abs().sqrt()
}

/// Pointer input for one frame.
///
/// "No pointer" is a position far outside the field, so the distance-based
/// falloff evaluates to exactly zero without a presence check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub position: DVec2,
    pub radius: f64,
    pub strength: f64,
}

impl PointerInput {
    /// Position used when no pointer is present.
    pub const SENTINEL: DVec2 = DVec2::new(10_000.0, 10_000.0);

    /// A pointer at `uv`, clamped to the unit square.
    pub fn at(uv: DVec2, radius: f64, strength: f64) -> Self {
        Self {
            position: uv.clamp(DVec2::ZERO, DVec2::ONE),
            radius,
            strength,
        }
    }

    /// No pointer this frame.
    pub fn absent(radius: f64, strength: f64) -> Self {
        Self {
            position: Self::SENTINEL,
            radius,
            strength,
        }
    }

    /// Displacement this pointer adds at `uv`. Zero at and beyond the radius.
    pub fn displacement(&self, uv: DVec2) -> f64 {
        let phase = (uv.distance(self.position) * PI / self.radius).min(PI);
        (phase.cos() + 1.0) * 0.5 * self.strength
    }
}

/// Evaluates the layered height function. Holds only immutable inputs: the
/// noise primitive and the bump/fade settings.
#[derive(Debug, Clone)]
pub struct CellComposer {
    noise: NoiseSource,
    bump_amplitude: f64,
    bump_frequency: f64,
    master_fade: bool,
    grid_overlay: bool,
}

impl CellComposer {
    pub fn new(noise: NoiseSource, bump_amplitude: f64, bump_frequency: f64, master_fade: bool) -> Self {
        Self {
            noise,
            bump_amplitude,
            bump_frequency,
            master_fade,
            grid_overlay: false,
        }
    }

    /// Enables the checkerboard rake used while `grid_unit >= 2`.
    pub fn with_grid_overlay(mut self, enabled: bool) -> Self {
        self.grid_overlay = enabled;
        self
    }

    /// Height at `uv` for this frame.
    pub fn compose(&self, uv: DVec2, state: &WaveState, pointer: &PointerInput) -> f64 {
        let mut h = self.waves(uv, state);

        if self.master_fade {
            let d = uv.distance(state.anchor());
            h *= state.master_scale.powf((d + 0.02) * 15.0);
        }

        let bump = (uv - 0.5) * self.bump_frequency;
        h += self.bump_amplitude * self.noise.noise2(bump.x, bump.y);

        h + pointer.displacement(uv)
    }

    /// The override-layered wave terms (steps 1–3) without noise or pointer.
    pub fn waves(&self, uv: DVec2, state: &WaveState) -> f64 {
        let background = WAVE_HEIGHT * state.background_wave_scale;
        let mut h = ripple(uv.x * RIPPLE_FREQUENCY) * background;

        if self.grid_overlay && state.grid_unit >= 2.0 {
            let unit = 1.0 / state.grid_unit.floor();
            let gx = (uv.x / unit).rem_euclid(2.0);
            let gy = (uv.y / unit).rem_euclid(2.0);
            if (gx < 1.0) == (gy < 1.0) {
                h = ripple(uv.y * RIPPLE_FREQUENCY) * background;
            }
        } else {
            let rotated = state.transform * uv;
            let sum = rotated.x * RIPPLE_FREQUENCY + (rotated.y * WOBBLE_FREQUENCY).sin() * WOBBLE_AMPLITUDE;
            if sum > OVERLAY_BAND.0 && sum < OVERLAY_BAND.1 {
                h = ripple(sum) * background;
            }
        }

        for wave in state.waves.iter().filter(|w| w.active) {
            let dist = uv.distance(wave.center);
            if wave.contains(dist) {
                h = ripple(dist * RIPPLE_FREQUENCY) * WAVE_HEIGHT;
            }
        }
        h
    }
}
