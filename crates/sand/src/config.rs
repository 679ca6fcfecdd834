//! Simulation configuration.
//!
//! [`SandConfig`] bundles every tunable of the sand garden. Build it from
//! [`Default`] or from a JSON params object with [`SandConfig::from_json`]
//! (missing keys fall back to defaults), then call
//! [`SandConfig::validate`] before constructing a simulation.

use sand_garden_core::error::EngineError;
use sand_garden_core::params::{param_bool, param_f64, param_usize};
use sand_garden_core::FractalParams;
use serde_json::{json, Value};

const DEFAULT_SIZE: usize = 256;
const DEFAULT_MAX_HEIGHT: f64 = 10.0;
const DEFAULT_OCTAVES: usize = 15;
const DEFAULT_BASE_FREQUENCY: f64 = 0.025;
const DEFAULT_LACUNARITY: f64 = 1.25;
const DEFAULT_BUMP_AMPLITUDE: f64 = 4.0;
const DEFAULT_BUMP_FREQUENCY: f64 = 500.0;
const DEFAULT_BACKGROUND_WAVE_SCALE: f64 = 1.0;
/// Pointer influence radius in normalized field units.
const DEFAULT_POINTER_RADIUS: f64 = 0.04;
/// Peak pointer displacement; negative presses the sand down.
const DEFAULT_POINTER_STRENGTH: f64 = -2.0;
const DEFAULT_SHRINK_MS: f64 = 1000.0;
const DEFAULT_GROW_MS: f64 = 900.0;
/// Side length of the field in world units (x and z).
const DEFAULT_BOUNDS: f64 = 1024.0;
const DEFAULT_BODY_SINK_MS: f64 = 900.0;
const DEFAULT_BODY_RISE_MS: f64 = 400.0;
const DEFAULT_BODY_SPIN: f64 = 0.0;
const DEFAULT_SCENE_FADE_MS: f64 = 3000.0;
const DEFAULT_SCENE_GROUPS: usize = 2;

/// All tunables of the sand-garden simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SandConfig {
    /// Grid side length N (the field is N×N).
    pub size: usize,
    /// Amplitude of the first fractal octave of the initial field.
    pub max_height: f64,
    /// Number of fractal octaves.
    pub octaves: usize,
    pub base_frequency: f64,
    pub lacunarity: f64,
    /// Amplitude of the bump noise added to every cell.
    pub bump_amplitude: f64,
    /// Domain scale of the bump noise.
    pub bump_frequency: f64,
    /// Initial background wave scale in [0, 1].
    pub background_wave_scale: f64,
    pub pointer_radius: f64,
    pub pointer_strength: f64,
    /// Duration of the fade-out half of a layout change.
    pub shrink_ms: f64,
    /// Duration of the fade-in half of a layout change.
    pub grow_ms: f64,
    /// Attenuate heights by the master scale around the anchor wave.
    pub master_fade: bool,
    /// Replace the interference overlay with a checkerboard rake while `grid_unit >= 2`.
    pub grid_overlay: bool,
    /// Advance the phase accumulator by a fixed 1/60 s per frame instead of the real delta.
    pub fixed_phase_step: bool,
    pub bounds: f64,
    pub body_sink_ms: f64,
    pub body_rise_ms: f64,
    /// Idle spin of the decorative body, radians per second.
    pub body_spin: f64,
    pub scene_fade_ms: f64,
    pub scene_groups: usize,
}

impl Default for SandConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            max_height: DEFAULT_MAX_HEIGHT,
            octaves: DEFAULT_OCTAVES,
            base_frequency: DEFAULT_BASE_FREQUENCY,
            lacunarity: DEFAULT_LACUNARITY,
            bump_amplitude: DEFAULT_BUMP_AMPLITUDE,
            bump_frequency: DEFAULT_BUMP_FREQUENCY,
            background_wave_scale: DEFAULT_BACKGROUND_WAVE_SCALE,
            pointer_radius: DEFAULT_POINTER_RADIUS,
            pointer_strength: DEFAULT_POINTER_STRENGTH,
            shrink_ms: DEFAULT_SHRINK_MS,
            grow_ms: DEFAULT_GROW_MS,
            master_fade: false,
            grid_overlay: false,
            fixed_phase_step: false,
            bounds: DEFAULT_BOUNDS,
            body_sink_ms: DEFAULT_BODY_SINK_MS,
            body_rise_ms: DEFAULT_BODY_RISE_MS,
            body_spin: DEFAULT_BODY_SPIN,
            scene_fade_ms: DEFAULT_SCENE_FADE_MS,
            scene_groups: DEFAULT_SCENE_GROUPS,
        }
    }
}

impl SandConfig {
    /// Reads a config from a JSON object, falling back to defaults per key.
    ///
    /// `size` is taken from the argument, not the params object, so callers
    /// (CLI, seed files) keep grid size as a first-class setting.
    pub fn from_json(size: usize, params: &Value) -> Self {
        let d = Self::default();
        Self {
            size,
            max_height: param_f64(params, "max_height", d.max_height),
            octaves: param_usize(params, "octaves", d.octaves),
            base_frequency: param_f64(params, "base_frequency", d.base_frequency),
            lacunarity: param_f64(params, "lacunarity", d.lacunarity),
            bump_amplitude: param_f64(params, "bump_amplitude", d.bump_amplitude),
            bump_frequency: param_f64(params, "bump_frequency", d.bump_frequency),
            background_wave_scale: param_f64(
                params,
                "background_wave_scale",
                d.background_wave_scale,
            ),
            pointer_radius: param_f64(params, "pointer_radius", d.pointer_radius),
            pointer_strength: param_f64(params, "pointer_strength", d.pointer_strength),
            shrink_ms: param_f64(params, "shrink_ms", d.shrink_ms),
            grow_ms: param_f64(params, "grow_ms", d.grow_ms),
            master_fade: param_bool(params, "master_fade", d.master_fade),
            grid_overlay: param_bool(params, "grid_overlay", d.grid_overlay),
            fixed_phase_step: param_bool(params, "fixed_phase_step", d.fixed_phase_step),
            bounds: param_f64(params, "bounds", d.bounds),
            body_sink_ms: param_f64(params, "body_sink_ms", d.body_sink_ms),
            body_rise_ms: param_f64(params, "body_rise_ms", d.body_rise_ms),
            body_spin: param_f64(params, "body_spin", d.body_spin),
            scene_fade_ms: param_f64(params, "scene_fade_ms", d.scene_fade_ms),
            scene_groups: param_usize(params, "scene_groups", d.scene_groups),
        }
    }

    /// Rejects configurations no frame could run with, including values
    /// outside the ranges published by [`SandConfig::param_schema`].
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.size < 2 {
            return Err(EngineError::InvalidDimensions);
        }
        self.size
            .checked_mul(self.size)
            .ok_or(EngineError::InvalidDimensions)?;
        if self.octaves == 0 {
            return Err(EngineError::config("octaves", "must be at least 1"));
        }
        if self.scene_groups == 0 {
            return Err(EngineError::config("scene_groups", "must be at least 1"));
        }

        let finite = [
            ("max_height", self.max_height),
            ("base_frequency", self.base_frequency),
            ("lacunarity", self.lacunarity),
            ("bump_amplitude", self.bump_amplitude),
            ("bump_frequency", self.bump_frequency),
            ("pointer_strength", self.pointer_strength),
            ("body_spin", self.body_spin),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(EngineError::config(name, format!("must be finite, got {value}")));
            }
        }

        if !(0.0..=1.0).contains(&self.background_wave_scale) {
            return Err(EngineError::config(
                "background_wave_scale",
                format!("must be in [0, 1], got {}", self.background_wave_scale),
            ));
        }

        let positive = [
            ("pointer_radius", self.pointer_radius),
            ("bounds", self.bounds),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(EngineError::config(name, format!("must be positive, got {value}")));
            }
        }

        let durations = [
            ("shrink_ms", self.shrink_ms),
            ("grow_ms", self.grow_ms),
            ("body_sink_ms", self.body_sink_ms),
            ("body_rise_ms", self.body_rise_ms),
            ("scene_fade_ms", self.scene_fade_ms),
        ];
        for (name, value) in durations {
            if !(value.is_finite() && value >= 0.0) {
                return Err(EngineError::config(
                    name,
                    format!("must be a non-negative duration, got {value}"),
                ));
            }
        }

        let values = self.to_json();
        for (name, entry) in Self::param_schema().as_object().into_iter().flatten() {
            let (Some(min), Some(max)) = (entry["min"].as_f64(), entry["max"].as_f64()) else {
                continue;
            };
            let Some(value) = values[name].as_f64() else {
                continue;
            };
            if !(min..=max).contains(&value) {
                return Err(EngineError::config(
                    name,
                    format!("must be in [{min}, {max}], got {value}"),
                ));
            }
        }

        self.fractal().validate()
    }

    /// Octave schedule for the initial field.
    pub fn fractal(&self) -> FractalParams {
        FractalParams {
            max_height: self.max_height,
            octaves: self.octaves,
            base_frequency: self.base_frequency,
            lacunarity: self.lacunarity,
            ..FractalParams::default()
        }
    }

    /// Current values as a JSON object.
    pub fn to_json(&self) -> Value {
        json!({
            "size": self.size,
            "max_height": self.max_height,
            "octaves": self.octaves,
            "base_frequency": self.base_frequency,
            "lacunarity": self.lacunarity,
            "bump_amplitude": self.bump_amplitude,
            "bump_frequency": self.bump_frequency,
            "background_wave_scale": self.background_wave_scale,
            "pointer_radius": self.pointer_radius,
            "pointer_strength": self.pointer_strength,
            "shrink_ms": self.shrink_ms,
            "grow_ms": self.grow_ms,
            "master_fade": self.master_fade,
            "grid_overlay": self.grid_overlay,
            "fixed_phase_step": self.fixed_phase_step,
            "bounds": self.bounds,
            "body_sink_ms": self.body_sink_ms,
            "body_rise_ms": self.body_rise_ms,
            "body_spin": self.body_spin,
            "scene_fade_ms": self.scene_fade_ms,
            "scene_groups": self.scene_groups,
        })
    }

    /// Schema of every parameter accepted by [`SandConfig::from_json`].
    pub fn param_schema() -> Value {
        json!({
            "max_height": {
                "type": "number", "default": DEFAULT_MAX_HEIGHT, "min": 0.0, "max": 100.0,
                "description": "Amplitude of the first fractal octave of the initial field"
            },
            "octaves": {
                "type": "integer", "default": DEFAULT_OCTAVES, "min": 1, "max": 32,
                "description": "Number of fractal octaves in the initial field"
            },
            "base_frequency": {
                "type": "number", "default": DEFAULT_BASE_FREQUENCY, "min": 0.0, "max": 1.0,
                "description": "Frequency of the first fractal octave"
            },
            "lacunarity": {
                "type": "number", "default": DEFAULT_LACUNARITY, "min": 1.0, "max": 4.0,
                "description": "Frequency multiplier between octaves"
            },
            "bump_amplitude": {
                "type": "number", "default": DEFAULT_BUMP_AMPLITUDE, "min": 0.0, "max": 20.0,
                "description": "Amplitude of the sand bump noise added to every cell"
            },
            "bump_frequency": {
                "type": "number", "default": DEFAULT_BUMP_FREQUENCY, "min": 1.0, "max": 2000.0,
                "description": "Domain scale of the sand bump noise"
            },
            "background_wave_scale": {
                "type": "number", "default": DEFAULT_BACKGROUND_WAVE_SCALE, "min": 0.0, "max": 1.0,
                "description": "Scale of the raked background waves"
            },
            "pointer_radius": {
                "type": "number", "default": DEFAULT_POINTER_RADIUS, "min": 0.001, "max": 1.0,
                "description": "Pointer influence radius in normalized field units"
            },
            "pointer_strength": {
                "type": "number", "default": DEFAULT_POINTER_STRENGTH, "min": -20.0, "max": 20.0,
                "description": "Peak pointer displacement (negative presses down)"
            },
            "shrink_ms": {
                "type": "number", "default": DEFAULT_SHRINK_MS, "min": 0.0, "max": 10000.0,
                "description": "Fade-out duration of a layout change"
            },
            "grow_ms": {
                "type": "number", "default": DEFAULT_GROW_MS, "min": 0.0, "max": 10000.0,
                "description": "Fade-in duration of a layout change"
            },
            "master_fade": {
                "type": "boolean", "default": false,
                "description": "Attenuate heights by the master scale around the anchor wave"
            },
            "grid_overlay": {
                "type": "boolean", "default": false,
                "description": "Rake a checkerboard instead of the interference overlay on non-unit grids"
            },
            "fixed_phase_step": {
                "type": "boolean", "default": false,
                "description": "Advance the phase accumulator by 1/60 s per frame regardless of dt"
            },
            "bounds": {
                "type": "number", "default": DEFAULT_BOUNDS, "min": 1.0, "max": 100000.0,
                "description": "Side length of the field in world units"
            },
            "body_sink_ms": {
                "type": "number", "default": DEFAULT_BODY_SINK_MS, "min": 0.0, "max": 10000.0,
                "description": "Duration of the decorative body sinking out"
            },
            "body_rise_ms": {
                "type": "number", "default": DEFAULT_BODY_RISE_MS, "min": 0.0, "max": 10000.0,
                "description": "Duration of the decorative body rising back"
            },
            "body_spin": {
                "type": "number", "default": DEFAULT_BODY_SPIN, "min": -1.0, "max": 1.0,
                "description": "Idle spin of the decorative body in radians per second"
            },
            "scene_fade_ms": {
                "type": "number", "default": DEFAULT_SCENE_FADE_MS, "min": 0.0, "max": 30000.0,
                "description": "Duration of the display-group cross-fade"
            },
            "scene_groups": {
                "type": "integer", "default": DEFAULT_SCENE_GROUPS, "min": 1, "max": 8,
                "description": "Number of display groups the cross-fade cycles through"
            }
        })
    }
}
