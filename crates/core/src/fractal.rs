//! Coherent noise: the shared 2D primitive and the fractal height generator.
//!
//! [`NoiseSource`] wraps a seeded OpenSimplex generator. The same instance
//! seeds the initial field with a multi-octave fractal sum
//! ([`NoiseSource::generate`]) and provides the single-octave primitive the
//! composer uses for bump noise. Same seed, same output, on every platform.

use crate::error::EngineError;
use crate::field::Field;
use ::noise::{NoiseFn, OpenSimplex};

/// Side length of the noise domain the field is mapped onto, in noise units.
const DOMAIN_EXTENT: f64 = 128.0;
/// Largest noise coordinate the OpenSimplex lattice lookup can index.
const MAX_DOMAIN_COORD: f64 = 1e15;

/// Parameters of the fractal octave sum.
///
/// Octave `k` has amplitude `a_k` and frequency `f_k` where
/// `a_0 = max_height`, `a_{k+1} = a_k * (persistence + persistence_step * k)`,
/// `f_0 = base_frequency`, `f_{k+1} = f_k * lacunarity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalParams {
    pub max_height: f64,
    pub octaves: usize,
    pub base_frequency: f64,
    pub lacunarity: f64,
    pub persistence: f64,
    pub persistence_step: f64,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            max_height: 10.0,
            octaves: 15,
            base_frequency: 0.025,
            lacunarity: 1.25,
            persistence: 0.53,
            persistence_step: 0.025,
        }
    }
}

impl FractalParams {
    /// Per-octave `(amplitude, frequency)` pairs.
    pub fn octave_iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        (0..self.octaves).scan(
            (self.max_height, self.base_frequency),
            move |(amp, freq), k| {
                let current = (*amp, *freq);
                *amp *= self.persistence + self.persistence_step * k as f64;
                *freq *= self.lacunarity;
                Some(current)
            },
        )
    }

    /// Sum of all octave amplitudes: the bound on `|height|` of a generated field.
    pub fn amplitude_bound(&self) -> f64 {
        self.octave_iter().map(|(amp, _)| amp.abs()).sum()
    }

    /// Rejects schedules whose amplitudes overflow or whose top octave
    /// samples beyond the noise lattice.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.octaves == 0 {
            return Err(EngineError::config("octaves", "must be at least 1"));
        }
        let bound = self.amplitude_bound();
        if !bound.is_finite() {
            return Err(EngineError::config(
                "max_height",
                format!("octave amplitudes sum to {bound}"),
            ));
        }
        let reach = self
            .octave_iter()
            .map(|(_, freq)| freq.abs() * DOMAIN_EXTENT)
            .fold(0.0, f64::max);
        if !(reach <= MAX_DOMAIN_COORD) {
            return Err(EngineError::config(
                "lacunarity",
                format!("top octave reaches noise coordinate {reach}, limit is {MAX_DOMAIN_COORD}"),
            ));
        }
        Ok(())
    }
}

/// Seeded 2D coherent noise.
#[derive(Clone)]
pub struct NoiseSource {
    simplex: OpenSimplex,
    seed: u32,
}

impl std::fmt::Debug for NoiseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseSource").field("seed", &self.seed).finish()
    }
}

impl NoiseSource {
    /// Creates a noise source. 64-bit run seeds are folded to the 32-bit
    /// noise seed by xoring the halves.
    pub fn new(seed: u64) -> Self {
        let seed = (seed ^ (seed >> 32)) as u32;
        Self {
            simplex: OpenSimplex::new(seed),
            seed,
        }
    }

    /// The 32-bit seed the generator was built with.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Single-octave noise at `(x, y)`, roughly in `[-1, 1]`.
    pub fn noise2(&self, x: f64, y: f64) -> f64 {
        self.simplex.get([x, y])
    }

    /// Fractal octave sum at `(x, y)`.
    pub fn fractal(&self, x: f64, y: f64, params: &FractalParams) -> f64 {
        params
            .octave_iter()
            .map(|(amp, freq)| amp * self.noise2(x * freq, y * freq))
            .sum()
    }

    /// Generates the initial `size × size` height field.
    ///
    /// Cell `(i, j)` samples the fractal sum at `(i * 128 / size, j * 128 / size)`.
    pub fn generate(&self, size: usize, params: &FractalParams) -> Result<Field, EngineError> {
        params.validate()?;
        let mut field = Field::new(size, size)?;
        let step = DOMAIN_EXTENT / size as f64;
        for (idx, h) in field.data_mut().iter_mut().enumerate() {
            let i = idx % size;
            let j = idx / size;
            *h = self.fractal(i as f64 * step, j as f64 * step, params);
        }
        log::debug!(
            "generated {size}x{size} fractal field (seed {}, {} octaves)",
            self.seed,
            params.octaves
        );
        Ok(field)
    }
}
