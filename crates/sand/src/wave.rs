//! Wave parameters read by the cell composer.
//!
//! [`WaveState`] is the complete parameter set for one frame's composition.
//! It is owned by the layout transition machine and handed to the composer
//! by shared reference, so a frame never mixes two snapshots.

use glam::{DMat2, DVec2};
use sand_garden_core::Xorshift64;
use serde::{Deserialize, Serialize};

/// Number of circular waves in a layout.
pub const WAVE_COUNT: usize = 3;

/// Index of the anchor wave (the one a layout change can target).
pub const ANCHOR_WAVE: usize = 2;

/// Fixed `(outer, inner)` radius bands, one per wave index.
pub const RADIUS_BANDS: [(f64, f64); WAVE_COUNT] = [(0.2, 0.05), (0.1, 0.0), (0.3, 0.03)];

/// A radially symmetric ripple confined to the open annulus
/// `inner < dist < outer` around `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularWave {
    pub center: DVec2,
    pub active: bool,
    pub outer: f64,
    pub inner: f64,
}

impl CircularWave {
    /// Active wave at `center` with radius band `index`.
    pub fn banded(center: DVec2, index: usize) -> Self {
        let (outer, inner) = RADIUS_BANDS[index];
        Self {
            center,
            active: true,
            outer,
            inner,
        }
    }

    /// True if `dist` lies strictly inside the annulus.
    pub fn contains(&self, dist: f64) -> bool {
        self.outer > dist && dist > self.inner
    }
}

/// The three circular waves of a layout, in override order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub waves: [CircularWave; WAVE_COUNT],
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            waves: [
                CircularWave::banded(DVec2::new(0.1, 0.2), 0),
                CircularWave::banded(DVec2::new(0.8, 0.4), 1),
                CircularWave::banded(DVec2::new(0.3, 0.8), 2),
            ],
        }
    }
}

impl Layout {
    /// Draws a new layout: two decorative waves in fixed coordinate bands and
    /// an anchor wave at `target` (clamped to the unit square) or at a random
    /// fallback position.
    pub fn random(rng: &mut Xorshift64, target: Option<DVec2>) -> Self {
        let first = DVec2::new(rng.next_range(0.2, 0.25), rng.next_range(0.1, 0.7));
        let second = DVec2::new(rng.next_range(0.7, 0.9), rng.next_range(0.3, 0.5));
        let anchor = match target {
            Some(t) => t.clamp(DVec2::ZERO, DVec2::ONE),
            None => DVec2::new(rng.next_range(0.2, 0.8), rng.next_range(0.3, 0.9)),
        };
        Self {
            waves: [
                CircularWave::banded(first, 0),
                CircularWave::banded(second, 1),
                CircularWave::banded(anchor, ANCHOR_WAVE),
            ],
        }
    }

    /// Centre of the anchor wave.
    pub fn anchor(&self) -> DVec2 {
        self.waves[ANCHOR_WAVE].center
    }
}

/// Every parameter the composer reads.
///
/// Ranges: `master_scale` and `background_wave_scale` in [0, 1],
/// `grid_unit >= 1`, `transform` a rotation, `elapsed_time` in seconds and
/// monotonic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveState {
    pub master_scale: f64,
    pub background_wave_scale: f64,
    pub waves: [CircularWave; WAVE_COUNT],
    pub grid_unit: f64,
    /// Column-major 2×2 rotation applied to `uv` before the interference overlay.
    pub transform: DMat2,
    pub elapsed_time: f64,
}

impl Default for WaveState {
    fn default() -> Self {
        Self {
            master_scale: 1.0,
            background_wave_scale: 1.0,
            waves: Layout::default().waves,
            grid_unit: 1.0,
            transform: DMat2::from_cols_array(&[0.8, 0.6, -0.6, 0.8]),
            elapsed_time: 0.0,
        }
    }
}

impl WaveState {
    /// Default layout with the given background wave scale.
    pub fn with_background_scale(background_wave_scale: f64) -> Self {
        Self {
            background_wave_scale,
            ..Self::default()
        }
    }

    /// Centre of the anchor wave.
    pub fn anchor(&self) -> DVec2 {
        self.waves[ANCHOR_WAVE].center
    }
}
