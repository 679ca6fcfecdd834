//! Read-only height probes and the floating bodies that ride on them.
//!
//! World space is centred on the field: `x` runs along `u`, `z` runs against
//! `v`, and the field spans `bounds` world units on each side.

use crate::compose::PointerInput;
use glam::{DVec2, DVec3};
use sand_garden_core::Field;

/// Gradient gain applied to a body's velocity each update.
const SLOPE_GAIN: f64 = 0.1;
/// Per-update velocity retention.
const DRAG: f64 = 0.998;
/// Velocity factor applied to the crossing axis on a wall hit.
const WALL_RESTITUTION: f64 = -0.3;
/// How far inside the wall a reflected body is placed.
const WALL_INSET: f64 = 0.001;

/// Height and downhill slope at a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeResult {
    pub height: f64,
    /// Downhill direction in world `(x, z)`, scaled by `size / bounds`.
    pub gradient: DVec2,
}

/// Maps between world and field coordinates and probes the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSampler {
    bounds: f64,
}

impl PointSampler {
    pub fn new(bounds: f64) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> f64 {
        self.bounds
    }

    /// Bilinear height at `uv` and the central difference one cell to either side.
    /// Positions outside the unit square are clamped onto its edge.
    pub fn sample(&self, field: &Field, uv: DVec2) -> ProbeResult {
        let clamped = uv.clamp(DVec2::ZERO, DVec2::ONE);
        if clamped != uv {
            log::debug!("probe {uv} clamped to {clamped}");
        }
        let uv = clamped;
        let du = DVec2::new(1.0 / field.width() as f64, 0.0);
        let dv = DVec2::new(0.0, 1.0 / field.height() as f64);
        let height = field.sample_bilinear(uv);

        let left = field.sample_bilinear(uv - du);
        let right = field.sample_bilinear(uv + du);
        let down = field.sample_bilinear(uv + dv);
        let up = field.sample_bilinear(uv - dv);

        // +v is -z, so the z slope keeps the sign of the v difference
        let scale = field.width() as f64 / self.bounds;
        ProbeResult {
            height,
            gradient: DVec2::new(left - right, down - up) * scale,
        }
    }

    /// Probe at a world `(x, z)` position.
    pub fn sample_world(&self, field: &Field, x: f64, z: f64) -> ProbeResult {
        self.sample(field, self.uv_from_world(x, z))
    }

    pub fn uv_from_world(&self, x: f64, z: f64) -> DVec2 {
        DVec2::new(x / self.bounds + 0.5, 0.5 - z / self.bounds)
    }

    /// World `(x, z)` of a field coordinate.
    pub fn world_from_uv(&self, uv: DVec2) -> DVec2 {
        DVec2::new((uv.x - 0.5) * self.bounds, (0.5 - uv.y) * self.bounds)
    }

    /// Pointer input from a world-space ray hit on the surface.
    pub fn pointer_at_world(&self, hit: DVec3, radius: f64, strength: f64) -> PointerInput {
        PointerInput::at(self.uv_from_world(hit.x, hit.z), radius, strength)
    }
}

/// A small body drifting downhill on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingBody {
    pub position: DVec3,
    pub velocity: DVec3,
}

impl FloatingBody {
    pub fn new(position: DVec3) -> Self {
        Self {
            position,
            velocity: DVec3::ZERO,
        }
    }

    /// One integration step against the current field. The slope is read
    /// where the body starts and the height where it lands.
    pub fn update(&mut self, sampler: &PointSampler, field: &Field) {
        let probe = sampler.sample_world(field, self.position.x, self.position.z);

        self.velocity.x += probe.gradient.x * SLOPE_GAIN;
        self.velocity.z += probe.gradient.y * SLOPE_GAIN;
        self.velocity *= DRAG;
        self.position += self.velocity;

        let half = sampler.bounds() * 0.5;
        reflect(&mut self.position.x, &mut self.velocity.x, half);
        reflect(&mut self.position.z, &mut self.velocity.z, half);

        self.position.y = sampler
            .sample_world(field, self.position.x, self.position.z)
            .height;
    }
}

fn reflect(position: &mut f64, velocity: &mut f64, half: f64) {
    if *position > half {
        *position = half - WALL_INSET;
        *velocity *= WALL_RESTITUTION;
    } else if *position < -half {
        *position = -half + WALL_INSET;
        *velocity *= WALL_RESTITUTION;
    }
}
