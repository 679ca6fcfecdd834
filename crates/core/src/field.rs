//! Two-dimensional height grid with clamp-to-edge addressing.
//!
//! A `Field` stores `width * height` f64 heights in row-major layout. Cell
//! `(x, y)` is centred on the normalized coordinate
//! `((x + 0.5) / width, (y + 0.5) / height)`, so `uv = (0.5, 0.5)` is the
//! middle of the grid. Reads outside the grid clamp to the nearest edge cell.
//!
//! Heights are not clamped: the composer's terms bound them by construction.
//! Mutation is crate-private; outside this crate only [`crate::FieldPair`]
//! writes fields.

use crate::error::EngineError;
use glam::DVec2;

/// A 2D height field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Field {
    /// Creates a flat (all-zero) field.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Builds a field by evaluating `f` at every cell centre.
    pub fn from_fn(
        width: usize,
        height: usize,
        f: impl Fn(DVec2) -> f64,
    ) -> Result<Self, EngineError> {
        let mut field = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                field.data[y * width + x] = f(field.cell_uv(x, y));
            }
        }
        Ok(field)
    }

    /// Field width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Normalized coordinate of the centre of cell `(x, y)`.
    pub fn cell_uv(&self, x: usize, y: usize) -> DVec2 {
        DVec2::new(
            (x as f64 + 0.5) / self.width as f64,
            (y as f64 + 0.5) / self.height as f64,
        )
    }

    /// Gets the height at `(x, y)`, clamping out-of-range indices to the edge.
    pub fn get(&self, x: isize, y: isize) -> f64 {
        let xi = x.clamp(0, self.width as isize - 1) as usize;
        let yi = y.clamp(0, self.height as isize - 1) as usize;
        self.data[yi * self.width + xi]
    }

    /// Bilinearly interpolated height at a normalized coordinate.
    ///
    /// Coordinates outside `[0, 1]²`, infinities included, read the edge cells.
    pub fn sample_bilinear(&self, uv: DVec2) -> f64 {
        // keep the cell index inside isize before the cast
        let px = (uv.x * self.width as f64 - 0.5).clamp(-0.5, self.width as f64 - 0.5);
        let py = (uv.y * self.height as f64 - 0.5).clamp(-0.5, self.height as f64 - 0.5);
        let x0 = px.floor();
        let y0 = py.floor();
        let fx = px - x0;
        let fy = py - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);

        let top = lerp(self.get(x0, y0), self.get(x0 + 1, y0), fx);
        let bottom = lerp(self.get(x0, y0 + 1), self.get(x0 + 1, y0 + 1), fx);
        lerp(top, bottom, fy)
    }

    /// Smallest and largest height in the field.
    pub fn min_max(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// True when no cell holds NaN or an infinity.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

}

fn checked_len(width: usize, height: usize) -> Result<usize, EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(EngineError::InvalidDimensions)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
