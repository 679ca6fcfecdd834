//! CPU-side PNG rendering of a [`Field`].
//!
//! Feature-gated behind `png` (default on) so library users that only need
//! the simulation do not pull in the `image` crate.

use sand_garden_core::error::EngineError;
use sand_garden_core::field::Field;
use std::path::Path;

use crate::pixel::{field_to_rgba, SandRamp};

/// Writes a field as a PNG image through the given ramp.
///
/// Returns `EngineError::InvalidDimensions` if the field dimensions overflow
/// `u32`, or `EngineError::Io` on write failure.
pub fn write_png(field: &Field, ramp: &SandRamp, path: &Path) -> Result<(), EngineError> {
    let rgba = field_to_rgba(field, ramp);
    let w = u32::try_from(field.width()).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(field.height()).map_err(|_| EngineError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))?;
    log::debug!("wrote {w}x{h} snapshot to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_png_round_trip() {
        let field = Field::from_fn(16, 8, |uv| (uv.x * 20.0).sin() * 5.0).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sand.png");

        write_png(&field, &SandRamp::default(), &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 8);
    }

    #[test]
    fn write_png_reports_io_failure() {
        let field = Field::new(4, 4).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("sand.png");
        let err = write_png(&field, &SandRamp::default(), &path).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
