//! Pixel buffer conversion from a height [`Field`] through a [`SandRamp`].
//!
//! Heights are unbounded, so each conversion normalizes by the field's own
//! min/max before sampling the ramp.

use sand_garden_core::field::Field;

/// Evenly spaced sRGB colour stops sampled by linear interpolation.
///
/// `sample(0.0)` returns the first stop, `sample(1.0)` the last.
#[derive(Debug, Clone, PartialEq)]
pub struct SandRamp {
    stops: Vec<[u8; 3]>,
}

impl Default for SandRamp {
    /// Shadowed troughs through dry sand to sunlit crests.
    fn default() -> Self {
        Self {
            stops: vec![[86, 70, 52], [168, 142, 104], [214, 192, 150], [244, 232, 204]],
        }
    }
}

impl SandRamp {
    /// A ramp from the given stops. An empty list yields the default ramp.
    pub fn new(stops: Vec<[u8; 3]>) -> Self {
        if stops.is_empty() {
            return Self::default();
        }
        Self { stops }
    }

    /// Colour at `t`, clamped to [0, 1]. NaN samples the first stop.
    pub fn sample(&self, t: f64) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = self.stops.len();
        if n == 1 {
            return self.stops[0];
        }

        let scaled = t * (n - 1) as f64;
        let idx = (scaled as usize).min(n - 2);
        let frac = scaled - idx as f64;
        let (a, b) = (self.stops[idx], self.stops[idx + 1]);
        std::array::from_fn(|i| {
            let v = a[i] as f64 + frac * (b[i] as f64 - a[i] as f64);
            v.round() as u8
        })
    }
}

/// Maps field heights through the ramp to an RGBA8 buffer of length
/// `width * height * 4`. A flat field renders at the ramp's midpoint.
pub fn field_to_rgba(field: &Field, ramp: &SandRamp) -> Vec<u8> {
    let (lo, hi) = field.min_max();
    let span = hi - lo;
    field
        .data()
        .iter()
        .flat_map(|&h| {
            let t = if span > 0.0 && span.is_finite() {
                (h - lo) / span
            } else {
                0.5
            };
            let [r, g, b] = ramp.sample(t);
            [r, g, b, 255u8]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_to_rgba_correct_length() {
        let field = Field::new(8, 4).unwrap();
        let buf = field_to_rgba(&field, &SandRamp::default());
        assert_eq!(buf.len(), 8 * 4 * 4);
    }

    #[test]
    fn field_to_rgba_alpha_always_255() {
        let field = Field::from_fn(4, 4, |uv| uv.x * 30.0 - 7.0).unwrap();
        let buf = field_to_rgba(&field, &SandRamp::default());
        for (i, &byte) in buf.iter().enumerate() {
            if i % 4 == 3 {
                assert_eq!(byte, 255, "alpha at pixel {} should be 255", i / 4);
            }
        }
    }

    #[test]
    fn extremes_map_to_ramp_ends() {
        let ramp = SandRamp::new(vec![[0, 0, 0], [255, 255, 255]]);
        let field = Field::from_fn(2, 1, |uv| if uv.x < 0.5 { -12.0 } else { 40.0 }).unwrap();
        let buf = field_to_rgba(&field, &ramp);
        assert_eq!(&buf[0..3], &[0, 0, 0]);
        assert_eq!(&buf[4..7], &[255, 255, 255]);
    }

    #[test]
    fn flat_field_uses_midpoint() {
        let ramp = SandRamp::new(vec![[0, 0, 0], [200, 100, 50]]);
        let field = Field::from_fn(3, 3, |_| 4.2).unwrap();
        let buf = field_to_rgba(&field, &ramp);
        assert_eq!(&buf[0..3], &[100, 50, 25]);
    }

    #[test]
    fn ramp_sampling_clamps_and_handles_nan() {
        let ramp = SandRamp::default();
        assert_eq!(ramp.sample(-1.0), ramp.sample(0.0));
        assert_eq!(ramp.sample(2.0), ramp.sample(1.0));
        assert_eq!(ramp.sample(f64::NAN), ramp.sample(0.0));
        assert_eq!(SandRamp::new(Vec::new()), SandRamp::default());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn default_ramp_is_monotone_in_brightness(a in 0.0_f64..=1.0, b in 0.0_f64..=1.0) {
                let ramp = SandRamp::default();
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let sum = |c: [u8; 3]| c.iter().map(|&v| v as u32).sum::<u32>();
                // rounding can cost at most one step per channel
                prop_assert!(sum(ramp.sample(lo)) <= sum(ramp.sample(hi)) + 3);
            }
        }
    }
}
