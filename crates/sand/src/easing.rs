//! Easing curves for the eased animations.
//!
//! All curves map `[0, 1] → ℝ` with `f(0) = 0` and `f(1) = 1`. Back-out
//! overshoots above 1 before settling.

use serde::{Deserialize, Serialize};

/// Overshoot constant of the back curves (≈10% overshoot).
const BACK_OVERSHOOT: f64 = 1.70158;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    /// Accelerating: used to fade the sand layout out.
    QuinticIn,
    /// Decelerating: used to fade the new layout in.
    QuinticOut,
    BackOut,
}

impl Easing {
    /// Eased value at progress `t`, clamped to `[0, 1]` first.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadraticIn => t * t,
            Self::QuadraticOut => t * (2.0 - t),
            Self::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::QuinticIn => t.powi(5),
            Self::QuinticOut => 1.0 - (1.0 - t).powi(5),
            Self::BackOut => {
                let u = t - 1.0;
                u * u * ((BACK_OVERSHOOT + 1.0) * u + BACK_OVERSHOOT) + 1.0
            }
        }
    }
}
