//! A single eased interpolation segment driven by elapsed milliseconds.

use crate::easing::Easing;
use serde::{Deserialize, Serialize};

/// Interpolates `from → to` over `duration_ms` along an [`Easing`] curve.
///
/// The tween is a plain value: it never calls back. Owners poll
/// [`Tween::value`] after [`Tween::advance`] and react to
/// [`Tween::is_finished`] themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub duration_ms: f64,
    pub elapsed_ms: f64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            easing,
        }
    }

    /// Moves the tween forward by `dt_ms` and returns the time left over past
    /// its end (zero while it is still running). The leftover lets a chained
    /// segment start exactly where this one stopped.
    pub fn advance(&mut self, dt_ms: f64) -> f64 {
        let dt_ms = dt_ms.max(0.0);
        let remaining = self.duration_ms - self.elapsed_ms;
        if dt_ms >= remaining {
            self.elapsed_ms = self.duration_ms;
            dt_ms - remaining
        } else {
            self.elapsed_ms += dt_ms;
            0.0
        }
    }

    /// Linear progress in `[0, 1]`. A zero-length tween is always complete.
    pub fn progress(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    /// Eased progress, before mapping onto `from → to`.
    pub fn eased(&self) -> f64 {
        self.easing.apply(self.progress())
    }

    /// Current interpolated value. Exactly `to` once finished.
    pub fn value(&self) -> f64 {
        if self.is_finished() {
            return self.to;
        }
        self.from + (self.to - self.from) * self.eased()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}
