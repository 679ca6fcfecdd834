//! Layout transition state machine.
//!
//! `Idle → ShrinkingOut → GrowingIn → Idle`. A request draws the next
//! layout up front, fades `master_scale` 1 → 0, swaps the layout in at the
//! bottom of the fade (toggling the grid unit and redrawing the overlay
//! rotation), then fades back 0 → 1. Requests made while a transition is
//! running are dropped, not queued.
//!
//! [`LayoutTransition`] is the only writer of its [`WaveState`]; everything
//! else reads it through [`LayoutTransition::state`].

use crate::easing::Easing;
use crate::tween::Tween;
use crate::wave::{Layout, WaveState};
use glam::{DMat2, DVec2};
use sand_garden_core::Xorshift64;
use serde::{Deserialize, Serialize};

/// Phase step used when the accumulator ignores the real frame delta.
pub const FIXED_PHASE_STEP_S: f64 = 1.0 / 60.0;

/// Range of the non-unit grid value drawn on every other transition.
const GRID_UNIT_RANGE: (f64, f64) = (4.0, 9.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionPhase {
    Idle,
    ShrinkingOut,
    GrowingIn,
}

/// Side effects reported by [`LayoutTransition::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    /// The pending layout was swapped in at `master_scale == 0`.
    Swapped,
    /// `master_scale` is back at 1 and new requests are accepted again.
    Completed,
}

#[derive(Debug, Clone)]
pub struct LayoutTransition {
    state: WaveState,
    rng: Xorshift64,
    phase: TransitionPhase,
    tween: Tween,
    pending: Option<Layout>,
    shrink_ms: f64,
    grow_ms: f64,
    fixed_phase_step: bool,
}

impl LayoutTransition {
    pub fn new(state: WaveState, rng: Xorshift64, shrink_ms: f64, grow_ms: f64, fixed_phase_step: bool) -> Self {
        Self {
            state,
            rng,
            phase: TransitionPhase::Idle,
            tween: Tween::new(1.0, 1.0, 0.0, Easing::Linear),
            pending: None,
            shrink_ms,
            grow_ms,
            fixed_phase_step,
        }
    }

    pub fn state(&self) -> &WaveState {
        &self.state
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// The transition guard.
    pub fn is_changing(&self) -> bool {
        self.phase != TransitionPhase::Idle
    }

    /// Anchor centre of the layout waiting to be swapped in, if any.
    pub fn pending_anchor(&self) -> Option<DVec2> {
        self.pending.as_ref().map(Layout::anchor)
    }

    /// Starts a transition towards a freshly drawn layout whose anchor wave
    /// sits at `target` (clamped to the unit square) or at a random spot.
    ///
    /// Returns `false` and changes nothing while a transition is running.
    pub fn request_change(&mut self, target: Option<DVec2>) -> bool {
        if self.is_changing() {
            log::debug!("layout change dropped: transition already running");
            return false;
        }
        if let Some(t) = target {
            if t != t.clamp(DVec2::ZERO, DVec2::ONE) {
                log::debug!("layout target {t} clamped to the unit square");
            }
        }

        let layout = Layout::random(&mut self.rng, target);
        log::debug!("layout change started, anchor at {}", layout.anchor());
        self.pending = Some(layout);
        self.phase = TransitionPhase::ShrinkingOut;
        self.tween = Tween::new(self.state.master_scale, 0.0, self.shrink_ms, Easing::QuinticIn);
        true
    }

    /// Advances the phase accumulator and any running transition by `dt_ms`.
    ///
    /// Time left over when a segment ends is carried into the next one, so
    /// the outcome depends only on the total time, not on frame boundaries.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<TransitionEvent> {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        self.state.elapsed_time += if self.fixed_phase_step {
            FIXED_PHASE_STEP_S
        } else {
            dt_ms / 1000.0
        };

        let mut events = Vec::new();
        let mut budget = dt_ms;
        loop {
            match self.phase {
                TransitionPhase::Idle => break,
                TransitionPhase::ShrinkingOut => {
                    budget = self.tween.advance(budget);
                    self.state.master_scale = self.tween.value();
                    if !self.tween.is_finished() {
                        break;
                    }
                    self.swap();
                    events.push(TransitionEvent::Swapped);
                    self.phase = TransitionPhase::GrowingIn;
                    self.tween = Tween::new(0.0, 1.0, self.grow_ms, Easing::QuinticOut);
                }
                TransitionPhase::GrowingIn => {
                    budget = self.tween.advance(budget);
                    self.state.master_scale = self.tween.value();
                    if self.tween.is_finished() {
                        self.phase = TransitionPhase::Idle;
                        events.push(TransitionEvent::Completed);
                        log::debug!("layout change completed, grid unit {}", self.state.grid_unit);
                    }
                    break;
                }
            }
        }
        events
    }

    /// Applies the pending layout while the field is fully faded out.
    fn swap(&mut self) {
        self.state.grid_unit = if self.state.grid_unit > 1.0 {
            1.0
        } else {
            self.rng.next_range(GRID_UNIT_RANGE.0, GRID_UNIT_RANGE.1)
        };
        self.state.transform = DMat2::from_angle(self.rng.next_angle());
        if let Some(layout) = self.pending.take() {
            self.state.waves = layout.waves;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(seed: u64) -> LayoutTransition {
        LayoutTransition::new(WaveState::default(), Xorshift64::new(seed), 1000.0, 900.0, false)
    }

    /// Advances in 60 Hz frames for `total_ms`, collecting every event.
    fn run(t: &mut LayoutTransition, total_ms: f64) -> Vec<TransitionEvent> {
        let frame = 1000.0 / 60.0;
        let mut events = Vec::new();
        let mut elapsed = 0.0;
        while elapsed < total_ms {
            events.extend(t.advance(frame));
            elapsed += frame;
        }
        events
    }

    #[test]
    fn starts_idle_at_full_scale() {
        let t = machine(1);
        assert_eq!(t.phase(), TransitionPhase::Idle);
        assert!(!t.is_changing());
        assert_eq!(t.state().master_scale, 1.0);
    }

    #[test]
    fn full_sequence_returns_to_idle() {
        let mut t = machine(42);
        assert!(t.request_change(None));
        assert_eq!(t.phase(), TransitionPhase::ShrinkingOut);
        let events = run(&mut t, 1950.0);
        assert_eq!(events, vec![TransitionEvent::Swapped, TransitionEvent::Completed]);
        assert!(!t.is_changing());
        assert_eq!(t.state().master_scale, 1.0);
    }

    #[test]
    fn concurrent_requests_run_a_single_sequence() {
        let mut t = machine(3);
        assert!(t.request_change(None));
        let pending = t.pending_anchor();
        assert!(!t.request_change(Some(DVec2::new(0.9, 0.9))));
        t.advance(300.0);
        assert!(!t.request_change(None));
        assert_eq!(t.pending_anchor(), pending);

        let events = run(&mut t, 2000.0);
        assert_eq!(events.iter().filter(|e| **e == TransitionEvent::Swapped).count(), 1);
        assert_eq!(events.iter().filter(|e| **e == TransitionEvent::Completed).count(), 1);
        assert_eq!(Some(t.state().anchor()), pending);
    }

    #[test]
    fn master_scale_falls_then_rises() {
        let mut t = machine(4);
        t.request_change(None);
        t.advance(500.0);
        let mid_shrink = t.state().master_scale;
        assert!(mid_shrink > 0.9, "quintic-in is still near 1 halfway: {mid_shrink}");
        let events = t.advance(500.0);
        assert_eq!(events, vec![TransitionEvent::Swapped]);
        assert_eq!(t.state().master_scale, 0.0);
        assert_eq!(t.phase(), TransitionPhase::GrowingIn);
        t.advance(450.0);
        assert!(t.state().master_scale > 0.9, "quintic-out is nearly done halfway");
        assert_eq!(t.advance(450.0), vec![TransitionEvent::Completed]);
        assert_eq!(t.state().master_scale, 1.0);
    }

    #[test]
    fn leftover_time_carries_across_segments() {
        let mut t = machine(5);
        t.request_change(None);
        let events = t.advance(1000.0 + 900.0);
        assert_eq!(events, vec![TransitionEvent::Swapped, TransitionEvent::Completed]);
        assert!(!t.is_changing());
    }

    #[test]
    fn grid_unit_alternates_across_transitions() {
        let mut t = machine(6);
        assert_eq!(t.state().grid_unit, 1.0);
        for round in 0..4 {
            let before = t.state().grid_unit;
            assert!(t.request_change(None));
            t.advance(2000.0);
            let after = t.state().grid_unit;
            if before == 1.0 {
                assert!((4.0..9.0).contains(&after), "round {round}: {after}");
            } else {
                assert_eq!(after, 1.0, "round {round}");
            }
        }
    }

    #[test]
    fn swap_replaces_transform_with_a_rotation() {
        let mut t = machine(7);
        let before = t.state().transform;
        t.request_change(None);
        t.advance(1000.0);
        let after = t.state().transform;
        assert_ne!(before, after);
        assert!((after.determinant() - 1.0).abs() < 1e-12);
        assert!((after.x_axis.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn target_becomes_clamped_anchor() {
        let mut t = machine(8);
        t.request_change(Some(DVec2::new(1.4, 0.25)));
        t.advance(2000.0);
        assert_eq!(t.state().anchor(), DVec2::new(1.0, 0.25));
    }

    #[test]
    fn waves_are_untouched_until_the_swap() {
        let mut t = machine(9);
        let original = t.state().waves;
        t.request_change(Some(DVec2::splat(0.5)));
        t.advance(999.0);
        assert_eq!(t.state().waves, original);
        t.advance(1.0);
        assert_eq!(t.state().anchor(), DVec2::splat(0.5));
    }

    #[test]
    fn phase_accumulator_follows_policy() {
        let mut real = machine(10);
        real.advance(100.0);
        assert!((real.state().elapsed_time - 0.1).abs() < 1e-12);

        let mut fixed = LayoutTransition::new(WaveState::default(), Xorshift64::new(10), 1000.0, 900.0, true);
        fixed.advance(100.0);
        fixed.advance(3.0);
        assert!((fixed.state().elapsed_time - 2.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn zero_durations_complete_in_one_frame() {
        let mut t = LayoutTransition::new(WaveState::default(), Xorshift64::new(11), 0.0, 0.0, false);
        t.request_change(None);
        assert_eq!(t.advance(0.0), vec![TransitionEvent::Swapped, TransitionEvent::Completed]);
        assert_eq!(t.state().master_scale, 1.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn frame_split_does_not_change_outcome(seed: u64, frames in proptest::collection::vec(1.0_f64..120.0, 1..40)) {
                let total: f64 = frames.iter().sum();
                let mut chunked = machine(seed);
                let mut whole = machine(seed);
                chunked.request_change(None);
                whole.request_change(None);
                for dt in &frames {
                    chunked.advance(*dt);
                }
                whole.advance(total);
                prop_assert_eq!(chunked.phase(), whole.phase());
                prop_assert!((chunked.state().master_scale - whole.state().master_scale).abs() < 1e-9);
                prop_assert_eq!(chunked.state().waves, whole.state().waves);
            }

            #[test]
            fn master_scale_stays_in_unit_range(seed: u64, dt in 0.0_f64..200.0) {
                let mut t = machine(seed);
                t.request_change(None);
                for _ in 0..30 {
                    t.advance(dt);
                    let s = t.state().master_scale;
                    prop_assert!((0.0..=1.0).contains(&s), "master_scale {s}");
                }
            }
        }
    }
}
