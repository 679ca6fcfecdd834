//! Eased animations that follow a layout change: the decorative body that
//! sinks and resurfaces at the new anchor, and the display-group cross-fade.
//!
//! Both share the transition guard semantics (a request while running is
//! dropped) but own their state independently of the sand layout.

use crate::easing::Easing;
use crate::tween::Tween;
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Resting scale of the decorative body.
pub const BODY_REST_SCALE: f64 = 70.0;
/// Resting height of the decorative body, world units.
pub const BODY_REST_Y: f64 = -11.0;
/// Height the body sinks to before resurfacing.
pub const BODY_SUNK_Y: f64 = -200.0;
/// Duration of the quarter-turn played alongside a sink.
pub const QUARTER_TURN_MS: f64 = 900.0;
/// Vertical lift of a display group as it fades.
pub const SCENE_LIFT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyPhase {
    Resting,
    Sinking,
    Rising,
}

/// The decorative body. `level` runs 1 (at rest) → 0 (sunk) → 1.
#[derive(Debug, Clone)]
pub struct DecorativeBody {
    position: DVec3,
    scale: f64,
    rotation: f64,
    visible: bool,
    phase: BodyPhase,
    level: Tween,
    turn: Option<Tween>,
    target: DVec2,
    sink_ms: f64,
    rise_ms: f64,
    spin_speed: f64,
}

impl DecorativeBody {
    /// A resting body at world `(x, z)`.
    pub fn new(at: DVec2, sink_ms: f64, rise_ms: f64, spin_speed: f64) -> Self {
        Self {
            position: DVec3::new(at.x, BODY_REST_Y, at.y),
            scale: BODY_REST_SCALE,
            rotation: 0.0,
            visible: true,
            phase: BodyPhase::Resting,
            level: Tween::new(1.0, 1.0, 0.0, Easing::Linear),
            turn: None,
            target: at,
            sink_ms,
            rise_ms,
            spin_speed,
        }
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn phase(&self) -> BodyPhase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase != BodyPhase::Resting
    }

    /// Sinks the body and resurfaces it at world `(x, z)` = `target`.
    /// Dropped while a previous move is still running.
    pub fn request_move(&mut self, target: DVec2) -> bool {
        if self.is_animating() {
            log::debug!("body move dropped: already moving");
            return false;
        }
        self.target = target;
        self.phase = BodyPhase::Sinking;
        self.level = Tween::new(1.0, 0.0, self.sink_ms, Easing::QuadraticIn);
        self.turn = Some(Tween::new(
            self.rotation,
            self.rotation + FRAC_PI_2,
            QUARTER_TURN_MS,
            Easing::BackOut,
        ));
        true
    }

    pub fn advance(&mut self, dt_ms: f64) {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };

        match self.turn.as_mut() {
            Some(turn) => {
                turn.advance(dt_ms);
                self.rotation = turn.value();
                if turn.is_finished() {
                    self.turn = None;
                }
            }
            None => self.rotation += self.spin_speed * dt_ms / 1000.0,
        }

        let mut budget = dt_ms;
        loop {
            match self.phase {
                BodyPhase::Resting => break,
                BodyPhase::Sinking => {
                    budget = self.level.advance(budget);
                    let v = self.level.value();
                    self.scale = BODY_REST_SCALE * (v * 0.5 + 0.5);
                    self.position.y = lerp(BODY_SUNK_Y, BODY_REST_Y, v);
                    if v < 0.5 {
                        self.visible = false;
                    }
                    if !self.level.is_finished() {
                        break;
                    }
                    self.position.x = self.target.x;
                    self.position.z = self.target.y;
                    self.phase = BodyPhase::Rising;
                    self.level = Tween::new(0.0, 1.0, self.rise_ms, Easing::QuadraticOut);
                }
                BodyPhase::Rising => {
                    budget = self.level.advance(budget);
                    let v = self.level.value();
                    self.scale = BODY_REST_SCALE * v;
                    self.position.y = lerp(BODY_SUNK_Y, BODY_REST_Y, v);
                    if v >= 0.5 {
                        self.visible = true;
                    }
                    if self.level.is_finished() {
                        self.phase = BodyPhase::Resting;
                    }
                    break;
                }
            }
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Presentation state of one display group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupFade {
    pub scale: f64,
    pub offset_y: f64,
    pub visible: bool,
}

/// Cross-fades between display groups, one active at a time.
#[derive(Debug, Clone)]
pub struct SceneCrossFade {
    groups: Vec<GroupFade>,
    active: usize,
    incoming: Option<usize>,
    tween: Tween,
    tint: f64,
    fade_ms: f64,
}

impl SceneCrossFade {
    /// `count` groups with group 0 shown. A count of zero is treated as one.
    pub fn new(count: usize, fade_ms: f64) -> Self {
        let hidden = GroupFade {
            scale: 0.0,
            offset_y: -SCENE_LIFT,
            visible: false,
        };
        let mut groups = vec![hidden; count.max(1)];
        groups[0] = GroupFade {
            scale: 1.0,
            offset_y: 0.0,
            visible: true,
        };
        Self {
            groups,
            active: 0,
            incoming: None,
            tween: Tween::new(0.0, 1.0, fade_ms, Easing::QuadraticInOut),
            tint: 0.0,
            fade_ms,
        }
    }

    pub fn groups(&self) -> &[GroupFade] {
        &self.groups
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Ambient tint weight, peaking mid-fade.
    pub fn tint(&self) -> f64 {
        self.tint
    }

    pub fn is_fading(&self) -> bool {
        self.incoming.is_some()
    }

    /// Starts fading to the next group. Dropped with a single group or while
    /// a fade is running.
    pub fn request_switch(&mut self) -> bool {
        if self.groups.len() < 2 || self.is_fading() {
            log::debug!("scene switch dropped");
            return false;
        }
        let next = (self.active + 1) % self.groups.len();
        self.groups[next].visible = true;
        self.incoming = Some(next);
        self.tween = Tween::new(0.0, 1.0, self.fade_ms, Easing::QuadraticInOut);
        true
    }

    pub fn advance(&mut self, dt_ms: f64) {
        let Some(next) = self.incoming else {
            return;
        };
        self.tween.advance(if dt_ms.is_finite() { dt_ms } else { 0.0 });
        let t = self.tween.value();

        let out = &mut self.groups[self.active];
        out.scale = 1.0 - t;
        out.offset_y = SCENE_LIFT * t;
        let inc = &mut self.groups[next];
        inc.scale = t;
        inc.offset_y = SCENE_LIFT * (t - 1.0);
        self.tint = (PI * t).sin();

        if self.tween.is_finished() {
            self.groups[self.active].visible = false;
            self.active = next;
            self.incoming = None;
            self.tint = 0.0;
        }
    }
}
