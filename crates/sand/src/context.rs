//! The simulation context: every piece of mutable simulation state, owned by
//! the caller and advanced once per frame.
//!
//! Within a frame the order is fixed: the layout transition and the
//! animators advance first, then the composer fills the write buffer from
//! the resulting [`WaveState`], then the buffers swap and the floating
//! bodies probe the new field. No frame mixes two wave-state snapshots.

use crate::animators::{DecorativeBody, SceneCrossFade};
use crate::compose::{CellComposer, PointerInput};
use crate::config::SandConfig;
use crate::sampler::{FloatingBody, PointSampler, ProbeResult};
use crate::transition::{LayoutTransition, TransitionEvent};
use crate::wave::WaveState;
use glam::{DVec2, DVec3};
use sand_garden_core::error::EngineError;
use sand_garden_core::{Engine, Field, FieldPair, NoiseSource, Xorshift64};
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct SimulationContext {
    config: SandConfig,
    composer: CellComposer,
    fields: FieldPair,
    transition: LayoutTransition,
    decoration: DecorativeBody,
    scene: SceneCrossFade,
    sampler: PointSampler,
    bodies: Vec<FloatingBody>,
    pointer: Option<DVec2>,
    frame: u64,
}

impl SimulationContext {
    /// Validates `config` and seeds the initial field from the fractal
    /// generator. The same `seed` also drives every layout draw.
    pub fn new(config: SandConfig, seed: u64) -> Result<Self, EngineError> {
        config.validate()?;

        let noise = NoiseSource::new(seed);
        let initial = noise.generate(config.size, &config.fractal())?;
        let composer = CellComposer::new(
            noise,
            config.bump_amplitude,
            config.bump_frequency,
            config.master_fade,
        )
        .with_grid_overlay(config.grid_overlay);

        let state = WaveState::with_background_scale(config.background_wave_scale);
        let sampler = PointSampler::new(config.bounds);
        let decoration = DecorativeBody::new(
            sampler.world_from_uv(state.anchor()),
            config.body_sink_ms,
            config.body_rise_ms,
            config.body_spin,
        );
        let transition = LayoutTransition::new(
            state,
            Xorshift64::new(seed),
            config.shrink_ms,
            config.grow_ms,
            config.fixed_phase_step,
        );
        let scene = SceneCrossFade::new(config.scene_groups, config.scene_fade_ms);

        log::info!(
            "sand garden ready: {size}x{size} field, seed {seed}, {octaves} octaves",
            size = config.size,
            octaves = config.octaves
        );

        Ok(Self {
            composer,
            fields: FieldPair::new(initial),
            transition,
            decoration,
            scene,
            sampler,
            bodies: Vec::new(),
            pointer: None,
            frame: 0,
            config,
        })
    }

    pub fn config(&self) -> &SandConfig {
        &self.config
    }

    /// Number of frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advances one frame of `dt_ms` milliseconds. Negative or non-finite
    /// deltas are treated as zero.
    pub fn advance(&mut self, dt_ms: f64) {
        let dt_ms = if dt_ms.is_finite() && dt_ms >= 0.0 {
            dt_ms
        } else {
            log::debug!("frame delta {dt_ms} ms treated as 0");
            0.0
        };

        for event in self.transition.advance(dt_ms) {
            if event == TransitionEvent::Swapped {
                log::debug!("frame {}: layout swapped", self.frame);
            }
        }
        self.decoration.advance(dt_ms);
        self.scene.advance(dt_ms);

        let pointer = match self.pointer.take() {
            Some(uv) => PointerInput::at(uv, self.config.pointer_radius, self.config.pointer_strength),
            None => PointerInput::absent(self.config.pointer_radius, self.config.pointer_strength),
        };
        let composer = &self.composer;
        let state = self.transition.state();
        self.fields.step(|uv| composer.compose(uv, state, &pointer));

        let field = self.fields.current();
        for body in &mut self.bodies {
            body.update(&self.sampler, field);
        }
        self.frame += 1;
    }

    /// Latches a pointer position for the next frame only. Positions outside
    /// the unit square are clamped.
    pub fn set_pointer(&mut self, uv: Option<DVec2>) {
        self.pointer = uv.map(|uv| {
            let clamped = uv.clamp(DVec2::ZERO, DVec2::ONE);
            if clamped != uv {
                log::debug!("pointer {uv} clamped to {clamped}");
            }
            clamped
        });
    }

    /// Latches a pointer from a world-space hit on the surface.
    pub fn set_pointer_world(&mut self, hit: DVec3) {
        self.set_pointer(Some(self.sampler.uv_from_world(hit.x, hit.z)));
    }

    /// Starts a layout change anchored at `target`, moving the decorative
    /// body along with it. Returns `false` if a change is already running.
    pub fn request_layout_change(&mut self, target: Option<DVec2>) -> bool {
        if !self.transition.request_change(target) {
            return false;
        }
        if let Some(anchor) = self.transition.pending_anchor() {
            self.decoration.request_move(self.sampler.world_from_uv(anchor));
        }
        true
    }

    /// Cross-fades to the next display group.
    pub fn request_scene_switch(&mut self) -> bool {
        self.scene.request_switch()
    }

    /// Height and slope at `uv` in the current field.
    pub fn sample_height(&self, uv: DVec2) -> ProbeResult {
        self.sampler.sample(self.fields.current(), uv)
    }

    pub fn current_field(&self) -> &Field {
        self.fields.current()
    }

    pub fn current_wave_state(&self) -> &WaveState {
        self.transition.state()
    }

    pub fn is_changing(&self) -> bool {
        self.transition.is_changing()
    }

    /// Drops a floating body at world `(x, z)` and returns its index.
    /// Positions beyond the walls are clamped onto them.
    pub fn spawn_body(&mut self, x: f64, z: f64) -> usize {
        let half = self.sampler.bounds() * 0.5;
        let (x, z) = (x.clamp(-half, half), z.clamp(-half, half));
        let probe = self.sampler.sample_world(self.fields.current(), x, z);
        self.bodies.push(FloatingBody::new(DVec3::new(x, probe.height, z)));
        self.bodies.len() - 1
    }

    pub fn bodies(&self) -> &[FloatingBody] {
        &self.bodies
    }

    pub fn decoration(&self) -> &DecorativeBody {
        &self.decoration
    }

    pub fn scene(&self) -> &SceneCrossFade {
        &self.scene
    }

    pub fn sampler(&self) -> &PointSampler {
        &self.sampler
    }
}

impl Engine for SimulationContext {
    fn advance(&mut self, dt_ms: f64) -> Result<(), EngineError> {
        SimulationContext::advance(self, dt_ms);
        Ok(())
    }

    fn field(&self) -> &Field {
        self.current_field()
    }

    fn params(&self) -> Value {
        let state = self.transition.state();
        let anchor = state.anchor();
        let mut params = self.config.to_json();
        params["state"] = json!({
            "frame": self.frame,
            "changing": self.is_changing(),
            "master_scale": state.master_scale,
            "grid_unit": state.grid_unit,
            "elapsed_time": state.elapsed_time,
            "anchor": [anchor.x, anchor.y],
            "active_group": self.scene.active(),
        });
        params
    }

    fn param_schema(&self) -> Value {
        SandConfig::param_schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sand_garden_core::FractalParams;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn small(seed: u64) -> SimulationContext {
        let config = SandConfig {
            size: 32,
            octaves: 6,
            ..SandConfig::default()
        };
        SimulationContext::new(config, seed).unwrap()
    }

    fn bits(field: &Field) -> Vec<u64> {
        field.data().iter().map(|v| v.to_bits()).collect()
    }

    #[test]
    fn seed_42_scenario_completes_a_transition() {
        let mut ctx = SimulationContext::new(SandConfig::default(), 42).unwrap();
        assert_eq!(ctx.current_field().width(), 256);
        let bound = FractalParams::default().amplitude_bound();
        let h = ctx.sample_height(DVec2::splat(0.5)).height;
        assert!(h.abs() <= bound, "|{h}| exceeds {bound}");

        assert!(ctx.request_layout_change(None));
        assert!(ctx.is_changing());
        for _ in 0..20 {
            ctx.advance(100.0);
        }
        assert!(!ctx.is_changing());
        assert_eq!(ctx.current_wave_state().master_scale, 1.0);
    }

    #[test]
    fn rejects_invalid_configuration() {
        let config = SandConfig {
            size: 1,
            ..SandConfig::default()
        };
        assert!(matches!(
            SimulationContext::new(config, 1),
            Err(EngineError::InvalidDimensions)
        ));
        let config = SandConfig {
            pointer_radius: -1.0,
            ..SandConfig::default()
        };
        assert!(matches!(
            SimulationContext::new(config, 1),
            Err(EngineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn same_seed_same_frames() {
        let mut a = small(7);
        let mut b = small(7);
        for frame in 0..40 {
            if frame == 3 {
                a.request_layout_change(Some(DVec2::new(0.6, 0.4)));
                b.request_layout_change(Some(DVec2::new(0.6, 0.4)));
            }
            a.advance(FRAME_MS * 3.0);
            b.advance(FRAME_MS * 3.0);
        }
        assert_eq!(bits(a.current_field()), bits(b.current_field()));
        assert_eq!(a.current_wave_state(), b.current_wave_state());
    }

    #[test]
    fn field_reflects_the_frames_wave_state() {
        let mut ctx = small(9);
        ctx.request_layout_change(None);
        let absent = PointerInput::absent(ctx.config.pointer_radius, ctx.config.pointer_strength);
        for _ in 0..70 {
            ctx.advance(FRAME_MS * 2.0);
            let state = ctx.current_wave_state().clone();
            let expected = Field::from_fn(32, 32, |uv| ctx.composer.compose(uv, &state, &absent)).unwrap();
            assert_eq!(bits(ctx.current_field()), bits(&expected));
        }
        assert!(!ctx.is_changing());
    }

    #[test]
    fn pointer_is_latched_for_one_frame() {
        let mut pressed = small(3);
        let mut untouched = small(3);

        pressed.set_pointer(Some(DVec2::splat(0.5)));
        pressed.advance(FRAME_MS);
        untouched.advance(FRAME_MS);
        assert_ne!(bits(pressed.current_field()), bits(untouched.current_field()));
        let centre = |ctx: &SimulationContext| ctx.current_field().get(15, 15);
        assert!(centre(&pressed) < centre(&untouched), "negative strength presses down");

        pressed.advance(FRAME_MS);
        untouched.advance(FRAME_MS);
        assert_eq!(bits(pressed.current_field()), bits(untouched.current_field()));
    }

    #[test]
    fn out_of_range_pointer_is_clamped_not_rejected() {
        let mut ctx = small(4);
        ctx.set_pointer(Some(DVec2::new(3.0, -1.0)));
        assert_eq!(ctx.pointer, Some(DVec2::new(1.0, 0.0)));
        ctx.advance(FRAME_MS);
        assert!(ctx.current_field().is_finite());
        assert_eq!(ctx.pointer, None);
    }

    #[test]
    fn world_pointer_maps_to_uv() {
        let mut ctx = small(4);
        ctx.set_pointer_world(DVec3::new(256.0, 3.0, 256.0));
        assert_eq!(ctx.pointer, Some(DVec2::new(0.75, 0.25)));
    }

    #[test]
    fn layout_change_is_guarded_and_moves_the_body() {
        let mut ctx = small(5);
        assert!(ctx.request_layout_change(Some(DVec2::new(0.75, 0.25))));
        assert!(!ctx.request_layout_change(Some(DVec2::new(0.1, 0.1))));
        assert!(ctx.decoration().is_animating());

        for _ in 0..120 {
            ctx.advance(FRAME_MS);
        }
        assert!(!ctx.is_changing());
        assert_eq!(ctx.current_wave_state().anchor(), DVec2::new(0.75, 0.25));
        let p = ctx.decoration().position();
        assert_eq!((p.x, p.z), (256.0, 256.0));
        assert!(!ctx.decoration().is_animating());
    }

    #[test]
    fn scene_switch_runs_independently() {
        let mut ctx = small(6);
        assert!(ctx.request_scene_switch());
        assert!(!ctx.request_scene_switch());
        assert!(!ctx.is_changing());
        for _ in 0..4 {
            ctx.advance(1000.0);
        }
        assert_eq!(ctx.scene().active(), 1);
    }

    #[test]
    fn bodies_ride_the_current_field() {
        let mut ctx = small(8);
        let idx = ctx.spawn_body(0.0, 0.0);
        ctx.advance(FRAME_MS);
        let body = ctx.bodies()[idx];
        assert!(body.position.x.abs() <= 512.0 && body.position.z.abs() <= 512.0);
        let landed = ctx.sampler().uv_from_world(body.position.x, body.position.z);
        assert_eq!(body.position.y, ctx.sample_height(landed).height);
    }

    #[test]
    fn far_out_heights_read_the_edge() {
        let ctx = small(8);
        let edge = ctx.sample_height(DVec2::new(1.0, 0.5));
        assert_eq!(ctx.sample_height(DVec2::new(1e30, 0.5)), edge);
        assert_eq!(ctx.sample_height(DVec2::new(f64::INFINITY, 0.5)), edge);
        assert!(ctx.sample_height(DVec2::new(f64::NAN, 0.5)).height.is_finite());
    }

    #[test]
    fn far_out_bodies_start_on_the_wall() {
        let mut ctx = small(8);
        let idx = ctx.spawn_body(1e30, f64::NEG_INFINITY);
        let body = ctx.bodies()[idx];
        assert_eq!((body.position.x, body.position.z), (512.0, -512.0));
        ctx.advance(FRAME_MS);
        let body = ctx.bodies()[idx];
        assert!(body.position.is_finite());
        assert!(body.position.x.abs() <= 512.0 && body.position.z.abs() <= 512.0);
    }

    #[test]
    fn overflowing_octaves_are_rejected_before_generation() {
        let config = SandConfig {
            size: 16,
            lacunarity: 1e300,
            ..SandConfig::default()
        };
        match SimulationContext::new(config, 42) {
            Err(EngineError::InvalidConfig { name, .. }) => assert_eq!(name, "lacunarity"),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn bad_delta_is_ignored() {
        let mut ctx = small(2);
        ctx.advance(f64::NAN);
        ctx.advance(-50.0);
        assert_eq!(ctx.current_wave_state().elapsed_time, 0.0);
        assert_eq!(ctx.frame(), 2);
    }

    #[test]
    fn engine_params_report_state() {
        let mut ctx = small(1);
        Engine::advance(&mut ctx, FRAME_MS).unwrap();
        let params = ctx.params();
        assert_eq!(params["bump_amplitude"], 4.0);
        assert_eq!(params["state"]["frame"], 1);
        assert_eq!(params["state"]["changing"], false);
        assert!(ctx.param_schema().get("grow_ms").is_some());
        assert_eq!(ctx.field().width(), 32);
    }
}
