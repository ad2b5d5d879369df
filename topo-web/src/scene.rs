//! Topography scene - the per-frame tick driver
//!
//! Threads the owned dynamics state together once per animation frame:
//! spring → confidence gate → gesture → ripple anchor → uniform snapshot.
//! Nothing in a tick can fail; bad inputs are clamped or zeroed.

use nalgebra::Matrix4;

use crate::bridge::HandMailbox;
use crate::config::TopographyConfig;
use crate::physics::{
    Camera, GestureState, GestureStateMachine, Pointer2D, PointerSource, PointerUnifier,
    RippleAnchor, SpringIntegrator, TerrainPlane,
};
use crate::terrain::{background, HeightFieldUniforms, Rgb, RIPPLE_DECAY, RIPPLE_FREQ, RIPPLE_SPEED};

/// Emissive boost per unit of spring speed
const EMISSIVE_SPEED_GAIN: f32 = 0.1;

/// Everything the renderer needs for one frame
#[derive(Clone, Copy, Debug)]
pub struct FrameSnapshot {
    pub uniforms: HeightFieldUniforms,
    pub view_projection: Matrix4<f32>,
    pub background: Rgb,
    pub pointer: Pointer2D,
    pub source: PointerSource,
    pub plane_segments: u32,
}

/// Owns all per-frame dynamics state
pub struct TopographyScene {
    config: TopographyConfig,
    clock: f32,
    spring: SpringIntegrator,
    unifier: PointerUnifier,
    gesture: GestureStateMachine,
    anchor: RippleAnchor,
    camera: Camera,
    plane: TerrainPlane,
    hand: Option<HandMailbox>,
    is_fist: bool,
    last: Option<FrameSnapshot>,
}

impl TopographyScene {
    pub fn new(config: TopographyConfig) -> Self {
        let camera = config.camera();
        let plane = config.plane();
        Self {
            config,
            clock: 0.0,
            spring: SpringIntegrator::new(),
            unifier: PointerUnifier::new(),
            gesture: GestureStateMachine::new(),
            anchor: RippleAnchor::new(),
            camera,
            plane,
            hand: None,
            is_fist: false,
            last: None,
        }
    }

    /// Scene reading hand samples from `mailbox`
    pub fn with_hand(config: TopographyConfig, mailbox: HandMailbox) -> Self {
        let mut scene = Self::new(config);
        scene.hand = Some(mailbox);
        scene
    }

    /// Swap in new visual parameters. Dynamics state and viewport are kept.
    pub fn apply_config(&mut self, config: TopographyConfig) {
        let aspect = self.camera.aspect();
        self.camera = config.camera();
        self.camera.set_viewport(aspect, 1.0);
        self.plane = config.plane();
        self.config = config;
    }

    pub fn config(&self) -> &TopographyConfig {
        &self.config
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.camera.set_viewport(width, height);
    }

    /// Raw mouse target in NDC
    pub fn set_mouse_target(&mut self, target: Pointer2D) {
        self.spring.set_target(target);
    }

    /// Fist observation for upcoming ticks
    pub fn set_fist(&mut self, is_fist: bool) {
        self.is_fist = is_fist;
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture.state()
    }

    pub fn spring(&self) -> &SpringIntegrator {
        &self.spring
    }

    pub fn anchor(&self) -> &RippleAnchor {
        &self.anchor
    }

    /// Snapshot from the most recent tick
    pub fn last_frame(&self) -> Option<&FrameSnapshot> {
        self.last.as_ref()
    }

    /// Advance one animation frame by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> FrameSnapshot {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.clock += dt;

        self.spring.tick(dt);
        let speed = self.spring.speed();

        let hand = self.hand.as_ref().map(|mailbox| {
            let sample = mailbox.latest();
            (sample.pointer, sample.confidence)
        });
        let (pointer, source) = self.unifier.unify(hand, self.spring.position());

        self.gesture.tick(self.is_fist, self.clock);
        let gesture = self.gesture.state();

        self.anchor.update(&self.camera, &self.plane, pointer, speed);

        let cfg = &self.config;
        let uniforms = HeightFieldUniforms {
            time: self.clock,
            noise_scale: cfg.noise_scale,
            noise_offset: pointer * cfg.pointer_offset_scale,
            noise_drift: Pointer2D::from((cfg.noise_drift[0], cfg.noise_drift[1])),
            plane_size: cfg.plane.size,
            line_step: cfg.line_step,
            line_thickness: cfg.line_thickness,
            emissive_strength: 1.0 + EMISSIVE_SPEED_GAIN * speed,
            base_color: cfg.base_color,
            line_color: cfg.line_color,
            ripple_center: [self.anchor.center.x, self.anchor.center.y],
            ripple_strength: self.anchor.strength,
            ripple_freq: RIPPLE_FREQ,
            ripple_decay: RIPPLE_DECAY,
            ripple_speed: RIPPLE_SPEED,
            global_ripple_start: gesture.global_ripple_start,
            red_tint: gesture.red_tint,
            peakyness: gesture.peakyness,
        };

        let snapshot = FrameSnapshot {
            uniforms,
            view_projection: self.camera.view_projection(),
            background: background(gesture.red_tint),
            pointer,
            source,
            plane_segments: cfg.plane.segments,
        };
        self.last = Some(snapshot);
        snapshot
    }
}

impl Default for TopographyScene {
    fn default() -> Self {
        Self::new(TopographyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::HandSample;
    use crate::terrain::HeightField;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_unconfident_hand_uses_spring() {
        let mailbox = HandMailbox::default();
        mailbox.publish(HandSample {
            pointer: Pointer2D::ZERO,
            confidence: 0.0,
            landmarks: None,
        });

        let mut scene = TopographyScene::with_hand(TopographyConfig::default(), mailbox);
        scene.set_mouse_target(Pointer2D::new(0.5, 0.5));
        for _ in 0..5 {
            scene.tick(DT);
        }
        let frame = scene.tick(DT);

        assert_eq!(frame.source, PointerSource::Mouse);
        assert_eq!(frame.pointer, scene.spring().position());
        assert_ne!(frame.pointer, Pointer2D::ZERO);
    }

    #[test]
    fn test_confident_hand_drives_pointer() {
        let mailbox = HandMailbox::default();
        let mut scene = TopographyScene::with_hand(TopographyConfig::default(), mailbox.clone());
        mailbox.publish(HandSample {
            pointer: Pointer2D::new(-0.2, 0.3),
            confidence: 0.95,
            landmarks: None,
        });
        let frame = scene.tick(DT);
        assert_eq!(frame.source, PointerSource::Hand);
        assert_eq!(frame.pointer, Pointer2D::new(-0.2, 0.3));
    }

    #[test]
    fn test_fist_onset_stamps_clock() {
        let mut scene = TopographyScene::default();
        // 4.9 s of idle, then a fist on the tick that reaches t = 5.0
        scene.tick(4.9);
        scene.set_fist(true);
        let frame = scene.tick(0.1);
        let start = frame.uniforms.global_ripple_start.unwrap();
        assert!((start - 5.0).abs() < 1e-5);

        for _ in 0..30 {
            let frame = scene.tick(DT);
            assert_eq!(frame.uniforms.global_ripple_start, Some(start));
        }
    }

    #[test]
    fn test_pointer_scrolls_noise_offset() {
        let mailbox = HandMailbox::default();
        let mut scene = TopographyScene::with_hand(TopographyConfig::default(), mailbox.clone());
        mailbox.publish(HandSample {
            pointer: Pointer2D::new(0.4, -0.2),
            confidence: 0.95,
            landmarks: None,
        });
        let frame = scene.tick(DT);
        assert!((frame.uniforms.noise_offset.x - 0.1).abs() < 1e-7);
        assert!((frame.uniforms.noise_offset.y + 0.05).abs() < 1e-7);
    }

    #[test]
    fn test_snapshot_is_complete_and_evaluable() {
        let mut scene = TopographyScene::default();
        scene.set_viewport(800.0, 600.0);
        let frame = scene.tick(DT);

        // Resting mouse at screen centre anchors a ripple near the origin
        assert!(frame.uniforms.ripple_strength >= 0.15);
        assert!(frame.uniforms.emissive_strength >= 1.0);
        assert_eq!(frame.plane_segments, 512);
        assert_eq!(frame.background, crate::terrain::BACKGROUND_NEUTRAL);

        let h = HeightField::new(&frame.uniforms).height([1.0, -2.0]);
        assert!(h.is_finite());
    }

    #[test]
    fn test_bad_dt_does_not_advance_clock() {
        let mut scene = TopographyScene::default();
        scene.tick(f32::NAN);
        scene.tick(-0.5);
        assert_eq!(scene.clock(), 0.0);
    }
}
