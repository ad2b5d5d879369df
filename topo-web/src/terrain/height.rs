//! Height field - terrain displacement at a point on the base plane
//!
//! Four stages, summed in order:
//! 1. fBm noise, scrolled by the pointer and the clock
//! 2. Peak folding, blended in by `peakyness` while a fist is held
//! 3. Local damped ripple around the pointer's anchor
//! 4. Global shockwave expanding from the plane origin after a fist onset
//!
//! `terrain.wgsl` runs the same stages per vertex; this is the CPU reference.

use super::noise::{fbm, fract};
use super::uniforms::HeightFieldUniforms;

/// fBm output → height units
pub const HEIGHT_SCALE: f32 = 0.6;

/// Peak folding is skipped below this blend
pub const PEAK_THRESHOLD: f32 = 0.01;

/// Height bands folded into peaks
const PEAK_FOLDS: f32 = 8.0;

/// Exponent sharpening the V-shaped peak profile
const PEAK_SHARPNESS: f32 = 3.5;

/// Peak profile is scaled to [0, PEAK_HEIGHT]
const PEAK_HEIGHT: f32 = 0.5;

/// Shockwave front speed (plane units per second)
pub const SHOCKWAVE_SPEED: f32 = 8.0;

/// Half-width of the shockwave front
const SHOCKWAVE_WIDTH: f32 = 3.0;

/// Shockwave fade-in duration (seconds)
const SHOCKWAVE_FADE_IN: f32 = 0.5;

/// Shockwave fades out between these elapsed times (seconds)
const SHOCKWAVE_FADE_OUT: (f32, f32) = (1.0, 3.0);

/// Shockwave peak height
const SHOCKWAVE_AMPLITUDE: f32 = 0.8;

/// Hermite smoothstep. Edges may be reversed (`e0 > e1`) for a falling edge.
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    if e0 == e1 {
        return if x < e0 { 0.0 } else { 1.0 };
    }
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Fold a height into sharp peaks and blend by `peakyness`
pub fn peak_deform(h: f32, peakyness: f32) -> f32 {
    if peakyness <= PEAK_THRESHOLD {
        return h;
    }

    let band = fract(h * PEAK_FOLDS);
    let peak = (1.0 - (band - 0.5).abs() * 2.0).powf(PEAK_SHARPNESS);
    let peaked = h + PEAK_HEIGHT * peak;

    h + (peaked - h) * peakyness
}

/// Shockwave amplitude envelope (before scaling by its peak height)
pub fn shockwave_envelope(elapsed: f32, dist_from_origin: f32) -> f32 {
    let front = elapsed * SHOCKWAVE_SPEED;
    let wave_dist = (dist_from_origin - front).abs();

    smoothstep(SHOCKWAVE_WIDTH, 0.0, wave_dist)
        * smoothstep(0.0, SHOCKWAVE_FADE_IN, elapsed)
        * smoothstep(SHOCKWAVE_FADE_OUT.1, SHOCKWAVE_FADE_OUT.0, elapsed)
}

/// Evaluates terrain height from one uniform snapshot
pub struct HeightField<'a> {
    uniforms: &'a HeightFieldUniforms,
}

impl<'a> HeightField<'a> {
    pub fn new(uniforms: &'a HeightFieldUniforms) -> Self {
        Self { uniforms }
    }

    /// Texture-space coordinate of a plane point (plane spans [0, 1])
    pub fn uv(&self, plane: [f32; 2]) -> [f32; 2] {
        let size = self.uniforms.plane_size;
        [plane[0] / size + 0.5, plane[1] / size + 0.5]
    }

    /// Stage 1: scrolled fBm
    pub fn base(&self, plane: [f32; 2]) -> f32 {
        let u = self.uniforms;
        let [tu, tv] = self.uv(plane);
        let x = tu * u.noise_scale + u.noise_offset.x + u.noise_drift.x * u.time;
        let y = tv * u.noise_scale + u.noise_offset.y + u.noise_drift.y * u.time;
        fbm(x, y) * HEIGHT_SCALE
    }

    /// Stage 3: damped ripple around the anchor; exactly zero without strength
    pub fn local_ripple(&self, plane: [f32; 2]) -> f32 {
        let u = self.uniforms;
        if !(u.ripple_strength > 0.0) {
            return 0.0;
        }

        let dx = plane[0] - u.ripple_center[0];
        let dy = plane[1] - u.ripple_center[1];
        let dist = (dx * dx + dy * dy).sqrt();

        let phase = u.ripple_freq * dist - u.ripple_speed * u.time;
        (-u.ripple_decay * dist).exp() * phase.sin() * u.ripple_strength
    }

    /// Stage 4: global shockwave; zero until the first fist onset
    pub fn global_ripple(&self, plane: [f32; 2]) -> f32 {
        let u = self.uniforms;
        match u.global_ripple_start {
            Some(start) => {
                let dist = (plane[0] * plane[0] + plane[1] * plane[1]).sqrt();
                shockwave_envelope(u.time - start, dist) * SHOCKWAVE_AMPLITUDE
            }
            None => 0.0,
        }
    }

    /// Final displaced height at a plane point
    pub fn height(&self, plane: [f32; 2]) -> f32 {
        let h = peak_deform(self.base(plane), self.uniforms.peakyness);
        h + self.local_ripple(plane) + self.global_ripple(plane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Pointer2D;

    #[test]
    fn test_height_is_deterministic() {
        let uniforms = HeightFieldUniforms {
            time: 3.7,
            noise_offset: Pointer2D::new(0.1, -0.05),
            ..HeightFieldUniforms::default()
        };
        let field = HeightField::new(&uniforms);
        let p = [4.2, -7.9];
        assert_eq!(field.height(p).to_bits(), field.height(p).to_bits());
    }

    #[test]
    fn test_local_ripple_zero_without_strength() {
        let uniforms = HeightFieldUniforms {
            time: 1.3,
            ripple_center: [0.0, 0.0],
            ripple_strength: 0.0,
            ..HeightFieldUniforms::default()
        };
        let field = HeightField::new(&uniforms);
        for i in 0..50 {
            let d = i as f32 * 0.37;
            assert_eq!(field.local_ripple([d, -d * 0.5]), 0.0);
        }
    }

    #[test]
    fn test_local_ripple_decays_with_distance() {
        let uniforms = HeightFieldUniforms {
            ripple_center: [0.0, 0.0],
            ripple_strength: 0.3,
            ..HeightFieldUniforms::default()
        };
        let field = HeightField::new(&uniforms);
        assert!(field.local_ripple([0.1, 0.0]).abs() <= 0.3);
        assert!(field.local_ripple([8.0, 0.0]).abs() < 1e-6);
    }

    #[test]
    fn test_shockwave_envelope_bounds() {
        for i in 0..200 {
            let dist = i as f32 * 0.2;
            assert_eq!(shockwave_envelope(0.0, dist), 0.0);
            assert_eq!(shockwave_envelope(3.0, dist), 0.0);
            assert_eq!(shockwave_envelope(4.5, dist), 0.0);
        }
        for i in 1..300 {
            let elapsed = i as f32 * 0.01;
            for j in 0..40 {
                assert!(shockwave_envelope(elapsed, j as f32) >= 0.0);
            }
        }
        // On the front, mid-life
        assert!(shockwave_envelope(0.75, 6.0) > 0.9);
    }

    #[test]
    fn test_global_ripple_inactive_without_start() {
        let uniforms = HeightFieldUniforms {
            time: 0.75,
            ..HeightFieldUniforms::default()
        };
        assert_eq!(HeightField::new(&uniforms).global_ripple([6.0, 0.0]), 0.0);

        let active = HeightFieldUniforms {
            global_ripple_start: Some(0.0),
            ..uniforms
        };
        assert!(HeightField::new(&active).global_ripple([6.0, 0.0]) > 0.7);
    }

    #[test]
    fn test_peak_deform_only_above_threshold() {
        assert_eq!(peak_deform(0.123, 0.0), 0.123);
        assert_eq!(peak_deform(0.123, 0.01), 0.123);
        // Centre of a fold band gets the full peak
        let h = 0.5 / PEAK_FOLDS;
        assert!((peak_deform(h, 1.0) - (h + PEAK_HEIGHT)).abs() < 1e-5);
        assert!(peak_deform(h, 0.5) > h);
    }

    #[test]
    fn test_smoothstep_reversed_edges() {
        assert_eq!(smoothstep(3.0, 0.0, 0.0), 1.0);
        assert_eq!(smoothstep(3.0, 0.0, 3.0), 0.0);
        assert!((smoothstep(3.0, 0.0, 1.5) - 0.5).abs() < 1e-6);
    }
}
