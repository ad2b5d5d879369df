//! Contour stage - turns a height into a glowing topographic band
//!
//! Only the lines are drawn; anything between bands is discarded so the
//! additive blend leaves the background untouched.

use super::height::smoothstep;
use super::noise::fract;
use super::uniforms::{HeightFieldUniforms, Rgb};

/// Line color once fully tinted (dark crimson)
pub const CRIMSON: Rgb = [0.8, 0.05, 0.1];

/// Clear color with no tint
pub const BACKGROUND_NEUTRAL: Rgb = [0.04, 0.04, 0.04];

/// Clear color once fully tinted
pub const BACKGROUND_RED: Rgb = [0.12, 0.01, 0.02];

/// Fragments with alpha at or below this are discarded
pub const ALPHA_CUTOFF: f32 = 0.001;

fn mix_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Shaded contour output for one surface point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContourSample {
    pub color: Rgb,
    pub alpha: f32,
}

impl ContourSample {
    /// Whether the fragment survives the discard test
    pub fn is_visible(&self) -> bool {
        self.alpha > ALPHA_CUTOFF
    }
}

/// Band intensity: 1 at the middle of each `line_step` band, 0 past `line_thickness`
pub fn line_intensity(height: f32, line_step: f32, line_thickness: f32) -> f32 {
    if !(line_step > 0.0) {
        return 0.0;
    }
    let f = fract(height / line_step);
    let d = (f - 0.5).abs() * 2.0;
    smoothstep(line_thickness, 0.0, d)
}

/// Shade a height. Invisible points come back fully transparent.
pub fn shade(height: f32, uniforms: &HeightFieldUniforms) -> ContourSample {
    let line = line_intensity(height, uniforms.line_step, uniforms.line_thickness);
    if line <= ALPHA_CUTOFF {
        return ContourSample {
            color: [0.0; 3],
            alpha: 0.0,
        };
    }

    let tint = mix_rgb(uniforms.line_color, CRIMSON, uniforms.red_tint);
    let gain = line * uniforms.emissive_strength;

    ContourSample {
        color: [tint[0] * gain, tint[1] * gain, tint[2] * gain],
        alpha: line,
    }
}

/// Clear color for the current tint
pub fn background(red_tint: f32) -> Rgb {
    mix_rgb(BACKGROUND_NEUTRAL, BACKGROUND_RED, red_tint.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_centre_is_full_line() {
        let u = HeightFieldUniforms::default();
        // f = 0.5 exactly in the middle of a band
        let h = u.line_step * 2.5;
        let s = shade(h, &u);
        assert!((s.alpha - 1.0).abs() < 1e-3);
        assert!(s.is_visible());
        assert!((s.color[0] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_between_bands_is_discarded() {
        let u = HeightFieldUniforms::default();
        let s = shade(u.line_step * 2.0, &u);
        assert_eq!(s.alpha, 0.0);
        assert!(!s.is_visible());
    }

    #[test]
    fn test_full_tint_and_emissive() {
        let u = HeightFieldUniforms {
            red_tint: 1.0,
            emissive_strength: 1.1,
            ..HeightFieldUniforms::default()
        };
        let s = shade(u.line_step * 0.5, &u);
        assert!((s.color[0] - CRIMSON[0] * 1.1).abs() < 1e-3);
        assert!((s.color[1] - CRIMSON[1] * 1.1).abs() < 1e-3);
    }

    #[test]
    fn test_background_follows_tint() {
        assert_eq!(background(0.0), BACKGROUND_NEUTRAL);
        let red = background(1.0);
        for c in 0..3 {
            assert!((red[c] - BACKGROUND_RED[c]).abs() < 1e-6);
        }
        let mid = background(0.5);
        assert!(mid[0] > BACKGROUND_NEUTRAL[0] && mid[0] < BACKGROUND_RED[0]);
    }
}
