//! 2D gradient noise and fractal sum
//!
//! Classic permutation-polynomial Perlin noise (permute mod 289, gradients
//! folded from a 41-step ring). This is the same function the vertex stage
//! evaluates in `terrain.wgsl`, so CPU samples line up with the drawn surface
//! up to float rounding.

/// Number of fBm octaves
pub const FBM_OCTAVES: usize = 5;

/// Amplitude of the first octave
const FBM_START_AMPLITUDE: f32 = 0.5;

/// Rescales the raw noise to roughly [-1, 1]
const PERLIN_OUTPUT_SCALE: f32 = 2.3;

/// GLSL-style mod: result has the sign of `y`
fn modulo(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

/// GLSL-style fract: always in [0, 1)
pub(crate) fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn permute(x: f32) -> f32 {
    modulo((x * 34.0 + 1.0) * x, 289.0)
}

/// Quintic fade curve 6t⁵ − 15t⁴ + 10t³
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Gradient dot offset for one lattice corner
fn corner(ix: f32, iy: f32, fx: f32, fy: f32) -> f32 {
    let i = permute(permute(ix) + iy);

    let mut gx = 2.0 * fract(i / 41.0) - 1.0;
    let gy = gx.abs() - 0.5;
    gx -= (gx + 0.5).floor();

    let norm = 1.792_842_9 - 0.853_734_7 * (gx * gx + gy * gy);
    (gx * norm) * fx + (gy * norm) * fy
}

/// Perlin gradient noise at `(x, y)`, roughly in [-1, 1]
pub fn perlin(x: f32, y: f32) -> f32 {
    let (pix, piy) = (x.floor(), y.floor());
    let (pfx, pfy) = (fract(x), fract(y));

    let n00 = corner(pix, piy, pfx, pfy);
    let n10 = corner(pix + 1.0, piy, pfx - 1.0, pfy);
    let n01 = corner(pix, piy + 1.0, pfx, pfy - 1.0);
    let n11 = corner(pix + 1.0, piy + 1.0, pfx - 1.0, pfy - 1.0);

    let (fade_x, fade_y) = (fade(pfx), fade(pfy));
    let n_x0 = mix(n00, n10, fade_x);
    let n_x1 = mix(n01, n11, fade_x);

    PERLIN_OUTPUT_SCALE * mix(n_x0, n_x1, fade_y)
}

/// Fractal Brownian motion: octaves at doubling frequency, halving amplitude
pub fn fbm(x: f32, y: f32) -> f32 {
    let mut value = 0.0;
    let mut amplitude = FBM_START_AMPLITUDE;
    let mut frequency = 1.0;

    for _ in 0..FBM_OCTAVES {
        value += amplitude * perlin(x * frequency, y * frequency);
        frequency *= 2.0;
        amplitude *= 0.5;
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fbm_is_deterministic() {
        for &(x, y) in &[(0.3, 7.1), (-4.25, 2.5), (10.9, -0.01)] {
            assert_eq!(fbm(x, y).to_bits(), fbm(x, y).to_bits());
        }
    }

    #[test]
    fn test_perlin_zero_on_lattice() {
        // Gradient noise vanishes at integer coordinates
        for &(x, y) in &[(0.0, 0.0), (3.0, -2.0), (17.0, 5.0)] {
            assert!(perlin(x, y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_noise_is_bounded_and_varies() {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for i in 0..400 {
            let x = i as f32 * 0.173;
            let y = i as f32 * 0.091 - 11.0;
            let v = fbm(x, y);
            assert!(v.is_finite());
            min = min.min(v);
            max = max.max(v);
        }
        assert!(min > -2.0 && max < 2.0);
        assert!(max - min > 0.1);
    }

    #[test]
    fn test_glsl_mod_and_fract() {
        assert!((modulo(-1.0, 289.0) - 288.0).abs() < 1e-4);
        assert!((fract(-0.25) - 0.75).abs() < 1e-6);
    }
}
