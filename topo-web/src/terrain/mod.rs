//! Terrain module - height field, contour shading, and the uniform snapshot
//!
//! Re-exports only. All logic in submodules.

mod noise;
mod height;
mod contour;
mod uniforms;

pub use noise::{fbm, perlin, FBM_OCTAVES};
pub use height::{HeightField, peak_deform, shockwave_envelope, smoothstep, HEIGHT_SCALE, SHOCKWAVE_SPEED};
pub use contour::{background, line_intensity, shade, ContourSample, ALPHA_CUTOFF, BACKGROUND_NEUTRAL, BACKGROUND_RED, CRIMSON};
pub use uniforms::{
    HeightFieldUniforms, Rgb,
    RIPPLE_FREQ, RIPPLE_DECAY, RIPPLE_SPEED,
    NO_GLOBAL_RIPPLE, GLOBAL_RIPPLE_ACTIVE_ABOVE,
};
