//! Height-field uniforms - the per-frame snapshot handed to the GPU
//!
//! Rebuilt wholesale every tick by the scene driver; nothing here is
//! patched in place, so a frame never sees a half-updated set.

use crate::physics::Pointer2D;

/// Local ripple angular frequency along the radius
pub const RIPPLE_FREQ: f32 = 9.5;

/// Local ripple exponential falloff with distance
pub const RIPPLE_DECAY: f32 = 2.5;

/// Local ripple phase speed
pub const RIPPLE_SPEED: f32 = 3.0;

/// GPU encoding of "no shockwave yet"
pub const NO_GLOBAL_RIPPLE: f32 = -999.0;

/// Values at or below this are read as [`NO_GLOBAL_RIPPLE`] by the shader
pub const GLOBAL_RIPPLE_ACTIVE_ABOVE: f32 = -900.0;

/// Linear RGB color
pub type Rgb = [f32; 3];

/// Everything the height and contour stages read for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightFieldUniforms {
    /// Animation clock (seconds)
    pub time: f32,

    // Base noise
    pub noise_scale: f32,
    pub noise_offset: Pointer2D,
    /// Noise scroll per second of clock
    pub noise_drift: Pointer2D,
    /// Local plane edge length, maps plane coordinates to [0, 1] texture space
    pub plane_size: f32,

    // Contour stage
    pub line_step: f32,
    pub line_thickness: f32,
    pub emissive_strength: f32,
    pub base_color: Rgb,
    pub line_color: Rgb,

    // Local ripple
    pub ripple_center: [f32; 2],
    pub ripple_strength: f32,
    pub ripple_freq: f32,
    pub ripple_decay: f32,
    pub ripple_speed: f32,

    // Gesture
    pub global_ripple_start: Option<f32>,
    pub red_tint: f32,
    pub peakyness: f32,
}

impl HeightFieldUniforms {
    /// Shockwave start as the shader sees it
    pub fn global_ripple_start_encoded(&self) -> f32 {
        self.global_ripple_start.unwrap_or(NO_GLOBAL_RIPPLE)
    }
}

impl Default for HeightFieldUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            noise_scale: 11.0,
            noise_offset: Pointer2D::ZERO,
            noise_drift: Pointer2D::new(0.03, 0.0),
            plane_size: 40.0,
            line_step: 0.03,
            line_thickness: 0.025,
            emissive_strength: 1.0,
            base_color: [0.02, 0.02, 0.025],
            line_color: [1.0, 1.0, 1.0],
            ripple_center: [9999.0, 9999.0],
            ripple_strength: 0.0,
            ripple_freq: RIPPLE_FREQ,
            ripple_decay: RIPPLE_DECAY,
            ripple_speed: RIPPLE_SPEED,
            global_ripple_start: None,
            red_tint: 0.0,
            peakyness: 0.0,
        }
    }
}
