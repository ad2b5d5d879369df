//! Scene configuration - visual tunables with defaults, overridable from JS
//!
//! `configure('{"line_step": 0.05, "camera": {"fov_y_deg": 50}}')` merges a
//! partial JSON object over the defaults. Dynamics constants (spring,
//! thresholds, easing rates, ripple shape) are fixed and not exposed here.

use nalgebra::Point3;
use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::physics::{Camera, TerrainPlane};
use crate::terrain::Rgb;

/// Upper bound on grid resolution per side
pub const MAX_PLANE_SEGMENTS: u32 = 1024;

/// Errors from parsing or validating a config override
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl From<ConfigError> for JsValue {
    fn from(err: ConfigError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Terrain plane geometry
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaneConfig {
    /// Edge length in world units
    pub size: f32,
    /// Grid cells per side
    pub segments: u32,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            size: 40.0,
            segments: 512,
        }
    }
}

/// Viewing camera
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    pub eye: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 45.0,
            near: 0.1,
            far: 200.0,
            eye: [0.0, 2.5, 5.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Visual parameters of the topography scene
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TopographyConfig {
    pub noise_scale: f32,
    /// Noise scroll per second
    pub noise_drift: [f32; 2],
    /// Pointer → noise offset gain
    pub pointer_offset_scale: f32,
    pub line_step: f32,
    pub line_thickness: f32,
    pub base_color: Rgb,
    pub line_color: Rgb,
    pub plane: PlaneConfig,
    pub camera: CameraConfig,
}

impl Default for TopographyConfig {
    fn default() -> Self {
        Self {
            noise_scale: 11.0,
            noise_drift: [0.03, 0.0],
            pointer_offset_scale: 0.25,
            line_step: 0.03,
            line_thickness: 0.025,
            base_color: [0.02, 0.02, 0.025],
            line_color: [1.0, 1.0, 1.0],
            plane: PlaneConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be a positive number",
        })
    }
}

impl TopographyConfig {
    /// Parse a partial JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TopographyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("noise_scale", self.noise_scale)?;
        positive("line_step", self.line_step)?;
        positive("line_thickness", self.line_thickness)?;
        positive("plane.size", self.plane.size)?;
        positive("camera.near", self.camera.near)?;

        if !self.pointer_offset_scale.is_finite() {
            return Err(ConfigError::Invalid {
                field: "pointer_offset_scale",
                reason: "must be finite",
            });
        }
        if self.noise_drift.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "noise_drift",
                reason: "must be finite",
            });
        }
        if self.plane.segments == 0 || self.plane.segments > MAX_PLANE_SEGMENTS {
            return Err(ConfigError::Invalid {
                field: "plane.segments",
                reason: "must be between 1 and 1024",
            });
        }
        if !(self.camera.fov_y_deg > 0.0 && self.camera.fov_y_deg < 180.0) {
            return Err(ConfigError::Invalid {
                field: "camera.fov_y_deg",
                reason: "must be between 0 and 180",
            });
        }
        if !(self.camera.far > self.camera.near) {
            return Err(ConfigError::Invalid {
                field: "camera.far",
                reason: "must be greater than camera.near",
            });
        }
        if self.camera.eye == self.camera.target {
            return Err(ConfigError::Invalid {
                field: "camera.target",
                reason: "must differ from camera.eye",
            });
        }
        Ok(())
    }

    pub fn camera(&self) -> Camera {
        let c = &self.camera;
        Camera::new(
            Point3::from(c.eye),
            Point3::from(c.target),
            c.fov_y_deg,
            c.near,
            c.far,
        )
    }

    pub fn plane(&self) -> TerrainPlane {
        TerrainPlane::flat(self.plane.size)
    }
}
