//! Ripple anchor - where the pointer touches the terrain
//!
//! Casts the unified pointer through the camera onto the terrain's flat
//! base plane (displacement is GPU-only, so the ray sees the undisplaced
//! mesh). The hit, in the plane's local 2D coordinates, becomes the origin
//! of the local ripple.

use std::f32::consts::FRAC_PI_2;

use nalgebra::{Isometry3, Point2, Translation3, UnitQuaternion, Vector3};

use super::camera::{Camera, Ray};
use super::pointer::Pointer2D;

/// Ripple amplitude with a resting pointer
pub const BASE_RIPPLE_STRENGTH: f32 = 0.15;

/// Extra amplitude per unit of pointer speed
pub const SPEED_RIPPLE_GAIN: f32 = 0.2;

/// Rays this close to parallel with the plane are treated as misses
const PARALLEL_EPSILON: f32 = 1.0e-6;

/// Square terrain plane, authored in local XY with +Z as its front face
#[derive(Clone, Debug)]
pub struct TerrainPlane {
    /// Edge length in local units
    pub size: f32,
    /// Local → world placement
    pub placement: Isometry3<f32>,
}

impl TerrainPlane {
    /// Plane of `size`, laid flat (rotated -90° about X) at the origin
    pub fn flat(size: f32) -> Self {
        Self {
            size,
            placement: Isometry3::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2),
            ),
        }
    }

    /// Intersect a world-space ray with the plane's front face.
    ///
    /// Returns the hit in local plane coordinates, or `None` on a miss
    /// (behind the camera, back face, parallel, or outside the edges).
    pub fn intersect(&self, ray: &Ray) -> Option<Point2<f32>> {
        let origin = self.placement.inverse_transform_point(&ray.origin);
        let direction = self.placement.inverse_transform_vector(&ray.direction);

        // Back faces are culled, as with a single-sided material
        if direction.z > -PARALLEL_EPSILON {
            return None;
        }

        let t = -origin.z / direction.z;
        if !(t >= 0.0) {
            return None;
        }

        let hit = origin + direction * t;
        let half = self.size * 0.5;
        if hit.x.abs() > half || hit.y.abs() > half {
            return None;
        }

        Some(Point2::new(hit.x, hit.y))
    }
}

impl Default for TerrainPlane {
    fn default() -> Self {
        Self::flat(40.0)
    }
}

/// Local ripple parameters for one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleAnchor {
    /// Ripple origin in local plane coordinates (stale after a miss)
    pub center: Point2<f32>,
    /// Ripple amplitude; zero when the pointer misses the terrain
    pub strength: f32,
    pub active: bool,
}

impl RippleAnchor {
    pub fn new() -> Self {
        Self {
            // Far off the plane until the first hit
            center: Point2::new(9999.0, 9999.0),
            strength: 0.0,
            active: false,
        }
    }

    /// Recompute from this tick's pointer. No caching across ticks.
    pub fn update(&mut self, camera: &Camera, plane: &TerrainPlane, pointer: Pointer2D, speed: f32) {
        let hit = camera
            .ray_through(pointer.sanitized())
            .and_then(|ray| plane.intersect(&ray));

        match hit {
            Some(center) => {
                self.center = center;
                self.strength = BASE_RIPPLE_STRENGTH + SPEED_RIPPLE_GAIN * speed.clamp(0.0, 1.0);
                self.active = true;
            }
            None => {
                self.strength = 0.0;
                self.active = false;
            }
        }
    }
}

impl Default for RippleAnchor {
    fn default() -> Self {
        Self::new()
    }
}
