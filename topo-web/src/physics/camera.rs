//! Viewing camera - perspective projection and pointer rays
//!
//! Mirrors a right-handed, Y-up scene camera: vertical field of view,
//! eye looking at a target point. Used both to build the GPU view-projection
//! matrix and to cast rays from the pointer into the scene.

use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Unit, Vector3};

use super::pointer::Pointer2D;

/// nalgebra projects depth to [-1, 1]; WebGPU clip space wants [0, 1]
#[rustfmt::skip]
fn opengl_to_wgpu() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Ray in world space
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Unit<Vector3<f32>>,
}

impl Ray {
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction.into_inner() * t
    }
}

/// Perspective camera looking at a fixed target
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
}

impl Camera {
    pub fn new(eye: Point3<f32>, target: Point3<f32>, fov_y_deg: f32, near: f32, far: f32) -> Self {
        Self {
            eye,
            target,
            up: Vector3::y(),
            fov_y_deg,
            near,
            far,
            aspect: 1.0,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Update aspect ratio from the drawing surface; degenerate sizes are ignored
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        let aspect = width / height;
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    fn view(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye, &self.target, &self.up)
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.aspect, self.fov_y_deg.to_radians(), self.near, self.far)
    }

    /// Combined view-projection in WebGPU clip space
    pub fn view_projection(&self) -> Matrix4<f32> {
        opengl_to_wgpu() * self.projection().as_matrix() * self.view().to_homogeneous()
    }

    /// Cast a ray from the eye through an NDC pointer position.
    ///
    /// Returns `None` only for a degenerate camera.
    pub fn ray_through(&self, ndc: Pointer2D) -> Option<Ray> {
        // Any depth inside the frustum gives the same direction
        let in_view = self.projection().unproject_point(&Point3::new(ndc.x, ndc.y, 0.5));
        let in_world = self.view().inverse_transform_point(&in_view);

        Unit::try_new(in_world - self.eye, 1.0e-9).map(|direction| Ray {
            origin: self.eye,
            direction,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 2.5, 5.0), Point3::origin(), 45.0, 0.1, 200.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::default();
        let ray = camera.ray_through(Pointer2D::ZERO).unwrap();
        let to_target = (camera.target - camera.eye).normalize();
        assert!((ray.direction.dot(&to_target) - 1.0).abs() < 1e-5);
        assert_eq!(ray.origin, camera.eye);
    }

    #[test]
    fn test_upper_pointer_ray_tilts_up() {
        let camera = Camera::default();
        let center = camera.ray_through(Pointer2D::ZERO).unwrap();
        let up = camera.ray_through(Pointer2D::new(0.0, 0.8)).unwrap();
        assert!(up.direction.y > center.direction.y);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = Camera::default();
        let clip = camera.view_projection() * camera.target.to_homogeneous();
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn test_degenerate_viewport_keeps_aspect() {
        let mut camera = Camera::default();
        camera.set_viewport(800.0, 600.0);
        camera.set_viewport(800.0, 0.0);
        assert!((camera.aspect() - 800.0 / 600.0).abs() < 1e-6);
    }
}
