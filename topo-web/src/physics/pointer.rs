//! Pointer value type - one normalized 2D position shared by every source
//!
//! Both the spring-smoothed mouse and the tracked fingertip produce a
//! `Pointer2D` in normalized device coordinates (-1 to 1, Y up).

use std::ops::{Add, Mul, Sub};

/// A 2D point or vector in normalized device coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer2D {
    pub x: f32,
    pub y: f32,
}

impl Pointer2D {
    pub const ZERO: Pointer2D = Pointer2D { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Linear interpolation toward `target` by `t`
    pub fn lerp(self, target: Pointer2D, t: f32) -> Pointer2D {
        self + (target - self) * t
    }

    /// Replace non-finite components with zero so downstream math stays total
    pub fn sanitized(self) -> Pointer2D {
        Pointer2D {
            x: if self.x.is_finite() { self.x } else { 0.0 },
            y: if self.y.is_finite() { self.y } else { 0.0 },
        }
    }

    /// Map client-space pixel coordinates to NDC, flipping Y.
    ///
    /// Returns `None` for a zero-sized or non-finite viewport.
    pub fn from_client(client_x: f32, client_y: f32, width: f32, height: f32) -> Option<Pointer2D> {
        if !(width > 0.0 && height > 0.0) {
            return None;
        }
        let x = (client_x / width) * 2.0 - 1.0;
        let y = -((client_y / height) * 2.0 - 1.0);
        Some(Pointer2D::new(x, y).sanitized())
    }
}

impl Add for Pointer2D {
    type Output = Pointer2D;
    fn add(self, rhs: Pointer2D) -> Pointer2D {
        Pointer2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Pointer2D {
    type Output = Pointer2D;
    fn sub(self, rhs: Pointer2D) -> Pointer2D {
        Pointer2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Pointer2D {
    type Output = Pointer2D;
    fn mul(self, rhs: f32) -> Pointer2D {
        Pointer2D::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f32, f32)> for Pointer2D {
    fn from((x, y): (f32, f32)) -> Self {
        Pointer2D::new(x, y)
    }
}
