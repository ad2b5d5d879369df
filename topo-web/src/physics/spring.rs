//! Mouse spring - smooths the raw mouse target into the fallback pointer
//!
//! Classic mass-spring-damper, integrated with semi-implicit Euler:
//! velocity first, then position from the new velocity.

use super::pointer::Pointer2D;

/// Spring constant
pub const SPRING_K: f32 = 10.0;

/// Fraction of critical damping (2·√k). Slightly underdamped on purpose,
/// the pointer may overshoot its target a little.
pub const DAMPING_RATIO: f32 = 0.9;

/// Velocity → speed scale before clamping to 1
const SPEED_GAIN: f32 = 2.0;

/// Damping coefficient c = 2·√k·0.9 ≈ 5.69
pub fn damping() -> f32 {
    2.0 * SPRING_K.sqrt() * DAMPING_RATIO
}

/// Position and velocity of the spring-smoothed pointer
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpringState {
    /// Position in NDC
    pub position: Pointer2D,

    /// Velocity in NDC units per second
    pub velocity: Pointer2D,
}

impl SpringState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one tick toward `target`
    pub fn advance(self, target: Pointer2D, dt: f32) -> SpringState {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        let accel = (target - self.position) * SPRING_K - self.velocity * damping();
        let velocity = self.velocity + accel * dt;
        let position = self.position + velocity * dt;

        SpringState { position, velocity }
    }

    /// Speed magnitude, scaled and clamped to [0, 1] for emissive boost
    pub fn speed(&self) -> f32 {
        (self.velocity.length() * SPEED_GAIN).min(1.0)
    }
}

/// Owns the spring state and the latest mouse target
#[derive(Clone, Debug, Default)]
pub struct SpringIntegrator {
    state: SpringState,
    target: Pointer2D,
}

impl SpringIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mouse target (NDC). Non-finite components are zeroed.
    pub fn set_target(&mut self, target: Pointer2D) {
        self.target = target.sanitized();
    }

    pub fn target(&self) -> Pointer2D {
        self.target
    }

    /// Integrate one frame
    pub fn tick(&mut self, dt: f32) {
        self.state = self.state.advance(self.target, dt);
    }

    pub fn position(&self) -> Pointer2D {
        self.state.position
    }

    pub fn speed(&self) -> f32 {
        self.state.speed()
    }

    pub fn state(&self) -> SpringState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_damping_is_below_critical() {
        let critical = 2.0 * SPRING_K.sqrt();
        assert!((damping() - 5.692).abs() < 0.001);
        assert!(damping() < critical);
    }

    #[test]
    fn test_converges_to_constant_target() {
        let mut spring = SpringIntegrator::new();
        let target = Pointer2D::new(0.7, -0.4);
        spring.set_target(target);

        let mut max_x = 0.0f32;
        for _ in 0..600 {
            spring.tick(DT);
            max_x = max_x.max(spring.position().x);
        }

        let p = spring.position();
        assert!((p.x - target.x).abs() < 1e-3);
        assert!((p.y - target.y).abs() < 1e-3);
        assert!(spring.state().velocity.length() < 1e-3);
        // Underdamped: may overshoot, but only slightly
        assert!(max_x < target.x * 1.1);
    }

    #[test]
    fn test_semi_implicit_step() {
        let s = SpringState::new().advance(Pointer2D::new(1.0, 0.0), 0.1);
        // accel = 10, v = 1.0, p = v·dt = 0.1
        assert!((s.velocity.x - 1.0).abs() < 1e-6);
        assert!((s.position.x - 0.1).abs() < 1e-6);
        assert_eq!(s.position.y, 0.0);
    }

    #[test]
    fn test_speed_clamped() {
        let s = SpringState {
            position: Pointer2D::ZERO,
            velocity: Pointer2D::new(3.0, 4.0),
        };
        assert_eq!(s.speed(), 1.0);

        let slow = SpringState {
            position: Pointer2D::ZERO,
            velocity: Pointer2D::new(0.1, 0.0),
        };
        assert!((slow.speed() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_bad_dt_is_a_noop() {
        let s = SpringState::new();
        assert_eq!(s.advance(Pointer2D::new(1.0, 1.0), f32::NAN), s);
        assert_eq!(s.advance(Pointer2D::new(1.0, 1.0), -1.0), s);
    }
}
