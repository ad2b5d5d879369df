//! Fist gesture state machine
//!
//! The observed fist flag is the only source of truth for the discrete
//! state. A rising edge stamps the global shockwave start time; two
//! continuous levels (red tint, peakyness) ease toward the state's target.
//!
//! Easing uses fixed per-tick fractions, not dt-scaled decay, so the blend
//! speed follows the frame rate.

/// Per-tick easing fraction for the red tint
pub const RED_TINT_RATE: f32 = 0.1;

/// Per-tick easing fraction for the peak deformation
pub const PEAKYNESS_RATE: f32 = 0.08;

/// Discrete gesture state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Active,
}

/// Edge produced by one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureTransition {
    /// Fist closed; shockwave launched at `start_time`
    Activated { start_time: f32 },
    /// Fist opened
    Released,
}

/// Gesture-driven visual state
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureState {
    pub is_fist: bool,
    pub red_tint: f32,
    pub peakyness: f32,
    /// Clock time of the last fist onset; `None` until the first one
    pub global_ripple_start: Option<f32>,
}

impl GestureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GesturePhase {
        if self.is_fist {
            GesturePhase::Active
        } else {
            GesturePhase::Idle
        }
    }

    /// Advance one tick with this tick's fist observation at clock `now`
    pub fn advance(self, is_fist: bool, now: f32) -> (GestureState, Option<GestureTransition>) {
        let mut next = self;

        let transition = match (self.is_fist, is_fist) {
            (false, true) => {
                next.global_ripple_start = Some(now);
                Some(GestureTransition::Activated { start_time: now })
            }
            (true, false) => Some(GestureTransition::Released),
            _ => None,
        };
        next.is_fist = is_fist;

        let target = if is_fist { 1.0 } else { 0.0 };
        next.red_tint += (target - next.red_tint) * RED_TINT_RATE;
        next.peakyness += (target - next.peakyness) * PEAKYNESS_RATE;

        (next, transition)
    }
}

/// Owns the gesture state across ticks
#[derive(Clone, Debug, Default)]
pub struct GestureStateMachine {
    state: GestureState,
}

impl GestureStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, is_fist: bool, now: f32) -> Option<GestureTransition> {
        let (next, transition) = self.state.advance(is_fist, now);
        self.state = next;

        match transition {
            Some(GestureTransition::Activated { start_time }) => {
                log::debug!("✊ Fist detected, shockwave at t={:.2}", start_time);
            }
            Some(GestureTransition::Released) => {
                log::debug!("🖐️ Fist released");
            }
            None => {}
        }

        transition
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn phase(&self) -> GesturePhase {
        self.state.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rising_edges_write_start_once_each() {
        let sequence = [false, false, true, true, false, true];
        let mut machine = GestureStateMachine::new();
        let mut writes = Vec::new();

        for (i, &fist) in sequence.iter().enumerate() {
            let before = machine.state().global_ripple_start;
            machine.tick(fist, i as f32);
            if machine.state().global_ripple_start != before {
                writes.push(i);
            }
        }

        assert_eq!(writes, vec![2, 5]);
    }

    #[test]
    fn test_start_time_held_while_fist() {
        let mut machine = GestureStateMachine::new();
        machine.tick(false, 4.9);
        let t = machine.tick(true, 5.0);
        assert_eq!(t, Some(GestureTransition::Activated { start_time: 5.0 }));
        for i in 1..20 {
            assert_eq!(machine.tick(true, 5.0 + i as f32 * 0.016), None);
            assert_eq!(machine.state().global_ripple_start, Some(5.0));
        }
        assert_eq!(machine.phase(), GesturePhase::Active);
    }

    #[test]
    fn test_release_keeps_start_time() {
        let mut machine = GestureStateMachine::new();
        machine.tick(true, 1.0);
        assert_eq!(machine.tick(false, 2.0), Some(GestureTransition::Released));
        assert_eq!(machine.state().global_ripple_start, Some(1.0));
        assert_eq!(machine.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_levels_rise_monotonically_below_one() {
        let mut state = GestureState::new();
        let mut prev = state;
        for i in 0..100 {
            state = state.advance(true, i as f32).0;
            assert!(state.red_tint > prev.red_tint);
            assert!(state.peakyness > prev.peakyness);
            assert!(state.red_tint < 1.0);
            assert!(state.peakyness < 1.0);
            prev = state;
        }
    }

    #[test]
    fn test_levels_use_fixed_fractions() {
        let (state, _) = GestureState::new().advance(true, 0.0);
        assert!((state.red_tint - 0.1).abs() < 1e-6);
        assert!((state.peakyness - 0.08).abs() < 1e-6);

        let (state, _) = state.advance(false, 0.1);
        assert!((state.red_tint - 0.09).abs() < 1e-6);
    }
}
