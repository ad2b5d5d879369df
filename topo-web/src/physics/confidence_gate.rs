//! Confidence Gate - picks the authoritative pointer each tick
//!
//! When the tracked fingertip is confident enough, it drives the terrain.
//! Otherwise the spring-smoothed mouse does. Never a blend of both.

use super::pointer::Pointer2D;

/// Hand pointer wins only when confidence is strictly above this
pub const HAND_CONFIDENCE_THRESHOLD: f32 = 0.6;

/// Which producer supplied the unified pointer this tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerSource {
    Hand,
    Mouse,
}

impl PointerSource {
    pub fn name(&self) -> &'static str {
        match self {
            PointerSource::Hand => "hand",
            PointerSource::Mouse => "mouse",
        }
    }
}

/// Confidence gate between the hand pointer and the mouse spring
pub struct PointerUnifier {
    /// Minimum (exclusive) confidence to accept the hand pointer
    threshold: f32,
}

impl PointerUnifier {
    pub fn new() -> Self {
        Self {
            threshold: HAND_CONFIDENCE_THRESHOLD,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Select the unified pointer.
    ///
    /// `hand` is `None` when no tracking collaborator is attached.
    /// Switching sources may jump; no smoothing happens here.
    pub fn unify(
        &self,
        hand: Option<(Pointer2D, f32)>,
        mouse: Pointer2D,
    ) -> (Pointer2D, PointerSource) {
        match hand {
            Some((pointer, confidence)) if confidence > self.threshold => {
                (pointer.sanitized(), PointerSource::Hand)
            }
            _ => (mouse.sanitized(), PointerSource::Mouse),
        }
    }
}

impl Default for PointerUnifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HAND: Pointer2D = Pointer2D::new(0.5, 0.5);
    const MOUSE: Pointer2D = Pointer2D::new(-0.3, 0.1);

    #[test]
    fn test_confident_hand_wins() {
        let gate = PointerUnifier::new();
        assert_eq!(gate.unify(Some((HAND, 0.95)), MOUSE), (HAND, PointerSource::Hand));
        assert_eq!(gate.unify(Some((HAND, 0.61)), MOUSE), (HAND, PointerSource::Hand));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let gate = PointerUnifier::new();
        assert_eq!(gate.unify(Some((HAND, 0.6)), MOUSE), (MOUSE, PointerSource::Mouse));
    }

    #[test]
    fn test_low_confidence_or_missing_hand_falls_back() {
        let gate = PointerUnifier::new();
        assert_eq!(gate.unify(Some((HAND, 0.0)), MOUSE).1, PointerSource::Mouse);
        assert_eq!(gate.unify(Some((HAND, f32::NAN)), MOUSE).1, PointerSource::Mouse);
        assert_eq!(gate.unify(None, MOUSE), (MOUSE, PointerSource::Mouse));
    }
}
