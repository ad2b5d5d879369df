//! Single-slot hand sample mailbox
//!
//! The detection loop publishes, the frame tick reads. Newest sample wins,
//! nothing queues. Both sides run on the one WASM thread, so a shared
//! `Cell` is enough.

use std::cell::Cell;
use std::rc::Rc;

use crate::physics::Pointer2D;

/// MediaPipe hand model landmark count
pub const HAND_LANDMARK_COUNT: usize = 21;

/// One hand landmark in normalized image coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandLandmark {
    pub x: f32,  // 0-1, left → right in the unmirrored image
    pub y: f32,  // 0-1, top → bottom
    pub z: f32,  // Relative depth
}

/// Latest hand pointer observation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandSample {
    pub pointer: Pointer2D,
    /// 0 when no hand is visible
    pub confidence: f32,
    pub landmarks: Option<[HandLandmark; HAND_LANDMARK_COUNT]>,
}

impl Default for HandSample {
    fn default() -> Self {
        Self {
            pointer: Pointer2D::ZERO,
            confidence: 0.0,
            landmarks: None,
        }
    }
}

/// Shared handle to the slot. Clones see the same sample.
#[derive(Clone, Default)]
pub struct HandMailbox {
    slot: Rc<Cell<HandSample>>,
}

impl HandMailbox {
    /// Overwrite the slot
    pub fn publish(&self, sample: HandSample) {
        self.slot.set(sample);
    }

    pub fn latest(&self) -> HandSample {
        self.slot.get()
    }
}

thread_local! {
    static SHARED: HandMailbox = HandMailbox::default();
}

/// The mailbox wired between hand tracking and the scene
pub fn shared_mailbox() -> HandMailbox {
    SHARED.with(|mailbox| mailbox.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let mailbox = HandMailbox::default();
        assert_eq!(mailbox.latest(), HandSample::default());
        assert_eq!(mailbox.latest().confidence, 0.0);
    }

    #[test]
    fn test_newest_sample_wins() {
        let writer = HandMailbox::default();
        let reader = writer.clone();

        for i in 0..3 {
            writer.publish(HandSample {
                pointer: Pointer2D::new(i as f32 * 0.1, 0.0),
                confidence: 0.95,
                landmarks: None,
            });
        }
        assert_eq!(reader.latest().pointer, Pointer2D::new(0.2, 0.0));
    }

    #[test]
    fn test_shared_mailbox_is_one_slot() {
        let a = shared_mailbox();
        let b = shared_mailbox();
        a.publish(HandSample {
            confidence: 0.5,
            ..HandSample::default()
        });
        assert_eq!(b.latest().confidence, 0.5);
    }
}
