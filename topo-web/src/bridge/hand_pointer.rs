//! Hand pointer - index fingertip → NDC pointer
//!
//! Features:
//! - Mirrored fingertip mapping (selfie view)
//! - Light easing toward each new detection
//! - Flat `Float32Array` entry point for JS-driven detection
//!
//! A missing hand publishes confidence 0 and keeps the last pointer.

use wasm_bindgen::prelude::*;
use std::cell::RefCell;

use super::mailbox::{shared_mailbox, HandLandmark, HandMailbox, HandSample, HAND_LANDMARK_COUNT};
use crate::physics::Pointer2D;

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const INDEX_TIP: usize = 8;

/// Floats per landmark in flat data (x, y, z)
pub const LANDMARK_STRIDE: usize = 3;

/// Floats per hand in flat data
pub const FLOATS_PER_HAND: usize = HAND_LANDMARK_COUNT * LANDMARK_STRIDE;

/// Confidence reported while a hand is visible
pub const DETECTED_CONFIDENCE: f32 = 0.95;

/// Fraction of the gap to a new detection closed per sample
pub const POINTER_SMOOTHING: f32 = 0.35;

// ============================================================================
// MAPPING
// ============================================================================

/// Mirror the fingertip horizontally and flip Y into NDC
pub fn fingertip_to_pointer(tip: HandLandmark) -> Pointer2D {
    Pointer2D::new((1.0 - tip.x) * 2.0 - 1.0, (1.0 - tip.y) * 2.0 - 1.0)
}

/// Unpack the first hand from flat `[x, y, z] × 21 × num_hands` data.
///
/// `Ok(None)` when no hand was seen, `Err(len)` when the buffer is too short
/// for the advertised hand count (or the count itself is out of range).
pub fn landmarks_from_flat(flat: &[f32], num_hands: usize) -> Result<Option<Vec<HandLandmark>>, usize> {
    if num_hands == 0 {
        return Ok(None);
    }
    match num_hands.checked_mul(FLOATS_PER_HAND) {
        Some(needed) if flat.len() >= needed => {}
        _ => return Err(flat.len()),
    }

    let hand = flat[..FLOATS_PER_HAND]
        .chunks_exact(LANDMARK_STRIDE)
        .map(|c| HandLandmark { x: c[0], y: c[1], z: c[2] })
        .collect();
    Ok(Some(hand))
}

// ============================================================================
// TRACKER
// ============================================================================

/// Turns per-frame detections into mailbox samples
pub struct HandTracker {
    mailbox: HandMailbox,
    pointer: Pointer2D,
}

impl HandTracker {
    pub fn new(mailbox: HandMailbox) -> Self {
        Self {
            mailbox,
            pointer: Pointer2D::ZERO,
        }
    }

    /// Publish one detection result (`None` = no hand this frame)
    pub fn observe(&mut self, landmarks: Option<&[HandLandmark]>) -> HandSample {
        let sample = match landmarks {
            Some(hand) if hand.len() > INDEX_TIP => {
                let target = fingertip_to_pointer(hand[INDEX_TIP]);
                self.pointer = self.pointer.lerp(target, POINTER_SMOOTHING).sanitized();
                HandSample {
                    pointer: self.pointer,
                    confidence: DETECTED_CONFIDENCE,
                    landmarks: hand.try_into().ok(),
                }
            }
            _ => HandSample {
                pointer: self.pointer,
                confidence: 0.0,
                landmarks: None,
            },
        };
        self.mailbox.publish(sample);
        sample
    }
}

thread_local! {
    static HAND_TRACKER: RefCell<HandTracker> = RefCell::new(HandTracker::new(shared_mailbox()));
}

/// Feed one detection result into the shared tracker
pub fn observe_hand(landmarks: Option<&[HandLandmark]>) -> HandSample {
    HAND_TRACKER.with(|tracker| tracker.borrow_mut().observe(landmarks))
}

// ============================================================================
// WASM API
// ============================================================================

/// Push landmarks detected on the JS side (21 × 3 floats per hand).
/// Only the first hand steers the pointer.
#[wasm_bindgen]
pub fn apply_hand_landmarks(flat_data: &[f32], num_hands: usize) {
    match landmarks_from_flat(flat_data, num_hands) {
        Ok(hand) => {
            observe_hand(hand.as_deref());
        }
        Err(len) => {
            log::warn!(
                "Invalid hand landmark data length: {} (expected {} per hand)",
                len,
                FLOATS_PER_HAND
            );
            observe_hand(None);
        }
    }
}

/// Latest landmarks as flat `[x, y, z] × 21`, empty without a hand
#[wasm_bindgen]
pub fn get_hand_landmarks() -> Vec<f32> {
    shared_mailbox()
        .latest()
        .landmarks
        .map(|hand| hand.iter().flat_map(|l| [l.x, l.y, l.z]).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_with_tip(x: f32, y: f32) -> Vec<HandLandmark> {
        let mut hand = vec![HandLandmark::default(); HAND_LANDMARK_COUNT];
        hand[INDEX_TIP] = HandLandmark { x, y, z: 0.0 };
        hand
    }

    #[test]
    fn test_fingertip_is_mirrored() {
        let p = fingertip_to_pointer(HandLandmark { x: 0.25, y: 0.25, z: 0.0 });
        assert_eq!(p, Pointer2D::new(0.5, 0.5));

        let centre = fingertip_to_pointer(HandLandmark { x: 0.5, y: 0.5, z: 0.0 });
        assert_eq!(centre, Pointer2D::ZERO);
    }

    #[test]
    fn test_detection_eases_toward_tip() {
        let mailbox = HandMailbox::default();
        let mut tracker = HandTracker::new(mailbox.clone());

        let sample = tracker.observe(Some(&hand_with_tip(0.0, 0.0)));
        // Target (1, 1), first step closes 35% of the gap
        assert!((sample.pointer.x - 0.35).abs() < 1e-6);
        assert!((sample.pointer.y - 0.35).abs() < 1e-6);
        assert_eq!(sample.confidence, DETECTED_CONFIDENCE);
        assert!(sample.landmarks.is_some());
        assert_eq!(mailbox.latest(), sample);

        for _ in 0..60 {
            tracker.observe(Some(&hand_with_tip(0.0, 0.0)));
        }
        assert!((mailbox.latest().pointer.x - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_lost_hand_keeps_pointer_and_drops_confidence() {
        let mailbox = HandMailbox::default();
        let mut tracker = HandTracker::new(mailbox.clone());
        let seen = tracker.observe(Some(&hand_with_tip(0.0, 1.0)));

        let lost = tracker.observe(None);
        assert_eq!(lost.confidence, 0.0);
        assert_eq!(lost.pointer, seen.pointer);
        assert!(lost.landmarks.is_none());
    }

    #[test]
    fn test_flat_data_parsing() {
        assert_eq!(landmarks_from_flat(&[], 0), Ok(None));
        assert_eq!(landmarks_from_flat(&[0.5; 10], 1), Err(10));

        let mut flat = vec![0.0; FLOATS_PER_HAND * 2];
        flat[INDEX_TIP * 3] = 0.75;
        flat[INDEX_TIP * 3 + 1] = 0.25;
        let hand = landmarks_from_flat(&flat, 2).unwrap().unwrap();
        assert_eq!(hand.len(), HAND_LANDMARK_COUNT);
        assert_eq!(hand[INDEX_TIP].x, 0.75);
        assert_eq!(hand[INDEX_TIP].y, 0.25);
    }

    #[test]
    fn test_huge_hand_count_is_rejected() {
        assert_eq!(landmarks_from_flat(&[0.5; 63], usize::MAX / 8), Err(63));
        assert_eq!(landmarks_from_flat(&[0.5; 60], usize::MAX / 8), Err(60));
        assert_eq!(landmarks_from_flat(&[0.5; 60], usize::MAX), Err(60));
    }

    #[test]
    fn test_malformed_flat_data_counts_as_no_hand() {
        apply_hand_landmarks(&vec![0.25; FLOATS_PER_HAND], 1);
        assert_eq!(shared_mailbox().latest().confidence, DETECTED_CONFIDENCE);

        apply_hand_landmarks(&[0.5; 60], usize::MAX / 8);
        let sample = shared_mailbox().latest();
        assert_eq!(sample.confidence, 0.0);
        assert!(sample.landmarks.is_none());
        assert!(get_hand_landmarks().is_empty());
    }
}
