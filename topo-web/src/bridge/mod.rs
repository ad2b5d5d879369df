//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] input entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod mailbox;
mod hand_pointer;
mod tracking;
mod mouse;
mod controls;

pub use mailbox::{shared_mailbox, HandLandmark, HandMailbox, HandSample, HAND_LANDMARK_COUNT};

pub use hand_pointer::{
    // WASM entry points
    apply_hand_landmarks,
    get_hand_landmarks,
    // Internal API
    fingertip_to_pointer,
    landmarks_from_flat,
    observe_hand,
    HandTracker,
    // Constants
    INDEX_TIP, DETECTED_CONFIDENCE, POINTER_SMOOTHING, FLOATS_PER_HAND,
};

pub use tracking::{
    start_hand_tracking,
    stop_hand_tracking,
    DetectionClock,
    HandLandmarker,
    HandTrackingSession,
    TrackingError,
};

pub use mouse::{install_mouse_listener, remove_mouse_listener};

pub use controls::{
    set_fist,
    set_pointer_target,
    configure,
    get_pointer,
    get_pointer_source,
    get_gesture_levels,
    tick_scene,
    with_scene,
};
