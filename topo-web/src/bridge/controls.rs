//! Scene state and its JS controls
//!
//! The scene lives in thread-local storage (WASM is single-threaded).
//! JS pushes inputs (fist, pointer target, config) and reads back the
//! unified pointer and gesture levels for its own UI.

use wasm_bindgen::prelude::*;
use std::cell::RefCell;

use super::mailbox::shared_mailbox;
use crate::config::TopographyConfig;
use crate::physics::Pointer2D;
use crate::scene::{FrameSnapshot, TopographyScene};

thread_local! {
    static SCENE: RefCell<TopographyScene> = RefCell::new(
        TopographyScene::with_hand(TopographyConfig::default(), shared_mailbox())
    );
}

/// Run `f` against the shared scene
pub fn with_scene<R>(f: impl FnOnce(&mut TopographyScene) -> R) -> R {
    SCENE.with(|scene| f(&mut scene.borrow_mut()))
}

/// Advance the shared scene one frame
pub fn tick_scene(dt: f32) -> FrameSnapshot {
    with_scene(|scene| scene.tick(dt))
}

// ============================================================================
// WASM API
// ============================================================================

/// Fist observation from the external classifier
#[wasm_bindgen]
pub fn set_fist(is_fist: bool) {
    with_scene(|scene| scene.set_fist(is_fist));
}

/// Set the mouse spring target directly in NDC (-1 to 1, Y up)
#[wasm_bindgen]
pub fn set_pointer_target(x: f32, y: f32) {
    let target = Pointer2D::new(x, y).sanitized();
    with_scene(|scene| scene.set_mouse_target(target));
}

/// Merge a JSON override over the default visual parameters
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = TopographyConfig::from_json(json)?;
    with_scene(|scene| scene.apply_config(config));
    log::info!("⚙️ Scene configuration applied");
    Ok(())
}

/// Unified pointer from the last frame as `[x, y]`
#[wasm_bindgen]
pub fn get_pointer() -> Vec<f32> {
    with_scene(|scene| {
        let p = scene
            .last_frame()
            .map(|frame| frame.pointer)
            .unwrap_or_else(|| scene.spring().position());
        vec![p.x, p.y]
    })
}

/// `"hand"` or `"mouse"`
#[wasm_bindgen]
pub fn get_pointer_source() -> String {
    with_scene(|scene| {
        scene
            .last_frame()
            .map(|frame| frame.source.name())
            .unwrap_or("mouse")
            .to_string()
    })
}

/// `[red_tint, peakyness, is_fist]`, fist as 0 or 1
#[wasm_bindgen]
pub fn get_gesture_levels() -> Vec<f32> {
    with_scene(|scene| {
        let g = scene.gesture();
        vec![g.red_tint, g.peakyness, if g.is_fist { 1.0 } else { 0.0 }]
    })
}
