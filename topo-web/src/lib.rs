//! Topo Web - WebGPU contour-line terrain
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

pub mod bridge;
pub mod config;
pub mod physics;
pub mod scene;
pub mod terrain;
mod logging;
mod renderer;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    apply_hand_landmarks, configure, get_gesture_levels, get_hand_landmarks, get_pointer,
    get_pointer_source, set_fist, set_pointer_target, start_hand_tracking, stop_hand_tracking,
};
pub use logging::set_log_level;
pub use renderer::resize;

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

/// Initialize WebGPU on the canvas and start following the mouse.
/// Must be called before render_frame draws anything.
#[wasm_bindgen]
pub async fn init(canvas_id: String) -> Result<(), JsValue> {
    renderer::initialize_gpu(&canvas_id).await?;
    bridge::install_mouse_listener()?;
    log::info!("✅ WebGPU initialized with contour terrain");
    Ok(())
}

/// Advance the scene by `dt` seconds and draw one frame
#[wasm_bindgen]
pub fn render_frame(dt: f32) {
    renderer::render_frame(dt);
}

/// Stop tracking, detach input listeners, and release the GPU
#[wasm_bindgen]
pub fn shutdown() {
    bridge::stop_hand_tracking();
    bridge::remove_mouse_listener();
    renderer::release_gpu();
}
