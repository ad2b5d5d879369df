//! Mouse pointer input
//!
//! A passive window-level `pointermove` listener sets the spring target.
//! The listener is removed when its guard drops.

use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, PointerEvent, Window};
use std::cell::RefCell;

use super::controls::with_scene;
use crate::physics::Pointer2D;

const EVENT: &str = "pointermove";

/// Registered pointermove listener
struct MouseListener {
    window: Window,
    callback: Closure<dyn FnMut(PointerEvent)>,
}

impl MouseListener {
    fn attach(window: Window) -> Result<Self, JsValue> {
        let target_window = window.clone();
        let callback = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let width = target_window.inner_width().ok().and_then(|v| v.as_f64());
            let height = target_window.inner_height().ok().and_then(|v| v.as_f64());
            let (Some(width), Some(height)) = (width, height) else { return };

            if let Some(target) = Pointer2D::from_client(
                event.client_x() as f32,
                event.client_y() as f32,
                width as f32,
                height as f32,
            ) {
                with_scene(|scene| scene.set_mouse_target(target));
            }
        });

        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        window.add_event_listener_with_callback_and_add_event_listener_options(
            EVENT,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;

        Ok(Self { window, callback })
    }
}

impl Drop for MouseListener {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback(EVENT, self.callback.as_ref().unchecked_ref());
    }
}

thread_local! {
    static LISTENER: RefCell<Option<MouseListener>> = RefCell::new(None);
}

/// Start following the mouse. Re-installing replaces the old listener.
pub fn install_mouse_listener() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let listener = MouseListener::attach(window)?;
    let previous = LISTENER.with(|slot| slot.borrow_mut().replace(listener));
    drop(previous);
    Ok(())
}

pub fn remove_mouse_listener() {
    let listener = LISTENER.with(|slot| slot.borrow_mut().take());
    drop(listener);
}
