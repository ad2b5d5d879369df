//! Hand tracking session - webcam capture plus per-frame detection
//!
//! The session owns every resource it acquires (camera stream, video
//! element, landmarker, animation-frame callback) and releases all of them
//! on drop, whether the session is stopped, replaced, or fails halfway
//! through startup.
//!
//! The MediaPipe `HandLandmarker` itself is created on the JS side; Rust
//! receives the promise for it and drives `detectForVideo` every frame.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack, Window};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::hand_pointer::observe_hand;
use super::mailbox::HandLandmark;

/// `HTMLMediaElement.HAVE_CURRENT_DATA`
const HAVE_CURRENT_DATA: u16 = 2;

/// Smallest step between detection timestamps (ms)
const MIN_TIMESTAMP_STEP_MS: f64 = 0.001;

const CAPTURE_WIDTH: u32 = 640;
const CAPTURE_HEIGHT: u32 = 480;

#[wasm_bindgen]
extern "C" {
    /// MediaPipe Tasks Vision `HandLandmarker`
    #[derive(Clone)]
    pub type HandLandmarker;

    #[wasm_bindgen(method, catch, js_name = detectForVideo)]
    fn detect_for_video(this: &HandLandmarker, video: &HtmlVideoElement, timestamp_ms: f64) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method)]
    fn close(this: &HandLandmarker);
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("no browser window")]
    NoWindow,

    #[error("camera API unavailable: {0}")]
    CameraUnavailable(String),

    #[error("camera access denied: {0}")]
    CameraDenied(String),

    #[error("video setup failed: {0}")]
    VideoSetup(String),

    #[error("hand landmarker failed to load: {0}")]
    ModelLoad(String),

    #[error("animation frame scheduling failed: {0}")]
    FrameLoop(String),

    #[error("hand tracking start was cancelled")]
    Cancelled,
}

impl From<TrackingError> for JsValue {
    fn from(err: TrackingError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{:?}", value))
}

// ============================================================================
// DETECTION CLOCK
// ============================================================================

/// Keeps detection timestamps strictly increasing.
/// `detectForVideo` rejects repeated or decreasing timestamps.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetectionClock {
    last_ms: Option<f64>,
}

impl DetectionClock {
    pub fn next(&mut self, now_ms: f64) -> f64 {
        let ts = match self.last_ms {
            Some(last) if !(now_ms > last) => last + MIN_TIMESTAMP_STEP_MS,
            _ => now_ms,
        };
        self.last_ms = Some(ts);
        ts
    }
}

// ============================================================================
// CAMERA CAPTURE
// ============================================================================

/// Camera stream bound to a hidden video element.
/// Dropping it stops every track and detaches the element.
struct CameraCapture {
    stream: MediaStream,
    video: HtmlVideoElement,
}

impl CameraCapture {
    async fn open(window: &Window) -> Result<Self, TrackingError> {
        let document = window
            .document()
            .ok_or_else(|| TrackingError::VideoSetup("no document".into()))?;
        let video: HtmlVideoElement = document
            .create_element("video")
            .map_err(|e| TrackingError::VideoSetup(describe(&e)))?
            .dyn_into()
            .map_err(|_| TrackingError::VideoSetup("not a video element".into()))?;

        let devices = window
            .navigator()
            .media_devices()
            .map_err(|e| TrackingError::CameraUnavailable(describe(&e)))?;

        let video_constraints = js_sys::Object::new();
        let set = |key: &str, value: JsValue| {
            let _ = js_sys::Reflect::set(&video_constraints, &key.into(), &value);
        };
        set("facingMode", "user".into());
        set("width", ideal(CAPTURE_WIDTH));
        set("height", ideal(CAPTURE_HEIGHT));

        let constraints = MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::FALSE);
        constraints.set_video(&video_constraints);

        let request = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| TrackingError::CameraUnavailable(describe(&e)))?;
        let stream: MediaStream = JsFuture::from(request)
            .await
            .map_err(|e| TrackingError::CameraDenied(describe(&e)))?
            .unchecked_into();

        // Guard owns the stream from here on
        let capture = Self { stream, video };

        capture.video.set_muted(true);
        capture.video.set_autoplay(true);
        let _ = capture.video.set_attribute("playsinline", "");
        capture.video.set_src_object(Some(&capture.stream));

        let playing = capture
            .video
            .play()
            .map_err(|e| TrackingError::VideoSetup(describe(&e)))?;
        JsFuture::from(playing)
            .await
            .map_err(|e| TrackingError::VideoSetup(describe(&e)))?;

        Ok(capture)
    }
}

fn ideal(value: u32) -> JsValue {
    let obj = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&obj, &"ideal".into(), &JsValue::from(value));
    obj.into()
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
        self.video.set_src_object(None);
        self.video.remove();
    }
}

// ============================================================================
// FRAME LOOP
// ============================================================================

/// Self-rescheduling requestAnimationFrame callback
#[derive(Default)]
struct FrameLoop {
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
    handle: Cell<Option<i32>>,
    stopped: Cell<bool>,
}

impl FrameLoop {
    fn request(&self, window: &Window) -> Result<(), TrackingError> {
        if self.stopped.get() {
            return Ok(());
        }
        let callback = self.callback.borrow();
        if let Some(callback) = callback.as_ref() {
            let id = window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .map_err(|e| TrackingError::FrameLoop(describe(&e)))?;
            self.handle.set(Some(id));
        }
        Ok(())
    }

    fn cancel(&self, window: Option<&Window>) {
        self.stopped.set(true);
        if let (Some(id), Some(window)) = (self.handle.take(), window) {
            let _ = window.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

/// First hand's landmarks from a `HandLandmarkerResult`
fn landmarks_from_result(result: &JsValue) -> Option<Vec<HandLandmark>> {
    let hands = js_sys::Reflect::get(result, &"landmarks".into()).ok()?;
    let hands = hands.dyn_ref::<js_sys::Array>()?;
    let first = hands.get(0);
    let points = first.dyn_ref::<js_sys::Array>()?;

    let coord = |point: &JsValue, key: &str| -> Option<f32> {
        js_sys::Reflect::get(point, &key.into())
            .ok()?
            .as_f64()
            .map(|v| v as f32)
    };

    points
        .iter()
        .map(|p| {
            Some(HandLandmark {
                x: coord(&p, "x")?,
                y: coord(&p, "y")?,
                z: coord(&p, "z").unwrap_or(0.0),
            })
        })
        .collect()
}

// ============================================================================
// START TICKETS
// ============================================================================

thread_local! {
    static GENERATION: Cell<u64> = Cell::new(0);
}

/// Issued to each start; stop or a newer start makes older tickets stale
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StartTicket(u64);

impl StartTicket {
    fn issue() -> Self {
        Self(invalidate_pending_starts())
    }

    fn is_current(self) -> bool {
        GENERATION.with(|g| g.get()) == self.0
    }
}

fn invalidate_pending_starts() -> u64 {
    GENERATION.with(|g| {
        let next = g.get().wrapping_add(1);
        g.set(next);
        next
    })
}

/// Close a landmarker whose promise nobody will await
fn close_when_ready(landmarker: js_sys::Promise) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Ok(value) = JsFuture::from(landmarker).await {
            value.unchecked_into::<HandLandmarker>().close();
        }
    });
}

// ============================================================================
// SESSION
// ============================================================================

/// Running hand tracking. Drop tears everything down.
pub struct HandTrackingSession {
    frame_loop: Rc<FrameLoop>,
    landmarker: HandLandmarker,
    // Declared last so the camera is released after the loop stops
    capture: CameraCapture,
}

impl HandTrackingSession {
    /// Open the camera, await the landmarker, and start detecting.
    ///
    /// Whatever was acquired is released again when the ticket goes stale
    /// while waiting or a step fails; the landmarker is closed in both cases.
    async fn start(landmarker: js_sys::Promise, ticket: StartTicket) -> Result<Self, TrackingError> {
        let opened = async {
            let window = web_sys::window().ok_or(TrackingError::NoWindow)?;
            let performance = window
                .performance()
                .ok_or_else(|| TrackingError::FrameLoop("no performance clock".into()))?;
            let capture = CameraCapture::open(&window).await?;
            Ok::<_, TrackingError>((window, performance, capture))
        };
        let (window, performance, capture) = match opened.await {
            Ok(opened) => opened,
            Err(e) => {
                close_when_ready(landmarker);
                return Err(e);
            }
        };
        if !ticket.is_current() {
            close_when_ready(landmarker);
            return Err(TrackingError::Cancelled);
        }
        log::info!("📷 Camera stream started");

        let landmarker: HandLandmarker = JsFuture::from(landmarker)
            .await
            .map_err(|e| TrackingError::ModelLoad(describe(&e)))?
            .unchecked_into();
        if !ticket.is_current() {
            landmarker.close();
            return Err(TrackingError::Cancelled);
        }

        let frame_loop = Rc::new(FrameLoop::default());
        let session = Self {
            frame_loop: frame_loop.clone(),
            landmarker: landmarker.clone(),
            capture,
        };

        let weak = Rc::downgrade(&frame_loop);
        let video = session.capture.video.clone();
        let loop_window = window.clone();
        let mut clock = DetectionClock::default();
        let mut warned = false;

        let callback = Closure::<dyn FnMut()>::new(move || {
            let Some(frame_loop) = weak.upgrade() else { return };
            if frame_loop.stopped.get() {
                return;
            }

            if video.ready_state() >= HAVE_CURRENT_DATA {
                let ts = clock.next(performance.now());
                match landmarker.detect_for_video(&video, ts) {
                    Ok(result) => {
                        let hand = landmarks_from_result(&result);
                        observe_hand(hand.as_deref());
                    }
                    Err(e) => {
                        if !warned {
                            log::warn!("⚠️ Hand detection failed: {}", describe(&e));
                            warned = true;
                        }
                    }
                }
            }

            if let Err(e) = frame_loop.request(&loop_window) {
                log::warn!("⚠️ {}", e);
            }
        });

        *frame_loop.callback.borrow_mut() = Some(callback);
        frame_loop.request(&window)?;
        Ok(session)
    }
}

impl Drop for HandTrackingSession {
    fn drop(&mut self) {
        self.frame_loop.cancel(web_sys::window().as_ref());
        self.landmarker.close();
        observe_hand(None);
        log::info!("🛑 Hand tracking stopped");
    }
}

thread_local! {
    static SESSION: RefCell<Option<HandTrackingSession>> = RefCell::new(None);
}

// ============================================================================
// WASM API
// ============================================================================

/// Start webcam hand tracking with a `HandLandmarker` promise from JS.
///
/// Never rejects: on failure the pointer stays on the mouse.
#[wasm_bindgen]
pub async fn start_hand_tracking(landmarker: js_sys::Promise) {
    let ticket = StartTicket::issue();
    match HandTrackingSession::start(landmarker, ticket).await {
        Ok(session) => {
            // Replacing an earlier session drops (and tears down) it
            let previous = SESSION.with(|slot| slot.borrow_mut().replace(session));
            drop(previous);
            log::info!("✅ Hand tracking started");
        }
        Err(TrackingError::Cancelled) => {
            log::info!("⏹️ Hand tracking start superseded");
        }
        Err(e) => {
            log::warn!("⚠️ Hand pointer init failed, staying on mouse: {}", e);
        }
    }
}

/// Stop hand tracking and release the camera. Also abandons a start that is
/// still waiting on the camera or the model. No-op when not running.
#[wasm_bindgen]
pub fn stop_hand_tracking() {
    invalidate_pending_starts();
    let session = SESSION.with(|slot| slot.borrow_mut().take());
    drop(session);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamps_strictly_increase() {
        let mut clock = DetectionClock::default();
        let a = clock.next(100.0);
        let b = clock.next(100.0);
        let c = clock.next(99.0);
        let d = clock.next(250.0);
        assert_eq!(a, 100.0);
        assert!(b > a);
        assert!(c > b);
        assert_eq!(d, 250.0);
    }

    #[test]
    fn test_nan_timestamp_still_advances() {
        let mut clock = DetectionClock::default();
        let a = clock.next(10.0);
        let b = clock.next(f64::NAN);
        assert!(b > a);
    }

    #[test]
    fn test_stop_invalidates_pending_start() {
        let ticket = StartTicket::issue();
        assert!(ticket.is_current());
        stop_hand_tracking();
        assert!(!ticket.is_current());
    }

    #[test]
    fn test_newer_start_supersedes_older() {
        let first = StartTicket::issue();
        let second = StartTicket::issue();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert_ne!(first, second);
    }
}
