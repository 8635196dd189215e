//! Overlay session bindings.
//!
//! The browser has no tokio runtime, so [`JsOverlaySession`] drives a
//! [`GestureTracker`] directly: the page forwards touch frames with a
//! timestamp and polls once per animation frame to let quiesced gestures
//! commit into the session state.

use std::sync::Arc;
use std::time::Duration;

use cameraoverlay_core::decode;
use cameraoverlay_core::{
    GestureDelta, GestureTracker, SessionEvent, SessionState, Transform, Vector2, ZoomRange,
};
use wasm_bindgen::prelude::*;

use crate::types::{JsDecodedImage, SessionSnapshot};

/// One overlay session held by the page.
#[wasm_bindgen]
pub struct JsOverlaySession {
    state: SessionState,
    tracker: GestureTracker,
}

#[wasm_bindgen]
impl JsOverlaySession {
    /// Create a session with the default state and a 300 ms commit delay.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsOverlaySession {
        JsOverlaySession {
            state: SessionState::default(),
            tracker: GestureTracker::default(),
        }
    }

    /// Create a session with a custom commit delay in milliseconds.
    pub fn with_quiescence(quiescence_ms: u32) -> JsOverlaySession {
        let state = SessionState::default();
        let tracker = GestureTracker::new(
            state.overlay.transform,
            Duration::from_millis(u64::from(quiescence_ms)),
        );
        JsOverlaySession { state, tracker }
    }

    #[wasm_bindgen(getter)]
    pub fn alpha(&self) -> f32 {
        self.state.overlay.alpha
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f32 {
        self.state.overlay.zoom
    }

    #[wasm_bindgen(getter)]
    pub fn camera_permission_granted(&self) -> bool {
        self.state.camera_permission_granted
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.state.has_image()
    }

    /// True while a gesture is waiting for its commit.
    #[wasm_bindgen(getter)]
    pub fn gesture_pending(&self) -> bool {
        self.tracker.is_pending()
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.dispatch(SessionEvent::SetAlpha(alpha));
    }

    /// Set the zoom ratio. Returns the clamped value to hand to the camera.
    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        self.dispatch(SessionEvent::SetZoom(zoom));
        self.state.overlay.zoom
    }

    /// Apply the zoom range reported by the camera track. Returns the
    /// current zoom after clamping.
    pub fn set_zoom_range(&mut self, min: f32, max: f32) -> f32 {
        self.dispatch(SessionEvent::SetZoomRange(ZoomRange::new(min, max)));
        self.state.overlay.zoom
    }

    pub fn set_permission_granted(&mut self, granted: bool) {
        self.dispatch(SessionEvent::SetPermissionGranted(granted));
    }

    /// Return the overlay to identity, dropping any pending gesture commit.
    pub fn reset_transform(&mut self) {
        self.dispatch(SessionEvent::ResetTransform);
    }

    /// Decode `bytes` and make them the overlay image. The transform resets.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails; the session is left unchanged.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        match decode::decode_image(bytes) {
            Ok(image) => {
                self.dispatch(SessionEvent::SetImage(Arc::new(image)));
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                web_sys::console::warn_1(&JsValue::from_str(&message));
                Err(JsValue::from_str(&message))
            }
        }
    }

    /// Current overlay image, copied into a new [`JsDecodedImage`].
    pub fn image(&self) -> Option<JsDecodedImage> {
        self.state
            .overlay
            .image
            .as_ref()
            .map(|img| JsDecodedImage::from_decoded(img.as_ref().clone()))
    }

    /// Feed one gesture frame.
    ///
    /// `cx, cy` is the centroid and `dx, dy` the pan since the last frame, in
    /// screen pixels. `zoom` is the scale multiplier and `rotation` the
    /// rotation in degrees. `now_ms` is any monotonic clock, such as
    /// `performance.now()`.
    #[allow(clippy::too_many_arguments)]
    pub fn on_gesture(
        &mut self,
        cx: f32,
        cy: f32,
        dx: f32,
        dy: f32,
        zoom: f32,
        rotation: f32,
        now_ms: f64,
    ) {
        let delta = GestureDelta::new(Vector2::new(cx, cy), Vector2::new(dx, dy), zoom, rotation);
        self.tracker.on_gesture(&delta, millis(now_ms));
    }

    /// Commit the transient transform if gestures have been quiet long
    /// enough. Returns `true` when the session state changed.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.tracker.poll(millis(now_ms)) {
            Some(transform) => {
                self.state = self.state.apply(SessionEvent::CommitTransform(transform));
                true
            }
            None => false,
        }
    }

    /// CSS `transform` for the overlay element, including any gesture still
    /// in flight. Use with `transform-origin: 0 0`.
    pub fn css_transform(&self) -> String {
        self.tracker.transient().layer().to_css()
    }

    /// Transient transform as `[offset_x, offset_y, scale, angle]`.
    pub fn transient_transform(&self) -> Vec<f32> {
        transform_parts(self.tracker.transient())
    }

    /// Committed transform as `[offset_x, offset_y, scale, angle]`.
    pub fn committed_transform(&self) -> Vec<f32> {
        transform_parts(self.state.overlay.transform)
    }

    /// Session state as a plain JavaScript object.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let snapshot = SessionSnapshot::new(&self.state, self.tracker.transient());
        serde_wasm_bindgen::to_value(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for JsOverlaySession {
    fn default() -> Self {
        Self::new()
    }
}

impl JsOverlaySession {
    fn dispatch(&mut self, event: SessionEvent) {
        let external = matches!(
            event,
            SessionEvent::ResetTransform | SessionEvent::SetImage(_)
        );
        self.state = self.state.apply(event);
        if external {
            self.tracker.sync_external(self.state.overlay.transform);
        }
    }
}

fn millis(now_ms: f64) -> Duration {
    if now_ms.is_finite() && now_ms > 0.0 {
        Duration::try_from_secs_f64(now_ms / 1000.0).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

fn transform_parts(transform: Transform) -> Vec<f32> {
    vec![
        transform.offset.x,
        transform.offset.y,
        transform.scale,
        transform.angle,
    ]
}
