//! WASM-compatible wrapper types.
//!
//! JavaScript cannot hold core types directly, so images cross the boundary
//! as [`JsDecodedImage`] and session state as a plain serializable
//! [`SessionSnapshot`].

use cameraoverlay_core::decode::{DecodedImage, FilterType};
use cameraoverlay_core::{LayerTransform, SessionState, Transform, ZoomRange};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A decoded overlay image for JavaScript.
///
/// Pixels are RGBA, 4 bytes per pixel in row-major order, which is the layout
/// `ImageData` expects. `pixels()` copies the buffer into JavaScript memory.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create a new image from dimensions and RGBA pixel data.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory. Optional; the finalizer does the same.
    pub fn free(self) {}
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert back to a core image. Clones the pixel data.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage::new(self.width, self.height, self.pixels.clone())
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// 0 = Nearest, 1 = Bilinear, 2 = Lanczos3. Anything else is Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

/// Serializable view of a session for JavaScript.
///
/// The overlay image itself is left out; only its dimensions are reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionSnapshot {
    pub camera_permission_granted: bool,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub alpha: f32,
    pub zoom: f32,
    pub zoom_range: ZoomRange,
    pub transform: Transform,
    pub layer: LayerTransform,
}

impl SessionSnapshot {
    pub(crate) fn new(state: &SessionState, rendered: Transform) -> Self {
        let overlay = &state.overlay;
        Self {
            camera_permission_granted: state.camera_permission_granted,
            image_width: overlay.image.as_ref().map(|img| img.width),
            image_height: overlay.image.as_ref().map(|img| img.height),
            alpha: overlay.alpha,
            zoom: overlay.zoom,
            zoom_range: overlay.zoom_range,
            transform: overlay.transform,
            layer: rendered.layer(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use cameraoverlay_core::{SessionEvent, Vector2};

    #[test]
    fn test_js_decoded_image_creation() {
        let img = JsDecodedImage::new(100, 50, vec![0u8; 100 * 50 * 4]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_decoded_round_trip() {
        let decoded = DecodedImage::new(2, 1, vec![255, 128, 64, 255, 1, 2, 3, 4]);
        let js_img = JsDecodedImage::from_decoded(decoded.clone());
        assert_eq!(js_img.pixels(), decoded.pixels);
        assert_eq!(js_img.to_decoded(), decoded);
    }

    #[test]
    fn test_filter_from_u8() {
        assert_eq!(filter_from_u8(0), FilterType::Nearest);
        assert_eq!(filter_from_u8(1), FilterType::Bilinear);
        assert_eq!(filter_from_u8(2), FilterType::Lanczos3);
        assert_eq!(filter_from_u8(255), FilterType::Bilinear);
    }

    #[test]
    fn test_snapshot_reports_image_dimensions() {
        let image = Arc::new(DecodedImage::new(3, 2, vec![0u8; 24]));
        let state = SessionState::default()
            .apply(SessionEvent::SetImage(image))
            .apply(SessionEvent::SetAlpha(0.8));

        let snapshot = SessionSnapshot::new(&state, state.overlay.transform);

        assert_eq!(snapshot.image_width, Some(3));
        assert_eq!(snapshot.image_height, Some(2));
        assert_eq!(snapshot.alpha, 0.8);
        assert_eq!(snapshot.layer, Transform::IDENTITY.layer());
    }

    #[test]
    fn test_snapshot_layer_follows_rendered_transform() {
        let state = SessionState::default();
        let rendered = Transform::new(Vector2::new(10.0, 0.0), 2.0, 0.0);

        let snapshot = SessionSnapshot::new(&state, rendered);

        assert!(snapshot.transform.is_identity());
        assert_eq!(snapshot.layer.translation, Vector2::new(-20.0, 0.0));
        assert_eq!(snapshot.image_width, None);
    }
}
