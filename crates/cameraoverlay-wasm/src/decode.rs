//! Image decoding WASM bindings.
//!
//! - [`decode_image`] - Decode a picked JPEG or PNG into RGBA pixels
//! - [`resize_to_fit`] - Downscale an image to fit a max edge
//!
//! ```typescript
//! import { decode_image, resize_to_fit } from '@cameraoverlay/wasm';
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const preview = resize_to_fit(image, 2048, 2); // Lanczos3 filter
//! ```

use crate::types::{filter_from_u8, JsDecodedImage};
use cameraoverlay_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a JPEG or PNG image from bytes.
///
/// EXIF orientation is applied, so the result is upright.
///
/// # Errors
///
/// Returns an error if the format is not recognised or the data is corrupt.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resize an image so its longest edge is at most `max_edge`, preserving the
/// aspect ratio. Images that already fit are returned unchanged.
///
/// `filter`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
#[wasm_bindgen]
pub fn resize_to_fit(
    image: &JsDecodedImage,
    max_edge: u32,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    decode::resize_to_fit(&image.to_decoded(), max_edge, filter_from_u8(filter))
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
