//! PNG encoding WASM bindings.
//!
//! The browser build caches the overlay image in IndexedDB as PNG, the same
//! format the native cache uses.

use crate::types::JsDecodedImage;
use cameraoverlay_core::encode;
use wasm_bindgen::prelude::*;

/// Encode RGBA pixel data to PNG bytes.
///
/// # Errors
///
/// Returns an error if the pixel buffer length is not `width * height * 4`
/// or a dimension is zero.
#[wasm_bindgen]
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(pixels, width, height).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode a [`JsDecodedImage`] to PNG bytes.
#[wasm_bindgen]
pub fn encode_png_from_image(image: &JsDecodedImage) -> Result<Vec<u8>, JsValue> {
    encode::encode_image_png(&image.to_decoded()).map_err(|e| JsValue::from_str(&e.to_string()))
}
