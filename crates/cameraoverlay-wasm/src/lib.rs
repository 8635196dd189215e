//! Camera Overlay WASM - WebAssembly bindings for Camera Overlay
//!
//! This crate exposes the cameraoverlay-core gesture engine and session state
//! to the browser build of the app. The page owns the camera stream and the
//! touch handling; everything that decides where the overlay sits lives here.
//!
//! # Module Structure
//!
//! - `session` - Overlay session with debounced gesture commits
//! - `types` - WASM-compatible wrapper types for image data and snapshots
//! - `decode` - Overlay image decoding and resizing
//! - `encode` - PNG encoding for the cached overlay image
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsOverlaySession } from '@cameraoverlay/wasm';
//!
//! await init();
//!
//! const session = new JsOverlaySession();
//! session.load_image(new Uint8Array(await file.arrayBuffer()));
//!
//! // From the touch handler
//! session.on_gesture(cx, cy, dx, dy, zoom, rotation, performance.now());
//! overlay.style.transform = session.css_transform();
//!
//! // From requestAnimationFrame
//! if (session.poll(performance.now())) {
//!   persist(session.snapshot());
//! }
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod session;
mod types;

// Re-export public types
pub use decode::{decode_image, resize_to_fit};
pub use encode::{encode_png, encode_png_from_image};
pub use session::JsOverlaySession;
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
