//! Overlay image decoding.
//!
//! This module provides functionality for:
//! - Decoding picked or cached overlay images (PNG, JPEG) into RGBA
//! - Applying EXIF orientation so camera-roll pictures appear upright
//! - Downscaling oversized pictures before they become the overlay
//!
//! All operations are synchronous; callers that must not block move them to
//! a worker thread.

mod codec;
mod resize;
mod types;

pub use codec::{decode_image, get_orientation};
pub use resize::{resize, resize_to_fit};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
