//! Image encoding for the overlay cache.
//!
//! # Examples
//!
//! ```ignore
//! use cameraoverlay_core::encode::encode_png;
//!
//! let pixels = vec![128u8; 100 * 100 * 4]; // Translucent gray image
//! let png_bytes = encode_png(&pixels, 100, 100).unwrap();
//! println!("Encoded {} bytes", png_bytes.len());
//! ```

mod png;

pub use png::{encode_image_png, encode_png, EncodeError};
