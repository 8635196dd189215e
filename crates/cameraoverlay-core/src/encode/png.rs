//! PNG encoding for the overlay image cache.
//!
//! PNG is lossless and keeps the alpha channel, so a cached overlay reloads
//! exactly as it was picked.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::decode::DecodedImage;

/// Errors that can occur during PNG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode RGBA pixel data to PNG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * DecodedImage::CHANNELS;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}

/// Encode a decoded overlay image to PNG bytes.
pub fn encode_image_png(image: &DecodedImage) -> Result<Vec<u8>, EncodeError> {
    encode_png(&image.pixels, image.width, image.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_image;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png_signature() {
        let pixels = vec![128u8; 10 * 10 * 4];
        let png = encode_png(&pixels, 10, 10).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_png_is_lossless() {
        let pixels: Vec<u8> = (0..(7 * 5 * 4)).map(|i| (i * 7 % 256) as u8).collect();
        let image = DecodedImage::new(7, 5, pixels);
        let png = encode_image_png(&image).unwrap();
        assert_eq!(decode_image(&png).unwrap(), image);
    }

    #[test]
    fn test_encode_png_invalid_pixel_data() {
        let pixels = vec![0u8; 10 * 10 * 3];
        let result = encode_png(&pixels, 10, 10);
        assert!(matches!(
            result,
            Err(EncodeError::InvalidPixelData {
                expected: 400,
                actual: 300
            })
        ));
    }

    #[test]
    fn test_encode_png_zero_dimensions() {
        assert!(matches!(
            encode_png(&[], 0, 10),
            Err(EncodeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_png(&[], 10, 0),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = EncodeError::InvalidDimensions {
            width: 0,
            height: 5,
        };
        assert_eq!(
            err.to_string(),
            "Invalid dimensions: width (0) and height (5) must be non-zero"
        );
    }
}
