//! Core types for overlay image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an overlay image could not be produced.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Empty input, or bytes that are neither PNG nor JPEG.
    #[error("Unsupported image format")]
    InvalidFormat,

    /// The format was recognised but the data could not be decoded.
    #[error("Image data is corrupt: {0}")]
    CorruptedFile(String),

    /// A resize target with a zero edge.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Resampling filter used when an overlay is downscaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    Nearest,
    /// Maps to the image crate's `Triangle` filter.
    #[default]
    Bilinear,
    Lanczos3,
}

impl FilterType {
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        use image::imageops::FilterType as Image;
        match self {
            FilterType::Nearest => Image::Nearest,
            FilterType::Bilinear => Image::Triangle,
            FilterType::Lanczos3 => Image::Lanczos3,
        }
    }
}

/// Orientation tag of a photo, numbered as in EXIF (1-8).
///
/// Phone cameras store the sensor image as-is and record how to turn it
/// upright here; the overlay must be shown upright to be traced against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Mirrored across the main diagonal.
    Transpose = 5,
    Rotate90CW = 6,
    /// Mirrored across the anti-diagonal.
    Transverse = 7,
    Rotate270CW = 8,
}

impl Orientation {
    /// Whether width and height swap once the orientation is applied.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }
}

impl From<u32> for Orientation {
    /// Unknown tag values read as `Normal`.
    fn from(tag: u32) -> Self {
        const ALL: [Orientation; 8] = [
            Orientation::Normal,
            Orientation::FlipHorizontal,
            Orientation::Rotate180,
            Orientation::FlipVertical,
            Orientation::Transpose,
            Orientation::Rotate90CW,
            Orientation::Transverse,
            Orientation::Rotate270CW,
        ];
        tag.checked_sub(1)
            .and_then(|i| ALL.get(i as usize))
            .copied()
            .unwrap_or_default()
    }
}

/// A decoded overlay bitmap with RGBA pixel data.
///
/// Alpha is kept so transparent PNG overlays stay transparent over the
/// camera preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Bytes per pixel in `pixels`.
    pub const CHANNELS: usize = 4;

    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * Self::CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Copy into an `RgbaImage`. `None` if the buffer does not match the
    /// dimensions.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// True for a zero-sized image or an empty buffer.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bilinear_maps_to_triangle() {
        assert_eq!(
            FilterType::default().to_image_filter(),
            image::imageops::FilterType::Triangle
        );
    }

    #[test]
    fn test_orientation_tags() {
        for tag in 1..=8u32 {
            assert_eq!(Orientation::from(tag) as u32, tag);
        }
        assert_eq!(Orientation::from(0), Orientation::Normal);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_quarter_turns_swap_dimensions() {
        assert!(Orientation::Rotate90CW.swaps_dimensions());
        assert!(Orientation::Transpose.swaps_dimensions());
        assert!(!Orientation::Rotate180.swaps_dimensions());
        assert!(!Orientation::FlipHorizontal.swaps_dimensions());
    }

    #[test]
    fn test_decoded_image_creation() {
        let img = DecodedImage::new(100, 50, vec![0u8; 100 * 50 * 4]);
        assert!(!img.is_empty());
    }

    #[test]
    fn test_decoded_image_empty() {
        let img = DecodedImage::new(0, 0, vec![]);
        assert!(img.is_empty());
    }

    #[test]
    fn test_rgba_image_conversion() {
        let img = DecodedImage::new(3, 2, (0..24).collect());
        let rgba = img.to_rgba_image().unwrap();
        assert_eq!(rgba.dimensions(), (3, 2));
        assert_eq!(rgba.get_pixel(1, 0).0, [4, 5, 6, 7]);
        assert_eq!(DecodedImage::from_rgba_image(rgba), img);
    }

    #[test]
    fn test_rgba_image_conversion_rejects_short_buffer() {
        let img = DecodedImage {
            width: 3,
            height: 3,
            pixels: vec![0u8; 8],
        };
        assert!(img.to_rgba_image().is_none());
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::InvalidFormat;
        assert_eq!(err.to_string(), "Unsupported image format");

        let err = DecodeError::InvalidDimensions {
            width: 0,
            height: 10,
        };
        assert_eq!(err.to_string(), "Invalid dimensions: 0x10");
    }
}
