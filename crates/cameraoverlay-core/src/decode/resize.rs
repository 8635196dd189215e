//! Downscaling picked overlay images.
//!
//! Camera-roll pictures can be far larger than the viewport they are drawn
//! over. These helpers shrink them before they become the overlay and before
//! they are cached.

use super::{DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` for an empty source or a zero
/// target size, and `DecodeError::CorruptedFile` if the pixel buffer does
/// not match the image dimensions.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    if image.is_empty() {
        return Err(DecodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgba_image = image
        .to_rgba_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbaImage".to_string()))?;

    let resized = image::imageops::resize(&rgba_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgba_image(resized))
}

/// Resize an image so its longest edge is at most `max_edge`, preserving
/// aspect ratio. Images that already fit are returned unchanged.
pub fn resize_to_fit(
    image: &DecodedImage,
    max_edge: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if max_edge == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: 0,
            height: 0,
        });
    }

    if image.width <= max_edge && image.height <= max_edge {
        return Ok(image.clone());
    }

    let (new_width, new_height) = calculate_fit_dimensions(image.width, image.height, max_edge);
    tracing::debug!(
        from_width = image.width,
        from_height = image.height,
        to_width = new_width,
        to_height = new_height,
        "downscaling overlay image"
    );

    resize(image, new_width, new_height, filter)
}

/// Calculate dimensions to fit within max_edge while preserving aspect ratio.
fn calculate_fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let ratio = width as f64 / height as f64;

    if width >= height {
        let new_height = (max_edge as f64 / ratio).round() as u32;
        (max_edge, new_height.max(1))
    } else {
        let new_width = (max_edge as f64 * ratio).round() as u32;
        (new_width.max(1), max_edge)
    }
}
