//! Overlay image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, DecodedImage, Orientation};

/// Decode an image (PNG or JPEG) from bytes into RGBA, applying EXIF
/// orientation correction when the container carries it.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for empty input or an unrecognised
/// format, and `DecodeError::CorruptedFile` when decoding fails part way.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let orientation = get_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if orientation != Orientation::Normal {
        tracing::debug!(
            ?orientation,
            swapped = orientation.swaps_dimensions(),
            "applying EXIF orientation"
        );
    }
    let oriented = apply_orientation(img, orientation);
    Ok(DecodedImage::from_rgba_image(oriented.into_rgba8()))
}

/// Extract the EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
