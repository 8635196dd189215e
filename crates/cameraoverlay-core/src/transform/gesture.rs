//! Gesture-to-transform computation.
//!
//! A continuous multi-touch gesture is reported frame by frame as a centroid,
//! an incremental pan, an incremental scale multiplier and an incremental
//! rotation. [`apply_gesture_delta`] folds one such frame into the overlay's
//! cumulative [`Transform`] so that the overlay point under the centroid stays
//! visually fixed while the overlay is scaled and rotated, and pan moves the
//! content by exactly the pan distance in screen pixels.
//!
//! # Algorithm
//!
//! ```text
//! local      = offset + centroid / old_scale
//! rotated    = rotate(local, Δθ)
//! new_offset = rotated - (centroid / new_scale + pan / old_scale)
//! new_angle  = angle + Δθ
//! ```
//!
//! The offset lives in overlay-local units (unscaled), which is why both the
//! centroid and the pan are divided by a scale before being combined with it.

use serde::{Deserialize, Serialize};

use super::{LayerTransform, Vector2};

/// Cumulative placement of the overlay relative to the viewport origin.
///
/// `scale` is always positive. Values are replaced wholesale on every
/// committed gesture or reset, never patched field by field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Overlay-local point that sits at the viewport's top-left corner.
    pub offset: Vector2,
    /// Uniform scale factor.
    pub scale: f32,
    /// Rotation in degrees. Accumulates without normalisation.
    pub angle: f32,
}

impl Transform {
    /// No offset, unit scale, no rotation.
    pub const IDENTITY: Transform = Transform {
        offset: Vector2::ZERO,
        scale: 1.0,
        angle: 0.0,
    };

    pub fn new(offset: Vector2, scale: f32, angle: f32) -> Self {
        Self {
            offset,
            scale,
            angle,
        }
    }

    /// Check whether this is exactly the identity transform.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Finite offset and angle, and a finite positive scale.
    pub fn is_valid(&self) -> bool {
        self.offset.is_finite()
            && self.angle.is_finite()
            && self.scale.is_finite()
            && self.scale > 0.0
    }

    /// Apply one gesture frame. See [`apply_gesture_delta`].
    pub fn apply(&self, delta: &GestureDelta) -> Transform {
        apply_gesture_delta(
            *self,
            delta.centroid,
            delta.pan,
            delta.zoom,
            delta.rotation,
        )
    }

    /// Layer parameters the presentation layer renders this transform with.
    pub fn layer(&self) -> LayerTransform {
        LayerTransform::from_transform(self)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One frame of a transform gesture as reported by a gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureDelta {
    /// Gesture centroid in viewport pixels.
    pub centroid: Vector2,
    /// Centroid movement since the previous frame, in viewport pixels.
    pub pan: Vector2,
    /// Scale multiplier since the previous frame (1.0 = unchanged).
    pub zoom: f32,
    /// Rotation since the previous frame, in degrees.
    pub rotation: f32,
}

impl GestureDelta {
    pub fn new(centroid: Vector2, pan: Vector2, zoom: f32, rotation: f32) -> Self {
        Self {
            centroid,
            pan,
            zoom,
            rotation,
        }
    }

    /// A pure pan frame.
    pub fn pan(centroid: Vector2, pan: Vector2) -> Self {
        Self::new(centroid, pan, 1.0, 0.0)
    }

    /// A pure pinch frame about `centroid`.
    pub fn pinch(centroid: Vector2, zoom: f32) -> Self {
        Self::new(centroid, Vector2::ZERO, zoom, 0.0)
    }

    /// A pure rotation frame about `centroid`.
    pub fn rotate(centroid: Vector2, rotation: f32) -> Self {
        Self::new(centroid, Vector2::ZERO, 1.0, rotation)
    }
}

/// Fold one gesture frame into `current`.
///
/// # Arguments
///
/// * `current` - Transform before this frame
/// * `centroid` - Gesture centroid in viewport pixels
/// * `pan` - Incremental pan in viewport pixels
/// * `scale_delta` - Incremental scale multiplier
/// * `rotation_delta_degrees` - Incremental rotation in degrees
///
/// # Returns
///
/// The updated transform. A `scale_delta` that is not a positive finite
/// number, or that would make the scale non-positive or non-finite, is
/// ignored (treated as 1.0); pan and rotation still apply. A non-finite
/// pan or rotation counts as zero, and a frame with a non-finite centroid,
/// or one whose result would not be finite, leaves `current` unchanged.
///
/// # Example
///
/// ```
/// use cameraoverlay_core::transform::{apply_gesture_delta, Transform, Vector2};
///
/// let t = apply_gesture_delta(
///     Transform::IDENTITY,
///     Vector2::new(100.0, 100.0),
///     Vector2::ZERO,
///     2.0,
///     0.0,
/// );
/// assert_eq!(t.scale, 2.0);
/// assert_eq!(t.offset, Vector2::new(50.0, 50.0));
/// ```
pub fn apply_gesture_delta(
    current: Transform,
    centroid: Vector2,
    pan: Vector2,
    scale_delta: f32,
    rotation_delta_degrees: f32,
) -> Transform {
    if !centroid.is_finite() {
        tracing::debug!("ignoring gesture frame with non-finite centroid");
        return current;
    }
    let pan = if pan.is_finite() { pan } else { Vector2::ZERO };
    let rotation = if rotation_delta_degrees.is_finite() {
        rotation_delta_degrees
    } else {
        0.0
    };

    let old_scale = current.scale;
    let new_scale = checked_scale(old_scale, scale_delta);

    let local_centroid = current.offset + centroid / old_scale;
    let rotated = local_centroid.rotate_by(rotation);
    let offset = rotated - (centroid / new_scale + pan / old_scale);

    let next = Transform {
        offset,
        scale: new_scale,
        angle: current.angle + rotation,
    };
    if next.is_valid() {
        next
    } else {
        tracing::debug!("ignoring gesture frame that overflows the transform");
        current
    }
}

/// `old_scale * scale_delta`, or `old_scale` when that product is unusable.
fn checked_scale(old_scale: f32, scale_delta: f32) -> f32 {
    if !(scale_delta.is_finite() && scale_delta > 0.0) {
        return old_scale;
    }
    let product = old_scale * scale_delta;
    if product.is_finite() && product > 0.0 {
        product
    } else {
        old_scale
    }
}
