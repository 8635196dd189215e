//! Rendering parameters for the overlay layer.
//!
//! The presentation layer draws the overlay with a translation, a uniform
//! scale and a rotation, all pivoting at the viewport's top-left corner (not
//! the image centre). The gesture math in [`super::apply_gesture_delta`]
//! assumes exactly this origin; rendering about any other pivot makes the
//! centroid drift under the fingers.

use serde::{Deserialize, Serialize};

use super::{Transform, Vector2};

/// Layer transform derived from a [`Transform`].
///
/// Maps an overlay-local point `p` to viewport pixels as
/// `translation + R(rotation) * (scale * p)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerTransform {
    /// Translation in viewport pixels: `-offset * scale`.
    pub translation: Vector2,
    /// Uniform scale on both axes.
    pub scale: f32,
    /// Rotation in degrees.
    pub rotation_degrees: f32,
    /// Pivot for scale and rotation, always the top-left corner.
    pub pivot: Vector2,
}

impl LayerTransform {
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            // Subtract from zero so identity prints as `0px`, not `-0px`.
            translation: Vector2::new(
                0.0 - transform.offset.x * transform.scale,
                0.0 - transform.offset.y * transform.scale,
            ),
            scale: transform.scale,
            rotation_degrees: transform.angle,
            pivot: Vector2::ZERO,
        }
    }

    /// Affine matrix `[a, b, c, d, e, f]` in the CSS/canvas convention:
    /// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
    pub fn matrix(&self) -> [f64; 6] {
        let angle_rad = (self.rotation_degrees as f64).to_radians();
        let s = self.scale as f64;
        let cos = angle_rad.cos();
        let sin = angle_rad.sin();
        [
            s * cos,
            s * sin,
            -s * sin,
            s * cos,
            self.translation.x as f64,
            self.translation.y as f64,
        ]
    }

    /// Map an overlay-local point to viewport pixels.
    pub fn apply(&self, point: Vector2) -> Vector2 {
        let [a, b, c, d, e, f] = self.matrix();
        let (x, y) = (point.x as f64, point.y as f64);
        Vector2::new((a * x + c * y + e) as f32, (b * x + d * y + f) as f32)
    }

    /// Map a viewport pixel back to the overlay-local point drawn there.
    pub fn invert(&self, point: Vector2) -> Vector2 {
        let angle_rad = (self.rotation_degrees as f64).to_radians();
        let s = self.scale as f64;
        let cos = angle_rad.cos();
        let sin = angle_rad.sin();

        let dx = point.x as f64 - self.translation.x as f64;
        let dy = point.y as f64 - self.translation.y as f64;

        // Undo rotation, then scale.
        let rx = dx * cos + dy * sin;
        let ry = -dx * sin + dy * cos;
        Vector2::new((rx / s) as f32, (ry / s) as f32)
    }

    /// CSS `transform` value for this layer. Pair it with
    /// `transform-origin: 0 0`.
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) rotate({}deg) scale({})",
            self.translation.x, self.translation.y, self.rotation_degrees, self.scale
        )
    }
}

impl From<Transform> for LayerTransform {
    fn from(transform: Transform) -> Self {
        Self::from_transform(&transform)
    }
}
