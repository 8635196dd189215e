//! Two-dimensional vector used for gesture centroids, pans and offsets.

use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A 2D vector in viewport pixels or overlay-local units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    /// The zero vector.
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Rotate this vector about the origin by `angle_degrees`.
    ///
    /// Uses the standard rotation matrix:
    /// ```text
    /// x' = x * cos(θ) - y * sin(θ)
    /// y' = x * sin(θ) + y * cos(θ)
    /// ```
    ///
    /// The trigonometry runs in `f64` and the result is narrowed back to `f32`,
    /// so repeated small rotations do not drift more than a single rounding.
    pub fn rotate_by(self, angle_degrees: f32) -> Self {
        let angle_rad = (angle_degrees as f64).to_radians();
        let cos = angle_rad.cos();
        let sin = angle_rad.sin();
        let (x, y) = (self.x as f64, self.y as f64);
        Self {
            x: (x * cos - y * sin) as f32,
            y: (x * sin + y * cos) as f32,
        }
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// True when both components are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f32) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vector2 {
    type Output = Vector2;

    fn div(self, rhs: f32) -> Vector2 {
        Vector2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl From<(f32, f32)> for Vector2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}
