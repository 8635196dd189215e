//! Overlay transform: gesture math and layer rendering.
//!
//! This module turns pinch/pan/rotate gesture frames into a cumulative 2D
//! affine placement of the overlay image and describes how that placement is
//! rendered.
//!
//! # Coordinate System
//!
//! - Viewport coordinates are pixels with the origin at the top-left corner,
//!   x to the right and y down
//! - The transform offset is expressed in overlay-local (unscaled) units
//! - Angles are in degrees; positive rotates clockwise on screen (y down)
//! - Scale and rotation pivot at the viewport origin, not the image centre

mod gesture;
mod layer;
mod vector;

pub use gesture::{apply_gesture_delta, GestureDelta, Transform};
pub use layer::LayerTransform;
pub use vector::Vector2;
