//! Session state values and the single update function.
//!
//! Every event produces a fresh [`SessionState`]; a snapshot that has been
//! handed out is never mutated afterwards.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::OverlayConfig;
use crate::decode::DecodedImage;
use crate::transform::Transform;

/// Range of zoom ratios supported by the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f32,
    pub max: f32,
}

impl ZoomRange {
    /// Create a range, swapping the bounds if they arrive reversed.
    pub fn new(min: f32, max: f32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Clamp `value` into the range. An invalid range leaves `value` as is.
    pub fn clamp(&self, value: f32) -> f32 {
        if self.is_valid() {
            value.clamp(self.min, self.max)
        } else {
            value
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// True when both bounds are finite and ordered.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self { min: 1.0, max: 2.0 }
    }
}

/// Opaque handle to the surface the camera preview renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceHandle(pub u64);

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Everything needed to draw the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    /// Loaded overlay image, if any.
    pub image: Option<Arc<DecodedImage>>,
    /// Overlay opacity (0.0 to 1.0).
    pub alpha: f32,
    /// Camera zoom ratio, always inside `zoom_range`.
    pub zoom: f32,
    /// Zoom ratios supported by the bound camera.
    pub zoom_range: ZoomRange,
    /// Committed overlay placement.
    pub transform: Transform,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self {
            image: None,
            alpha: 0.5,
            zoom: 1.0,
            zoom_range: ZoomRange::default(),
            transform: Transform::IDENTITY,
        }
    }
}

/// Root state of an overlay session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub camera_permission_granted: bool,
    pub camera_surface: Option<SurfaceHandle>,
    pub overlay: OverlayState,
}

/// A discrete change to the session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    SetAlpha(f32),
    SetZoom(f32),
    CommitTransform(Transform),
    ResetTransform,
    SetPermissionGranted(bool),
    /// A new overlay image. Also resets the transform.
    SetImage(Arc<DecodedImage>),
    /// Camera-reported zoom range. Clamps the current zoom into it.
    SetZoomRange(ZoomRange),
    SetSurface(Option<SurfaceHandle>),
}

impl SessionState {
    /// Initial state using the defaults from `config`.
    pub fn from_config(config: &OverlayConfig) -> Self {
        let zoom_range = config.default_zoom_range;
        Self {
            overlay: OverlayState {
                alpha: config.default_alpha.clamp(0.0, 1.0),
                zoom: zoom_range.clamp(1.0),
                zoom_range,
                ..OverlayState::default()
            },
            ..Self::default()
        }
    }

    /// Produce the state that follows `event`.
    pub fn apply(&self, event: SessionEvent) -> SessionState {
        let mut next = self.clone();
        let overlay = &mut next.overlay;
        match event {
            SessionEvent::SetAlpha(alpha) => {
                if alpha.is_nan() {
                    tracing::debug!("ignoring NaN alpha");
                } else {
                    overlay.alpha = alpha.clamp(0.0, 1.0);
                }
            }
            SessionEvent::SetZoom(zoom) => {
                if zoom.is_nan() {
                    tracing::debug!("ignoring NaN zoom");
                } else {
                    overlay.zoom = overlay.zoom_range.clamp(zoom);
                }
            }
            SessionEvent::CommitTransform(transform) => {
                if transform.is_valid() {
                    overlay.transform = transform;
                } else {
                    tracing::warn!(
                        scale = transform.scale,
                        angle = transform.angle,
                        "ignoring invalid transform commit"
                    );
                }
            }
            SessionEvent::ResetTransform => overlay.transform = Transform::IDENTITY,
            SessionEvent::SetPermissionGranted(granted) => {
                next.camera_permission_granted = granted;
            }
            SessionEvent::SetImage(image) => {
                overlay.image = Some(image);
                overlay.transform = Transform::IDENTITY;
            }
            SessionEvent::SetZoomRange(range) => {
                if range.is_valid() {
                    overlay.zoom_range = range;
                    overlay.zoom = range.clamp(overlay.zoom);
                } else {
                    tracing::warn!(min = range.min, max = range.max, "ignoring invalid zoom range");
                }
            }
            SessionEvent::SetSurface(surface) => next.camera_surface = surface,
        }
        next
    }

    pub fn has_image(&self) -> bool {
        self.overlay.image.is_some()
    }
}
