//! Seams to the platform camera and permission services.
//!
//! The camera pipeline itself is external. The session only needs to bind a
//! camera for as long as the preview is visible, learn its zoom range once,
//! forward zoom requests, and know which surface the preview renders into.

mod binding;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::{SurfaceHandle, ZoomRange};

pub use binding::run_camera_binding;

/// Errors reported by camera collaborators.
#[derive(Debug, Error)]
pub enum CameraError {
    /// Binding the camera to the preview failed.
    #[error("Camera bind failed: {0}")]
    BindFailed(String),

    /// The camera rejected a zoom ratio request.
    #[error("Zoom ratio {ratio} rejected: {reason}")]
    ZoomRejected { ratio: f32, reason: String },

    /// No camera is available for the requested selector.
    #[error("No camera available for {0:?}")]
    Unavailable(CameraSelector),
}

/// Which camera to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraSelector {
    #[default]
    Back,
    Front,
}

/// A camera bound to the preview.
pub trait CameraControl: Send + Sync {
    /// Supported zoom ratios, if the camera has reported them yet.
    fn zoom_range(&self) -> Option<ZoomRange>;

    /// Request a zoom ratio from the hardware.
    fn set_zoom_ratio(&self, ratio: f32) -> Result<(), CameraError>;

    /// Surface the preview renders into.
    fn surface(&self) -> Option<SurfaceHandle>;
}

/// Platform camera provider.
#[async_trait]
pub trait CameraProvider: Send + Sync {
    /// Bind a camera to the preview. Suspends until bound.
    ///
    /// Returns `CameraError::Unavailable` when the device has no camera for
    /// `selector`, and `CameraError::BindFailed` when one exists but could not
    /// be bound.
    async fn bind(&self, selector: CameraSelector) -> Result<Arc<dyn CameraControl>, CameraError>;

    /// Release every camera bound by this provider.
    fn unbind_all(&self);
}

/// Runtime permissions the session cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Camera,
}

/// Platform permission service.
pub trait PermissionChecker: Send + Sync {
    fn is_granted(&self, permission: Permission) -> bool;

    /// Ask the user for `permission`. The outcome is not reported back; the
    /// host re-checks on its next resume.
    fn request(&self, permission: Permission);
}
