//! Camera Overlay Core - gesture engine and session state
//!
//! This crate holds the platform-independent part of Camera Overlay: a live
//! camera preview with a semi-transparent picture on top that the user can
//! pan, pinch and rotate to trace or compare against.
//!
//! # Module Structure
//!
//! - `transform` - Overlay transform, gesture math and the render contract
//! - `gesture` - Debounced commit of gesture-driven transforms
//! - `session` - Immutable session snapshots and their controller
//! - `camera` - Seams to the platform camera and permission services
//! - `decode` / `encode` - Overlay image decoding and PNG encoding
//! - `cache` - On-disk cache of the last picked overlay image
//! - `config` - JSON session configuration
//!
//! The `runtime` feature (on by default) enables the tokio-backed parts:
//! the session controller, the gesture driver and the camera binding.

pub mod cache;
#[cfg(feature = "runtime")]
pub mod camera;
pub mod config;
pub mod decode;
pub mod encode;
pub mod gesture;
pub mod session;
pub mod transform;

pub use cache::ImageCache;
pub use config::OverlayConfig;
pub use gesture::GestureTracker;
pub use session::{SessionEvent, SessionState, ZoomRange};
pub use transform::{apply_gesture_delta, GestureDelta, LayerTransform, Transform, Vector2};

#[cfg(feature = "runtime")]
pub use session::SessionController;
