//! Overlay session state.
//!
//! [`SessionState`] is an immutable snapshot; [`SessionState::apply`] is the
//! one place that turns an event into the next snapshot. With the `runtime`
//! feature, [`SessionController`] owns the live snapshot, forwards zoom to
//! the camera, and runs image loading and saving in the background.

#[cfg(feature = "runtime")]
mod controller;
#[cfg(feature = "runtime")]
mod images;
mod state;

#[cfg(feature = "runtime")]
pub use controller::SessionController;
#[cfg(feature = "runtime")]
pub use images::{pick_image, spawn_startup_load, ImageTaskError};
pub use state::{OverlayState, SessionEvent, SessionState, SurfaceHandle, ZoomRange};
