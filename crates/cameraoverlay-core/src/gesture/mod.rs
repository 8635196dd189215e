//! Debounced commit of gesture-driven transforms.
//!
//! Gesture frames arrive at touch rate. Each frame updates a transient copy of
//! the transform for immediate rendering; the session only sees the result
//! once input has been quiet for [`DEFAULT_COMMIT_QUIESCENCE`].
//!
//! - [`GestureTracker`] is the synchronous state machine. The caller supplies
//!   timestamps, which keeps it usable from a browser event loop.
//! - `spawn_gesture_driver` (with the `runtime` feature) runs a tracker on a
//!   tokio task against a [`SessionController`](crate::session::SessionController).

#[cfg(feature = "runtime")]
mod driver;
mod tracker;

#[cfg(feature = "runtime")]
pub use driver::{spawn_gesture_driver, GestureHandle};
pub use tracker::{GestureTracker, DEFAULT_COMMIT_QUIESCENCE};
