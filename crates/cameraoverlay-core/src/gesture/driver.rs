//! Async driver that runs a [`GestureTracker`] against a session.
//!
//! Gesture frames arrive over a channel from the presentation layer. Each
//! frame updates the transient transform (published for rendering) and
//! restarts the commit timer; when the timer runs out the transform is
//! committed to the [`SessionController`]. Resets and new images reported by
//! the controller resynchronise the tracker and drop any pending commit.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::GestureTracker;
use crate::session::SessionController;
use crate::transform::{GestureDelta, Transform};

/// Presentation-side handle to a running gesture driver.
#[derive(Debug, Clone)]
pub struct GestureHandle {
    frames: mpsc::UnboundedSender<GestureDelta>,
    transient: watch::Receiver<Transform>,
}

impl GestureHandle {
    /// Forward one gesture frame. Returns `false` once the driver has stopped.
    pub fn send(&self, delta: GestureDelta) -> bool {
        self.frames.send(delta).is_ok()
    }

    /// Transform to render right now.
    pub fn transient(&self) -> Transform {
        *self.transient.borrow()
    }

    /// Receiver notified on every transient transform change.
    pub fn subscribe(&self) -> watch::Receiver<Transform> {
        self.transient.clone()
    }
}

/// Spawn a gesture driver for `controller`.
///
/// The driver stops when `cancel` fires or every [`GestureHandle`] is
/// dropped. A commit still pending at that point is discarded.
pub fn spawn_gesture_driver(
    controller: SessionController,
    quiescence: Duration,
    cancel: CancellationToken,
) -> (GestureHandle, JoinHandle<()>) {
    let external = controller.external_transforms();
    let initial = controller.snapshot().overlay.transform;
    let (frames_tx, frames_rx) = mpsc::unbounded_channel();
    let (transient_tx, transient_rx) = watch::channel(initial);

    let tracker = GestureTracker::new(initial, quiescence);
    let task = tokio::spawn(run(
        controller,
        tracker,
        external,
        frames_rx,
        transient_tx,
        cancel,
    ));

    let handle = GestureHandle {
        frames: frames_tx,
        transient: transient_rx,
    };
    (handle, task)
}

async fn run(
    controller: SessionController,
    mut tracker: GestureTracker,
    mut external: watch::Receiver<Transform>,
    mut frames: mpsc::UnboundedReceiver<GestureDelta>,
    transient: watch::Sender<Transform>,
    cancel: CancellationToken,
) {
    let epoch = Instant::now();

    loop {
        let deadline = tracker.deadline().map(|d| epoch + d);

        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,

            changed = external.changed() => {
                if changed.is_err() {
                    break;
                }
                let transform = *external.borrow_and_update();
                tracker.sync_external(transform);
                transient.send_replace(transform);
            }

            frame = frames.recv() => match frame {
                Some(delta) => {
                    let next = tracker.on_gesture(&delta, epoch.elapsed());
                    transient.send_replace(next);
                }
                None => break,
            },

            _ = sleep_until(deadline.unwrap_or(epoch)), if deadline.is_some() => {
                if let Some(transform) = tracker.poll(epoch.elapsed()) {
                    controller.commit_transform(transform);
                }
            }
        }
    }

    if tracker.is_pending() {
        debug!("gesture driver stopped with an uncommitted transform");
    }
}
