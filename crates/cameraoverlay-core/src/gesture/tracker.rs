//! Clock-agnostic debounce of gesture frames into committed transforms.

use std::time::Duration;

use crate::transform::{GestureDelta, Transform};

/// Quiescence interval after the last gesture frame before the transient
/// transform is committed.
pub const DEFAULT_COMMIT_QUIESCENCE: Duration = Duration::from_millis(300);

/// Tracks the transient transform of an in-flight gesture and decides when
/// it is committed.
///
/// Every gesture frame updates the transient copy immediately (for rendering)
/// and pushes the commit deadline out to `now + quiescence`. Time is supplied
/// by the caller as a [`Duration`] since any fixed epoch.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    committed: Transform,
    transient: Transform,
    deadline: Option<Duration>,
    quiescence: Duration,
}

impl GestureTracker {
    pub fn new(committed: Transform, quiescence: Duration) -> Self {
        Self {
            committed,
            transient: committed,
            deadline: None,
            quiescence,
        }
    }

    /// Transform to render right now.
    pub fn transient(&self) -> Transform {
        self.transient
    }

    /// Last transform handed out by [`poll`](Self::poll) or set externally.
    pub fn committed(&self) -> Transform {
        self.committed
    }

    /// Pending commit deadline, if a gesture frame is waiting for quiescence.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn quiescence(&self) -> Duration {
        self.quiescence
    }

    /// True when a commit is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Apply one gesture frame and restart the quiescence timer.
    pub fn on_gesture(&mut self, delta: &GestureDelta, now: Duration) -> Transform {
        self.transient = self.transient.apply(delta);
        self.deadline = Some(now.saturating_add(self.quiescence));
        self.transient
    }

    /// Resynchronise to a transform set outside the gesture stream (a reset
    /// or a freshly loaded image). Any pending commit is discarded.
    /// An invalid transform (see [`Transform::is_valid`]) is ignored.
    pub fn sync_external(&mut self, transform: Transform) {
        if !transform.is_valid() {
            tracing::warn!(scale = transform.scale, "ignoring invalid external transform");
            return;
        }
        if self.deadline.take().is_some() {
            tracing::debug!("pending transform commit discarded by external update");
        }
        self.committed = transform;
        self.transient = transform;
    }

    /// Commit the transient transform if the quiescence interval has passed.
    ///
    /// Returns the transform to commit, or `None` when nothing is due or the
    /// transient value equals the committed one.
    pub fn poll(&mut self, now: Duration) -> Option<Transform> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                if self.transient == self.committed {
                    return None;
                }
                self.committed = self.transient;
                Some(self.committed)
            }
            _ => None,
        }
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(Transform::IDENTITY, DEFAULT_COMMIT_QUIESCENCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Vector2;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn pan(dx: f32) -> GestureDelta {
        GestureDelta::pan(Vector2::new(100.0, 100.0), Vector2::new(dx, 0.0))
    }

    #[test]
    fn test_idle_tracker_never_commits() {
        let mut tracker = GestureTracker::default();
        assert!(!tracker.is_pending());
        assert_eq!(tracker.poll(ms(10_000)), None);
        assert_eq!(tracker.transient(), Transform::IDENTITY);
    }

    #[test]
    fn test_rapid_frames_commit_once() {
        let mut tracker = GestureTracker::default();
        let mut last = Transform::IDENTITY;
        for i in 0..20u64 {
            last = tracker.on_gesture(&pan(2.0), ms(i * 16));
            // Still inside the quiescence window of the latest frame.
            assert_eq!(tracker.poll(ms(i * 16 + 1)), None);
        }

        let last_frame = 19 * 16;
        assert_eq!(tracker.poll(ms(last_frame + 299)), None);
        assert_eq!(tracker.poll(ms(last_frame + 300)), Some(last));
        assert_eq!(tracker.poll(ms(last_frame + 1000)), None);
        assert_eq!(tracker.committed(), last);
    }

    #[test]
    fn test_transient_updates_every_frame() {
        let mut tracker = GestureTracker::default();
        let first = tracker.on_gesture(&pan(10.0), ms(0));
        let second = tracker.on_gesture(&pan(10.0), ms(16));
        assert_ne!(first, second);
        assert_eq!(tracker.transient(), second);
        assert_eq!(tracker.committed(), Transform::IDENTITY);
    }

    #[test]
    fn test_each_frame_pushes_deadline() {
        let mut tracker = GestureTracker::default();
        tracker.on_gesture(&pan(1.0), ms(0));
        assert_eq!(tracker.deadline(), Some(ms(300)));
        tracker.on_gesture(&pan(1.0), ms(250));
        assert_eq!(tracker.deadline(), Some(ms(550)));
        assert_eq!(tracker.poll(ms(300)), None);
        assert!(tracker.poll(ms(550)).is_some());
    }

    #[test]
    fn test_external_reset_discards_pending_commit() {
        let mut tracker = GestureTracker::default();
        tracker.on_gesture(&pan(25.0), ms(0));
        tracker.on_gesture(&pan(25.0), ms(16));

        tracker.sync_external(Transform::IDENTITY);

        assert!(!tracker.is_pending());
        assert_eq!(tracker.transient(), Transform::IDENTITY);
        assert_eq!(tracker.poll(ms(1000)), None);
    }

    #[test]
    fn test_external_value_becomes_baseline() {
        let mut tracker = GestureTracker::default();
        let external = Transform::new(Vector2::new(5.0, 5.0), 2.0, 45.0);
        tracker.sync_external(external);
        assert_eq!(tracker.committed(), external);

        let next = tracker.on_gesture(&pan(4.0), ms(0));
        assert_eq!(next, external.apply(&pan(4.0)));
    }

    #[test]
    fn test_gesture_returning_to_committed_value_skips_commit() {
        let mut tracker = GestureTracker::default();
        tracker.on_gesture(&GestureDelta::rotate(Vector2::ZERO, 0.0), ms(0));
        assert_eq!(tracker.poll(ms(300)), None);
        assert!(!tracker.is_pending());
    }

    #[test]
    fn test_invalid_external_transform_is_ignored() {
        let mut tracker = GestureTracker::default();
        let moved = tracker.on_gesture(&pan(6.0), ms(0));

        tracker.sync_external(Transform::new(Vector2::ZERO, 0.0, 0.0));

        assert!(tracker.is_pending());
        assert_eq!(tracker.transient(), moved);
        assert_eq!(tracker.poll(ms(300)), Some(moved));
    }

    #[test]
    fn test_non_finite_frame_does_not_poison_transform() {
        let mut tracker = GestureTracker::default();
        let centroid = Vector2::new(100.0, 100.0);

        tracker.on_gesture(&GestureDelta::rotate(centroid, f32::NAN), ms(0));
        assert_eq!(tracker.poll(ms(300)), None);

        let next = tracker.on_gesture(&pan(5.0), ms(400));
        assert!(next.is_valid());
        assert_eq!(tracker.poll(ms(700)), Some(next));
    }

    #[test]
    fn test_deadline_saturates_at_end_of_clock() {
        let mut tracker = GestureTracker::default();
        tracker.on_gesture(&pan(1.0), Duration::MAX - ms(1));
        assert_eq!(tracker.deadline(), Some(Duration::MAX));
        assert!(tracker.poll(Duration::MAX).is_some());
    }

    #[test]
    fn test_custom_quiescence() {
        let mut tracker = GestureTracker::new(Transform::IDENTITY, ms(50));
        tracker.on_gesture(&pan(3.0), ms(0));
        assert_eq!(tracker.quiescence(), ms(50));
        assert!(tracker.poll(ms(50)).is_some());
    }
}
