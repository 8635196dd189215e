//! Owner of the live session state.
//!
//! The controller is the only writer. Each update computes the next
//! [`SessionState`] from the current one and swaps it in as a whole value
//! through a `watch` channel, so readers always observe a complete snapshot.
//! Cloning the controller hands out another reference to the same session.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::{SessionEvent, SessionState, SurfaceHandle, ZoomRange};
use crate::camera::{CameraControl, Permission, PermissionChecker};
use crate::config::OverlayConfig;
use crate::decode::DecodedImage;
use crate::transform::Transform;

struct Inner {
    state: watch::Sender<SessionState>,
    /// Transforms set outside the gesture stream (reset, new image).
    external_transform: watch::Sender<Transform>,
    camera: watch::Sender<Option<Arc<dyn CameraControl>>>,
}

/// Shared handle to one overlay session.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

impl SessionController {
    pub fn new(initial: SessionState) -> Self {
        let transform = initial.overlay.transform;
        Self {
            inner: Arc::new(Inner {
                state: watch::Sender::new(initial),
                external_transform: watch::Sender::new(transform),
                camera: watch::Sender::new(None),
            }),
        }
    }

    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(SessionState::from_config(config))
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified after every state update.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Receiver notified whenever the transform is replaced by something
    /// other than a gesture commit.
    pub fn external_transforms(&self) -> watch::Receiver<Transform> {
        self.inner.external_transform.subscribe()
    }

    /// Apply `event` and return the resulting state.
    pub fn dispatch(&self, event: SessionEvent) -> SessionState {
        let external = matches!(
            event,
            SessionEvent::ResetTransform | SessionEvent::SetImage(_)
        );

        let mut next = None;
        self.inner.state.send_modify(|state| {
            *state = state.apply(event);
            next = Some(state.clone());
        });
        let next = next.unwrap_or_else(|| self.snapshot());

        if external {
            self.inner
                .external_transform
                .send_replace(next.overlay.transform);
        }
        next
    }

    pub fn set_alpha(&self, alpha: f32) -> SessionState {
        self.dispatch(SessionEvent::SetAlpha(alpha))
    }

    /// Update the zoom and forward it to the bound camera, if any.
    pub fn set_zoom(&self, zoom: f32) -> SessionState {
        let next = self.dispatch(SessionEvent::SetZoom(zoom));
        self.forward_zoom(next.overlay.zoom);
        next
    }

    pub fn commit_transform(&self, transform: Transform) -> SessionState {
        debug!(
            x = transform.offset.x,
            y = transform.offset.y,
            scale = transform.scale,
            angle = transform.angle,
            "transform committed"
        );
        self.dispatch(SessionEvent::CommitTransform(transform))
    }

    pub fn reset_transform(&self) -> SessionState {
        self.dispatch(SessionEvent::ResetTransform)
    }

    pub fn set_permission_granted(&self, granted: bool) -> SessionState {
        self.dispatch(SessionEvent::SetPermissionGranted(granted))
    }

    pub fn set_image(&self, image: Arc<DecodedImage>) -> SessionState {
        self.dispatch(SessionEvent::SetImage(image))
    }

    /// Set `image` only if the session has no overlay yet. Returns whether
    /// it was applied. The check and the update happen in one swap.
    pub fn restore_image(&self, image: Arc<DecodedImage>) -> bool {
        let mut restored = None;
        self.inner.state.send_if_modified(|state| {
            if state.has_image() {
                return false;
            }
            *state = state.apply(SessionEvent::SetImage(image));
            restored = Some(state.overlay.transform);
            true
        });
        match restored {
            Some(transform) => {
                self.inner.external_transform.send_replace(transform);
                true
            }
            None => false,
        }
    }

    /// Apply the camera-reported zoom range and forward the clamped zoom.
    pub fn set_zoom_range(&self, range: ZoomRange) -> SessionState {
        let next = self.dispatch(SessionEvent::SetZoomRange(range));
        self.forward_zoom(next.overlay.zoom);
        next
    }

    pub fn set_surface(&self, surface: Option<SurfaceHandle>) -> SessionState {
        self.dispatch(SessionEvent::SetSurface(surface))
    }

    /// Re-check the camera permission and record the result.
    pub fn check_permission<C>(&self, checker: &C) -> bool
    where
        C: PermissionChecker + ?Sized,
    {
        let granted = checker.is_granted(Permission::Camera);
        self.set_permission_granted(granted);
        granted
    }

    /// Ask for the camera permission. The answer is picked up by the next
    /// [`check_permission`](Self::check_permission).
    pub fn request_permission<C>(&self, checker: &C)
    where
        C: PermissionChecker + ?Sized,
    {
        checker.request(Permission::Camera);
    }

    pub fn attach_camera(&self, camera: Arc<dyn CameraControl>) {
        self.inner.camera.send_replace(Some(camera));
    }

    pub fn detach_camera(&self) {
        self.inner.camera.send_replace(None);
    }

    /// Currently bound camera.
    pub fn camera(&self) -> Option<Arc<dyn CameraControl>> {
        self.inner.camera.borrow().clone()
    }

    fn forward_zoom(&self, zoom: f32) {
        let Some(camera) = self.camera() else {
            return;
        };
        if let Err(e) = camera.set_zoom_ratio(zoom) {
            warn!(error = %e, zoom, "camera rejected zoom ratio");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::camera::CameraError;
    use crate::transform::Vector2;

    struct RecordingCamera {
        requests: Mutex<Vec<f32>>,
        reject: bool,
    }

    impl CameraControl for RecordingCamera {
        fn zoom_range(&self) -> Option<ZoomRange> {
            None
        }

        fn set_zoom_ratio(&self, ratio: f32) -> Result<(), CameraError> {
            self.requests.lock().unwrap().push(ratio);
            if self.reject {
                Err(CameraError::ZoomRejected {
                    ratio,
                    reason: "busy".to_string(),
                })
            } else {
                Ok(())
            }
        }

        fn surface(&self) -> Option<SurfaceHandle> {
            None
        }
    }

    struct FakePermissions {
        granted: AtomicBool,
        requested: AtomicBool,
    }

    impl PermissionChecker for FakePermissions {
        fn is_granted(&self, _permission: Permission) -> bool {
            self.granted.load(Ordering::SeqCst)
        }

        fn request(&self, _permission: Permission) {
            self.requested.store(true, Ordering::SeqCst);
        }
    }

    fn camera(reject: bool) -> Arc<RecordingCamera> {
        Arc::new(RecordingCamera {
            requests: Mutex::new(Vec::new()),
            reject,
        })
    }

    #[test]
    fn test_updates_replace_snapshot() {
        let controller = SessionController::new(SessionState::default());
        let before = controller.snapshot();

        let after = controller.set_alpha(0.25);

        assert_eq!(before.overlay.alpha, 0.5);
        assert_eq!(after.overlay.alpha, 0.25);
        assert_eq!(controller.snapshot(), after);
    }

    #[test]
    fn test_subscribers_see_updates() {
        let controller = SessionController::new(SessionState::default());
        let mut rx = controller.subscribe();
        assert!(!rx.has_changed().unwrap());

        controller.set_permission_granted(true);

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().camera_permission_granted);
    }

    #[test]
    fn test_zoom_forwarded_to_camera() {
        let controller = SessionController::new(SessionState::default());
        // No camera yet: state still updates.
        assert_eq!(controller.set_zoom(1.5).overlay.zoom, 1.5);

        let cam = camera(false);
        controller.attach_camera(cam.clone());
        controller.set_zoom(5.0);

        // Forwarded value is the clamped one.
        assert_eq!(*cam.requests.lock().unwrap(), vec![2.0]);
    }

    #[test]
    fn test_rejected_zoom_still_updates_state() {
        let controller = SessionController::new(SessionState::default());
        let cam = camera(true);
        controller.attach_camera(cam.clone());

        let state = controller.set_zoom(1.25);

        assert_eq!(state.overlay.zoom, 1.25);
        assert_eq!(*cam.requests.lock().unwrap(), vec![1.25]);
    }

    #[test]
    fn test_detach_stops_forwarding() {
        let controller = SessionController::new(SessionState::default());
        let cam = camera(false);
        controller.attach_camera(cam.clone());
        controller.detach_camera();
        controller.set_zoom(1.5);
        assert!(cam.requests.lock().unwrap().is_empty());
        assert!(controller.camera().is_none());
    }

    #[test]
    fn test_reset_publishes_external_transform() {
        let controller = SessionController::new(SessionState::default());
        let mut external = controller.external_transforms();

        controller.commit_transform(Transform::new(Vector2::new(3.0, 4.0), 2.0, 5.0));
        assert!(!external.has_changed().unwrap());

        let state = controller.reset_transform();
        assert!(state.overlay.transform.is_identity());
        assert!(external.has_changed().unwrap());
        assert_eq!(*external.borrow_and_update(), Transform::IDENTITY);

        // A reset while already at identity still notifies.
        controller.reset_transform();
        assert!(external.has_changed().unwrap());
    }

    #[test]
    fn test_set_image_publishes_identity() {
        let controller = SessionController::new(SessionState::default());
        controller.commit_transform(Transform::new(Vector2::new(1.0, 1.0), 3.0, 0.0));
        let mut external = controller.external_transforms();

        let image = Arc::new(DecodedImage::new(1, 1, vec![0, 0, 0, 255]));
        let state = controller.set_image(image);

        assert!(state.has_image());
        assert!(state.overlay.transform.is_identity());
        assert!(external.has_changed().unwrap());
    }

    #[test]
    fn test_restore_image_only_fills_empty_overlay() {
        let controller = SessionController::new(SessionState::default());
        let mut updates = controller.subscribe();
        let mut external = controller.external_transforms();
        let cached = Arc::new(DecodedImage::new(1, 1, vec![1, 2, 3, 255]));
        let picked = Arc::new(DecodedImage::new(1, 1, vec![9, 9, 9, 255]));

        assert!(controller.restore_image(cached.clone()));
        assert!(updates.has_changed().unwrap());
        assert!(external.has_changed().unwrap());
        updates.borrow_and_update();
        external.borrow_and_update();

        controller.set_image(picked.clone());
        updates.borrow_and_update();
        external.borrow_and_update();

        assert!(!controller.restore_image(cached));
        assert!(!updates.has_changed().unwrap());
        assert!(!external.has_changed().unwrap());
        assert_eq!(controller.snapshot().overlay.image, Some(picked));
    }

    #[test]
    fn test_permission_check_and_request() {
        let controller = SessionController::new(SessionState::default());
        let permissions = FakePermissions {
            granted: AtomicBool::new(false),
            requested: AtomicBool::new(false),
        };

        assert!(!controller.check_permission(&permissions));
        assert!(!controller.snapshot().camera_permission_granted);

        controller.request_permission(&permissions);
        assert!(permissions.requested.load(Ordering::SeqCst));
        // Nothing changes until the next check.
        assert!(!controller.snapshot().camera_permission_granted);

        permissions.granted.store(true, Ordering::SeqCst);
        assert!(controller.check_permission(&permissions));
        assert!(controller.snapshot().camera_permission_granted);
    }

    #[test]
    fn test_from_config_uses_defaults() {
        let config = OverlayConfig {
            default_alpha: 0.3,
            ..OverlayConfig::default()
        };
        let controller = SessionController::from_config(&config);
        assert_eq!(controller.snapshot().overlay.alpha, 0.3);
    }
}
