//! Lifetime of one camera binding.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{CameraError, CameraProvider, CameraSelector};
use crate::session::SessionController;

/// Bind a camera and keep it bound until `cancel` fires.
///
/// On success the camera is attached to `controller`, its preview surface is
/// published, and its zoom range is applied once (clamping the current zoom,
/// which is then forwarded to the hardware). When `cancel` fires the camera
/// is detached, the surface cleared and every binding released.
///
/// A bind failure is logged and returned; the session state is left as it
/// was and the provider is asked to release anything half-bound. The caller
/// may try again on its next lifecycle start.
pub async fn run_camera_binding<P>(
    provider: &P,
    controller: &SessionController,
    selector: CameraSelector,
    cancel: CancellationToken,
) -> Result<(), CameraError>
where
    P: CameraProvider + ?Sized,
{
    let camera = tokio::select! {
        _ = cancel.cancelled() => {
            debug!(?selector, "camera binding cancelled before bind completed");
            provider.unbind_all();
            return Ok(());
        }
        bound = provider.bind(selector) => match bound {
            Ok(camera) => camera,
            Err(e @ CameraError::Unavailable(_)) => {
                warn!(?selector, "no camera available");
                provider.unbind_all();
                return Err(e);
            }
            Err(e) => {
                error!(error = %e, ?selector, "camera bind failed");
                provider.unbind_all();
                return Err(e);
            }
        },
    };

    controller.attach_camera(camera.clone());
    if let Some(surface) = camera.surface() {
        controller.set_surface(Some(surface));
    }
    match camera.zoom_range() {
        Some(range) => {
            let state = controller.set_zoom_range(range);
            info!(
                ?selector,
                min = range.min,
                max = range.max,
                zoom = state.overlay.zoom,
                "camera bound"
            );
        }
        None => info!(?selector, "camera bound without zoom range"),
    }

    cancel.cancelled().await;

    controller.detach_camera();
    controller.set_surface(None);
    provider.unbind_all();
    debug!(?selector, "camera unbound");
    Ok(())
}
