//! Background loading and saving of the overlay image.
//!
//! Decoding and PNG encoding are CPU bound and run on tokio's blocking pool.
//! Results are posted back to the controller as one whole-state update.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use super::SessionController;
use crate::cache::{CacheError, ImageCache};
use crate::decode::{decode_image, resize_to_fit, DecodeError, DecodedImage, FilterType};

/// Errors from picking a new overlay image.
#[derive(Debug, Error)]
pub enum ImageTaskError {
    /// The picked bytes could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The decoding worker panicked or was cancelled.
    #[error("Image worker failed: {0}")]
    Worker(#[from] JoinError),
}

/// Load the cached overlay image in the background.
///
/// On success the image becomes the overlay, unless an image was picked
/// while the cache was loading; a picked image always wins. A missing or
/// unreadable cache is logged and otherwise ignored: no state field changes.
/// The handle resolves to whether an image was applied.
pub fn spawn_startup_load(controller: SessionController, cache: ImageCache) -> JoinHandle<bool> {
    tokio::spawn(async move {
        let path = cache.path();
        match tokio::task::spawn_blocking(move || cache.load()).await {
            Ok(Ok(image)) => {
                let (width, height) = (image.width, image.height);
                if controller.restore_image(Arc::new(image)) {
                    info!(path = %path.display(), width, height, "restored cached overlay image");
                    true
                } else {
                    debug!(path = %path.display(), "overlay already picked; cached image skipped");
                    false
                }
            }
            Ok(Err(CacheError::Missing(_))) => {
                debug!(path = %path.display(), "no cached overlay image");
                false
            }
            Ok(Err(e)) => {
                warn!(error = %e, path = %path.display(), "unable to load cached overlay image");
                false
            }
            Err(e) => {
                warn!(error = %e, "cached image loader failed");
                false
            }
        }
    })
}

/// Decode a freshly picked image, make it the overlay, and cache it.
///
/// The overlay is replaced as soon as decoding succeeds; the PNG re-encode
/// and file write happen afterwards on a fire-and-forget task whose handle
/// is returned. Write failures are logged only.
///
/// # Errors
///
/// Decode failures are logged and returned; the session state is left
/// untouched.
pub async fn pick_image(
    controller: &SessionController,
    cache: &ImageCache,
    bytes: Vec<u8>,
    max_edge: Option<u32>,
) -> Result<JoinHandle<()>, ImageTaskError> {
    let decoded = tokio::task::spawn_blocking(move || prepare_overlay(&bytes, max_edge)).await;
    let image = match decoded {
        Ok(Ok(image)) => Arc::new(image),
        Ok(Err(e)) => {
            warn!(error = %e, "unable to decode picked image");
            return Err(e.into());
        }
        Err(e) => {
            warn!(error = %e, "picked image decoder failed");
            return Err(e.into());
        }
    };

    controller.set_image(image.clone());

    let cache = cache.clone();
    Ok(tokio::spawn(async move {
        let path = cache.path();
        match tokio::task::spawn_blocking(move || cache.store(&image)).await {
            Ok(Ok(())) => debug!(path = %path.display(), "picked image cached"),
            Ok(Err(e)) => warn!(error = %e, path = %path.display(), "unable to cache picked image"),
            Err(e) => warn!(error = %e, "image cache writer failed"),
        }
    }))
}

fn prepare_overlay(bytes: &[u8], max_edge: Option<u32>) -> Result<DecodedImage, DecodeError> {
    let image = decode_image(bytes)?;
    match max_edge {
        Some(edge) => resize_to_fit(&image, edge, FilterType::Lanczos3),
        None => Ok(image),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_support::scratch_dir;
    use crate::encode::encode_image_png;
    use crate::session::SessionState;
    use crate::transform::{Transform, Vector2};

    fn sample_image(width: u32, height: u32) -> DecodedImage {
        let pixels = (0..(width * height * 4)).map(|i| (i % 251) as u8).collect();
        DecodedImage::new(width, height, pixels)
    }

    fn moved_controller() -> SessionController {
        let controller = SessionController::new(SessionState::default());
        controller.set_alpha(0.7);
        controller.commit_transform(Transform::new(Vector2::new(9.0, 9.0), 1.5, 12.0));
        controller
    }

    #[tokio::test]
    async fn test_startup_load_restores_image() {
        let cache = ImageCache::new(scratch_dir("startup"));
        let image = sample_image(5, 3);
        cache.store(&image).unwrap();

        let controller = SessionController::new(SessionState::default());
        let applied = spawn_startup_load(controller.clone(), cache).await.unwrap();

        assert!(applied);
        let state = controller.snapshot();
        assert_eq!(state.overlay.image.as_deref(), Some(&image));
    }

    #[tokio::test]
    async fn test_startup_load_missing_changes_nothing() {
        let controller = moved_controller();
        let before = controller.snapshot();

        let cache = ImageCache::new(scratch_dir("startup-missing"));
        let applied = spawn_startup_load(controller.clone(), cache).await.unwrap();

        assert!(!applied);
        assert_eq!(controller.snapshot(), before);
    }

    #[tokio::test]
    async fn test_startup_load_corrupt_changes_nothing() {
        let dir = scratch_dir("startup-corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(crate::cache::CACHE_FILE_NAME), b"\x89PNG garbage").unwrap();

        let controller = moved_controller();
        let before = controller.snapshot();

        let applied = spawn_startup_load(controller.clone(), ImageCache::new(dir))
            .await
            .unwrap();

        assert!(!applied);
        assert_eq!(controller.snapshot(), before);
    }

    #[tokio::test]
    async fn test_startup_load_never_replaces_picked_image() {
        let cache = ImageCache::new(scratch_dir("startup-after-pick"));
        cache.store(&sample_image(4, 4)).unwrap();

        let controller = SessionController::new(SessionState::default());
        let picked = Arc::new(sample_image(3, 2));
        controller.set_image(picked.clone());
        let before = controller.snapshot();

        let applied = spawn_startup_load(controller.clone(), cache).await.unwrap();

        assert!(!applied);
        assert_eq!(controller.snapshot(), before);
        assert_eq!(controller.snapshot().overlay.image, Some(picked));
    }

    #[tokio::test]
    async fn test_pick_image_replaces_overlay_and_caches() {
        let cache = ImageCache::new(scratch_dir("pick"));
        let image = sample_image(8, 6);
        let bytes = encode_image_png(&image).unwrap();

        let controller = moved_controller();
        let save = pick_image(&controller, &cache, bytes, None).await.unwrap();

        let state = controller.snapshot();
        assert_eq!(state.overlay.image.as_deref(), Some(&image));
        assert!(state.overlay.transform.is_identity());
        assert_eq!(state.overlay.alpha, 0.7);

        save.await.unwrap();
        assert_eq!(cache.load().unwrap(), image);
    }

    #[tokio::test]
    async fn test_pick_image_downscales() {
        let cache = ImageCache::new(scratch_dir("pick-downscale"));
        let bytes = encode_image_png(&sample_image(64, 32)).unwrap();

        let controller = SessionController::new(SessionState::default());
        let save = pick_image(&controller, &cache, bytes, Some(16)).await.unwrap();
        save.await.unwrap();

        let state = controller.snapshot();
        let overlay = state.overlay.image.unwrap();
        assert_eq!((overlay.width, overlay.height), (16, 8));
        assert_eq!(cache.load().unwrap().width, 16);
    }

    #[tokio::test]
    async fn test_pick_invalid_image_keeps_previous() {
        let cache = ImageCache::new(scratch_dir("pick-invalid"));
        let controller = moved_controller();
        let previous = Arc::new(sample_image(2, 2));
        controller.set_image(previous.clone());
        let before = controller.snapshot();

        let result = pick_image(&controller, &cache, b"nope".to_vec(), None).await;

        assert!(matches!(result, Err(ImageTaskError::Decode(_))));
        assert_eq!(controller.snapshot(), before);
        assert!(!cache.path().exists());
    }
}
