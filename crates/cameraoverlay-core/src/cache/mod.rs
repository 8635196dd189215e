//! Single-file cache for the overlay image.
//!
//! The last picked overlay is kept as one PNG file in the cache directory and
//! reloaded at startup. A new pick replaces the file wholesale: the image is
//! written to a scratch file first and then renamed over the cache file, so a
//! crash mid-write never leaves a half-written `image.png` behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::OverlayConfig;
use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::encode::{encode_image_png, EncodeError};

/// File name of the cached overlay image.
pub const CACHE_FILE_NAME: &str = "image.png";

/// Scratch file the image is encoded into before replacing the cache file.
pub const SCRATCH_FILE_NAME: &str = "cachedImage.png";

/// Errors from reading or writing the image cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No image has been cached yet.
    #[error("No cached image at {0}")]
    Missing(PathBuf),

    /// Reading or writing the cache file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cached file is not a decodable image.
    #[error("Cached image is unreadable: {0}")]
    Decode(#[from] DecodeError),

    /// The image could not be encoded for caching.
    #[error("Failed to encode image for cache: {0}")]
    Encode(#[from] EncodeError),
}

impl CacheError {
    fn io(path: &Path, source: io::Error) -> Self {
        CacheError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Location of the cached overlay image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCache {
    dir: PathBuf,
}

impl ImageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(config.cache_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cached image file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(CACHE_FILE_NAME)
    }

    fn scratch_path(&self) -> PathBuf {
        self.dir.join(SCRATCH_FILE_NAME)
    }

    /// Read and decode the cached image.
    ///
    /// # Errors
    ///
    /// `CacheError::Missing` when nothing is cached, `CacheError::Io` when
    /// the file cannot be read and `CacheError::Decode` when it is corrupt.
    pub fn load(&self) -> Result<DecodedImage, CacheError> {
        let path = self.path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CacheError::Missing(path));
            }
            Err(e) => return Err(CacheError::io(&path, e)),
        };
        let image = decode_image(&bytes)?;
        tracing::debug!(
            path = %path.display(),
            width = image.width,
            height = image.height,
            "loaded cached overlay image"
        );
        Ok(image)
    }

    /// Encode `image` as PNG and replace the cached file with it.
    pub fn store(&self, image: &DecodedImage) -> Result<(), CacheError> {
        let png = encode_image_png(image)?;

        fs::create_dir_all(&self.dir).map_err(|e| CacheError::io(&self.dir, e))?;

        let scratch = self.scratch_path();
        fs::write(&scratch, &png).map_err(|e| CacheError::io(&scratch, e))?;

        let path = self.path();
        fs::rename(&scratch, &path).map_err(|e| CacheError::io(&path, e))?;

        tracing::debug!(path = %path.display(), bytes = png.len(), "cached overlay image");
        Ok(())
    }
}
