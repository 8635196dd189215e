//! Session configuration.
//!
//! Configuration is plain JSON. Every field is optional; missing fields take
//! the defaults below.
//!
//! ```json
//! {
//!   "cache_dir": "/data/user/0/eu.heha.cameraoverlay/files",
//!   "commit_quiescence_ms": 300,
//!   "default_alpha": 0.5,
//!   "default_zoom_range": { "min": 1.0, "max": 2.0 },
//!   "max_image_edge": 4096
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::ZoomRange;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for [`OverlayConfig`].
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value outside its allowed range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Tunables for an overlay session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Directory holding the cached overlay image.
    pub cache_dir: PathBuf,
    /// Quiet period after the last gesture frame before a transform commits.
    pub commit_quiescence_ms: u64,
    /// Initial overlay opacity.
    pub default_alpha: f32,
    /// Zoom range assumed until the camera reports its own.
    pub default_zoom_range: ZoomRange,
    /// Downscale picked images so their longest edge fits. `None` keeps the
    /// original resolution.
    pub max_image_edge: Option<u32>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            cache_dir: std::env::temp_dir().join("cameraoverlay"),
            commit_quiescence_ms: 300,
            default_alpha: 0.5,
            default_zoom_range: ZoomRange::default(),
            max_image_edge: None,
        }
    }
}

impl OverlayConfig {
    /// Parse and validate configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: OverlayConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), "loaded overlay config");
        Ok(config)
    }

    /// Check that every field is within its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.default_alpha) {
            return Err(ConfigError::InvalidValue {
                field: "default_alpha",
                reason: format!("{} is outside 0.0..=1.0", self.default_alpha),
            });
        }
        let range = self.default_zoom_range;
        if !range.is_valid() || range.min <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "default_zoom_range",
                reason: format!("{}..{} is not a positive ordered range", range.min, range.max),
            });
        }
        if self.max_image_edge == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_image_edge",
                reason: "must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn commit_quiescence(&self) -> Duration {
        Duration::from_millis(self.commit_quiescence_ms)
    }
}
