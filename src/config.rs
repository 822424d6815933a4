//! Configuration for the document viewer.
//!
//! All viewer behaviour is controlled through [`ViewerConfig`], built via its
//! [`ViewerConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to construct a gateway and a viewer from the same source and to diff two
//! runs to understand why their behaviour differs.

use crate::error::ViewerError;
use crate::resource::PlaybackSettings;
use serde::Serialize;

/// Configuration for a [`crate::viewer::DocumentViewer`] and its
/// [`crate::gateway::HttpGateway`].
///
/// # Example
/// ```rust
/// use pagecast::ViewerConfig;
///
/// let config = ViewerConfig::builder()
///     .base_url("http://localhost:8000")
///     .volume(0.7)
///     .cache_capacity(64)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ViewerConfig {
    /// Base URL of the backend exposing `/init/`, `/explain/`, `/image/`,
    /// `/audio/`, and `/regenerate/`. Default: `http://localhost:8000`.
    pub base_url: String,

    /// Optional per-request HTTP timeout in seconds. Default: `None`.
    ///
    /// With `None`, a hung backend call keeps the loading state pending
    /// indefinitely. Set a value when the host would rather surface a
    /// network error than wait forever.
    pub request_timeout_secs: Option<u64>,

    /// Initial narration volume in `[0.0, 1.0]`. Default: 0.5.
    pub volume: f32,

    /// Whether narration starts enabled. Default: true.
    pub speaking: bool,

    /// Image-cache capacity in entries; `None` means unbounded. Default:
    /// `None`.
    ///
    /// Within one session the cache is append-only; a bound only matters for
    /// very long sessions over very large documents.
    pub cache_capacity: Option<usize>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: None,
            volume: 0.5,
            speaking: true,
            cache_capacity: None,
        }
    }
}

impl ViewerConfig {
    /// Create a new builder for `ViewerConfig`.
    pub fn builder() -> ViewerConfigBuilder {
        ViewerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Initial playback settings derived from the config.
    pub fn playback(&self) -> PlaybackSettings {
        PlaybackSettings {
            volume: self.volume,
            speaking: self.speaking,
        }
    }
}

/// Builder for [`ViewerConfig`].
#[derive(Debug)]
pub struct ViewerConfigBuilder {
    config: ViewerConfig,
}

impl ViewerConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.config.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn speaking(mut self, speaking: bool) -> Self {
        self.config.speaking = speaking;
        self
    }

    pub fn cache_capacity(mut self, entries: usize) -> Self {
        self.config.cache_capacity = Some(entries.max(1));
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ViewerConfig, ViewerError> {
        let c = &self.config;
        if !(c.base_url.starts_with("http://") || c.base_url.starts_with("https://")) {
            return Err(ViewerError::InvalidConfig(format!(
                "base_url must start with http:// or https://, got '{}'",
                c.base_url
            )));
        }
        if !(0.0..=1.0).contains(&c.volume) {
            return Err(ViewerError::InvalidConfig(format!(
                "volume must be within [0, 1], got {}",
                c.volume
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let c = ViewerConfig::default();
        assert_eq!(c.base_url, "http://localhost:8000");
        assert_eq!(c.volume, 0.5);
        assert!(c.speaking);
        assert!(c.request_timeout_secs.is_none());
        assert!(c.cache_capacity.is_none());
    }

    #[test]
    fn builder_clamps_volume() {
        let c = ViewerConfig::builder().volume(3.0).build().unwrap();
        assert_eq!(c.volume, 1.0);
    }

    #[test]
    fn build_rejects_non_http_base_url() {
        let err = ViewerConfig::builder()
            .base_url("file:///tmp/backend")
            .build()
            .unwrap_err();
        assert!(matches!(err, ViewerError::InvalidConfig(_)));
    }

    #[test]
    fn playback_reflects_config() {
        let c = ViewerConfig::builder()
            .volume(0.25)
            .speaking(false)
            .build()
            .unwrap();
        let p = c.playback();
        assert_eq!(p.volume, 0.25);
        assert!(!p.speaking);
    }

    #[test]
    fn cache_capacity_floor_is_one() {
        let c = ViewerConfig::builder().cache_capacity(0).build().unwrap();
        assert_eq!(c.cache_capacity, Some(1));
    }
}
