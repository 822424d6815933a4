//! Resource handles and the per-page artifact triple.
//!
//! Binary responses (page images, narration audio) are wrapped in a
//! [`ResourceHandle`]: a reference-counted, immutable byte buffer that the
//! presentation layer can display or play without re-fetching. Ownership is
//! scoped: the image cache and the current [`PageContent`] hold the
//! references, and dropping the last one releases the bytes. There is no
//! explicit free call anywhere.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A locally addressable reference to a fetched binary artifact.
///
/// Cloning is cheap (one atomic increment); the payload is shared and
/// immutable. The handle carries the content type reported by the backend so
/// callers can pick a file extension or media element without sniffing.
#[derive(Clone)]
pub struct ResourceHandle {
    inner: Arc<ResourceInner>,
}

struct ResourceInner {
    data: Vec<u8>,
    content_type: String,
}

impl ResourceHandle {
    /// Wrap raw response bytes in a shared handle.
    pub fn new(data: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ResourceInner {
                data,
                content_type: content_type.into(),
            }),
        }
    }

    /// The raw artifact bytes.
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// MIME type reported by the backend (e.g. `image/png`, `audio/wav`).
    pub fn content_type(&self) -> &str {
        &self.inner.content_type
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.inner.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.data.is_empty()
    }

    /// True when both handles reference the same underlying buffer.
    pub fn shares_buffer_with(&self, other: &ResourceHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("content_type", &self.inner.content_type)
            .field("len", &self.inner.data.len())
            .finish()
    }
}

/// The artifact triple for the page currently on display.
///
/// Not a persisted entity: this is the "current page" projection,
/// overwritten field-by-field on every load. A fetch failure for one artifact
/// leaves that field at its previous value while the others update; there is
/// no rollback and no merge.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Explanatory text for the page. Empty until the first successful fetch.
    pub explanation: String,

    /// Rendered page image, if any fetch has succeeded so far.
    pub image: Option<ResourceHandle>,

    /// Narration clip, if any fetch has succeeded so far.
    pub audio: Option<ResourceHandle>,
}

/// Playback settings applied to every narration clip.
///
/// Process-wide, not per-page: a change takes effect on the currently
/// attached audio output immediately and is re-applied each time a new audio
/// handle is produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackSettings {
    /// Output volume in `[0.0, 1.0]`.
    pub volume: f32,

    /// Whether narration should be playing at all.
    pub speaking: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 0.5,
            speaking: true,
        }
    }
}

impl PlaybackSettings {
    /// Set the volume, clamped into `[0.0, 1.0]`.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_buffer() {
        let a = ResourceHandle::new(vec![1, 2, 3], "image/png");
        let b = a.clone();
        assert!(a.shares_buffer_with(&b));
        assert_eq!(b.data(), &[1, 2, 3]);
        assert_eq!(b.content_type(), "image/png");
    }

    #[test]
    fn debug_omits_payload_bytes() {
        let h = ResourceHandle::new(vec![0u8; 4096], "audio/wav");
        let dbg = format!("{h:?}");
        assert!(dbg.contains("4096"));
        assert!(dbg.contains("audio/wav"));
        assert!(dbg.len() < 200, "debug output should not dump the payload");
    }

    #[test]
    fn volume_is_clamped() {
        let mut s = PlaybackSettings::default();
        s.set_volume(1.7);
        assert_eq!(s.volume, 1.0);
        s.set_volume(-0.2);
        assert_eq!(s.volume, 0.0);
    }

    #[test]
    fn page_content_starts_empty() {
        let c = PageContent::default();
        assert!(c.explanation.is_empty());
        assert!(c.image.is_none());
        assert!(c.audio.is_none());
    }
}
