//! Observer trait for viewer state changes.
//!
//! Inject an [`Arc<dyn ViewerObserver>`] via
//! [`crate::viewer::DocumentViewer::with_observer`] to receive events as the
//! orchestrator works: the loading flag flipping, a page load completing,
//! a fresh narration clip becoming available, playback settings changing.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: a host can
//! forward events to an audio device, a websocket, a terminal spinner, or a
//! test recorder, without the library knowing anything about how the host
//! renders or plays. The trait is `Send + Sync` so observers work when the
//! viewer is shared across tasks.
//!
//! The `audio_attached` event is the seam the playback contract hangs on:
//! it fires synchronously when a narration fetch succeeds and always carries
//! the playback settings read at that instant, so the sink never starts a
//! clip with stale volume or a stale speaking toggle.

use crate::report::PageLoadReport;
use crate::resource::ResourceHandle;
use std::sync::Arc;

/// Called by the viewer as session and page state changes.
///
/// All methods have default no-op implementations so hosts only override
/// what they care about.
pub trait ViewerObserver: Send + Sync {
    /// The loading flag changed. Fired before the first network call of a
    /// page load and after the load commits.
    fn loading_changed(&self, loading: bool) {
        let _ = loading;
    }

    /// A page load finished (successfully, partially, or discarded as
    /// stale). Fired once per `load_page` call.
    fn page_loaded(&self, report: &PageLoadReport) {
        let _ = report;
    }

    /// A fresh narration clip is available. `settings` are the playback
    /// settings in force at the moment the clip was produced; apply them
    /// before starting playback.
    fn audio_attached(&self, handle: &ResourceHandle, settings: crate::PlaybackSettings) {
        let _ = (handle, settings);
    }

    /// Playback settings changed via a user control. Mutate the currently
    /// attached audio output immediately.
    fn playback_changed(&self, settings: crate::PlaybackSettings) {
        let _ = settings;
    }
}

/// A no-op implementation for hosts that don't need events.
///
/// This is the default when no observer is configured.
pub struct NoopObserver;

impl ViewerObserver for NoopObserver {}

/// Convenience alias matching the type the viewer stores.
pub type ObserverHandle = Arc<dyn ViewerObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        loads: AtomicUsize,
    }

    impl ViewerObserver for Counting {
        fn page_loaded(&self, _report: &PageLoadReport) {
            self.loads.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_observer_is_object_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NoopObserver>();

        let obs: ObserverHandle = Arc::new(NoopObserver);
        obs.loading_changed(true);
        obs.playback_changed(crate::PlaybackSettings::default());
    }

    #[test]
    fn default_methods_are_overridable_per_event() {
        let obs = Counting {
            loads: AtomicUsize::new(0),
        };
        // Only page_loaded is overridden; the rest stay no-ops.
        obs.loading_changed(true);
        assert_eq!(obs.loads.load(Ordering::SeqCst), 0);
    }
}
