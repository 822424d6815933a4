//! The page-fetch orchestrator and navigation state machine.
//!
//! [`DocumentViewer`] owns the session, the current-page artifact triple,
//! and the playback settings, and is the only writer of all three. User
//! intent (buttons, key bindings, a "go to page" box) arrives as calls to
//! the navigation methods; each validated transition runs one
//! [`load_page`](DocumentViewer::load_page).
//!
//! ## Load ordering contract
//!
//! Within one `load_page` the explanation and image fetches are siblings:
//! launched together, joined together, and neither failure cancels the
//! other. The audio fetch runs strictly *after* that join: narration is
//! synthesized from the finalized explanation text server-side, so starting
//! it earlier could narrate the wrong text. This ordering is a hard
//! contract, not an optimization.
//!
//! ## Overlapping loads
//!
//! Nothing stops a host from issuing a second `load_page` while the first is
//! in flight (rapid paging does exactly that). Each load captures a freshly
//! incremented generation; when it finishes it commits its results only if
//! no newer load has started since. A superseded load returns a report
//! marked `stale` and leaves the viewer state untouched; in-flight HTTP
//! requests are not aborted, their results are simply dropped.

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::gateway::BackendGateway;
use crate::observer::{NoopObserver, ObserverHandle};
use crate::report::{ArtifactOutcome, LoadMode, PageLoadReport};
use crate::resource::{PageContent, PlaybackSettings, ResourceHandle};
use crate::session::{Session, SessionId};
use rand::Rng;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Check whether an input string is an acceptable document URL.
///
/// This mirrors the validation the URL input form performs before calling
/// `/init/`: non-empty, recognised scheme. Anything else is rejected without
/// a network round trip.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

struct ViewerState {
    session: Option<Session>,
    content: PageContent,
    playback: PlaybackSettings,
    loading: bool,
    /// Incremented at the start of every load; a load commits only if it
    /// still holds the newest value when it finishes.
    generation: u64,
}

/// Session, pagination, and playback state plus the orchestration logic
/// that mutates it.
///
/// Methods take `&self`; the viewer is designed to sit behind an `Arc` and
/// be shared with UI tasks. Internal state lives behind a mutex that is
/// never held across an await point.
pub struct DocumentViewer {
    gateway: Arc<dyn BackendGateway>,
    observer: ObserverHandle,
    state: Mutex<ViewerState>,
    cache_capacity: Option<usize>,
}

impl DocumentViewer {
    /// Create a viewer over a gateway with a no-op observer.
    pub fn new(gateway: Arc<dyn BackendGateway>, config: &ViewerConfig) -> Self {
        Self::with_observer(gateway, config, Arc::new(NoopObserver))
    }

    /// Create a viewer that reports state changes to `observer`.
    pub fn with_observer(
        gateway: Arc<dyn BackendGateway>,
        config: &ViewerConfig,
        observer: ObserverHandle,
    ) -> Self {
        Self {
            gateway,
            observer,
            state: Mutex::new(ViewerState {
                session: None,
                content: PageContent::default(),
                playback: config.playback(),
                loading: false,
                generation: 0,
            }),
            cache_capacity: config.cache_capacity,
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewerState> {
        self.state.lock().unwrap()
    }

    // ── State accessors ──────────────────────────────────────────────────

    /// True once a session id has been obtained.
    pub fn is_initialized(&self) -> bool {
        self.state().session.is_some()
    }

    /// True while a page load is between its first network call and its
    /// commit.
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.state().session.as_ref().map(|s| s.id.clone())
    }

    /// Current page (1-indexed), if a session is active.
    pub fn current_page(&self) -> Option<u32> {
        self.state().session.as_ref().map(|s| s.current_page)
    }

    /// Total pages of the active document.
    pub fn page_count(&self) -> Option<u32> {
        self.state().session.as_ref().map(|s| s.page_count)
    }

    /// Snapshot of the current artifact triple.
    pub fn content(&self) -> PageContent {
        self.state().content.clone()
    }

    pub fn playback(&self) -> PlaybackSettings {
        self.state().playback
    }

    // ── Playback controls ────────────────────────────────────────────────

    /// Set narration volume (clamped into `[0, 1]`) and push the change to
    /// the observer so the attached output updates immediately.
    pub fn set_volume(&self, volume: f32) {
        let settings = {
            let mut state = self.state();
            state.playback.set_volume(volume);
            state.playback
        };
        self.observer.playback_changed(settings);
    }

    /// Toggle narration on or off, effective immediately.
    pub fn set_speaking(&self, speaking: bool) {
        let settings = {
            let mut state = self.state();
            state.playback.speaking = speaking;
            state.playback
        };
        self.observer.playback_changed(settings);
    }

    // ── Initialization ───────────────────────────────────────────────────

    /// Submit a document URL: open a session and load page 1.
    ///
    /// On success any previous session is replaced wholesale; its image
    /// cache and the handles it owned are dropped here. On failure the
    /// previous state is left exactly as it was (no partial session).
    pub async fn submit_url(&self, url: &str) -> Result<PageLoadReport, ViewerError> {
        if !is_url(url) {
            return Err(ViewerError::InvalidUrl {
                url: url.to_string(),
            });
        }

        let init = self
            .gateway
            .init(url)
            .await
            .map_err(|source| ViewerError::InitFailed { source })?;

        if init.page_num < 1 {
            return Err(ViewerError::EmptyDocument {
                page_count: init.page_num,
            });
        }

        info!(session = %init.request_id, pages = init.page_num, "session opened");
        {
            let mut state = self.state();
            // Dropping the old session releases its cache and handles.
            state.session = Some(Session::new(
                init.request_id,
                init.page_num,
                self.cache_capacity,
            ));
            state.content = PageContent::default();
        }

        self.load_page(1, LoadMode::Fetch).await
    }

    // ── Navigation ───────────────────────────────────────────────────────

    /// Go to a specific page.
    ///
    /// Returns `Ok(None)` without any network call when `page` equals the
    /// current page or is out of bounds; otherwise updates `current_page`
    /// and loads the page.
    pub async fn go_to(&self, page: u32) -> Result<Option<PageLoadReport>, ViewerError> {
        {
            let mut state = self.state();
            let session = state.session.as_mut().ok_or(ViewerError::NotInitialized)?;
            if page == session.current_page || !session.is_valid_page(page) {
                return Ok(None);
            }
            session.current_page = page;
        }
        self.load_page(page, LoadMode::Fetch).await.map(Some)
    }

    /// Go to the previous page; no-op on page 1.
    pub async fn previous(&self) -> Result<Option<PageLoadReport>, ViewerError> {
        let target = {
            let state = self.state();
            let session = state.session.as_ref().ok_or(ViewerError::NotInitialized)?;
            match session.current_page.checked_sub(1) {
                Some(p) if p >= 1 => p,
                _ => return Ok(None),
            }
        };
        self.go_to(target).await
    }

    /// Go to the next page; no-op on the last page.
    pub async fn next(&self) -> Result<Option<PageLoadReport>, ViewerError> {
        let target = {
            let state = self.state();
            let session = state.session.as_ref().ok_or(ViewerError::NotInitialized)?;
            session.current_page + 1
        };
        self.go_to(target).await
    }

    /// Jump to a uniformly random page in `[1, page_count]`.
    ///
    /// May land on the current page, in which case this is a no-op like any
    /// other same-page `go_to`.
    pub async fn random(&self) -> Result<Option<PageLoadReport>, ViewerError> {
        let target = {
            let state = self.state();
            let session = state.session.as_ref().ok_or(ViewerError::NotInitialized)?;
            rand::thread_rng().gen_range(1..=session.page_count)
        };
        self.go_to(target).await
    }

    /// Recompute the current page's explanation without changing pages.
    pub async fn regenerate(&self) -> Result<PageLoadReport, ViewerError> {
        let page = {
            let state = self.state();
            let session = state.session.as_ref().ok_or(ViewerError::NotInitialized)?;
            session.current_page
        };
        self.load_page(page, LoadMode::Regenerate).await
    }

    // ── Orchestration ────────────────────────────────────────────────────

    /// Load the artifact triple for one page.
    ///
    /// 1. flag loading, capture a fresh generation;
    /// 2. fetch explanation (per `mode`) and image (cache-checked)
    ///    concurrently, join both without short-circuit;
    /// 3. fetch audio after the join;
    /// 4. commit whatever succeeded, apply playback settings to new audio,
    ///    clear loading, unless a newer load has started, in which case
    ///    everything from this load is discarded.
    ///
    /// Navigation methods call this; it is public so hosts can re-load the
    /// current page explicitly.
    pub async fn load_page(
        &self,
        page: u32,
        mode: LoadMode,
    ) -> Result<PageLoadReport, ViewerError> {
        let (session_id, generation) = {
            let mut state = self.state();
            let session = state.session.as_ref().ok_or(ViewerError::NotInitialized)?;
            let id = session.id.clone();
            state.generation += 1;
            state.loading = true;
            (id, state.generation)
        };
        self.observer.loading_changed(true);
        debug!(session = %session_id, page, ?mode, generation, "page load started");

        // Siblings: explanation and image, joined without short-circuit.
        let explanation_fut = async {
            match mode {
                LoadMode::Regenerate => {
                    self.gateway
                        .regenerate_explanation(&session_id, page)
                        .await
                }
                LoadMode::Fetch => self.gateway.fetch_explanation(&session_id, page).await,
            }
        };
        let image_fut = async {
            if let Some(handle) = self.cached_image(&session_id, page) {
                return (Ok(handle), true);
            }
            match self.gateway.fetch_image(&session_id, page).await {
                Ok(handle) => {
                    self.cache_image(&session_id, page, handle.clone());
                    (Ok(handle), false)
                }
                Err(e) => (Err(e), false),
            }
        };
        let (explanation, (image, image_from_cache)) = futures::join!(explanation_fut, image_fut);

        // Audio strictly after the join, regardless of sibling outcomes.
        let audio = self.gateway.fetch_audio(&session_id, page).await;

        let mut report = PageLoadReport {
            page,
            mode,
            explanation: ArtifactOutcome::from_result(&explanation),
            image: ArtifactOutcome::from_result(&image),
            audio: ArtifactOutcome::from_result(&audio),
            image_from_cache,
            stale: false,
        };

        let attach = {
            let mut state = self.state();
            let still_current = state.generation == generation
                && state.session.as_ref().map(|s| &s.id) == Some(&session_id);
            if !still_current {
                None
            } else {
                if let Ok(text) = explanation {
                    state.content.explanation = text;
                }
                if let Ok(handle) = image {
                    state.content.image = Some(handle);
                }
                let attach = match audio {
                    Ok(handle) => {
                        state.content.audio = Some(handle.clone());
                        Some((handle, state.playback))
                    }
                    Err(_) => None,
                };
                state.loading = false;
                Some(attach)
            }
        };

        match attach {
            None => {
                // A newer load (or a new session) owns the state now.
                report.stale = true;
                report.explanation = ArtifactOutcome::Discarded;
                report.image = ArtifactOutcome::Discarded;
                report.audio = ArtifactOutcome::Discarded;
                debug!(page, generation, "page load superseded, results discarded");
            }
            Some(audio_attach) => {
                self.observer.loading_changed(false);
                if let Some((handle, settings)) = audio_attach {
                    // Settings are read under the same lock that committed the
                    // handle, so the sink never sees stale volume.
                    self.observer.audio_attached(&handle, settings);
                }
                if report.failed() {
                    // One diagnostic per load, not one per failed artifact.
                    warn!(page, ?mode, "page load incomplete: {}", report.summary());
                } else {
                    debug!(page, ?mode, cached = image_from_cache, "page load complete");
                }
            }
        }

        self.observer.page_loaded(&report);
        Ok(report)
    }

    // ── Cache access (lock-scoped helpers) ───────────────────────────────

    fn cached_image(&self, session_id: &SessionId, page: u32) -> Option<ResourceHandle> {
        let state = self.state();
        let session = state.session.as_ref()?;
        if &session.id != session_id {
            return None;
        }
        session.cache.get(session_id, page)
    }

    fn cache_image(&self, session_id: &SessionId, page: u32, handle: ResourceHandle) {
        let mut state = self.state();
        if let Some(session) = state.session.as_mut() {
            // A put from a load that outlived its session must not land in
            // the replacement session's cache.
            if &session.id == session_id {
                session.cache.put(session_id, page, handle);
            }
        }
    }
}
