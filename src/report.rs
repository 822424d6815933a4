//! Structured outcome of one page load.
//!
//! The orchestrator never aborts a page load because one artifact failed.
//! Instead it records, per artifact, whether the state was updated or which
//! [`FetchError`] occurred, and hands the whole picture back as a
//! [`PageLoadReport`]. Hosts that want an error banner richer than "something
//! went wrong" can serialise the report as-is.

use crate::error::FetchError;
use serde::Serialize;

/// How the explanation for a page should be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Normal paging: the backend may serve a previously generated
    /// explanation.
    Fetch,
    /// Force the backend to recompute the explanation instead of reusing any
    /// server-side cache.
    Regenerate,
}

/// Outcome of one artifact within a page load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ArtifactOutcome {
    /// The viewer state was updated with a fresh value.
    Updated,
    /// The fetch failed; the previous value (if any) was kept.
    Failed { error: FetchError },
    /// The load was superseded before its results could be committed.
    Discarded,
}

impl ArtifactOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ArtifactOutcome::Failed { .. })
    }

    pub(crate) fn from_result<T>(result: &Result<T, FetchError>) -> Self {
        match result {
            Ok(_) => ArtifactOutcome::Updated,
            Err(e) => ArtifactOutcome::Failed { error: e.clone() },
        }
    }
}

/// Aggregated result of one `load_page` invocation.
#[derive(Debug, Clone, Serialize)]
pub struct PageLoadReport {
    /// 1-indexed page that was loaded.
    pub page: u32,
    pub mode: LoadMode,
    pub explanation: ArtifactOutcome,
    pub image: ArtifactOutcome,
    pub audio: ArtifactOutcome,
    /// True when the image came from the session cache (no network call).
    pub image_from_cache: bool,
    /// True when a newer load started before this one finished; its results
    /// were discarded and the viewer state is untouched.
    pub stale: bool,
}

impl PageLoadReport {
    /// True when at least one artifact fetch failed.
    pub fn failed(&self) -> bool {
        self.explanation.is_failure() || self.image.is_failure() || self.audio.is_failure()
    }

    /// One-line summary for the single diagnostic emitted per load.
    pub fn summary(&self) -> String {
        let label = |o: &ArtifactOutcome| match o {
            ArtifactOutcome::Updated => "ok".to_string(),
            ArtifactOutcome::Failed { error } => error.to_string(),
            ArtifactOutcome::Discarded => "discarded".to_string(),
        };
        format!(
            "explanation: {}; image: {}{}; audio: {}",
            label(&self.explanation),
            label(&self.image),
            if self.image_from_cache { " (cached)" } else { "" },
            label(&self.audio),
        )
    }
}
