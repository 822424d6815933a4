//! # pagecast
//!
//! Page through a remote document while a backend supplies, per page, an
//! explanatory text, a rendered image, and a synthesized narration clip.
//!
//! ## Why this crate?
//!
//! The backend does the heavy lifting (document parsing, explanation
//! generation, image rendering, speech synthesis); what a client needs is
//! the awkward part in between: coordinating three independent fetches per
//! page, caching what is worth caching, tracking pagination and playback
//! state, and degrading gracefully when any fetch fails. This crate is that
//! orchestration layer, headless: bring your own rendering and audio output.
//!
//! ## Load sequence per page
//!
//! ```text
//! load_page(page, mode)
//!  │
//!  ├─ explanation ──┐   fetched concurrently; a failure on one
//!  ├─ image (cached)┤   side never cancels the other
//!  │                │
//!  ├─ join ◀────────┘
//!  ├─ audio             strictly after the join; narration is built
//!  │                    from the finalized explanation server-side
//!  └─ commit            apply playback settings, clear loading flag,
//!                       one structured report per load
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pagecast::{DocumentViewer, HttpGateway, ViewerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ViewerConfig::builder()
//!         .base_url("http://localhost:8000")
//!         .build()?;
//!     let gateway = Arc::new(HttpGateway::new(&config)?);
//!     let viewer = DocumentViewer::new(gateway, &config);
//!
//!     let report = viewer.submit_url("https://arxiv.org/pdf/1706.03762").await?;
//!     println!("page 1 of {}: {}", viewer.page_count().unwrap(), report.summary());
//!
//!     viewer.next().await?;
//!     println!("{}", viewer.content().explanation);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pagecast` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pagecast = { version = "0.2", default-features = false }
//! ```
//!
//! ## What this crate deliberately does not do
//!
//! No retry/backoff (a failed fetch is reported once, not retried), no
//! persistence across restarts, no offline mode, and no cancellation of
//! in-flight HTTP requests; a page load superseded by a newer one simply
//! discards its results when it completes.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod observer;
pub mod report;
pub mod resource;
pub mod session;
pub mod viewer;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use cache::ResourceCache;
pub use config::{ViewerConfig, ViewerConfigBuilder};
pub use error::{FetchError, ViewerError};
pub use gateway::{BackendGateway, HttpGateway, InitResponse};
pub use observer::{NoopObserver, ObserverHandle, ViewerObserver};
pub use report::{ArtifactOutcome, LoadMode, PageLoadReport};
pub use resource::{PageContent, PlaybackSettings, ResourceHandle};
pub use session::{Session, SessionId};
pub use viewer::{is_url, DocumentViewer};
