//! Error types for the pagecast library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ViewerError`] is **fatal**: the operation cannot proceed at all
//!   (malformed document URL, no active session, session initialisation
//!   refused by the backend). Returned as `Err(ViewerError)` from the
//!   top-level [`crate::viewer::DocumentViewer`] methods.
//!
//! * [`FetchError`] is **non-fatal**: a single artifact fetch failed
//!   (explanation, image, or audio) but the other artifacts of the page are
//!   fine. Stored inside [`crate::report::PageLoadReport`] so callers can
//!   inspect partial success rather than losing the whole page to one bad
//!   fetch.
//!
//! The separation lets callers decide their own tolerance: treat any failed
//! artifact as an error, render whatever succeeded, or collect reports for a
//! post-session diagnosis.

use thiserror::Error;

/// A non-fatal error for a single artifact fetch.
///
/// Every gateway operation collapses its failure causes into exactly one of
/// these three variants. No distinction finer than this is preserved; the
/// viewer does not retry, so "which kind of broken" only matters for the
/// diagnostic surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout, reset).
    #[error("network error: {detail}")]
    Network { detail: String },

    /// The backend answered with a non-success HTTP status.
    #[error("backend returned HTTP {status}")]
    Backend { status: u16 },

    /// The response arrived but its body could not be decoded.
    #[error("could not decode response: {detail}")]
    Decode { detail: String },
}

impl FetchError {
    /// Classify a `reqwest` error into the fetch taxonomy.
    ///
    /// Status errors are handled before the body is read, so by the time a
    /// `reqwest::Error` reaches this function it is either a transport
    /// failure or a body-decoding failure.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode {
                detail: err.to_string(),
            }
        } else {
            FetchError::Network {
                detail: err.to_string(),
            }
        }
    }
}

/// All fatal errors returned by the pagecast library.
///
/// Artifact-level failures use [`FetchError`] and are stored in
/// [`crate::report::PageLoadReport`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The document URL is empty or does not use a recognised scheme.
    /// No request is sent to the backend for such input.
    #[error("invalid document URL '{url}': must start with http:// or https://")]
    InvalidUrl { url: String },

    /// The backend refused to open a session for the URL.
    /// No partial session is created; the viewer stays uninitialised.
    #[error("session initialisation failed: {source}")]
    InitFailed {
        #[source]
        source: FetchError,
    },

    /// The backend reported a document with no pages.
    #[error("backend reported an empty document ({page_count} pages)")]
    EmptyDocument { page_count: u32 },

    /// A page operation was requested before any session exists.
    #[error("no active session; submit a document URL first")]
    NotInitialized,

    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_display_includes_status() {
        let e = FetchError::Backend { status: 503 };
        assert!(e.to_string().contains("503"), "got: {e}");
    }

    #[test]
    fn init_failed_chains_source() {
        let e = ViewerError::InitFailed {
            source: FetchError::Network {
                detail: "connection refused".into(),
            },
        };
        assert!(e.to_string().contains("connection refused"));
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn invalid_url_display_names_the_url() {
        let e = ViewerError::InvalidUrl {
            url: "ftp://example.com/doc.pdf".into(),
        };
        assert!(e.to_string().contains("ftp://example.com/doc.pdf"));
    }

    #[test]
    fn fetch_error_serialises() {
        let e = FetchError::Decode {
            detail: "missing field `explanation`".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: FetchError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
