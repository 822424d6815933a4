//! Session identity and pagination state.
//!
//! A [`Session`] is one document-viewing interaction: the opaque id the
//! backend issued at `/init/`, the fixed page count, the current page, and
//! the image cache scoped to this session. Sessions are replaced wholesale
//! when a new URL is submitted, never mutated into a different document,
//! so dropping the old `Session` is what discards its cache and releases the
//! image handles it owned.

use crate::cache::ResourceCache;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque session handle issued by the backend.
///
/// Immutable for the session's lifetime. The backend calls this a
/// `request_id` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One document-viewing interaction.
///
/// Invariant: `1 <= current_page <= page_count`, with `page_count >= 1`
/// enforced at construction. All page numbers are 1-indexed, matching the
/// backend contract.
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub page_count: u32,
    pub current_page: u32,
    pub cache: ResourceCache,
}

impl Session {
    /// Open a session positioned on page 1.
    ///
    /// `cache_capacity = None` means an unbounded image cache.
    pub fn new(id: SessionId, page_count: u32, cache_capacity: Option<usize>) -> Self {
        debug_assert!(page_count >= 1);
        Self {
            id,
            page_count,
            current_page: 1,
            cache: match cache_capacity {
                Some(cap) => ResourceCache::with_capacity(cap),
                None => ResourceCache::new(),
            },
        }
    }

    /// Bounds guard for every page transition.
    pub fn is_valid_page(&self, page: u32) -> bool {
        (1..=self.page_count).contains(&page)
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page == self.page_count
    }
}
