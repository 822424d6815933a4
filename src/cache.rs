//! Session-scoped image cache.
//!
//! The backend renders a page image once per `(session, page)` pair, so the
//! client never needs to download the same image twice within a session.
//! Only images are cached: explanations are intentionally regenerable and
//! audio depends on the latest explanation text, so both are always
//! re-fetched.
//!
//! The cache is owned by the [`crate::session::Session`]: replacing the
//! session drops the cache and releases every handle it still holds. That
//! scoping is what bounds the cache's lifetime. Its *size* is unbounded by
//! default
//! (entries are append-only for the session's lifetime); callers with
//! long-running sessions can set a capacity, which evicts the oldest entry
//! on overflow.

use crate::resource::ResourceHandle;
use crate::session::SessionId;
use std::collections::{HashMap, VecDeque};

/// `(session, page) → image handle` lookup with optional FIFO eviction.
#[derive(Debug, Default)]
pub struct ResourceCache {
    entries: HashMap<(SessionId, u32), ResourceHandle>,
    /// Insertion order, used only when `capacity` is set.
    order: VecDeque<(SessionId, u32)>,
    capacity: Option<usize>,
}

impl ResourceCache {
    /// An unbounded cache (the default behaviour).
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache that evicts its oldest entry once `capacity` is exceeded.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    /// Look up a previously cached image.
    pub fn get(&self, session: &SessionId, page: u32) -> Option<ResourceHandle> {
        self.entries.get(&(session.clone(), page)).cloned()
    }

    /// Insert an image handle. Re-inserting an existing key replaces the
    /// handle without growing the cache.
    pub fn put(&mut self, session: &SessionId, page: u32, handle: ResourceHandle) {
        let key = (session.clone(), page);
        if self.entries.insert(key.clone(), handle).is_none() {
            self.order.push_back(key);
            if let Some(cap) = self.capacity {
                while self.entries.len() > cap {
                    if let Some(oldest) = self.order.pop_front() {
                        self.entries.remove(&oldest);
                    }
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
