//! Priority-ordered pending request queue.

use super::request::ReadRequest;
use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::sync::Arc;

/// Queue entry wrapping a shared request.
///
/// Identity is pointer identity on the descriptor, never field equality.
pub(crate) struct RequestHandle {
    request: Arc<ReadRequest>,
}

impl RequestHandle {
    pub fn new(request: Arc<ReadRequest>) -> Self {
        Self { request }
    }

    fn priority(&self) -> i32 {
        self.request.priority()
    }

    fn is(&self, request: &Arc<ReadRequest>) -> bool {
        Arc::ptr_eq(&self.request, request)
    }

    pub fn into_request(self) -> Arc<ReadRequest> {
        self.request
    }
}

/// Pending requests, kept sorted by priority descending.
///
/// Not internally synchronized; the runner guards it with the queue mutex.
/// A request must not be queued twice concurrently.
#[derive(Default)]
pub(crate) struct PendingQueue {
    entries: SmallVec<[RequestHandle; 8]>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert preserving the descending priority order. Placement among
    /// equal priorities is unspecified.
    pub fn insert(&mut self, handle: RequestHandle) {
        let at = self
            .entries
            .partition_point(|entry| entry.priority() >= handle.priority());
        self.entries.insert(at, handle);
    }

    /// Remove the entry for `request`, if still queued. Returns whether an
    /// entry was removed; absence is not an error, the request may already
    /// be in flight or completed.
    pub fn remove(&mut self, request: &Arc<ReadRequest>) -> bool {
        match self.entries.iter().position(|entry| entry.is(request)) {
            Some(at) => {
                self.entries.remove(at);
                true
            }
            None => false,
        }
    }

    /// Pop the highest-priority entry.
    pub fn pop_front(&mut self) -> Result<RequestHandle> {
        if self.entries.is_empty() {
            return Err(Error::EmptyQueue);
        }
        Ok(self.entries.remove(0))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drop all entries without completing them. Returns the count dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }
}
