//! Read request descriptor and completion statuses.

use crate::registry::FileId;
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Completion status delivered to a request's callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// The requested byte count was read in full.
    Ok,
    /// The end of the file was reached; the byte count may be short.
    EndOfFile,
    /// The provider failed to seek or read, or the handle was closed.
    Failed,
}

type DoneFn = Box<dyn Fn(&ReadRequest, ReadStatus) + Send + Sync>;

/// One asynchronous read request.
///
/// The descriptor is shared between the caller and the scheduler through an
/// `Arc`. The scheduler drops its clones once the request completes or is
/// canceled, so the caller alone decides the descriptor's lifetime.
pub struct ReadRequest {
    file: FileId,
    offset: u64,
    len: usize,
    priority: i32,
    buffer: Mutex<Vec<u8>>,
    bytes_read: AtomicUsize,
    done: DoneFn,
}

impl ReadRequest {
    /// Start building a request to read `len` bytes at `offset`.
    pub fn new(file: FileId, offset: u64, len: usize) -> ReadRequestBuilder {
        ReadRequestBuilder {
            file,
            offset,
            len,
            priority: 0,
            done: None,
        }
    }

    /// Handle of the file to read from.
    pub fn file(&self) -> FileId {
        self.file
    }

    /// Byte offset to read at.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Requested byte count.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether zero bytes were requested.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Scheduling priority; higher runs first.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Bytes actually read, valid once the completion callback has run.
    pub fn bytes_read(&self) -> usize {
        self.bytes_read.load(Ordering::Acquire)
    }

    /// Locked access to the destination buffer.
    pub fn buffer(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock()
    }

    pub(crate) fn set_bytes_read(&self, count: usize) {
        self.bytes_read.store(count, Ordering::Release);
    }

    /// Invoke the completion callback. Called exactly once, from the worker.
    pub(crate) fn complete(&self, status: ReadStatus) {
        (self.done)(self, status);
    }
}

impl fmt::Debug for ReadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadRequest")
            .field("file", &self.file)
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("priority", &self.priority)
            .field("bytes_read", &self.bytes_read.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Builder for [`ReadRequest`].
///
/// Created via [`ReadRequest::new`].
pub struct ReadRequestBuilder {
    file: FileId,
    offset: u64,
    len: usize,
    priority: i32,
    done: Option<DoneFn>,
}

impl ReadRequestBuilder {
    /// Set the scheduling priority; higher runs first (default: 0).
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the completion callback.
    ///
    /// Invoked exactly once on the worker thread, unless the request is
    /// canceled while queued or dropped at shutdown. The callback must not
    /// call back into the scheduler for the same request.
    pub fn on_done(
        mut self,
        done: impl Fn(&ReadRequest, ReadStatus) + Send + Sync + 'static,
    ) -> Self {
        self.done = Some(Box::new(done));
        self
    }

    /// Finish the request, allocating its destination buffer.
    pub fn build(self) -> Arc<ReadRequest> {
        Arc::new(ReadRequest {
            file: self.file,
            offset: self.offset,
            len: self.len,
            priority: self.priority,
            buffer: Mutex::new(vec![0; self.len]),
            bytes_read: AtomicUsize::new(0),
            done: self.done.unwrap_or_else(|| Box::new(|_, _| {})),
        })
    }
}
