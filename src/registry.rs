//! Open-file handle table.

use crate::error::{Error, Result};
use crate::provider::{FileProvider, StdFileProvider};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Opaque handle for an open file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(u64);

impl FileId {
    /// Generate a new unique file ID.
    fn generate() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A registered provider, serialized per handle.
pub(crate) type SharedProvider = Arc<Mutex<Box<dyn FileProvider>>>;

/// Table of open files, keyed by [`FileId`].
///
/// Handles stay valid until closed; looking up a closed handle fails
/// instead of dangling.
#[derive(Default)]
pub struct FileRegistry {
    files: DashMap<FileId, SharedProvider>,
}

impl FileRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a file on disk and register it. Returns its handle and size in
    /// bytes.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<(FileId, u64)> {
        let provider = StdFileProvider::open(path)?;
        Ok(self.register(Box::new(provider)))
    }

    /// Register an already-open provider. Returns its handle and size in
    /// bytes.
    pub fn register(&self, provider: Box<dyn FileProvider>) -> (FileId, u64) {
        let id = FileId::generate();
        let size = provider.len();
        self.files.insert(id, Arc::new(Mutex::new(provider)));
        (id, size)
    }

    /// Close a handle, dropping its provider.
    pub fn close(&self, id: FileId) -> Result<()> {
        self.files
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::UnknownHandle(id))
    }

    /// Look up the provider behind a handle.
    pub(crate) fn get(&self, id: FileId) -> Option<SharedProvider> {
        self.files.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of open handles.
    pub fn open_count(&self) -> usize {
        self.files.len()
    }
}
