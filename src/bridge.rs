//! Facade binding the handle table and the read runner into the callback
//! surface an audio runtime plugs into.

use crate::error::{Error, Result};
use crate::provider::FileProvider;
use crate::registry::{FileId, FileRegistry};
use crate::runner::{FileRunner, ReadRequest, ReadStatus, RunnerConfig, RunnerMetrics};
use std::path::Path;
use std::sync::Arc;

/// File bridge: open/close plus synchronous read/seek passthroughs, and the
/// asynchronous submit/cancel entry points.
///
/// # Example
/// ```ignore
/// use spindle::{FileBridge, ReadRequest};
///
/// let mut bridge = FileBridge::new();
/// bridge.start();
///
/// let (file, _size) = bridge.open("music.ogg")?;
/// let request = ReadRequest::new(file, 0, 4096)
///     .priority(50)
///     .on_done(|req, status| {
///         // req.buffer()[..req.bytes_read()] now holds the data
///     })
///     .build();
/// bridge.submit_read(std::sync::Arc::clone(&request));
/// ```
pub struct FileBridge {
    registry: Arc<FileRegistry>,
    runner: FileRunner,
}

impl FileBridge {
    /// Create a bridge with default configuration. The worker is not
    /// started until [`start`](Self::start).
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// Create a bridge with custom worker configuration.
    pub fn with_config(config: RunnerConfig) -> Self {
        let registry = Arc::new(FileRegistry::new());
        let runner = FileRunner::with_config(Arc::clone(&registry), config);
        Self { registry, runner }
    }

    /// Start the read worker.
    pub fn start(&mut self) {
        self.runner.start();
    }

    /// Stop the read worker, dropping queued requests.
    pub fn finish(&mut self) {
        self.runner.finish();
    }

    /// Open a file on disk. Returns its handle and size in bytes.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<(FileId, u64)> {
        let (file, size) = self.registry.open(path)?;
        tracing::debug!(?file, size, "opened file");
        Ok((file, size))
    }

    /// Register a custom provider, for hosts that do not read from plain
    /// disk files. Returns its handle and size in bytes.
    pub fn register(&self, provider: Box<dyn FileProvider>) -> (FileId, u64) {
        self.registry.register(provider)
    }

    /// Close an open handle.
    pub fn close(&self, file: FileId) -> Result<()> {
        self.registry.close(file)?;
        tracing::debug!(?file, "closed file");
        Ok(())
    }

    /// Synchronous read at the current cursor.
    ///
    /// Reads up to `buf.len()` bytes. A short read is reported as
    /// [`ReadStatus::EndOfFile`] with the actual count, not as an error.
    pub fn read(&self, file: FileId, buf: &mut [u8]) -> Result<(usize, ReadStatus)> {
        let provider = self.registry.get(file).ok_or(Error::UnknownHandle(file))?;
        let mut provider = provider.lock();

        let bytes = provider.read(buf)?;
        let status = if provider.at_end() {
            ReadStatus::EndOfFile
        } else {
            ReadStatus::Ok
        };
        Ok((bytes, status))
    }

    /// Synchronous absolute seek.
    pub fn seek(&self, file: FileId, offset: u64) -> Result<()> {
        let provider = self.registry.get(file).ok_or(Error::UnknownHandle(file))?;
        provider.lock().seek(offset)?;
        Ok(())
    }

    /// Submit an asynchronous read. Always accepted; completion arrives
    /// through the request's callback.
    pub fn submit_read(&self, request: Arc<ReadRequest>) {
        self.runner.queue_read(request);
    }

    /// Cancel an asynchronous read. Returns once the request is guaranteed
    /// untouched-from-now-on or already completed; see
    /// [`FileRunner::cancel_read`].
    pub fn cancel_read(&self, request: &Arc<ReadRequest>) {
        self.runner.cancel_read(request);
    }

    /// Scheduler metrics.
    pub fn metrics(&self) -> Arc<RunnerMetrics> {
        self.runner.metrics()
    }

    /// The underlying handle table.
    pub fn registry(&self) -> &Arc<FileRegistry> {
        &self.registry
    }
}

impl Default for FileBridge {
    fn default() -> Self {
        Self::new()
    }
}
