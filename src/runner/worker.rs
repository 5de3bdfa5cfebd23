//! Read worker thread and scheduler facade.

use super::config::RunnerConfig;
use super::metrics::RunnerMetrics;
use super::queue::{PendingQueue, RequestHandle};
use super::request::{ReadRequest, ReadStatus};
use crate::registry::{FileRegistry, SharedProvider};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thread_priority::ThreadPriority;

/// State shared between caller threads and the worker.
///
/// Two independent lock domains: the pending queue with its readiness
/// condvar, and the current-request marker with the completion condvar used
/// for the cancellation rendezvous. A cancel waiting on `done_cv` never
/// blocks an enqueue on `queue`.
struct RunnerShared {
    queue: Mutex<PendingQueue>,
    queue_cv: Condvar,
    current: Mutex<Option<Arc<ReadRequest>>>,
    done_cv: Condvar,
    stop: AtomicBool,
}

/// Scheduler facade owning the read worker thread.
///
/// One worker services all requests in priority order; there is no read
/// parallelism. Construct one instance per registry and share it behind
/// whatever the host runtime hands its callbacks.
pub struct FileRunner {
    shared: Arc<RunnerShared>,
    registry: Arc<FileRegistry>,
    metrics: Arc<RunnerMetrics>,
    config: RunnerConfig,
    thread_handle: Option<JoinHandle<()>>,
}

impl FileRunner {
    /// Create a runner with default configuration.
    pub fn new(registry: Arc<FileRegistry>) -> Self {
        Self::with_config(registry, RunnerConfig::default())
    }

    /// Create a runner with custom configuration.
    pub fn with_config(registry: Arc<FileRegistry>, config: RunnerConfig) -> Self {
        Self {
            shared: Arc::new(RunnerShared {
                queue: Mutex::new(PendingQueue::new()),
                queue_cv: Condvar::new(),
                current: Mutex::new(None),
                done_cv: Condvar::new(),
                stop: AtomicBool::new(false),
            }),
            registry,
            metrics: Arc::new(RunnerMetrics::new()),
            config,
            thread_handle: None,
        }
    }

    /// Spawn the worker thread. No-op if it is already running; restarting
    /// after [`finish`](Self::finish) is supported.
    pub fn start(&mut self) {
        if self.thread_handle.is_some() {
            return;
        }

        self.shared.stop.store(false, Ordering::SeqCst);

        let shared = Arc::clone(&self.shared);
        let registry = Arc::clone(&self.registry);
        let metrics = Arc::clone(&self.metrics);
        let elevate = self.config.elevate_priority;

        let handle = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || {
                if elevate {
                    let _ = thread_priority::set_current_thread_priority(ThreadPriority::Max);
                }
                run_loop(&shared, &registry, &metrics);
            })
            .expect("failed to spawn read worker thread");

        self.thread_handle = Some(handle);
    }

    /// Stop the worker and join it.
    ///
    /// Requests still queued are dropped without their callbacks firing; the
    /// host is shutting down and their descriptors may no longer be valid to
    /// touch. An in-flight read completes normally first.
    pub fn finish(&mut self) {
        self.shared.stop.store(true, Ordering::SeqCst);
        self.shared.queue_cv.notify_one();

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }

    /// Whether the worker thread is live.
    pub fn is_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Queue a read request and wake the worker.
    ///
    /// Requests are served strictly by descending priority; submission order
    /// only matters between requests of equal priority, and even there the
    /// order is unspecified. A request must not be queued again before it
    /// completes or is canceled.
    pub fn queue_read(&self, request: Arc<ReadRequest>) {
        let mut queue = self.shared.queue.lock();
        queue.insert(RequestHandle::new(request));
        let queued = queue.len();
        drop(queue);

        self.shared.queue_cv.notify_one();
        self.metrics.record_queued();
        tracing::trace!(queued, "read request queued");
    }

    /// Cancel a request.
    ///
    /// When this returns, the worker will never touch the request again:
    /// either it was still queued and has been removed, or its completion
    /// callback has already run. Canceling the in-flight request blocks for
    /// the remainder of that read; canceling a request the scheduler no
    /// longer knows is a no-op.
    pub fn cancel_read(&self, request: &Arc<ReadRequest>) {
        let removed = self.shared.queue.lock().remove(request);
        if removed {
            // Removed before dispatch: it can no longer become current.
            self.metrics.record_canceled();
            tracing::trace!(request = ?request, "canceled queued request");
            return;
        }

        let mut current = self.shared.current.lock();
        if current.as_ref().is_some_and(|c| Arc::ptr_eq(c, request)) {
            self.metrics.record_cancel_wait();
            self.shared.done_cv.wait_while(&mut current, |c| {
                c.as_ref().is_some_and(|c| Arc::ptr_eq(c, request))
            });
        }
    }

    /// Scheduler metrics.
    pub fn metrics(&self) -> Arc<RunnerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// The registry this runner resolves handles against.
    pub fn registry(&self) -> &Arc<FileRegistry> {
        &self.registry
    }
}

impl Drop for FileRunner {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Worker loop: wait for a queued request or a stop signal, service the
/// highest-priority request, signal cancellation waiters, repeat.
fn run_loop(shared: &RunnerShared, registry: &FileRegistry, metrics: &RunnerMetrics) {
    tracing::debug!("read worker started");

    loop {
        let request = {
            let mut queue = shared.queue.lock();
            shared
                .queue_cv
                .wait_while(&mut queue, |q| {
                    q.is_empty() && !shared.stop.load(Ordering::SeqCst)
                });

            if shared.stop.load(Ordering::SeqCst) {
                let dropped = queue.clear();
                if dropped > 0 {
                    metrics.record_dropped(dropped as u64);
                    tracing::debug!(dropped, "stopping with requests still queued");
                }
                break;
            }

            // Publish the current-request marker before releasing the queue
            // lock: cancel_read must always find the request either queued
            // or current, never in between.
            let Ok(handle) = queue.pop_front() else {
                continue;
            };
            let request = handle.into_request();
            *shared.current.lock() = Some(Arc::clone(&request));
            request
        };

        service_request(&request, registry, metrics);
        drop(request);

        // Clear the marker before signaling, so a waiting cancel observes
        // completion when it wakes.
        *shared.current.lock() = None;
        shared.done_cv.notify_one();
    }

    tracing::debug!("read worker stopped");
}

/// Service one request end to end and invoke its completion callback.
fn service_request(request: &ReadRequest, registry: &FileRegistry, metrics: &RunnerMetrics) {
    let status = match registry.get(request.file()) {
        Some(provider) => read_into(&provider, request, metrics),
        None => {
            tracing::warn!(file = ?request.file(), "read request against a closed handle");
            ReadStatus::Failed
        }
    };

    if status == ReadStatus::Failed {
        metrics.record_failed();
    }
    tracing::trace!(request = ?request, ?status, "read request done");
    request.complete(status);
}

/// Seek and read one request against its provider, recording the byte count
/// on the descriptor. Short reads are not failures; they surface as
/// `EndOfFile` with the actual count.
fn read_into(
    provider: &SharedProvider,
    request: &ReadRequest,
    metrics: &RunnerMetrics,
) -> ReadStatus {
    let mut provider = provider.lock();

    if let Err(e) = provider.seek(request.offset()) {
        tracing::warn!(offset = request.offset(), error = %e, "seek failed");
        return ReadStatus::Failed;
    }

    let mut buffer = request.buffer();
    let bytes = match provider.read(&mut buffer) {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(len = buffer.len(), error = %e, "read failed");
            return ReadStatus::Failed;
        }
    };
    drop(buffer);

    request.set_bytes_read(bytes);
    metrics.record_read(bytes as u64);

    if provider.at_end() {
        metrics.record_eof();
        ReadStatus::EndOfFile
    } else {
        ReadStatus::Ok
    }
}
