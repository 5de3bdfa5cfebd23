//! I/O statistics for the read worker.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for read-scheduler activity.
#[derive(Default)]
pub struct RunnerMetrics {
    /// Bytes read from providers
    bytes_read: AtomicU64,
    /// Completed read operations
    read_ops: AtomicU64,
    /// Reads that hit end-of-file
    eof_reads: AtomicU64,
    /// Reads that failed at the provider
    failed_reads: AtomicU64,
    /// Requests accepted into the queue
    requests_queued: AtomicU64,
    /// Requests removed from the queue by cancellation
    requests_canceled: AtomicU64,
    /// Cancellations that had to wait for an in-flight read
    cancel_waits: AtomicU64,
    /// Requests dropped at shutdown without completing
    requests_dropped: AtomicU64,
}

impl RunnerMetrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record bytes read from a provider.
    #[inline]
    pub(crate) fn record_read(&self, bytes: u64) {
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
        self.read_ops.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a read that reached end-of-file.
    #[inline]
    pub(crate) fn record_eof(&self) {
        self.eof_reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a read that failed at the provider.
    #[inline]
    pub(crate) fn record_failed(&self) {
        self.failed_reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request entering the queue.
    #[inline]
    pub(crate) fn record_queued(&self) {
        self.requests_queued.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request canceled while still queued.
    #[inline]
    pub(crate) fn record_canceled(&self) {
        self.requests_canceled.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cancellation that waited on the in-flight read.
    #[inline]
    pub(crate) fn record_cancel_wait(&self) {
        self.cancel_waits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record requests dropped at shutdown.
    #[inline]
    pub(crate) fn record_dropped(&self, count: u64) {
        self.requests_dropped.fetch_add(count, Ordering::Relaxed);
    }

    /// Take a snapshot of current metrics.
    pub fn snapshot(&self) -> RunnerMetricsSnapshot {
        RunnerMetricsSnapshot {
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            read_ops: self.read_ops.load(Ordering::Relaxed),
            eof_reads: self.eof_reads.load(Ordering::Relaxed),
            failed_reads: self.failed_reads.load(Ordering::Relaxed),
            requests_queued: self.requests_queued.load(Ordering::Relaxed),
            requests_canceled: self.requests_canceled.load(Ordering::Relaxed),
            cancel_waits: self.cancel_waits.load(Ordering::Relaxed),
            requests_dropped: self.requests_dropped.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.bytes_read.store(0, Ordering::Relaxed);
        self.read_ops.store(0, Ordering::Relaxed);
        self.eof_reads.store(0, Ordering::Relaxed);
        self.failed_reads.store(0, Ordering::Relaxed);
        self.requests_queued.store(0, Ordering::Relaxed);
        self.requests_canceled.store(0, Ordering::Relaxed);
        self.cancel_waits.store(0, Ordering::Relaxed);
        self.requests_dropped.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of scheduler metrics at a point in time.
#[derive(Debug, Clone, Default)]
pub struct RunnerMetricsSnapshot {
    /// Bytes read from providers
    pub bytes_read: u64,
    /// Completed read operations
    pub read_ops: u64,
    /// Reads that hit end-of-file
    pub eof_reads: u64,
    /// Reads that failed at the provider
    pub failed_reads: u64,
    /// Requests accepted into the queue
    pub requests_queued: u64,
    /// Requests removed from the queue by cancellation
    pub requests_canceled: u64,
    /// Cancellations that had to wait for an in-flight read
    pub cancel_waits: u64,
    /// Requests dropped at shutdown without completing
    pub requests_dropped: u64,
}

impl RunnerMetricsSnapshot {
    /// Average bytes per completed read.
    pub fn avg_read_size(&self) -> u64 {
        if self.read_ops == 0 {
            0
        } else {
            self.bytes_read / self.read_ops
        }
    }
}
