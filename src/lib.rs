//! # Spindle - asynchronous file reads for audio runtimes
//!
//! Bridges the callback-driven asynchronous file-I/O contract issued by
//! audio middleware to a synchronous file-access provider. A single
//! background worker serializes concurrent read requests, services them in
//! priority order off the caller's thread, and supports synchronous
//! cancellation that waits out an in-flight read.
//!
//! - **Priority scheduling**: requests are served strictly by descending
//!   priority, so an urgent stream refill overtakes background loads
//! - **Synchronous cancellation**: `cancel_read` returns only once the
//!   request can never be touched again, so the caller may free its
//!   descriptor immediately after
//! - **Pluggable providers**: any [`FileProvider`] can back a handle; a
//!   `std::fs` adapter is included
//!
//! ## Quick Start
//!
//! ```ignore
//! use spindle::{FileBridge, ReadRequest};
//! use std::sync::Arc;
//!
//! let mut bridge = FileBridge::new();
//! bridge.start();
//!
//! let (file, size) = bridge.open("music.ogg")?;
//! let request = ReadRequest::new(file, 0, 4096)
//!     .priority(50)
//!     .on_done(|req, status| {
//!         // consume req.buffer()[..req.bytes_read()]
//!     })
//!     .build();
//! bridge.submit_read(Arc::clone(&request));
//!
//! // ... later, if the stream is torn down early:
//! bridge.cancel_read(&request);
//! bridge.finish();
//! ```

// Error types
pub mod error;
pub use error::{Error, Result};

// Main high-level API (most common usage)
mod bridge;
pub use bridge::FileBridge;

// Collaborator surface
mod provider;
pub use provider::{FileProvider, StdFileProvider};

mod registry;
pub use registry::{FileId, FileRegistry};

// Read scheduling
pub mod runner;
pub use runner::{
    FileRunner, ReadRequest, ReadRequestBuilder, ReadStatus, RunnerConfig, RunnerMetrics,
    RunnerMetricsSnapshot,
};
