//! Asynchronous read scheduling for callback-driven file I/O.

mod config;
mod metrics;
mod queue;
mod request;
mod worker;

pub use config::RunnerConfig;
pub use metrics::{RunnerMetrics, RunnerMetricsSnapshot};
pub use request::{ReadRequest, ReadRequestBuilder, ReadStatus};
pub use worker::FileRunner;
