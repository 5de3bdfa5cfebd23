//! Read worker configuration.

/// Configuration for the read worker thread.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Worker thread name (default: "spindle-io")
    pub thread_name: String,
    /// Elevate the worker to maximum thread priority (default: true).
    /// Elevation failures are ignored on platforms that refuse it.
    pub elevate_priority: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            thread_name: "spindle-io".into(),
            elevate_priority: true,
        }
    }
}
