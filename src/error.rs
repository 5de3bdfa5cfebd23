//! Error types.

use crate::registry::FileId;
use thiserror::Error;

/// Error type.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The pending queue had no request to pop.
    #[error("read queue is empty")]
    EmptyQueue,

    /// Operation against a handle that is not open.
    #[error("unknown file handle: {0:?}")]
    UnknownHandle(FileId),
}

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;
