//! Error types for bytewrap decorators.

use std::io;
use thiserror::Error;

/// The main error type for bytewrap operations.
#[derive(Debug, Error)]
pub enum WrapError {
    /// An I/O error occurred in the wrapped source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A block adapter was configured with a block size below one byte.
    #[error("Invalid block size: {0}, block size must be at least 1")]
    InvalidBlockSize(usize),

    /// The sink failed while whole blocks were being forwarded to it.
    ///
    /// `forwarded` is the exact number of bytes the sink accepted before failing,
    /// so callers can reason about what was persisted.
    #[error("Sink failed after accepting {forwarded} bytes: {source}")]
    PartialForward {
        forwarded: usize,
        #[source]
        source: io::Error,
    },

    /// The adapter hit a failure on an earlier call and refuses to continue.
    #[error("Stream terminated by an earlier failure: {message}")]
    Terminated { kind: io::ErrorKind, message: String },

    /// Attempted to write to a closed block writer.
    #[error("Writing a closed stream")]
    WritingClosedStream,

    /// A byte observer rejected the data it was handed.
    #[error("Observer error: {0}")]
    Observer(String),

    /// A general error occurred.
    #[error("{0}")]
    Other(String),
}

impl WrapError {
    /// The `io::ErrorKind` this error surfaces as when it crosses a `Read`/`Write` boundary.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            WrapError::Io(e) => e.kind(),
            WrapError::InvalidBlockSize(_) => io::ErrorKind::InvalidInput,
            WrapError::PartialForward { source, .. } => source.kind(),
            WrapError::Terminated { kind, .. } => *kind,
            WrapError::WritingClosedStream => io::ErrorKind::BrokenPipe,
            WrapError::Observer(_) | WrapError::Other(_) => io::ErrorKind::Other,
        }
    }
}

impl From<WrapError> for io::Error {
    fn from(err: WrapError) -> Self {
        match err {
            WrapError::Io(e) => e,
            other => io::Error::new(other.kind(), other),
        }
    }
}

/// A specialized Result type for bytewrap operations.
pub type Result<T> = std::result::Result<T, WrapError>;
