//! Shared buffering primitive for the block adapters.
//!
//! Both adapters hold bytes that could not yet cross the adapter as whole blocks, plus
//! the first terminal condition observed from their upstream. They differ only in data
//! direction, so the bookkeeping lives here.

use std::io;

use bytes::{Buf, Bytes, BytesMut};

use crate::blocks::utils::align_down;
use crate::error::WrapError;

/// Sticky end state of a block adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Terminal {
    /// The source signalled end of data.
    Eof,
    /// The upstream failed. Only kind and message are kept since `io::Error` is not `Clone`.
    Failed { kind: io::ErrorKind, message: String },
    /// The writer was closed.
    Closed,
}

impl Terminal {
    pub(crate) fn failed(err: &WrapError) -> Self {
        let message = match err {
            WrapError::Io(source) | WrapError::PartialForward { source, .. } => source.to_string(),
            other => other.to_string(),
        };
        Terminal::Failed {
            kind: err.kind(),
            message,
        }
    }

    /// The error to replay for every call made after this terminal state was reached.
    pub(crate) fn replay(&self) -> WrapError {
        match self {
            Terminal::Eof => WrapError::Io(io::ErrorKind::UnexpectedEof.into()),
            Terminal::Failed { kind, message } => WrapError::Terminated {
                kind: *kind,
                message: message.clone(),
            },
            Terminal::Closed => WrapError::WritingClosedStream,
        }
    }
}

/// Pending bytes of a block adapter.
///
/// Consuming from the front keeps the remainder in order without copying it.
#[derive(Debug)]
pub(crate) struct BlockBuffer {
    block_size: usize,
    pending: BytesMut,
    terminal: Option<Terminal>,
}

impl BlockBuffer {
    /// Creates an empty buffer. `block_size` must already be validated.
    pub(crate) fn new(block_size: usize) -> Self {
        Self {
            block_size,
            pending: BytesMut::with_capacity(block_size),
            terminal: None,
        }
    }

    pub(crate) fn block_size(&self) -> usize {
        self.block_size
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Rounds `len` down to whole blocks.
    pub(crate) fn align(&self, len: usize) -> usize {
        align_down(len, self.block_size)
    }

    /// Number of pending bytes that form whole blocks.
    pub(crate) fn aligned_len(&self) -> usize {
        self.align(self.pending.len())
    }

    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Removes and returns the first `n` pending bytes.
    pub(crate) fn take(&mut self, n: usize) -> Bytes {
        self.pending.split_to(n).freeze()
    }

    /// Copies the first `n` pending bytes into `dst` and drops them from the buffer.
    pub(crate) fn copy_out(&mut self, dst: &mut [u8], n: usize) {
        dst[..n].copy_from_slice(&self.pending[..n]);
        self.pending.advance(n);
    }

    pub(crate) fn terminal(&self) -> Option<&Terminal> {
        self.terminal.as_ref()
    }

    pub(crate) fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    /// Records `terminal` unless a terminal state was already recorded.
    pub(crate) fn set_terminal(&mut self, terminal: Terminal) {
        if self.terminal.is_none() {
            self.terminal = Some(terminal);
        }
    }

    #[cfg(test)]
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.pending
    }
}
