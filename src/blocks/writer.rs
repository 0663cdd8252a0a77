use std::io::{self, Write};

use log::{debug, warn};

use crate::blocks::buffer::{BlockBuffer, Terminal};
use crate::blocks::utils::{self, forward};
use crate::constants::DEFAULT_BLOCK_SIZE;
use crate::error::{Result, WrapError};

/// Configuration options for BlockWriter.
#[derive(Debug, Clone)]
pub struct BlockWriterConfig {
    /// Size of a block in bytes (default: 4 KiB).
    pub block_size: usize,
}

impl Default for BlockWriterConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl BlockWriterConfig {
    /// Creates a new BlockWriterConfig with custom block size.
    ///
    /// Returns an error if block_size is zero.
    pub fn with_block_size(block_size: usize) -> Result<Self> {
        utils::validate_block_size(block_size)?;
        Ok(Self { block_size })
    }
}

/// Writer that only forwards whole blocks to its sink.
///
/// Writes of any size are accepted and buffered; whenever the buffer holds at least one
/// whole block, all whole blocks are forwarded to the sink in one go. The sink therefore
/// only ever sees multiples of the block size, except for the final short block.
///
/// Because the sink cannot tell when the stream ends, [`BlockWriter::close`] must be
/// called to forward the final partial block. Without it the last
/// `total_len % block_size` bytes are lost. [`Write::flush`] only flushes the sink, it
/// never forwards a partial block.
///
/// # Error handling
///
/// The first forwarding failure is sticky. The failing call returns
/// [`WrapError::PartialForward`] with the exact number of bytes the sink accepted; every
/// later call (including `close`) returns [`WrapError::Terminated`] with the same kind
/// and message, and the sink is never touched again.
pub struct BlockWriter<Sink: Write> {
    /// The underlying sink.
    sink: Sink,

    /// Bytes accepted from the caller but not yet forwarded, plus the terminal state.
    buffer: BlockBuffer,
}

impl<Sink: Write> BlockWriter<Sink> {
    /// Creates a new BlockWriter forwarding multiples of `block_size`.
    pub fn new(block_size: usize, sink: Sink) -> Result<Self> {
        Self::with_config(sink, BlockWriterConfig { block_size })
    }

    /// Creates a new BlockWriter with custom configuration.
    pub fn with_config(sink: Sink, config: BlockWriterConfig) -> Result<Self> {
        utils::validate_block_size(config.block_size)?;

        Ok(Self {
            sink,
            buffer: BlockBuffer::new(config.block_size),
        })
    }

    /// Buffers `data` and forwards every whole block to the sink.
    ///
    /// # Returns
    ///
    /// * `Ok(data.len())` - All of `data` was accepted, even if part of it is still
    ///   buffered waiting for a whole block.
    /// * `Err(PartialForward)` - The sink failed; `forwarded` tells how many bytes it
    ///   accepted in this call.
    /// * `Err(Terminated)` / `Err(WritingClosedStream)` - An earlier call failed or the
    ///   writer was closed. Nothing was buffered.
    pub fn write_blocks(&mut self, data: &[u8]) -> Result<usize> {
        if let Some(terminal) = self.buffer.terminal() {
            return Err(terminal.replay());
        }

        self.buffer.extend(data);

        // Write out any whole blocks.
        let aligned = self.buffer.aligned_len();
        if aligned > 0 {
            let blocks = self.buffer.take(aligned);
            if let Err(e) = forward(&mut self.sink, &blocks) {
                warn!("Sink failed while forwarding {} bytes: {}", aligned, e);
                self.buffer.set_terminal(Terminal::failed(&e));
                return Err(e);
            }
        }

        Ok(data.len())
    }

    /// Forwards the final partial block and flushes the sink.
    ///
    /// After closing, writes fail with [`WrapError::WritingClosedStream`]. Closing again
    /// is a no-op. If an earlier call failed, that failure is returned instead.
    pub fn close(&mut self) -> Result<()> {
        match self.buffer.terminal() {
            Some(Terminal::Closed) => return Ok(()),
            Some(terminal) => return Err(terminal.replay()),
            None => {}
        }

        // Write out any remaining data (which didn't fill a block).
        if !self.buffer.is_empty() {
            let tail = self.buffer.take(self.buffer.len());
            debug!("Forwarding final partial block of {} bytes", tail.len());
            if let Err(e) = forward(&mut self.sink, &tail) {
                warn!("Sink failed while forwarding the final block: {}", e);
                self.buffer.set_terminal(Terminal::failed(&e));
                return Err(e);
            }
        }

        if let Err(e) = self.sink.flush() {
            let e = WrapError::Io(e);
            self.buffer.set_terminal(Terminal::failed(&e));
            return Err(e);
        }

        self.buffer.set_terminal(Terminal::Closed);
        Ok(())
    }

    /// Returns the block size this writer aligns to.
    pub fn block_size(&self) -> usize {
        self.buffer.block_size()
    }

    /// Returns the number of accepted bytes still waiting for a whole block.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Returns whether [`BlockWriter::close`] completed successfully.
    pub fn is_closed(&self) -> bool {
        matches!(self.buffer.terminal(), Some(Terminal::Closed))
    }

    /// Gets a reference to the underlying sink.
    pub fn get_ref(&self) -> &Sink {
        &self.sink
    }

    /// Gets a mutable reference to the underlying sink.
    pub fn get_mut(&mut self) -> &mut Sink {
        &mut self.sink
    }

    /// Returns the underlying sink, consuming self.
    ///
    /// Pending bytes are dropped; call [`BlockWriter::close`] first to forward them.
    pub fn into_inner(self) -> Sink {
        if !self.buffer.is_empty() {
            warn!("Dropping {} bytes that were never forwarded", self.buffer.len());
        }
        self.sink
    }
}

impl<Sink: Write> Write for BlockWriter<Sink> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_blocks(buf)?)
    }

    /// Flushes the sink. Partial blocks stay buffered until [`BlockWriter::close`].
    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}
