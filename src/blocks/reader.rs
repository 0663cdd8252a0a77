use std::io::{self, Read};

use log::{debug, trace, warn};

use crate::blocks::buffer::{BlockBuffer, Terminal};
use crate::blocks::utils;
use crate::constants::{DEFAULT_BLOCK_SIZE, READ_TO_END_BUFFER_SIZE};
use crate::error::{Result, WrapError};

/// Result of a block read operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlocksPiece {
    /// `n` bytes were copied into the destination. `n` is a multiple of the block size,
    /// except for the final short block at end of stream.
    Blocks(usize),
    /// The destination is shorter than one block. Nothing was read; calling again with
    /// the same destination will never make progress.
    Starved,
    /// The source was read but a whole block is not available yet.
    Pending,
    /// End of stream reached, every byte has been delivered.
    EOF,
}

/// Configuration options for BlockReader.
#[derive(Debug, Clone)]
pub struct BlockReaderConfig {
    /// Size of a block in bytes (default: 4 KiB).
    pub block_size: usize,
}

impl Default for BlockReaderConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl BlockReaderConfig {
    /// Creates a new BlockReaderConfig with custom block size.
    ///
    /// Returns an error if block_size is zero.
    pub fn with_block_size(block_size: usize) -> Result<Self> {
        utils::validate_block_size(block_size)?;
        Ok(Self { block_size })
    }
}

/// Reader that only hands out whole blocks.
///
/// Every successful read returns a multiple of the block size, pulled from the
/// wrapped source and buffered as needed. The one exception is the last read
/// before end of stream, which returns whatever partial block is left.
///
/// A destination shorter than one block never makes progress: the read returns
/// [`BlocksPiece::Starved`] (or `Ok(0)` through [`Read`]) without touching the
/// source. Callers must always supply at least one block of space.
///
/// # Example
///
/// ```
/// use bytewrap::blocks::reader::{BlockReader, BlocksPiece};
///
/// let mut reader = BlockReader::new(3, &b"0123456789"[..]).unwrap();
/// let mut buf = [0u8; 5];
///
/// assert_eq!(reader.read_blocks(&mut buf).unwrap(), BlocksPiece::Blocks(3));
/// assert_eq!(&buf[..3], b"012");
/// assert_eq!(reader.read_blocks(&mut buf).unwrap(), BlocksPiece::Blocks(3));
/// assert_eq!(reader.read_blocks(&mut buf).unwrap(), BlocksPiece::Blocks(3));
/// assert_eq!(reader.read_blocks(&mut buf).unwrap(), BlocksPiece::Blocks(1));
/// assert_eq!(&buf[..1], b"9");
/// assert_eq!(reader.read_blocks(&mut buf).unwrap(), BlocksPiece::EOF);
/// ```
pub struct BlockReader<Source: Read> {
    /// The underlying source to read from.
    source: Source,

    /// Bytes read from the source but not yet delivered, plus the terminal state.
    buffer: BlockBuffer,
}

impl<Source: Read> BlockReader<Source> {
    /// Creates a new BlockReader delivering multiples of `block_size`.
    pub fn new(block_size: usize, source: Source) -> Result<Self> {
        Self::with_config(source, BlockReaderConfig { block_size })
    }

    /// Creates a new BlockReader with custom configuration.
    pub fn with_config(source: Source, config: BlockReaderConfig) -> Result<Self> {
        utils::validate_block_size(config.block_size)?;

        Ok(Self {
            source,
            buffer: BlockBuffer::new(config.block_size),
        })
    }

    /// Reads whole blocks into `dst`.
    ///
    /// Makes at most one read from the source per call. Terminal conditions from the
    /// source (end of data or a failure) are only reported once every buffered byte
    /// has been delivered; after that they are reported on every call.
    pub fn read_blocks(&mut self, dst: &mut [u8]) -> Result<BlocksPiece> {
        // If we've finished reading and delivered everything, we can quit.
        if self.buffer.is_empty() && self.buffer.is_terminal() {
            return self.finished();
        }

        // We'll only fill dst with full blocks.
        let mut n = self.buffer.align(dst.len());
        if n == 0 {
            trace!(
                "Destination of {} bytes is smaller than block size {}",
                dst.len(),
                self.buffer.block_size()
            );
            return Ok(BlocksPiece::Starved);
        }

        if !self.buffer.is_terminal() && self.buffer.len() < n {
            self.fill_from_source(dst)?;
        }

        // Only hand out the whole blocks we actually hold.
        if n > self.buffer.len() {
            n = self.buffer.aligned_len();
        }

        // At the end without a whole block, the remainder is the last piece.
        if n == 0 && self.buffer.is_terminal() {
            n = self.buffer.len();
        }

        if n == 0 {
            if self.buffer.is_terminal() {
                return self.finished();
            }
            trace!("Holding {} bytes, waiting for a whole block", self.buffer.len());
            return Ok(BlocksPiece::Pending);
        }

        self.buffer.copy_out(dst, n);
        Ok(BlocksPiece::Blocks(n))
    }

    /// Outcome of a call made once the source ended and the buffer is drained.
    fn finished(&self) -> Result<BlocksPiece> {
        match self.buffer.terminal() {
            Some(Terminal::Eof) => Ok(BlocksPiece::EOF),
            Some(terminal) => Err(terminal.replay()),
            None => Err(WrapError::Other(
                "Block reader finished without a terminal state".to_string(),
            )),
        }
    }

    /// Reads once from the source, using `dst` as scratch space.
    fn fill_from_source(&mut self, dst: &mut [u8]) -> Result<()> {
        match self.source.read(dst) {
            Ok(0) => {
                debug!("Source exhausted with {} bytes buffered", self.buffer.len());
                self.buffer.set_terminal(Terminal::Eof);
            }
            Ok(read) => self.buffer.extend(&dst[..read]),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
                ) =>
            {
                return Err(WrapError::Io(e));
            }
            Err(e) => {
                warn!(
                    "Source failed with {} bytes buffered, draining before reporting: {}",
                    self.buffer.len(),
                    e
                );
                self.buffer.set_terminal(Terminal::failed(&WrapError::Io(e)));
            }
        }
        Ok(())
    }

    /// Returns the block size this reader aligns to.
    pub fn block_size(&self) -> usize {
        self.buffer.block_size()
    }

    /// Returns the number of bytes read from the source but not yet delivered.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Gets a reference to the underlying source.
    pub fn get_ref(&self) -> &Source {
        &self.source
    }

    /// Gets a mutable reference to the underlying source.
    pub fn get_mut(&mut self) -> &mut Source {
        &mut self.source
    }

    /// Returns the underlying source, consuming self. Buffered bytes are dropped.
    pub fn into_inner(self) -> Source {
        self.source
    }
}

impl<Source: Read> Read for BlockReader<Source> {
    /// Reads whole blocks, looping over [`BlocksPiece::Pending`] so that `Ok(0)`
    /// only ever means end of stream or a destination shorter than one block.
    ///
    /// `read_to_end` and `read_to_string` never hit the short destination case, they
    /// drive [`BlockReader::read_blocks`] with a scratch buffer of whole blocks.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.read_blocks(buf)? {
                BlocksPiece::Blocks(n) => return Ok(n),
                BlocksPiece::Starved | BlocksPiece::EOF => return Ok(0),
                BlocksPiece::Pending => continue,
            }
        }
    }

    fn read_to_end(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        let scratch_len = self
            .buffer
            .align(READ_TO_END_BUFFER_SIZE)
            .max(self.buffer.block_size());
        let mut scratch = vec![0u8; scratch_len];
        let start = buf.len();

        loop {
            match self.read_blocks(&mut scratch) {
                Ok(BlocksPiece::Blocks(n)) => buf.extend_from_slice(&scratch[..n]),
                Ok(BlocksPiece::Pending) => {}
                Ok(BlocksPiece::EOF) => return Ok(buf.len() - start),
                Ok(BlocksPiece::Starved) => {
                    return Err(WrapError::Other(format!(
                        "Scratch buffer of {} bytes is shorter than block size {}",
                        scratch_len,
                        self.buffer.block_size()
                    ))
                    .into());
                }
                Err(WrapError::Io(e)) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn read_to_string(&mut self, buf: &mut String) -> io::Result<usize> {
        let mut bytes = Vec::new();
        let n = self.read_to_end(&mut bytes)?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        buf.push_str(text);
        Ok(n)
    }
}

// Methods for testing only
#[cfg(test)]
impl<Source: Read> BlockReader<Source> {
    /// Puts the reader in an arbitrary state (testing only)
    pub(crate) fn with_state(
        block_size: usize,
        source: Source,
        buffered: &[u8],
        terminal: Option<Terminal>,
    ) -> Self {
        let mut buffer = BlockBuffer::new(block_size);
        buffer.extend(buffered);
        if let Some(terminal) = terminal {
            buffer.set_terminal(terminal);
        }
        Self { source, buffer }
    }

    /// Get the buffered bytes (testing only)
    pub(crate) fn buffered_bytes(&self) -> &[u8] {
        self.buffer.as_slice()
    }
}
