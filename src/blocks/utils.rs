//! Common utilities for block adapters.

use std::io::{self, Write};

use crate::constants::MIN_BLOCK_SIZE;
use crate::error::{Result, WrapError};

/// Validates that the block size is usable.
///
/// # Arguments
///
/// * `block_size` - The block size to validate
///
/// # Returns
///
/// * `Result<()>` - Ok if valid, or `InvalidBlockSize` explaining why it's invalid
pub fn validate_block_size(block_size: usize) -> Result<()> {
    if block_size < MIN_BLOCK_SIZE {
        return Err(WrapError::InvalidBlockSize(block_size));
    }
    Ok(())
}

/// Rounds `len` down to the largest multiple of `block_size` that fits in it.
pub fn align_down(len: usize, block_size: usize) -> usize {
    (len / block_size) * block_size
}

/// Forwards all of `data` to `sink`.
///
/// Short writes are continued and `Interrupted` is retried. A sink that accepts zero
/// bytes fails with `WriteZero`. On failure the error carries the exact number of bytes
/// the sink accepted before it failed.
pub(crate) fn forward<Sink: Write>(sink: &mut Sink, mut data: &[u8]) -> Result<()> {
    let mut forwarded = 0;
    while !data.is_empty() {
        match sink.write(data) {
            Ok(0) => {
                return Err(WrapError::PartialForward {
                    forwarded,
                    source: io::Error::new(io::ErrorKind::WriteZero, "sink accepted zero bytes"),
                });
            }
            Ok(n) => {
                forwarded += n;
                data = &data[n..];
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(source) => return Err(WrapError::PartialForward { forwarded, source }),
        }
    }
    Ok(())
}
