//! The byte observer capability.
//!
//! A [`ByteObserver`] is handed every chunk of bytes that crosses a decorator. It reacts
//! to the bytes (hashing them, counting them, logging them) and may reject them by
//! returning an error, but it never owns any buffering of its own.

use crate::error::Result;

/// Something that reacts to chunks of bytes passing through a stream.
///
/// Decorators only call `observe` with non-empty slices.
///
/// Any closure `FnMut(&[u8]) -> Result<()>` is an observer:
///
/// ```
/// use bytewrap::ByteObserver;
///
/// let mut seen = Vec::new();
/// let mut observer = |bytes: &[u8]| -> bytewrap::Result<()> {
///     seen.extend_from_slice(bytes);
///     Ok(())
/// };
/// observer.observe(b"abc").unwrap();
/// drop(observer);
/// assert_eq!(seen, b"abc");
/// ```
pub trait ByteObserver {
    /// React to `bytes`, optionally failing.
    fn observe(&mut self, bytes: &[u8]) -> Result<()>;
}

impl<F> ByteObserver for F
where
    F: FnMut(&[u8]) -> Result<()>,
{
    fn observe(&mut self, bytes: &[u8]) -> Result<()> {
        self(bytes)
    }
}
