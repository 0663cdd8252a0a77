//! Transparent observing decorators.
//!
//! [`WrapReader`] and [`WrapWriter`] pass every call straight through to the wrapped
//! source or sink and hand the bytes that actually moved to a [`ByteObserver`]. They do
//! no buffering of their own.

use std::io::{self, Read, Write};

use crate::constants::READ_TO_END_BUFFER_SIZE;
use crate::observer::ByteObserver;

/// A reader that shows every chunk it reads to an observer.
///
/// Reads that return at least one byte run through the observer before they are
/// returned. If the observer fails, the read fails with the observer's error and the
/// bytes are not handed to the caller.
pub struct WrapReader<Source: Read, O: ByteObserver> {
    source: Source,
    observer: O,
}

impl<Source: Read, O: ByteObserver> WrapReader<Source, O> {
    /// Wraps `source` so that `observer` sees every byte read from it.
    pub fn new(observer: O, source: Source) -> Self {
        Self { source, observer }
    }

    /// Gets a reference to the observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Gets a mutable reference to the observer.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Gets a reference to the underlying source.
    pub fn get_ref(&self) -> &Source {
        &self.source
    }

    /// Gets a mutable reference to the underlying source.
    ///
    /// Bytes read directly from the source bypass the observer.
    pub fn get_mut(&mut self) -> &mut Source {
        &mut self.source
    }

    /// Returns the underlying source, consuming self.
    pub fn into_inner(self) -> Source {
        self.source
    }

    /// Returns the underlying source and the observer, consuming self.
    pub fn into_parts(self) -> (Source, O) {
        (self.source, self.observer)
    }
}

impl<Source: Read, O: ByteObserver> Read for WrapReader<Source, O> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.source.read(buf)?;
        if n > 0 {
            self.observer.observe(&buf[..n])?;
        }
        Ok(n)
    }

    /// Reads in chunks of [`READ_TO_END_BUFFER_SIZE`] bytes. The default starts with a
    /// 32 byte read, which a block-aligning source would answer as end of stream.
    fn read_to_end(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        let mut scratch = vec![0u8; READ_TO_END_BUFFER_SIZE];
        let start = buf.len();

        loop {
            match self.read(&mut scratch) {
                Ok(0) => return Ok(buf.len() - start),
                Ok(n) => buf.extend_from_slice(&scratch[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
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

/// A writer that shows every chunk the sink accepts to an observer.
///
/// The observer sees exactly the bytes the sink reported as written. A short write
/// followed by a retry of the remainder therefore never shows the same byte twice, and
/// bytes the sink refused are never observed.
pub struct WrapWriter<Sink: Write, O: ByteObserver> {
    sink: Sink,
    observer: O,
}

impl<Sink: Write, O: ByteObserver> WrapWriter<Sink, O> {
    /// Wraps `sink` so that `observer` sees every byte written to it.
    pub fn new(observer: O, sink: Sink) -> Self {
        Self { sink, observer }
    }

    /// Gets a reference to the observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Gets a mutable reference to the observer.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Gets a reference to the underlying sink.
    pub fn get_ref(&self) -> &Sink {
        &self.sink
    }

    /// Gets a mutable reference to the underlying sink.
    ///
    /// Bytes written directly to the sink bypass the observer.
    pub fn get_mut(&mut self) -> &mut Sink {
        &mut self.sink
    }

    /// Returns the underlying sink, consuming self.
    pub fn into_inner(self) -> Sink {
        self.sink
    }

    /// Returns the underlying sink and the observer, consuming self.
    pub fn into_parts(self) -> (Sink, O) {
        (self.sink, self.observer)
    }
}

impl<Sink: Write, O: ByteObserver> Write for WrapWriter<Sink, O> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.sink.write(buf)?;
        if n > 0 {
            self.observer.observe(&buf[..n])?;
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}
