//! Hashing observers.
//!
//! [`DigestObserver`] feeds every observed byte into any [`digest::Update`]
//! implementation (SHA-2, SHA-3, BLAKE2, ...), which allows reading or writing a stream
//! and computing its digest in a single pass. [`HighwayObserver`] does the same with a
//! keyed HighwayHash for a cheap non-cryptographic checksum.

use std::io::{Read, Write};

use digest::Update;
use highway::{HighwayHash, HighwayHasher, Key};

use crate::constants::HIGHWAY_HASH_KEY;
use crate::error::Result;
use crate::observer::ByteObserver;
use crate::wrap::{WrapReader, WrapWriter};

/// Calculate the HighwayHash for a chunk of bytes in one shot.
pub fn highway_hash(data: &[u8]) -> u64 {
    let mut hasher = HighwayHasher::new(Key(HIGHWAY_HASH_KEY));
    hasher.append(data);
    hasher.finalize64()
}

/// Observer that feeds bytes into a digest.
#[derive(Debug, Clone, Default)]
pub struct DigestObserver<D: Update> {
    digest: D,
}

impl<D: Update> DigestObserver<D> {
    pub fn new(digest: D) -> Self {
        Self { digest }
    }

    /// Gets a reference to the digest state.
    pub fn digest(&self) -> &D {
        &self.digest
    }

    /// Returns the digest, consuming self. Finalise it to get the hash.
    pub fn into_digest(self) -> D {
        self.digest
    }
}

impl<D: Update> ByteObserver for DigestObserver<D> {
    fn observe(&mut self, bytes: &[u8]) -> Result<()> {
        self.digest.update(bytes);
        Ok(())
    }
}

/// Observer that keeps a streaming HighwayHash checksum.
///
/// The checksum of a stream equals [`highway_hash`] over all of its bytes, however they
/// were split into calls.
pub struct HighwayObserver {
    hasher: HighwayHasher,
}

impl HighwayObserver {
    pub fn new() -> Self {
        Self {
            hasher: HighwayHasher::new(Key(HIGHWAY_HASH_KEY)),
        }
    }

    /// Returns the 64-bit checksum of everything observed, consuming self.
    pub fn finalize64(self) -> u64 {
        self.hasher.finalize64()
    }
}

impl Default for HighwayObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteObserver for HighwayObserver {
    fn observe(&mut self, bytes: &[u8]) -> Result<()> {
        self.hasher.append(bytes);
        Ok(())
    }
}

/// Wraps `source` so that every byte read from it is also fed to `digest`.
pub fn hash_reader<D: Update, Source: Read>(
    digest: D,
    source: Source,
) -> WrapReader<Source, DigestObserver<D>> {
    WrapReader::new(DigestObserver::new(digest), source)
}

/// Wraps `sink` so that every byte it accepts is also fed to `digest`.
pub fn hash_writer<D: Update, Sink: Write>(
    digest: D,
    sink: Sink,
) -> WrapWriter<Sink, DigestObserver<D>> {
    WrapWriter::new(DigestObserver::new(digest), sink)
}

/// Wraps `source` with a streaming HighwayHash checksum.
pub fn highway_reader<Source: Read>(source: Source) -> WrapReader<Source, HighwayObserver> {
    WrapReader::new(HighwayObserver::new(), source)
}

/// Wraps `sink` with a streaming HighwayHash checksum.
pub fn highway_writer<Sink: Write>(sink: Sink) -> WrapWriter<Sink, HighwayObserver> {
    WrapWriter::new(HighwayObserver::new(), sink)
}
