//! Running I/O statistics.
//!
//! A [`Stats`] counter is updated on every read or write that moves at least one byte.
//! It is shared through an `Arc` and owns its own mutex, so several decorators (possibly
//! on different threads) may feed the same counter.

use std::fmt;
use std::io::{Read, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Result, WrapError};
use crate::observer::ByteObserver;
use crate::wrap::{WrapReader, WrapWriter};

/// A snapshot of the counters kept by [`Stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Counters {
    /// The total number of bytes that have passed through.
    pub total: usize,
    /// The average number of bytes per call, `total / calls` in floating point.
    ///
    /// The fraction is kept rather than truncated to whole bytes, so 10 bytes over 4
    /// calls averages 2.5.
    pub average: f64,
    /// The number of calls that moved at least one byte.
    pub calls: usize,
}

impl fmt::Display for Counters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Total: {}, Average: {:.6}, Calls: {}]",
            self.total, self.average, self.calls
        )
    }
}

/// Thread-safe statistics about the I/O passing through a decorator.
#[derive(Debug, Default)]
pub struct Stats {
    counters: Mutex<Counters>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the counters for reading.
    ///
    /// Decorators feeding this counter block on their next call until the guard is
    /// dropped.
    pub fn lock(&self) -> Result<MutexGuard<'_, Counters>> {
        self.counters
            .lock()
            .map_err(|e| WrapError::Other(format!("Failed to lock stats mutex: {}", e)))
    }

    /// Returns a copy of the current counters.
    pub fn snapshot(&self) -> Result<Counters> {
        Ok(*self.lock()?)
    }

    /// Records one call that moved `bytes`.
    pub fn update(&self, bytes: &[u8]) -> Result<()> {
        let mut counters = self.lock()?;
        counters.total += bytes.len();
        counters.calls += 1;
        counters.average = counters.total as f64 / counters.calls as f64;
        Ok(())
    }
}

/// Observer that feeds a shared [`Stats`] counter.
#[derive(Debug, Clone)]
pub struct StatsObserver {
    stats: Arc<Stats>,
}

impl StatsObserver {
    pub fn new(stats: Arc<Stats>) -> Self {
        Self { stats }
    }

    /// Gets the counter this observer updates.
    pub fn stats(&self) -> &Arc<Stats> {
        &self.stats
    }
}

impl ByteObserver for StatsObserver {
    fn observe(&mut self, bytes: &[u8]) -> Result<()> {
        self.stats.update(bytes)
    }
}

/// Wraps `source` with a fresh statistics counter, returning both.
pub fn stats_reader<Source: Read>(source: Source) -> (Arc<Stats>, WrapReader<Source, StatsObserver>) {
    let stats = Arc::new(Stats::new());
    let reader = WrapReader::new(StatsObserver::new(Arc::clone(&stats)), source);
    (stats, reader)
}

/// Wraps `sink` with a fresh statistics counter, returning both.
pub fn stats_writer<Sink: Write>(sink: Sink) -> (Arc<Stats>, WrapWriter<Sink, StatsObserver>) {
    let stats = Arc::new(Stats::new());
    let writer = WrapWriter::new(StatsObserver::new(Arc::clone(&stats)), sink);
    (stats, writer)
}
