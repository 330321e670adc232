//! Throughput counters for broadcaster diagnostics

use std::time::{Duration, Instant};

/// Interval throughput counters
///
/// Accumulates between two diagnostic reports and is reset after each
/// one. Owned by the broadcaster; nothing here is shared or persisted.
#[derive(Debug)]
pub struct ThroughputStats {
    started: Instant,
    messages: u64,
    payload_bytes: u64,
    evictions: u64,
}

impl ThroughputStats {
    /// Start a fresh interval
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            messages: 0,
            payload_bytes: 0,
            evictions: 0,
        }
    }

    /// Record one broadcast event
    pub fn record(&mut self, payload_len: usize, evictions: usize) {
        self.messages += 1;
        self.payload_bytes += payload_len as u64;
        self.evictions += evictions as u64;
    }

    /// Messages broadcast this interval
    pub fn messages(&self) -> u64 {
        self.messages
    }

    /// Total payload bytes broadcast this interval
    pub fn payload_bytes(&self) -> u64 {
        self.payload_bytes
    }

    /// Client-queue evictions observed this interval
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Mean payload size in bytes, 0 when nothing was broadcast
    pub fn mean_payload(&self) -> u64 {
        if self.messages > 0 {
            self.payload_bytes / self.messages
        } else {
            0
        }
    }

    /// Messages per second over the interval so far
    pub fn message_rate(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.messages as f64 / secs
        } else {
            0.0
        }
    }

    /// Time since the interval started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Reset all counters and restart the interval clock
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ThroughputStats {
    fn default() -> Self {
        Self::new()
    }
}
