//! Pipeline configuration

use std::time::Duration;

/// Pipeline tuning options
///
/// Queue capacities bound memory; a full queue drops instead of
/// blocking, so these are latency/loss trade-offs, not correctness
/// knobs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Video ingestion queue capacity (events)
    pub video_ingest_capacity: usize,

    /// Audio ingestion queue capacity (events)
    ///
    /// Audio blocks are small and frequent, so the default is much
    /// deeper than the video queue.
    pub audio_ingest_capacity: usize,

    /// Per-client output queue capacity (messages)
    pub client_queue_capacity: usize,

    /// How often the broadcaster logs a throughput diagnostic
    pub stats_interval: Duration,

    /// How long the broadcaster sleeps when both ingestion queues are
    /// empty; sub-millisecond keeps wake-up latency negligible
    pub idle_backoff: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            video_ingest_capacity: 64,
            audio_ingest_capacity: 256,
            client_queue_capacity: 64,
            stats_interval: Duration::from_secs(10),
            idle_backoff: Duration::from_micros(500),
        }
    }
}

impl PipelineConfig {
    /// Set the video ingestion queue capacity
    pub fn video_ingest_capacity(mut self, capacity: usize) -> Self {
        self.video_ingest_capacity = capacity.max(1);
        self
    }

    /// Set the audio ingestion queue capacity
    pub fn audio_ingest_capacity(mut self, capacity: usize) -> Self {
        self.audio_ingest_capacity = capacity.max(1);
        self
    }

    /// Set the per-client output queue capacity
    pub fn client_queue_capacity(mut self, capacity: usize) -> Self {
        self.client_queue_capacity = capacity.max(1);
        self
    }

    /// Set the diagnostic reporting interval
    pub fn stats_interval(mut self, interval: Duration) -> Self {
        self.stats_interval = interval;
        self
    }

    /// Set the idle backoff sleep
    pub fn idle_backoff(mut self, backoff: Duration) -> Self {
        self.idle_backoff = backoff;
        self
    }
}
