//! The broadcaster loop
//!
//! Drains the ingestion queues, encodes each event once, and fans the
//! encoded message out to every registered client's output queue.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crate::capture::{self, CaptureEvent, CaptureSink, IngestReceiver, MediaKind};
use crate::registry::ClientRegistry;
use crate::stats::ThroughputStats;
use crate::wire;

use super::config::PipelineConfig;

/// Central fan-out loop of the pipeline
///
/// One broadcaster runs per process. Each iteration services the audio
/// queue before the video queue: audio glitches are perceptually worse
/// than a skipped frame, and audio payloads are small enough that the
/// priority costs almost no video latency.
///
/// The loop never blocks on a client. A slow client's queue evicts its
/// own oldest message; a stalled client affects only itself.
pub struct Broadcaster {
    config: PipelineConfig,
    registry: Arc<ClientRegistry>,
    audio_rx: IngestReceiver,
    video_rx: IngestReceiver,
    stats: ThroughputStats,
    last_report: Instant,
}

impl Broadcaster {
    /// Create a broadcaster from existing ingestion receivers
    pub fn new(
        config: PipelineConfig,
        registry: Arc<ClientRegistry>,
        video_rx: IngestReceiver,
        audio_rx: IngestReceiver,
    ) -> Self {
        Self {
            config,
            registry,
            audio_rx,
            video_rx,
            stats: ThroughputStats::new(),
            last_report: Instant::now(),
        }
    }

    /// Create a broadcaster plus the capture sinks that feed it
    ///
    /// Ingestion queue capacities come from the config. Returns the
    /// broadcaster and the (video, audio) sinks for the capture
    /// collaborators.
    pub fn with_sources(
        config: PipelineConfig,
        registry: Arc<ClientRegistry>,
    ) -> (Self, CaptureSink, CaptureSink) {
        let (video_sink, video_rx) =
            capture::channel(MediaKind::Video, config.video_ingest_capacity);
        let (audio_sink, audio_rx) =
            capture::channel(MediaKind::Audio, config.audio_ingest_capacity);

        let broadcaster = Self::new(config, registry, video_rx, audio_rx);
        (broadcaster, video_sink, audio_sink)
    }

    /// The registry this broadcaster fans out to
    pub fn registry(&self) -> &Arc<ClientRegistry> {
        &self.registry
    }

    /// Run until the process shuts down
    pub async fn run(mut self) {
        tracing::info!(
            video_capacity = self.config.video_ingest_capacity,
            audio_capacity = self.config.audio_ingest_capacity,
            client_capacity = self.config.client_queue_capacity,
            "broadcaster started"
        );

        loop {
            self.tick().await;
        }
    }

    /// Run until the given future resolves
    pub async fn run_until<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("broadcaster stopped");
                    return;
                }
                _ = self.tick() => {}
            }
        }
    }

    /// One loop iteration: audio first, then video, then bookkeeping
    async fn tick(&mut self) {
        let mut serviced = false;

        if let Some(event) = self.audio_rx.try_recv() {
            self.dispatch(event).await;
            serviced = true;
        }

        if let Some(event) = self.video_rx.try_recv() {
            self.dispatch(event).await;
            serviced = true;
        }

        if self.last_report.elapsed() >= self.config.stats_interval {
            self.report().await;
        }

        if serviced {
            // stay cooperative between bursts
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.config.idle_backoff).await;
        }
    }

    /// Encode one event and fan it out to every registered client
    async fn dispatch(&mut self, event: CaptureEvent) {
        let payload_len = event.payload_len();
        let message = wire::encode(&event);

        let outcome = self.registry.broadcast(message).await;
        self.stats.record(payload_len, outcome.evicted);

        tracing::trace!(
            kind = %event.kind,
            timestamp = event.timestamp,
            bytes = payload_len,
            delivered = outcome.delivered,
            evicted = outcome.evicted,
            "event dispatched"
        );
    }

    async fn report(&mut self) {
        let clients = self.registry.client_count().await;

        tracing::info!(
            clients,
            audio_depth = self.audio_rx.depth(),
            video_depth = self.video_rx.depth(),
            messages = self.stats.messages(),
            mean_payload = self.stats.mean_payload(),
            evictions = self.stats.evictions(),
            "broadcast throughput"
        );

        self.stats.reset();
        self.last_report = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;

    use crate::client::OutputQueue;
    use crate::registry::ClientHandle;

    use super::*;

    fn test_config() -> PipelineConfig {
        PipelineConfig::default().idle_backoff(Duration::from_micros(50))
    }

    /// Register a client without a sender so its queue can be inspected
    async fn attach_probe(registry: &ClientRegistry, capacity: usize) -> Arc<OutputQueue> {
        let queue = Arc::new(OutputQueue::new(capacity));
        let handle = ClientHandle::new(registry.allocate_id(), Arc::clone(&queue));
        registry.register(handle).await.unwrap();
        queue
    }

    async fn drain(queue: &OutputQueue) -> Vec<Bytes> {
        let mut messages = Vec::new();
        for _ in 0..queue.len() {
            match queue.pop().await {
                Some(message) => messages.push(message),
                None => break,
            }
        }
        messages
    }

    /// Wait until the queue holds `n` messages or the deadline passes
    async fn wait_for_len(queue: &OutputQueue, n: usize) {
        for _ in 0..200 {
            if queue.len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("queue never reached {} messages", n);
    }

    #[tokio::test]
    async fn test_audio_serviced_before_video() {
        let registry = Arc::new(ClientRegistry::new());
        let (broadcaster, video_sink, audio_sink) =
            Broadcaster::with_sources(test_config(), Arc::clone(&registry));
        let probe = attach_probe(&registry, 8).await;

        // Both queues pending before the loop starts
        assert!(video_sink.push(CaptureEvent::video(1.0, 2, 2, Bytes::from_static(&[1]))));
        assert!(audio_sink.push(CaptureEvent::audio(2.0, Bytes::from_static(&[2]))));

        let worker = tokio::spawn(broadcaster.run());
        wait_for_len(&probe, 2).await;
        worker.abort();

        let messages = drain(&probe).await;
        assert_eq!(messages[0][0], wire::AUDIO_TAG);
        assert_eq!(messages[1][0], wire::VIDEO_TAG);
    }

    #[tokio::test]
    async fn test_video_flows_without_audio_producer() {
        let registry = Arc::new(ClientRegistry::new());
        let (broadcaster, video_sink, _audio_sink) =
            Broadcaster::with_sources(test_config(), Arc::clone(&registry));
        let probe = attach_probe(&registry, 8).await;

        let worker = tokio::spawn(broadcaster.run());
        for n in 0..3 {
            video_sink.push(CaptureEvent::video(n as f64, 2, 2, Bytes::from_static(&[7])));
        }

        wait_for_len(&probe, 3).await;
        worker.abort();
    }

    #[tokio::test]
    async fn test_run_until_stops() {
        let registry = Arc::new(ClientRegistry::new());
        let (broadcaster, _video_sink, _audio_sink) =
            Broadcaster::with_sources(test_config(), registry);

        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let worker = tokio::spawn(broadcaster.run_until(async {
            let _ = stop_rx.await;
        }));

        stop_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), worker)
            .await
            .expect("broadcaster did not stop")
            .unwrap();
    }
}
