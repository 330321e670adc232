//! Bounded ingestion channel between a capture producer and the broadcaster
//!
//! One channel exists per media kind. The producer side never blocks:
//! when the queue is full the incoming event is dropped so capture keeps
//! real-time pace. The consumer side is polled non-blocking by the
//! broadcaster.

use tokio::sync::mpsc;

use super::event::{CaptureEvent, MediaKind};

/// Create a bounded ingestion channel for one media kind
///
/// The sink goes to the capture collaborator, the receiver to the
/// broadcaster. Single producer, single consumer.
pub fn channel(kind: MediaKind, capacity: usize) -> (CaptureSink, IngestReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (CaptureSink { kind, tx }, IngestReceiver { kind, rx })
}

/// Producer handle for one media kind's ingestion queue
#[derive(Debug)]
pub struct CaptureSink {
    kind: MediaKind,
    tx: mpsc::Sender<CaptureEvent>,
}

impl CaptureSink {
    /// Offer an event to the pipeline without blocking
    ///
    /// Returns whether the event was accepted. `false` means it was
    /// dropped: the queue was full, the broadcaster is gone, or the
    /// event's kind does not match this sink. Callers do not retry.
    pub fn push(&self, event: CaptureEvent) -> bool {
        if event.kind != self.kind {
            debug_assert_eq!(event.kind, self.kind, "event kind does not match sink");
            tracing::warn!(
                sink = %self.kind,
                event = %event.kind,
                "event kind does not match sink, dropping"
            );
            return false;
        }

        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(kind = %self.kind, "ingest queue full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(kind = %self.kind, "broadcaster gone, dropping event");
                false
            }
        }
    }

    /// The media kind this sink accepts
    pub fn kind(&self) -> MediaKind {
        self.kind
    }
}

/// Consumer handle for one media kind's ingestion queue
///
/// Owned exclusively by the broadcaster.
#[derive(Debug)]
pub struct IngestReceiver {
    kind: MediaKind,
    rx: mpsc::Receiver<CaptureEvent>,
}

impl IngestReceiver {
    /// Pop the next pending event, if any, without waiting
    pub fn try_recv(&mut self) -> Option<CaptureEvent> {
        self.rx.try_recv().ok()
    }

    /// Number of events currently queued
    pub fn depth(&self) -> usize {
        self.rx.len()
    }

    /// The media kind this receiver yields
    pub fn kind(&self) -> MediaKind {
        self.kind
    }
}
