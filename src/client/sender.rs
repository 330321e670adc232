//! Per-client sender task
//!
//! One sender runs per connected client, concurrently with the
//! broadcaster and every other sender. It drains the client's output
//! queue in delivery order and hands each message to the transport.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::registry::ClientRegistry;
use crate::transport::MediaTransport;

use super::{ClientId, OutputQueue};

/// Drains one client's output queue into the transport
///
/// Exits when the queue is closed (clean disconnect) or when the
/// transport reports a failure, in which case it removes its own client
/// from the registry before stopping. An empty queue only suspends the
/// sender; it never terminates it.
pub struct Sender<T> {
    id: ClientId,
    queue: Arc<OutputQueue>,
    transport: Arc<T>,
    registry: Arc<ClientRegistry>,
}

impl<T: MediaTransport> Sender<T> {
    /// Create a sender for one client
    pub fn new(
        id: ClientId,
        queue: Arc<OutputQueue>,
        transport: Arc<T>,
        registry: Arc<ClientRegistry>,
    ) -> Self {
        Self {
            id,
            queue,
            transport,
            registry,
        }
    }

    /// Spawn the sender onto the runtime
    ///
    /// The handle resolves once the sender has terminated.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        tracing::debug!(client = %self.id, "sender started");

        while let Some(message) = self.queue.pop().await {
            if let Err(e) = self.transport.deliver(self.id, message).await {
                tracing::info!(client = %self.id, error = %e, "transport failed, dropping client");
                self.registry.unregister(self.id).await;
                return;
            }
        }

        tracing::debug!(client = %self.id, "sender stopped");
    }
}
