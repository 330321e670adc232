//! Client registry implementation
//!
//! The central registry of currently-connected clients. Mutated by the
//! transport collaborator on connect/disconnect, read by the
//! broadcaster on every fan-out.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::client::{ClientId, OutputQueue, PushOutcome, Sender};
use crate::transport::MediaTransport;

use super::error::RegistryError;

/// Handle to one connected client, stored in the registry
///
/// Owns the producer side of the client's output queue. The consume
/// side belongs exclusively to the client's sender task.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: ClientId,
    queue: Arc<OutputQueue>,
}

impl ClientHandle {
    /// Create a handle from an id and its output queue
    pub fn new(id: ClientId, queue: Arc<OutputQueue>) -> Self {
        Self { id, queue }
    }

    /// This client's id
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// This client's output queue
    pub fn queue(&self) -> &Arc<OutputQueue> {
        &self.queue
    }

    /// Offer a message to this client's queue
    pub fn push(&self, message: Bytes) -> PushOutcome {
        self.queue.push(message)
    }
}

/// Result of one fan-out pass over the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Clients whose queue accepted the message
    pub delivered: usize,
    /// Clients where the oldest pending message was evicted to make room
    pub evicted: usize,
    /// Clients whose queue was already closed
    pub dropped: usize,
}

/// Registry of currently-connected clients
///
/// Thread-safe via `RwLock`: connect/disconnect take the write lock,
/// the broadcaster's fan-out takes the read lock, so an iteration
/// observes a consistent snapshot — a client joining or leaving
/// mid-broadcast is either fully included or fully excluded.
pub struct ClientRegistry {
    clients: RwLock<HashMap<ClientId, ClientHandle>>,
    next_id: AtomicU64,
}

impl ClientRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Allocate a process-unique client id
    pub fn allocate_id(&self) -> ClientId {
        ClientId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Add a client to the registry
    ///
    /// The client becomes eligible for broadcast output as soon as this
    /// returns. Ids from [`allocate_id`](Self::allocate_id) never
    /// collide; reusing one is an error.
    pub async fn register(&self, handle: ClientHandle) -> Result<(), RegistryError> {
        let mut clients = self.clients.write().await;

        if clients.contains_key(&handle.id()) {
            return Err(RegistryError::DuplicateClient(handle.id()));
        }

        tracing::info!(
            client = %handle.id(),
            clients = clients.len() + 1,
            "client registered"
        );
        clients.insert(handle.id(), handle);
        Ok(())
    }

    /// Remove a client and close its output queue
    ///
    /// Closing the queue terminates the client's sender. Idempotent:
    /// removing an unknown id is a no-op.
    pub async fn unregister(&self, id: ClientId) {
        let mut clients = self.clients.write().await;

        if let Some(handle) = clients.remove(&id) {
            handle.queue().close();
            tracing::info!(client = %id, clients = clients.len(), "client unregistered");
        }
    }

    /// Visit every registered client under a consistent snapshot
    pub async fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&ClientHandle),
    {
        let clients = self.clients.read().await;
        for handle in clients.values() {
            f(handle);
        }
    }

    /// Fan one encoded message out to every registered client
    ///
    /// A full queue evicts its own oldest message, a closed queue drops
    /// the message; neither outcome affects the other clients.
    pub async fn broadcast(&self, message: Bytes) -> BroadcastOutcome {
        let mut outcome = BroadcastOutcome::default();

        self.for_each(|handle| match handle.push(message.clone()) {
            PushOutcome::Enqueued => outcome.delivered += 1,
            PushOutcome::Evicted => {
                outcome.delivered += 1;
                outcome.evicted += 1;
                tracing::trace!(client = %handle.id(), "output queue full, evicted oldest");
            }
            PushOutcome::Dropped => {
                outcome.dropped += 1;
            }
        })
        .await;

        outcome
    }

    /// Number of currently registered clients
    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Connect hook for the transport collaborator
    ///
    /// Allocates an id, registers an output queue for it, and spawns
    /// the client's sender. Registration completes before the id is
    /// returned, so no broadcast iteration can target a half-connected
    /// client. The join handle resolves when the sender terminates.
    pub async fn connect<T: MediaTransport>(
        self: &Arc<Self>,
        transport: &Arc<T>,
        queue_capacity: usize,
    ) -> (ClientId, JoinHandle<()>) {
        let id = self.allocate_id();
        let queue = Arc::new(OutputQueue::new(queue_capacity));

        // allocate_id never hands out the same id twice
        let _ = self.register(ClientHandle::new(id, Arc::clone(&queue))).await;

        let sender = Sender::new(id, queue, Arc::clone(transport), Arc::clone(self));
        (id, sender.spawn())
    }

    /// Disconnect hook for the transport collaborator
    ///
    /// The client's sender terminates, its queue is released, and the
    /// broadcaster stops targeting it.
    pub async fn disconnect(&self, id: ClientId) {
        self.unregister(id).await;
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(registry: &ClientRegistry, capacity: usize) -> ClientHandle {
        ClientHandle::new(registry.allocate_id(), Arc::new(OutputQueue::new(capacity)))
    }

    #[tokio::test]
    async fn test_register_unregister() {
        let registry = ClientRegistry::new();
        let client = handle(&registry, 4);
        let id = client.id();

        registry.register(client).await.unwrap();
        assert_eq!(registry.client_count().await, 1);

        registry.unregister(id).await;
        assert_eq!(registry.client_count().await, 0);
    }

    #[tokio::test]
    async fn test_register_duplicate() {
        let registry = ClientRegistry::new();
        let client = handle(&registry, 4);
        let dup = client.clone();

        registry.register(client).await.unwrap();
        let result = registry.register(dup).await;

        assert!(matches!(result, Err(RegistryError::DuplicateClient(_))));
    }

    #[tokio::test]
    async fn test_unregister_unknown_is_noop() {
        let registry = ClientRegistry::new();
        let id = registry.allocate_id();

        // No registration happened; must not error or panic
        registry.unregister(id).await;
        registry.unregister(id).await;
        assert_eq!(registry.client_count().await, 0);
    }

    #[tokio::test]
    async fn test_unregister_closes_queue() {
        let registry = ClientRegistry::new();
        let client = handle(&registry, 4);
        let id = client.id();
        let queue = Arc::clone(client.queue());

        registry.register(client).await.unwrap();
        registry.unregister(id).await;

        assert!(queue.is_closed());
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_clients() {
        let registry = ClientRegistry::new();
        let a = handle(&registry, 4);
        let b = handle(&registry, 4);
        let queue_a = Arc::clone(a.queue());
        let queue_b = Arc::clone(b.queue());

        registry.register(a).await.unwrap();
        registry.register(b).await.unwrap();

        let outcome = registry.broadcast(Bytes::from_static(&[9])).await;

        assert_eq!(outcome.delivered, 2);
        assert_eq!(outcome.evicted, 0);
        assert_eq!(queue_a.len(), 1);
        assert_eq!(queue_b.len(), 1);
    }

    #[tokio::test]
    async fn test_broadcast_counts_evictions() {
        let registry = ClientRegistry::new();
        let client = handle(&registry, 1);
        registry.register(client).await.unwrap();

        registry.broadcast(Bytes::from_static(&[1])).await;
        let outcome = registry.broadcast(Bytes::from_static(&[2])).await;

        assert_eq!(outcome.delivered, 1);
        assert_eq!(outcome.evicted, 1);
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_registry() {
        let registry = ClientRegistry::new();
        let outcome = registry.broadcast(Bytes::from_static(&[1])).await;

        assert_eq!(outcome, BroadcastOutcome::default());
    }

    #[tokio::test]
    async fn test_allocated_ids_unique() {
        let registry = ClientRegistry::new();
        let first = registry.allocate_id();
        let second = registry.allocate_id();

        assert_ne!(first, second);
    }
}
