//! Transport collaborator contract
//!
//! The pipeline does not speak HTTP, WebSocket, or TCP. A transport
//! collaborator owns the connections and exposes one operation to the
//! pipeline: deliver a byte message to one connected peer. In return
//! the transport drives the registry's connect/disconnect hooks.

use std::fmt;
use std::future::Future;

use bytes::Bytes;

use crate::client::ClientId;

/// Delivers encoded messages to connected peers
///
/// One implementation serves all clients; the pipeline addresses peers
/// by [`ClientId`]. `deliver` is called from per-client sender tasks,
/// so implementations must be shareable across tasks and the returned
/// future must be `Send`.
///
/// Any error is treated as terminal for that client: its sender stops
/// and the client is removed from the registry. Other clients are
/// unaffected.
pub trait MediaTransport: Send + Sync + 'static {
    /// Deliver one message to one peer
    fn deliver(
        &self,
        client: ClientId,
        message: Bytes,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Failure delivering to a peer
#[derive(Debug)]
pub enum TransportError {
    /// Peer is gone (closed the connection or was never known)
    Closed,
    /// I/O failure on the peer's connection
    Io(std::io::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Closed => write!(f, "peer connection closed"),
            TransportError::Io(e) => write!(f, "transport i/o error: {}", e),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Io(e) => Some(e),
            TransportError::Closed => None,
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        TransportError::Io(e)
    }
}
