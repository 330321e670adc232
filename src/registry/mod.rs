//! Client registry for broadcast fan-out
//!
//! The registry is the only state shared between the transport
//! collaborator (connect/disconnect) and the broadcaster (fan-out), so
//! it is the one place mutation is serialized.
//!
//! # Architecture
//!
//! ```text
//!                       Arc<ClientRegistry>
//!                  ┌──────────────────────────┐
//!                  │ clients: HashMap<        │
//!                  │   ClientId,              │
//!                  │   ClientHandle {         │
//!                  │     queue: OutputQueue,  │
//!                  │   }                      │
//!                  │ >                        │
//!                  └────────────┬─────────────┘
//!                               │
//!        ┌──────────────────────┼──────────────────────┐
//!        │                      │                      │
//!        ▼                      ▼                      ▼
//!   [Broadcaster]          [Sender #1]            [Sender #2]
//!   broadcast()            queue.pop()            queue.pop()
//!        │                      │                      │
//!        └─► handle.push() ──►  └─► transport ──► peer └─► ...
//! ```
//!
//! Messages are `bytes::Bytes`, so the per-client pushes share one
//! allocation; fan-out clones are reference-count bumps.

mod error;
mod store;

pub use error::RegistryError;
pub use store::{BroadcastOutcome, ClientHandle, ClientRegistry};
