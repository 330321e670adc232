//! Live capture broadcast pipeline
//!
//! `camcast-rs` multiplexes timestamped media frames from local capture
//! producers onto any number of concurrently-connected consumers with
//! low latency and bounded memory. Capture hardware and the network
//! transport stay outside the crate: producers feed [`CaptureSink`]s,
//! and a [`MediaTransport`] implementation delivers encoded messages to
//! peers.
//!
//! # Architecture
//!
//! ```text
//!  video producer ──► ingest queue ─┐
//!                                   ├─► Broadcaster ─► encode once
//!  audio producer ──► ingest queue ─┘        │
//!                                            ▼  fan out (Bytes clone)
//!                    ┌───────────────────────┼────────────────────┐
//!                    ▼                       ▼                    ▼
//!              OutputQueue #1          OutputQueue #2       OutputQueue #N
//!                    │                       │                    │
//!               Sender task             Sender task          Sender task
//!                    ▼                       ▼                    ▼
//!              MediaTransport ──────────► peers
//! ```
//!
//! Every queue is bounded and drops instead of blocking: a full
//! ingestion queue rejects the newest event so capture keeps real-time
//! pace, and a full client queue evicts its own oldest message so a
//! slow client sees gaps rather than stalling anyone else. Audio is
//! serviced before video each iteration.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bytes::Bytes;
//! use camcast_rs::{
//!     Broadcaster, CaptureEvent, ClientId, ClientRegistry, MediaTransport, PipelineConfig,
//!     TransportError,
//! };
//!
//! struct Discard;
//!
//! impl MediaTransport for Discard {
//!     async fn deliver(&self, _client: ClientId, _message: Bytes) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//! }
//!
//! # async fn run() {
//! let registry = Arc::new(ClientRegistry::new());
//! let transport = Arc::new(Discard);
//!
//! let (broadcaster, video_sink, _audio_sink) =
//!     Broadcaster::with_sources(PipelineConfig::default(), Arc::clone(&registry));
//! tokio::spawn(broadcaster.run());
//!
//! // transport-driven connect hook
//! let (_client, _sender) = registry.connect(&transport, 64).await;
//!
//! // capture collaborator feeds frames
//! video_sink.push(CaptureEvent::video(0.0, 640, 480, Bytes::from_static(b"\xFF\xD8")));
//! # }
//! ```

pub mod broadcast;
pub mod capture;
pub mod client;
pub mod error;
pub mod registry;
pub mod stats;
pub mod transport;
pub mod wire;

pub use broadcast::{Broadcaster, PipelineConfig};
pub use capture::{CaptureEvent, CaptureSink, MediaKind};
pub use client::{ClientId, OutputQueue, PushOutcome};
pub use error::{Error, Result};
pub use registry::{BroadcastOutcome, ClientHandle, ClientRegistry};
pub use transport::{MediaTransport, TransportError};
