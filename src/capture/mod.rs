//! Capture ingestion boundary
//!
//! The pipeline does not open cameras or microphones. A capture
//! collaborator (hardware adapter, test harness, replay tool) produces
//! [`CaptureEvent`]s and offers them through a [`CaptureSink`], one per
//! media kind. Each sink feeds a bounded queue drained by the
//! broadcaster.
//!
//! The contract with producers:
//!
//! - Video events arrive one per encoded still image, already resized to
//!   the output dimensions, with non-decreasing timestamps per source.
//! - Audio events arrive one per fixed-size PCM block.
//! - `push` never blocks. A full queue drops the offered event; capture
//!   cadence is preserved at the cost of a gap.
//! - A producer that stops emitting starves only its own kind. The
//!   broadcaster keeps servicing the other.
//!
//! Callback-style capture APIs are adapted outside the pipeline: the
//! adapter owns the callback and calls [`CaptureSink::push`] from it.

mod event;
mod ingest;

pub use event::{CaptureEvent, MediaKind};
pub use ingest::{channel, CaptureSink, IngestReceiver};
