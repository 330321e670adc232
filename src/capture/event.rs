//! Capture event types
//!
//! A capture event is one unit of media handed to the pipeline by a
//! capture collaborator: a JPEG still for video, or a block of raw
//! s16le PCM samples for audio.

use std::fmt;

use bytes::Bytes;

/// Kind of captured media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// JPEG-encoded video frame
    Video,
    /// Raw PCM audio block (signed 16-bit little-endian)
    Audio,
}

impl MediaKind {
    /// Lowercase label for log fields
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One unit of captured media
///
/// Cheap to clone: the payload is reference-counted `Bytes`.
///
/// `width`/`height` are the output dimensions after any capture-side
/// resize and are meaningful for video only; audio events carry zero.
/// The timestamp is seconds on the producer's clock, forwarded verbatim
/// to clients for presentation ordering. The pipeline never sequences
/// on it.
#[derive(Debug, Clone)]
pub struct CaptureEvent {
    /// Media kind
    pub kind: MediaKind,
    /// Capture time in seconds (producer's clock)
    pub timestamp: f64,
    /// Frame width in pixels (video only)
    pub width: u16,
    /// Frame height in pixels (video only)
    pub height: u16,
    /// Encoded payload (JPEG or raw PCM)
    pub payload: Bytes,
}

impl CaptureEvent {
    /// Create a video event
    pub fn video(timestamp: f64, width: u16, height: u16, payload: Bytes) -> Self {
        Self {
            kind: MediaKind::Video,
            timestamp,
            width,
            height,
            payload,
        }
    }

    /// Create an audio event
    pub fn audio(timestamp: f64, payload: Bytes) -> Self {
        Self {
            kind: MediaKind::Audio,
            timestamp,
            width: 0,
            height: 0,
            payload,
        }
    }

    /// Payload size in bytes
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}
