//! Binary message codec
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! Video: 'V' | timestamp f64 | width u16 | height u16 | JPEG bytes
//! Audio: 'A' | timestamp f64 | PCM s16le bytes
//! ```
//!
//! The header is fixed-width per kind, so a client can decode from the
//! tag byte alone. No schema exchange, no framing delimiter search.

use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::capture::{CaptureEvent, MediaKind};

/// Tag byte for video messages
pub const VIDEO_TAG: u8 = b'V';

/// Tag byte for audio messages
pub const AUDIO_TAG: u8 = b'A';

/// Header length of a video message (tag + timestamp + dimensions)
pub const VIDEO_HEADER_LEN: usize = 1 + 8 + 2 + 2;

/// Header length of an audio message (tag + timestamp)
pub const AUDIO_HEADER_LEN: usize = 1 + 8;

/// Encode a capture event into a wire message
///
/// Pure and infallible for any constructible event.
pub fn encode(event: &CaptureEvent) -> Bytes {
    match event.kind {
        MediaKind::Video => {
            let mut buf = BytesMut::with_capacity(VIDEO_HEADER_LEN + event.payload.len());
            buf.put_u8(VIDEO_TAG);
            buf.put_f64_le(event.timestamp);
            buf.put_u16_le(event.width);
            buf.put_u16_le(event.height);
            buf.extend_from_slice(&event.payload);
            buf.freeze()
        }
        MediaKind::Audio => {
            let mut buf = BytesMut::with_capacity(AUDIO_HEADER_LEN + event.payload.len());
            buf.put_u8(AUDIO_TAG);
            buf.put_f64_le(event.timestamp);
            buf.extend_from_slice(&event.payload);
            buf.freeze()
        }
    }
}

/// Decode a wire message back into a capture event
///
/// Exact inverse of [`encode`]. Consuming clients use this to recover
/// the timestamp, dimensions, and payload.
pub fn decode(mut buf: &[u8]) -> Result<CaptureEvent, WireError> {
    if buf.is_empty() {
        return Err(WireError::Truncated);
    }

    let tag = buf.get_u8();
    match tag {
        VIDEO_TAG => {
            if buf.remaining() < VIDEO_HEADER_LEN - 1 {
                return Err(WireError::Truncated);
            }
            let timestamp = buf.get_f64_le();
            let width = buf.get_u16_le();
            let height = buf.get_u16_le();
            Ok(CaptureEvent::video(
                timestamp,
                width,
                height,
                Bytes::copy_from_slice(buf),
            ))
        }
        AUDIO_TAG => {
            if buf.remaining() < AUDIO_HEADER_LEN - 1 {
                return Err(WireError::Truncated);
            }
            let timestamp = buf.get_f64_le();
            Ok(CaptureEvent::audio(timestamp, Bytes::copy_from_slice(buf)))
        }
        other => Err(WireError::UnknownTag(other)),
    }
}

/// Error decoding a wire message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    /// Message shorter than its fixed header
    Truncated,
    /// First byte is not a known kind tag
    UnknownTag(u8),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::Truncated => write!(f, "message truncated before end of header"),
            WireError::UnknownTag(tag) => write!(f, "unknown message tag: 0x{:02X}", tag),
        }
    }
}

impl std::error::Error for WireError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_layout() {
        let event = CaptureEvent::video(1.5, 640, 480, Bytes::from_static(&[0xFF, 0xD8, 0xFF]));
        let message = encode(&event);

        assert_eq!(message.len(), VIDEO_HEADER_LEN + 3);
        assert_eq!(message[0], b'V');
        assert_eq!(&message[1..9], &1.5f64.to_le_bytes());
        assert_eq!(&message[9..11], &640u16.to_le_bytes());
        assert_eq!(&message[11..13], &480u16.to_le_bytes());
        assert_eq!(&message[13..], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_audio_layout() {
        let event = CaptureEvent::audio(2.25, Bytes::from_static(&[1, 2, 3, 4]));
        let message = encode(&event);

        assert_eq!(message.len(), AUDIO_HEADER_LEN + 4);
        assert_eq!(message[0], b'A');
        assert_eq!(&message[1..9], &2.25f64.to_le_bytes());
        assert_eq!(&message[9..], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_video_round_trip() {
        let event = CaptureEvent::video(
            1691423999.125,
            1280,
            720,
            Bytes::from_static(&[0xFF, 0xD8, 0x00, 0x7F, 0xFF, 0xD9]),
        );

        let decoded = decode(&encode(&event)).unwrap();

        assert_eq!(decoded.kind, MediaKind::Video);
        assert_eq!(decoded.timestamp, event.timestamp);
        assert_eq!(decoded.width, 1280);
        assert_eq!(decoded.height, 720);
        assert_eq!(decoded.payload, event.payload);
    }

    #[test]
    fn test_audio_round_trip() {
        let pcm: Vec<u8> = (0..64).collect();
        let event = CaptureEvent::audio(0.0625, Bytes::from(pcm.clone()));

        let decoded = decode(&encode(&event)).unwrap();

        assert_eq!(decoded.kind, MediaKind::Audio);
        assert_eq!(decoded.timestamp, 0.0625);
        assert_eq!(decoded.payload, Bytes::from(pcm));
    }

    #[test]
    fn test_empty_payload_round_trip() {
        let event = CaptureEvent::audio(1.0, Bytes::new());
        let decoded = decode(&encode(&event)).unwrap();

        assert!(decoded.payload.is_empty());
    }

    #[test]
    fn test_decode_empty_input() {
        assert_eq!(decode(&[]).unwrap_err(), WireError::Truncated);
    }

    #[test]
    fn test_decode_truncated_header() {
        assert_eq!(decode(&[b'V', 0, 0, 0]).unwrap_err(), WireError::Truncated);
        assert_eq!(decode(&[b'A', 0]).unwrap_err(), WireError::Truncated);
    }

    #[test]
    fn test_decode_unknown_tag() {
        assert_eq!(decode(&[b'X', 0, 0]).unwrap_err(), WireError::UnknownTag(b'X'));
    }
}
