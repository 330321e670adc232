//! Self-describing wire format for broadcast messages
//!
//! Every message starts with a one-byte kind tag followed by a
//! fixed-width little-endian header, then the opaque payload. A client
//! can start decoding the instant the tag byte arrives, and video and
//! audio share one transport channel without negotiation.

mod codec;

pub use codec::{decode, encode, WireError};
pub use codec::{AUDIO_HEADER_LEN, AUDIO_TAG, VIDEO_HEADER_LEN, VIDEO_TAG};
