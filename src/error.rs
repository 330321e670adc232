//! Crate-level error type
//!
//! Each failure domain has its own error enum; this aggregates them for
//! callers that thread pipeline results through one `?` chain. Nothing
//! in the pipeline treats these as fatal: overflow is absorbed by the
//! queues and a transport failure only removes its own client.

use std::fmt;

use crate::registry::RegistryError;
use crate::transport::TransportError;
use crate::wire::WireError;

/// Convenience alias for `Result<T, Error>`
pub type Result<T> = std::result::Result<T, Error>;

/// Any pipeline error
#[derive(Debug)]
pub enum Error {
    /// Wire message decoding failed
    Wire(WireError),
    /// Registry operation failed
    Registry(RegistryError),
    /// Message delivery to a peer failed
    Transport(TransportError),
    /// Underlying I/O error
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Wire(e) => write!(f, "wire error: {}", e),
            Error::Registry(e) => write!(f, "registry error: {}", e),
            Error::Transport(e) => write!(f, "transport error: {}", e),
            Error::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Wire(e) => Some(e),
            Error::Registry(e) => Some(e),
            Error::Transport(e) => Some(e),
            Error::Io(e) => Some(e),
        }
    }
}

impl From<WireError> for Error {
    fn from(e: WireError) -> Self {
        Error::Wire(e)
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Error::Registry(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_domain() {
        let error = Error::from(WireError::Truncated);
        assert!(error.to_string().starts_with("wire error"));

        let error = Error::from(TransportError::Closed);
        assert!(error.to_string().starts_with("transport error"));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;

        let error = Error::from(WireError::UnknownTag(0x00));
        assert!(error.source().is_some());
    }
}
