//! Registry error types

use crate::client::ClientId;

/// Error type for registry operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// A client with this id is already registered
    DuplicateClient(ClientId),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateClient(id) => {
                write!(f, "client already registered: {}", id)
            }
        }
    }
}

impl std::error::Error for RegistryError {}
