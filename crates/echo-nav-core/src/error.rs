//! Error types for echo-nav-core

use thiserror::Error;

/// Result type alias using echo-nav-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in echo-nav-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote document failed structural validation
    #[error("Invalid sync config: {0}")]
    InvalidConfig(String),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote store unreachable or rejected the call
    #[error("Remote store error: {0}")]
    Remote(String),

    /// Local store failed to read or write
    #[error("Local storage error: {0}")]
    Storage(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Remote store has no credentials
    #[error("Not signed in to the remote store")]
    NotAuthenticated,

    /// Download requested before any remote document exists
    #[error("No remote config document found")]
    MissingRemoteHandle,

    /// Conflict resolution requested with nothing pending
    #[error("No pending conflict to resolve")]
    NoPendingConflict,

    /// Another sync operation is already running
    #[error("A sync operation is already in progress")]
    SyncInProgress,
}

impl Error {
    /// Whether this failure belongs to a sync attempt (status `Error`, logged
    /// to history) rather than a caller mistake rejected up front.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::NotAuthenticated
                | Self::MissingRemoteHandle
                | Self::NoPendingConflict
                | Self::SyncInProgress
                | Self::InvalidInput(_)
        )
    }
}
