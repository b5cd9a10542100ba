//! Error types for the conversation history service.

use std::path::PathBuf;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Conversation error: {0}")]
    Conversation(#[from] ConversationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised by the in-memory message store.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversationError {
    #[error("Message {id} not found")]
    NotFound { id: u64 },

    #[error("Message id must be positive")]
    ZeroId,

    #[error("Duplicate message id {id}")]
    DuplicateId { id: u64 },

    #[error("Message id {id} is above the largest assignable id")]
    IdOutOfRange { id: u64 },
}

/// Persistence errors.
///
/// `Corrupt` is deliberately distinct from "nothing stored yet": a file that
/// exists but does not parse is never replaced by the seed conversation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Stored conversation at {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// CSV export errors.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Exported data is not valid UTF-8: {0}")]
    Encoding(String),
}

/// Input rejected by a caller before it reaches the store.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Field {field} must not be blank")]
    Blank { field: &'static str },

    #[error("Nothing to update: provide sender or content")]
    EmptyPatch,
}

impl Error {
    /// Whether this is a missing-message error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Conversation(ConversationError::NotFound { .. }))
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
