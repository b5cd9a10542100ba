//! `Storage` trait — whole-conversation persistence.

use std::path::Path;

use async_trait::async_trait;

use crate::conversation::{Message, MessageStore};
use crate::error::StorageError;

/// Durable home for one conversation, read and written as a single unit.
///
/// There is no locking and no version check. Two sessions that load, edit and
/// save the same location race, and the later `save` overwrites the earlier
/// one's changes.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the whole conversation. Returns the seed conversation when
    /// nothing has been stored yet, and `StorageError::Corrupt` when something
    /// is stored but unreadable.
    async fn load(&self) -> Result<Vec<Message>, StorageError>;

    /// Replace the stored conversation with `messages`.
    async fn save(&self, messages: &[Message]) -> Result<(), StorageError>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// Parse a stored JSON array and check the id invariants.
pub(crate) fn decode(path: &Path, text: &str) -> Result<Vec<Message>, StorageError> {
    let messages: Vec<Message> =
        serde_json::from_str(text).map_err(|e| StorageError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    MessageStore::from_messages(messages)
        .map(MessageStore::into_messages)
        .map_err(|e| StorageError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}
