//! In-process storage, used for ephemeral runs and tests.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::traits::Storage;
use crate::conversation::{Message, Seed};
use crate::error::StorageError;

/// Keeps the last saved conversation in memory. Until the first save, `load`
/// returns the seed.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    saved: RwLock<Option<Vec<Message>>>,
    seed: Seed,
}

impl MemoryStorage {
    pub fn new(seed: Seed) -> Self {
        Self {
            saved: RwLock::new(None),
            seed,
        }
    }

    /// Start with `messages` already stored.
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            saved: RwLock::new(Some(messages)),
            seed: Seed::default(),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load(&self) -> Result<Vec<Message>, StorageError> {
        let saved = self.saved.read().await;
        Ok(saved.clone().unwrap_or_else(|| self.seed.messages()))
    }

    async fn save(&self, messages: &[Message]) -> Result<(), StorageError> {
        *self.saved.write().await = Some(messages.to_vec());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
