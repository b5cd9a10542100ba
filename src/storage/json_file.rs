//! Flat JSON file storage.
//!
//! One file holds one conversation as a JSON array of
//! `{"id", "sender", "content"}` objects in display order. Every save rewrites
//! the whole file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use tokio::fs;
use tracing::{debug, info};

use super::traits::{Storage, decode};
use crate::conversation::{Message, Seed};
use crate::error::StorageError;

/// Default file name, relative to the working directory.
pub const DEFAULT_HISTORY_FILE: &str = "conversation_history.json";

/// Conversation stored in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    seed: Seed,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seed: Seed::default(),
        }
    }

    /// Use `seed` when the file does not exist yet.
    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Storage for JsonFileStorage {
    async fn load(&self) -> Result<Vec<Message>, StorageError> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), seed = %self.seed, "No history file, using seed conversation");
                return Ok(self.seed.messages());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        // A file that was created but never written counts as "nothing stored".
        if text.trim().is_empty() {
            info!(path = %self.path.display(), seed = %self.seed, "History file is empty, using seed conversation");
            return Ok(self.seed.messages());
        }

        let messages = decode(&self.path, &text)?;
        debug!(path = %self.path.display(), count = messages.len(), "History loaded");
        Ok(messages)
    }

    async fn save(&self, messages: &[Message]) -> Result<(), StorageError> {
        write_json(&self.path, messages).await?;
        debug!(path = %self.path.display(), count = messages.len(), "History saved");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Write a timestamped copy of `messages` into `dir` as
/// `conversation_<YYYYmmdd_HHMMSS>.json` and return its path.
///
/// An existing file with the same name gets a numeric suffix instead of being
/// overwritten.
pub async fn write_snapshot(messages: &[Message], dir: &Path) -> Result<PathBuf, StorageError> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let mut path = dir.join(format!("conversation_{stamp}.json"));
    let mut n = 1;
    while fs::try_exists(&path)
        .await
        .map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?
    {
        path = dir.join(format!("conversation_{stamp}_{n}.json"));
        n += 1;
    }

    write_json(&path, messages).await?;
    info!(path = %path.display(), count = messages.len(), "Conversation snapshot written");
    Ok(path)
}

async fn write_json(path: &Path, messages: &[Message]) -> Result<(), StorageError> {
    let body = serde_json::to_string_pretty(messages)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| StorageError::Write {
                path: path.to_path_buf(),
                source,
            })?;
    }
    fs::write(path, body)
        .await
        .map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })
}

// ── Tests ───────────────────────────────────────────────────────────
