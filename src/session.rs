//! Session — one user's view of the conversation.
//!
//! A `Session` owns the [`MessageStore`], the current page, and a handle to
//! storage. Every user action is one call on it; callers re-read state with
//! [`Session::view`] or [`Session::messages`] afterwards instead of relying
//! on any implicit re-render.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::conversation::{
    Message, MessagePatch, MessageStore, Page, Seed, paginate, single_page, to_csv, total_pages,
};
use crate::error::Result;
use crate::storage::{Storage, write_snapshot};

/// Default number of messages per page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// How a session relates to storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Starts from the seed and never reads or writes storage.
    Ephemeral,
    /// Loads once when opened and saves after every change.
    #[default]
    Held,
    /// Reloads from storage before every call and saves after every change.
    ReloadPerRequest,
}

impl SessionMode {
    pub fn is_persistent(&self) -> bool {
        !matches!(self, Self::Ephemeral)
    }
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ephemeral => write!(f, "ephemeral"),
            Self::Held => write!(f, "held"),
            Self::ReloadPerRequest => write!(f, "reload"),
        }
    }
}

impl std::str::FromStr for SessionMode {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ephemeral" => Ok(Self::Ephemeral),
            "held" => Ok(Self::Held),
            "reload" | "reload_per_request" => Ok(Self::ReloadPerRequest),
            _ => Err(format!("Unknown session mode: {}", s)),
        }
    }
}

/// Session behaviour flags.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub mode: SessionMode,
    /// Messages per page; `None` shows everything on one page.
    pub page_size: Option<NonZeroUsize>,
    /// Conversation used by ephemeral sessions.
    pub seed: Seed,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: SessionMode::Held,
            page_size: NonZeroUsize::new(DEFAULT_PAGE_SIZE),
            seed: Seed::Factorial,
        }
    }
}

/// One user's conversation state.
pub struct Session {
    config: SessionConfig,
    storage: Arc<dyn Storage>,
    store: MessageStore,
    current_page: usize,
}

impl Session {
    /// Open a session. Persistent modes load from `storage`; ephemeral
    /// sessions start from `config.seed` and leave `storage` untouched.
    pub async fn open(config: SessionConfig, storage: Arc<dyn Storage>) -> Result<Self> {
        let messages = if config.mode.is_persistent() {
            storage.load().await?
        } else {
            config.seed.messages()
        };
        let store = MessageStore::from_messages(messages)?;

        info!(
            mode = %config.mode,
            location = %storage.location(),
            messages = store.len(),
            "Session opened"
        );

        Ok(Self {
            config,
            storage,
            store,
            current_page: 1,
        })
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// The whole conversation in display order.
    pub async fn messages(&mut self) -> Result<Vec<Message>> {
        self.refresh().await?;
        Ok(self.store.list().to_vec())
    }

    pub async fn get(&mut self, id: u64) -> Result<Message> {
        self.refresh().await?;
        Ok(self.store.get(id)?.clone())
    }

    /// The current page.
    pub async fn view(&mut self) -> Result<Page<Message>> {
        self.refresh().await?;
        Ok(self.move_to(self.current_page as i64))
    }

    /// Move to page `requested` (clamped) and return it.
    pub async fn go_to_page(&mut self, requested: i64) -> Result<Page<Message>> {
        self.refresh().await?;
        Ok(self.move_to(requested))
    }

    pub async fn next_page(&mut self) -> Result<Page<Message>> {
        self.refresh().await?;
        let current = self.window(self.current_page as i64).current_page;
        Ok(self.move_to(current as i64 + 1))
    }

    pub async fn previous_page(&mut self) -> Result<Page<Message>> {
        self.refresh().await?;
        let current = self.window(self.current_page as i64).current_page;
        Ok(self.move_to(current as i64 - 1))
    }

    /// The whole conversation as CSV.
    pub async fn export_csv(&mut self) -> Result<String> {
        self.refresh().await?;
        Ok(to_csv(self.store.list())?)
    }

    /// Write a timestamped JSON copy of the conversation into `dir`.
    pub async fn snapshot(&mut self, dir: &Path) -> Result<PathBuf> {
        self.refresh().await?;
        Ok(write_snapshot(self.store.list(), dir).await?)
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Append a message and move to the last page so it is visible.
    pub async fn add(
        &mut self,
        sender: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Message> {
        self.refresh().await?;
        let message = self.store.create(sender, content);
        self.current_page = self.last_page();
        info!(id = message.id, sender = %message.sender, page = self.current_page, "Message added");
        self.persist().await?;
        Ok(message)
    }

    /// Replace only the content of message `id`.
    pub async fn update(&mut self, id: u64, content: impl Into<String>) -> Result<Message> {
        self.edit(id, MessagePatch::content(content)).await
    }

    pub async fn edit(&mut self, id: u64, patch: MessagePatch) -> Result<Message> {
        self.refresh().await?;
        let message = self.store.edit(id, patch)?;
        info!(id, "Message updated");
        self.persist().await?;
        Ok(message)
    }

    pub async fn delete(&mut self, id: u64) -> Result<()> {
        self.refresh().await?;
        self.store.delete(id)?;
        info!(id, remaining = self.store.len(), "Message deleted");
        self.persist().await
    }

    // ── Helpers ─────────────────────────────────────────────────────

    async fn refresh(&mut self) -> Result<()> {
        if self.config.mode == SessionMode::ReloadPerRequest {
            let messages = self.storage.load().await?;
            self.store = MessageStore::from_messages(messages)?;
            debug!(messages = self.store.len(), "Session reloaded from storage");
        }
        Ok(())
    }

    /// Save after a mutation. On failure the in-memory change is kept and
    /// the error is returned so the caller knows it is not durable.
    async fn persist(&self) -> Result<()> {
        if !self.config.mode.is_persistent() {
            return Ok(());
        }
        if let Err(e) = self.storage.save(self.store.list()).await {
            warn!(
                location = %self.storage.location(),
                error = %e,
                "Save failed, change exists in memory only"
            );
            return Err(e.into());
        }
        Ok(())
    }

    fn move_to(&mut self, requested: i64) -> Page<Message> {
        let page = self.window(requested);
        self.current_page = page.current_page;
        page
    }

    fn window(&self, requested: i64) -> Page<Message> {
        match self.config.page_size {
            Some(size) => paginate(self.store.list(), size, requested),
            None => single_page(self.store.list()),
        }
    }

    fn last_page(&self) -> usize {
        match self.config.page_size {
            Some(size) => total_pages(self.store.len(), size),
            None => 1,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, StorageError};
    use crate::storage::{JsonFileStorage, MemoryStorage};

    fn config(mode: SessionMode) -> SessionConfig {
        SessionConfig {
            mode,
            ..SessionConfig::default()
        }
    }

    fn ids(messages: &[Message]) -> Vec<u64> {
        messages.iter().map(|m| m.id).collect()
    }

    #[tokio::test]
    async fn add_on_seed_then_reopen_reproduces_six() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn Storage> =
            Arc::new(JsonFileStorage::new(dir.path().join("history.json")));

        let mut session = Session::open(config(SessionMode::Held), Arc::clone(&storage))
            .await
            .unwrap();
        let added = session.add("User", "hi").await.unwrap();
        assert_eq!(added.id, 6);
        let before = session.messages().await.unwrap();

        let mut reopened = Session::open(config(SessionMode::Held), storage).await.unwrap();
        let after = reopened.messages().await.unwrap();
        assert_eq!(after, before);
        assert_eq!(ids(&after), vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn delete_then_add_skips_deleted_id() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new(Seed::Factorial));
        let mut session = Session::open(config(SessionMode::Held), storage).await.unwrap();

        session.delete(3).await.unwrap();
        session.add("Coder", "ok").await.unwrap();
        assert_eq!(ids(&session.messages().await.unwrap()), vec![1, 2, 4, 5, 6]);
        assert!(session.get(3).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new(Seed::Factorial));
        let mut session = Session::open(config(SessionMode::Held), storage).await.unwrap();

        assert!(session.delete(77).await.unwrap_err().is_not_found());
        assert!(session.update(77, "x").await.unwrap_err().is_not_found());
        assert_eq!(session.messages().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn mutations_are_saved_immediately() {
        let storage = Arc::new(MemoryStorage::new(Seed::Factorial));
        let mut session = Session::open(config(SessionMode::Held), storage.clone())
            .await
            .unwrap();

        session.update(2, "edited").await.unwrap();
        assert_eq!(storage.load().await.unwrap()[1].content, "edited");

        session.delete(1).await.unwrap();
        assert_eq!(ids(&storage.load().await.unwrap()), vec![2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn ephemeral_session_never_saves() {
        let storage = Arc::new(MemoryStorage::with_messages(Vec::new()));
        let mut session = Session::open(config(SessionMode::Ephemeral), storage.clone())
            .await
            .unwrap();

        assert_eq!(session.messages().await.unwrap().len(), 5);
        session.add("User", "hi").await.unwrap();
        assert!(storage.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_save_keeps_change_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.json");
        let storage: Arc<dyn Storage> = Arc::new(JsonFileStorage::new(&path));

        let mut session = Session::open(config(SessionMode::Held), storage).await.unwrap();
        // A directory where the file should be makes the save fail.
        std::fs::create_dir(&path).unwrap();

        let err = session.add("User", "not durable").await.unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::Write { .. })));

        let messages = session.messages().await.unwrap();
        assert_eq!(messages.len(), 6);
        assert_eq!(messages[5].content, "not durable");
    }

    #[tokio::test]
    async fn corrupt_storage_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.json");
        std::fs::write(&path, "{ nope").unwrap();
        let storage: Arc<dyn Storage> = Arc::new(JsonFileStorage::new(path));

        let err = Session::open(config(SessionMode::Held), storage)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::Storage(StorageError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn reload_mode_sees_other_writers() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new(Seed::Factorial));
        let mut reader = Session::open(config(SessionMode::ReloadPerRequest), Arc::clone(&storage))
            .await
            .unwrap();
        let mut writer = Session::open(config(SessionMode::Held), Arc::clone(&storage))
            .await
            .unwrap();

        writer.add("Coder", "from elsewhere").await.unwrap();
        let seen = reader.messages().await.unwrap();
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[5].content, "from elsewhere");
    }

    #[tokio::test]
    async fn held_sessions_overwrite_each_other() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new(Seed::Factorial));
        let mut first = Session::open(config(SessionMode::Held), Arc::clone(&storage))
            .await
            .unwrap();
        let mut second = Session::open(config(SessionMode::Held), Arc::clone(&storage))
            .await
            .unwrap();

        first.add("User", "first").await.unwrap();
        second.add("User", "second").await.unwrap();

        // Last save wins; the first session's message is gone from storage.
        let stored = storage.load().await.unwrap();
        assert_eq!(stored.len(), 6);
        assert_eq!(stored[5].content, "second");
    }

    #[tokio::test]
    async fn add_moves_to_new_last_page() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new(Seed::Factorial));
        let mut session = Session::open(config(SessionMode::Held), storage).await.unwrap();

        assert_eq!(session.view().await.unwrap().total_pages, 1);
        let added = session.add("User", "sixth").await.unwrap();

        let page = session.view().await.unwrap();
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items, vec![added]);
    }

    #[tokio::test]
    async fn navigation_clamps_at_both_ends() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new(Seed::FactorialExtended));
        let mut session = Session::open(config(SessionMode::Held), storage).await.unwrap();

        assert_eq!(session.previous_page().await.unwrap().current_page, 1);
        assert_eq!(session.next_page().await.unwrap().current_page, 2);
        assert_eq!(session.go_to_page(99).await.unwrap().current_page, 4);
        assert_eq!(session.next_page().await.unwrap().current_page, 4);
        assert_eq!(session.go_to_page(-3).await.unwrap().current_page, 1);
    }

    #[tokio::test]
    async fn deleting_last_item_of_last_page_steps_back() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new(Seed::Factorial));
        let mut session = Session::open(config(SessionMode::Held), storage).await.unwrap();

        let added = session.add("User", "alone on page two").await.unwrap();
        session.delete(added.id).await.unwrap();

        let page = session.view().await.unwrap();
        assert_eq!(page.current_page, 1);
        assert_eq!(page.items.len(), 5);
    }

    #[tokio::test]
    async fn no_page_size_shows_everything() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new(Seed::FactorialExtended));
        let cfg = SessionConfig {
            page_size: None,
            ..SessionConfig::default()
        };
        let mut session = Session::open(cfg, storage).await.unwrap();

        let page = session.next_page().await.unwrap();
        assert_eq!(page.current_page, 1);
        assert_eq!(page.items.len(), 20);
    }

    #[tokio::test]
    async fn export_reflects_current_state() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new(Seed::Factorial));
        let mut session = Session::open(config(SessionMode::Held), storage).await.unwrap();
        session.update(1, "a, b").await.unwrap();

        let csv = session.export_csv().await.unwrap();
        let parsed = crate::conversation::from_csv(&csv).unwrap();
        assert_eq!(parsed, session.messages().await.unwrap());
        assert!(csv.contains("1,User,\"a, b\""));
    }

    #[test]
    fn parse_modes() {
        assert_eq!("held".parse::<SessionMode>().unwrap(), SessionMode::Held);
        assert_eq!(
            "reload".parse::<SessionMode>().unwrap(),
            SessionMode::ReloadPerRequest
        );
        assert!("sometimes".parse::<SessionMode>().is_err());
    }
}
