//! MessageStore — the in-memory authority for one conversation.
//!
//! All edits go through here. Persistence is the caller's business: the store
//! never touches disk.

use std::collections::HashSet;

use tracing::debug;

use super::model::{Message, MessagePatch};
use crate::error::ConversationError;

/// Largest id a stored message may carry. Keeping loaded ids at or below
/// `i64::MAX` leaves room for `create` to keep counting without overflow.
pub const MAX_ID: u64 = i64::MAX as u64;

/// Ordered, id-addressed collection of messages.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    /// Highest id ever handed out or seen in this store. Deleting the current
    /// maximum does not lower it, so ids are not reused within a session.
    high_water: u64,
}

impl MessageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an existing conversation, checking that every id is
    /// positive, unique and no larger than [`MAX_ID`].
    pub fn from_messages(messages: Vec<Message>) -> Result<Self, ConversationError> {
        validate(&messages)?;
        let high_water = messages.iter().map(|m| m.id).max().unwrap_or(0);
        Ok(Self {
            messages,
            high_water,
        })
    }

    /// The full conversation, in display order.
    pub fn list(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    /// Point lookup by id.
    pub fn get(&self, id: u64) -> Result<&Message, ConversationError> {
        self.messages
            .iter()
            .find(|m| m.id == id)
            .ok_or(ConversationError::NotFound { id })
    }

    /// Append a new message with a freshly assigned id.
    ///
    /// Sender and content are not validated; empty strings are stored as-is.
    pub fn create(&mut self, sender: impl Into<String>, content: impl Into<String>) -> Message {
        let id = self.next_id();
        self.high_water = id;
        let message = Message::new(id, sender, content);
        self.messages.push(message.clone());
        debug!(id, sender = %message.sender, "Message appended");
        message
    }

    /// Replace the content of message `id`, keeping sender and position.
    pub fn update(
        &mut self,
        id: u64,
        content: impl Into<String>,
    ) -> Result<Message, ConversationError> {
        self.edit(id, MessagePatch::content(content))
    }

    /// Apply a partial edit to message `id`. Id and position never change.
    pub fn edit(&mut self, id: u64, patch: MessagePatch) -> Result<Message, ConversationError> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(ConversationError::NotFound { id })?;
        patch.apply(message);
        debug!(id, "Message edited");
        Ok(message.clone())
    }

    /// Remove message `id`; later messages shift up by one.
    pub fn delete(&mut self, id: u64) -> Result<Message, ConversationError> {
        let index = self
            .messages
            .iter()
            .position(|m| m.id == id)
            .ok_or(ConversationError::NotFound { id })?;
        let removed = self.messages.remove(index);
        debug!(id, index, "Message deleted");
        Ok(removed)
    }

    /// The id the next `create` will assign: one past the largest id seen.
    pub fn next_id(&self) -> u64 {
        let current_max = self.messages.iter().map(|m| m.id).max().unwrap_or(0);
        current_max.max(self.high_water) + 1
    }
}

fn validate(messages: &[Message]) -> Result<(), ConversationError> {
    let mut seen = HashSet::with_capacity(messages.len());
    for message in messages {
        if message.id == 0 {
            return Err(ConversationError::ZeroId);
        }
        if message.id > MAX_ID {
            return Err(ConversationError::IdOutOfRange { id: message.id });
        }
        if !seen.insert(message.id) {
            return Err(ConversationError::DuplicateId { id: message.id });
        }
    }
    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Seed;

    fn seeded() -> MessageStore {
        MessageStore::from_messages(Seed::Factorial.messages()).unwrap()
    }

    fn ids(store: &MessageStore) -> Vec<u64> {
        store.list().iter().map(|m| m.id).collect()
    }

    #[test]
    fn first_id_in_empty_store_is_one() {
        let mut store = MessageStore::new();
        assert!(store.is_empty());
        let msg = store.create("User", "");
        assert_eq!(msg.id, 1);
        assert_eq!(msg.content, "");
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut store = seeded();
        let mut last = 5;
        for i in 0..20 {
            let msg = store.create("User", format!("msg {i}"));
            assert!(msg.id > last);
            last = msg.id;
        }
        let mut all = ids(&store);
        let before = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), before);
    }

    #[test]
    fn create_on_seed_assigns_six() {
        let mut store = seeded();
        let msg = store.create("User", "hi");
        assert_eq!(msg.id, 6);
        assert_eq!(store.list().last().unwrap(), &msg);
    }

    #[test]
    fn delete_then_create_does_not_reuse_ids() {
        let mut store = seeded();
        store.delete(3).unwrap();
        let msg = store.create("Coder", "ok");
        assert_eq!(msg.id, 6);
        assert_eq!(ids(&store), vec![1, 2, 4, 5, 6]);
    }

    #[test]
    fn deleting_the_maximum_keeps_the_high_water_mark() {
        let mut store = seeded();
        store.delete(5).unwrap();
        assert_eq!(store.create("User", "again").id, 6);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut store = seeded();
        let mut expected = store.list().to_vec();
        expected.retain(|m| m.id != 2);

        let removed = store.delete(2).unwrap();
        assert_eq!(removed.id, 2);
        assert_eq!(store.list(), &expected[..]);
        assert_eq!(store.get(2), Err(ConversationError::NotFound { id: 2 }));
    }

    #[test]
    fn delete_missing_is_not_found() {
        let mut store = seeded();
        assert_eq!(store.delete(42), Err(ConversationError::NotFound { id: 42 }));
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn update_is_targeted() {
        let mut store = seeded();
        let before = store.list().to_vec();

        let updated = store.update(4, "Execution result: Failure").unwrap();
        assert_eq!(updated.sender, "User");

        for (old, new) in before.iter().zip(store.list()) {
            assert_eq!(old.id, new.id);
            assert_eq!(old.sender, new.sender);
            if old.id == 4 {
                assert_eq!(new.content, "Execution result: Failure");
            } else {
                assert_eq!(old.content, new.content);
            }
        }
    }

    #[test]
    fn update_missing_is_not_found() {
        let mut store = seeded();
        assert_eq!(
            store.update(99, "x"),
            Err(ConversationError::NotFound { id: 99 })
        );
    }

    #[test]
    fn edit_can_change_sender() {
        let mut store = seeded();
        let patch = MessagePatch {
            sender: Some("Coder".into()),
            content: None,
        };
        let edited = store.edit(1, patch).unwrap();
        assert_eq!(edited.sender, "Coder");
        assert_eq!(edited.content, "Write a Python function to calculate factorial.");
        assert_eq!(ids(&store), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn from_messages_rejects_invalid_ids() {
        let dup = vec![
            Message::new(1, "User", "a"),
            Message::new(1, "Coder", "b"),
        ];
        assert_eq!(
            MessageStore::from_messages(dup).unwrap_err(),
            ConversationError::DuplicateId { id: 1 }
        );

        let zero = vec![Message::new(0, "User", "a")];
        assert_eq!(
            MessageStore::from_messages(zero).unwrap_err(),
            ConversationError::ZeroId
        );
    }

    #[test]
    fn from_messages_rejects_ids_with_no_successor() {
        let huge = vec![Message::new(u64::MAX, "User", "a")];
        assert_eq!(
            MessageStore::from_messages(huge).unwrap_err(),
            ConversationError::IdOutOfRange { id: u64::MAX }
        );
    }

    #[test]
    fn create_after_largest_allowed_id() {
        let mut store =
            MessageStore::from_messages(vec![Message::new(MAX_ID, "User", "a")]).unwrap();
        let msg = store.create("Coder", "b");
        assert_eq!(msg.id, MAX_ID + 1);
        assert_eq!(store.create("User", "c").id, MAX_ID + 2);
    }

    #[test]
    fn next_id_follows_max_not_count() {
        let store = MessageStore::from_messages(vec![
            Message::new(10, "User", "a"),
            Message::new(3, "Coder", "b"),
        ])
        .unwrap();
        assert_eq!(store.next_id(), 11);
    }
}
