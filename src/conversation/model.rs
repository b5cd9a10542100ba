//! Message data model.

use serde::{Deserialize, Serialize};

/// Sender label used for messages typed by the person.
pub const SENDER_USER: &str = "User";
/// Sender label used for messages produced by the coding assistant.
pub const SENDER_CODER: &str = "Coder";

/// One entry in a conversation.
///
/// The on-disk shape is exactly `{"id", "sender", "content"}`; any other
/// field makes a stored conversation unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Message {
    /// Store-assigned id, unique within the conversation and never zero.
    pub id: u64,
    /// Free-form sender label (usually [`SENDER_USER`] or [`SENDER_CODER`]).
    pub sender: String,
    /// Message body, may span multiple lines.
    pub content: String,
}

impl Message {
    pub fn new(id: u64, sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            sender: sender.into(),
            content: content.into(),
        }
    }
}

/// Partial edit of a message. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePatch {
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl MessagePatch {
    /// Patch that only replaces the content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            sender: None,
            content: Some(content.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sender.is_none() && self.content.is_none()
    }

    pub(crate) fn apply(self, message: &mut Message) {
        if let Some(sender) = self.sender {
            message.sender = sender;
        }
        if let Some(content) = self.content {
            message.content = content;
        }
    }
}
