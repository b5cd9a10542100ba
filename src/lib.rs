//! Conversation history — an editable, paged, persisted chat log.

pub mod config;
pub mod conversation;
pub mod error;
pub mod http;
pub mod session;
pub mod storage;
