//! Conversation core — messages, the in-memory store, paging and export.

pub mod export;
pub mod model;
pub mod paginate;
pub mod seed;
pub mod store;

pub use export::{EXPORT_FILE_NAME, from_csv, to_csv};
pub use model::{Message, MessagePatch, SENDER_CODER, SENDER_USER};
pub use paginate::{Page, paginate, single_page, total_pages};
pub use seed::Seed;
pub use store::MessageStore;
