//! Persistence layer — whole-conversation load/save.

pub mod json_file;
pub mod memory;
pub mod traits;

pub use json_file::{DEFAULT_HISTORY_FILE, JsonFileStorage, write_snapshot};
pub use memory::MemoryStorage;
pub use traits::Storage;
