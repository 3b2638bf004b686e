pub mod json;
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use json::JsonStorage;
pub use memory::MemoryStorage;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;
