use std::sync::Arc;

use nr_core::{Error, Result, SnapshotStorage};
use tracing::info;

pub mod backends;

pub use backends::*;

/// Backend names accepted by [`create_storage`].
pub const STORAGE_KINDS: &[&str] = &["memory", "json", "sqlite"];

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_DB_FILE: &str = "news.db";

/// Open the snapshot backend named `kind`. `location` is the data directory
/// for `json` and the database file for `sqlite`; `memory` ignores it.
pub async fn create_storage(kind: &str, location: Option<&str>) -> Result<Arc<dyn SnapshotStorage>> {
    let storage: Arc<dyn SnapshotStorage> = match kind.trim().to_lowercase().as_str() {
        "memory" => Arc::new(MemoryStorage::new()),
        "json" => Arc::new(JsonStorage::new(location.unwrap_or(DEFAULT_DATA_DIR)).await?),
        "sqlite" => open_sqlite(location).await?,
        other => {
            return Err(Error::Config(format!(
                "Unknown storage backend '{}', expected one of: {}",
                other,
                STORAGE_KINDS.join(", ")
            )))
        }
    };
    info!("💾 Using {} snapshot storage", storage.name());
    Ok(storage)
}

#[cfg(feature = "sqlite")]
async fn open_sqlite(location: Option<&str>) -> Result<Arc<dyn SnapshotStorage>> {
    use std::path::PathBuf;

    let path = location
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR).join(DEFAULT_DB_FILE));
    Ok(Arc::new(SqliteStorage::new_with_path(&path).await?))
}

#[cfg(not(feature = "sqlite"))]
async fn open_sqlite(_location: Option<&str>) -> Result<Arc<dyn SnapshotStorage>> {
    Err(Error::Config(
        "This build has no SQLite support; rebuild with the `sqlite` feature".to_string(),
    ))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::create_storage;
    pub use nr_core::SnapshotStorage;
}
