use async_trait::async_trait;

use crate::types::{EnrichedArticle, RawArticle};
use crate::Result;

/// Persistence for the two pipeline snapshots. Each store call replaces the
/// previous snapshot of that kind wholesale.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Short backend name for log lines
    fn name(&self) -> &str;

    /// Store the fetch gateway output
    async fn store_raw(&self, articles: &[RawArticle]) -> Result<()>;

    /// Load the latest raw snapshot
    async fn load_raw(&self) -> Result<Vec<RawArticle>>;

    /// Store the enriched corpus
    async fn store_corpus(&self, articles: &[EnrichedArticle]) -> Result<()>;

    /// Load the latest enriched corpus
    async fn load_corpus(&self) -> Result<Vec<EnrichedArticle>>;
}
