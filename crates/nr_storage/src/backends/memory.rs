use async_trait::async_trait;
use nr_core::{EnrichedArticle, Error, RawArticle, Result, SnapshotStorage};
use tokio::sync::RwLock;

/// Keeps both snapshots in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    raw: RwLock<Option<Vec<RawArticle>>>,
    corpus: RwLock<Option<Vec<EnrichedArticle>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStorage for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    async fn store_raw(&self, articles: &[RawArticle]) -> Result<()> {
        *self.raw.write().await = Some(articles.to_vec());
        Ok(())
    }

    async fn load_raw(&self) -> Result<Vec<RawArticle>> {
        self.raw
            .read()
            .await
            .clone()
            .ok_or_else(|| Error::Storage("no raw snapshot stored in memory".to_string()))
    }

    async fn store_corpus(&self, articles: &[EnrichedArticle]) -> Result<()> {
        *self.corpus.write().await = Some(articles.to_vec());
        Ok(())
    }

    async fn load_corpus(&self) -> Result<Vec<EnrichedArticle>> {
        self.corpus
            .read()
            .await
            .clone()
            .ok_or_else(|| Error::Storage("no corpus snapshot stored in memory".to_string()))
    }
}
