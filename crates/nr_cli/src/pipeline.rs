use std::sync::Arc;
use std::time::Duration;

use nr_core::logging::Logger;
use nr_core::{EnrichedArticle, Result, SnapshotStorage};
use nr_fetch::FetchGateway;
use nr_inference::EnrichmentProcessor;
use tokio::time::sleep;

/// Fetch, persist and enrich in one pass.
pub struct Pipeline {
    gateway: FetchGateway,
    processor: EnrichmentProcessor,
    storage: Arc<dyn SnapshotStorage>,
}

impl Pipeline {
    pub fn new(
        gateway: FetchGateway,
        processor: EnrichmentProcessor,
        storage: Arc<dyn SnapshotStorage>,
    ) -> Self {
        Self {
            gateway,
            processor,
            storage,
        }
    }

    /// Fetch every pair, store the raw snapshot, enrich it and store the
    /// corpus. An empty fetch leaves both stored snapshots untouched and
    /// returns an empty corpus.
    pub async fn run_once(&self) -> Result<Vec<EnrichedArticle>> {
        let logger = Logger::new().with_prefix("[pipeline]");

        let raw = self.gateway.fetch_all().await;
        if raw.is_empty() {
            logger.warn("📭 Nothing fetched, keeping the previous snapshots");
            return Ok(Vec::new());
        }

        self.storage.store_raw(&raw).await?;
        logger.info(&format!("💾 Stored {} raw articles in {}", raw.len(), self.storage.name()));

        let corpus = self.processor.process(raw);
        self.storage.store_corpus(&corpus).await?;
        logger.info(&format!("💾 Stored corpus of {} articles", corpus.len()));
        Ok(corpus)
    }

    /// Run forever, one pass every `interval`. A failed pass is logged and
    /// the loop carries on.
    pub async fn run_periodic(&self, interval: Duration) {
        let logger = Logger::new().with_prefix("[pipeline]");
        loop {
            if let Err(e) = self.run_once().await {
                logger.error(&format!("❌ Pipeline pass failed: {}", e));
            }
            logger.info(&format!("⏳ Next pass in {}s", interval.as_secs()));
            sleep(interval).await;
        }
    }
}

/// Re-enrich the stored raw snapshot and replace the stored corpus.
pub async fn enrich_stored(
    processor: &EnrichmentProcessor,
    storage: &dyn SnapshotStorage,
) -> Result<Vec<EnrichedArticle>> {
    let raw = storage.load_raw().await?;
    let corpus = processor.process(raw);
    storage.store_corpus(&corpus).await?;
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nr_core::{Error, Topic};
    use nr_fetch::{FeedArticle, FeedClient, FeedEnvelope, FeedParams, FetchConfig};
    use nr_storage::MemoryStorage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticFeed {
        empty: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FeedClient for StaticFeed {
        fn name(&self) -> &str {
            "static"
        }

        async fn fetch(&self, params: &FeedParams) -> Result<FeedEnvelope> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.empty {
                return Ok(FeedEnvelope::ok(Vec::new()));
            }
            Ok(FeedEnvelope::ok(vec![FeedArticle {
                title: Some(format!("Stock market rallies in {}", params.region)),
                description: Some("Investors cheered strong gains".to_string()),
                url: Some(format!("https://example.com/{}/{}", params.category, params.region)),
                ..Default::default()
            }]))
        }
    }

    fn pipeline(empty: bool, storage: Arc<dyn SnapshotStorage>) -> Pipeline {
        let client = Arc::new(StaticFeed {
            empty,
            calls: AtomicUsize::new(0),
        });
        let config = FetchConfig {
            categories: vec!["business".to_string()],
            regions: vec!["us".to_string(), "gb".to_string()],
            max_attempts: 1,
            retry_delay: Duration::from_millis(0),
            concurrency: 2,
        };
        Pipeline::new(
            FetchGateway::new(client, config),
            EnrichmentProcessor::default(),
            storage,
        )
    }

    #[tokio::test]
    async fn test_run_once_stores_both_snapshots() {
        let storage: Arc<dyn SnapshotStorage> = Arc::new(MemoryStorage::new());
        let corpus = pipeline(false, storage.clone()).run_once().await.unwrap();

        assert_eq!(corpus.len(), 2);
        assert!(corpus.iter().all(|a| a.topic == Topic::Finance));
        assert_eq!(storage.load_raw().await.unwrap().len(), 2);
        assert_eq!(storage.load_corpus().await.unwrap(), corpus);
    }

    #[tokio::test]
    async fn test_empty_fetch_keeps_previous_snapshots() {
        let storage: Arc<dyn SnapshotStorage> = Arc::new(MemoryStorage::new());
        pipeline(false, storage.clone()).run_once().await.unwrap();

        let corpus = pipeline(true, storage.clone()).run_once().await.unwrap();
        assert!(corpus.is_empty());
        assert_eq!(storage.load_corpus().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_fetch_on_fresh_storage_writes_nothing() {
        let storage: Arc<dyn SnapshotStorage> = Arc::new(MemoryStorage::new());
        pipeline(true, storage.clone()).run_once().await.unwrap();
        assert!(matches!(storage.load_raw().await, Err(Error::Storage(_))));
    }

    #[tokio::test]
    async fn test_enrich_stored() {
        let storage = MemoryStorage::new();
        assert!(enrich_stored(&EnrichmentProcessor::default(), &storage).await.is_err());

        let raw = vec![nr_core::RawArticle {
            title: "Rover lands on Mars".to_string(),
            description: String::new(),
            content: String::new(),
            source: "Wire".to_string(),
            url: "https://example.com/rover".to_string(),
            category: "science".to_string(),
            region: "us".to_string(),
            published_at: "2024-03-01T10:00:00Z".to_string(),
            author: None,
            image_url: None,
            fetched_at: Some(chrono::Utc::now()),
        }];
        storage.store_raw(&raw).await.unwrap();
        let corpus = enrich_stored(&EnrichmentProcessor::default(), &storage).await.unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(storage.load_corpus().await.unwrap(), corpus);
    }
}
