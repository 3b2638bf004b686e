use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use nr_core::config::FetchSettings;
use nr_core::logging::Logger;
use nr_core::{RawArticle, Result};
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{error, info};

use crate::feeds::{FeedClient, FeedParams};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub categories: Vec<String>,
    pub regions: Vec<String>,
    /// Total attempts per (category, region) pair, first one included
    pub max_attempts: u32,
    /// Pause after a transport failure before the next attempt
    pub retry_delay: Duration,
    /// Pairs in flight at once
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&FetchSettings::default())
    }
}

impl From<&FetchSettings> for FetchConfig {
    fn from(settings: &FetchSettings) -> Self {
        Self {
            categories: settings.categories.clone(),
            regions: settings.regions.clone(),
            max_attempts: settings.max_attempts.max(1),
            retry_delay: Duration::from_secs(settings.retry_delay_secs),
            concurrency: settings.concurrency.max(1),
        }
    }
}

/// Pulls every configured (category, region) pair from a feed. Never fails:
/// a pair that cannot be fetched simply contributes no articles.
#[derive(Clone)]
pub struct FetchGateway {
    client: Arc<dyn FeedClient>,
    config: Arc<FetchConfig>,
    semaphore: Arc<Semaphore>,
}

impl FetchGateway {
    pub fn new(client: Arc<dyn FeedClient>, config: FetchConfig) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
        Self {
            client,
            config: Arc::new(config),
            semaphore,
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Cross product of categories and regions, category-major.
    pub fn params(&self) -> Vec<FeedParams> {
        self.config
            .categories
            .iter()
            .flat_map(|category| {
                self.config
                    .regions
                    .iter()
                    .map(move |region| FeedParams::new(category.clone(), region.clone()))
            })
            .collect()
    }

    /// Fetch all pairs on a bounded pool. Each task hands back its own vec; the
    /// result is their concatenation in no particular order.
    pub async fn fetch_all(&self) -> Vec<RawArticle> {
        let params = self.params();
        info!(
            "🗞️ Fetching {} category/region pairs from {} ({} at a time)",
            params.len(),
            self.client.name(),
            self.config.concurrency
        );

        let handles: Vec<_> = params
            .iter()
            .cloned()
            .map(|p| {
                let gateway = self.clone();
                tokio::spawn(async move {
                    let Ok(_permit) = gateway.semaphore.clone().acquire_owned().await else {
                        return Vec::new();
                    };
                    gateway.fetch_articles_for_params(&p).await
                })
            })
            .collect();

        let mut articles = Vec::new();
        for (p, result) in params.iter().zip(join_all(handles).await) {
            match result {
                Ok(mut batch) => articles.append(&mut batch),
                Err(e) => error!("💥 Fetch task for {} did not complete: {}", p, e),
            }
        }

        info!("📦 Total articles fetched: {}", articles.len());
        articles
    }

    /// Fetch one pair with the retry budget. Transport failures wait
    /// `retry_delay` before the next attempt; invalid envelopes move straight on.
    pub async fn fetch_articles_for_params(&self, params: &FeedParams) -> Vec<RawArticle> {
        let logger = Logger::new().with_prefix(format!("[{}]", params));
        let max_attempts = self.config.max_attempts;

        for attempt in 1..=max_attempts {
            match self.fetch_once(params).await {
                Ok(articles) => {
                    logger.info(&format!("✅ Fetched {} articles", articles.len()));
                    return articles;
                }
                Err(e) if e.is_retryable() => {
                    logger.warn(&format!("🌐 Attempt {}/{} failed: {}", attempt, max_attempts, e));
                    if attempt < max_attempts {
                        sleep(self.config.retry_delay).await;
                    }
                }
                Err(e) => {
                    logger.warn(&format!(
                        "📭 Attempt {}/{} got an unusable response: {}",
                        attempt, max_attempts, e
                    ));
                }
            }
        }

        logger.error(&format!("❌ Giving up after {} attempts", max_attempts));
        Vec::new()
    }

    async fn fetch_once(&self, params: &FeedParams) -> Result<Vec<RawArticle>> {
        let envelope = self.client.fetch(params).await?;
        let fetched_at = Utc::now();
        Ok(envelope
            .into_articles()?
            .into_iter()
            .map(|article| article.into_raw(params, fetched_at))
            .collect())
    }
}
