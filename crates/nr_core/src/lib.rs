pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use models::{Sentiment, SentimentModel};
pub use storage::SnapshotStorage;
pub use types::{
    ArticleSummary, CorpusStats, EnrichedArticle, RawArticle, SentimentDistribution, Topic,
};
