//! Enrichment and recommendation: text normalization, keyword topic
//! classification, lexicon sentiment, TF–IDF and the content-based ranker.

pub mod classify;
pub mod enrich;
pub mod models;
pub mod recommend;
pub mod text;
pub mod tfidf;

pub use classify::classify;
pub use enrich::EnrichmentProcessor;
pub use models::{create_sentiment_model, LexiconSentiment, NeutralSentiment};
pub use recommend::{Corpus, RecommendationEngine, ScoredArticle};
pub use tfidf::{SparseVector, TfIdfVectorizer};

pub mod prelude {
    pub use super::enrich::EnrichmentProcessor;
    pub use super::models::create_sentiment_model;
    pub use super::recommend::{RecommendationEngine, ScoredArticle};
    pub use nr_core::{EnrichedArticle, Error, RawArticle, Result, Topic};
}
