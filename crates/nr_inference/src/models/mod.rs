use std::sync::Arc;

use nr_core::{Error, Result, SentimentModel};

pub mod lexicon;
pub mod neutral;

pub use lexicon::LexiconSentiment;
pub use neutral::NeutralSentiment;

/// Names accepted by [`create_sentiment_model`].
pub const SENTIMENT_MODELS: &[&str] = &["lexicon", "neutral"];

pub fn create_sentiment_model(name: &str) -> Result<Arc<dyn SentimentModel>> {
    match name.trim().to_lowercase().as_str() {
        "lexicon" => Ok(Arc::new(LexiconSentiment::new())),
        "neutral" | "none" => Ok(Arc::new(NeutralSentiment::new())),
        other => Err(Error::Config(format!(
            "Unknown sentiment model '{}', expected one of: {}",
            other,
            SENTIMENT_MODELS.join(", ")
        ))),
    }
}
