use std::fmt;

use nr_core::{Result, Sentiment, SentimentModel};

/// Scores everything as neutral. Used when sentiment is switched off and in tests.
pub struct NeutralSentiment;

impl fmt::Debug for NeutralSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeutralSentiment").finish()
    }
}

impl NeutralSentiment {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NeutralSentiment {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentModel for NeutralSentiment {
    fn name(&self) -> &str {
        "neutral"
    }

    fn score(&self, _text: &str) -> Result<Sentiment> {
        Ok(Sentiment::default())
    }
}
