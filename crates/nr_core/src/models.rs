use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Polarity in [-1, 1], subjectivity in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub polarity: f64,
    pub subjectivity: f64,
}

impl Sentiment {
    pub fn is_finite(&self) -> bool {
        self.polarity.is_finite() && self.subjectivity.is_finite()
    }
}

pub trait SentimentModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Score a piece of free text. Empty text must score as neutral, not fail.
    fn score(&self, text: &str) -> Result<Sentiment>;
}
