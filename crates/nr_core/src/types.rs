use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// Characters of body text kept in an [`ArticleSummary`] description.
pub const SUMMARY_DESCRIPTION_CHARS: usize = 200;

/// Snapshot files and feeds both use `null` for absent text; we never want that
/// to fail a load, so it becomes an empty string.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// An article as the feed delivered it, tagged with the request that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArticle {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    /// Category used in the feed request, not whatever the feed claims.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub region: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub published_at: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// `None` when the snapshot that held the article never recorded it
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl RawArticle {
    /// Title, description and body joined the way every scorer sees them.
    pub fn full_text(&self) -> String {
        format!("{} {} {}", self.title, self.description, self.content)
    }

    /// Best identifier we have for log lines.
    pub fn label(&self) -> &str {
        if !self.url.is_empty() {
            &self.url
        } else if !self.title.is_empty() {
            &self.title
        } else {
            "<untitled>"
        }
    }
}

/// Fixed set of topic labels. Declaration order is the classification
/// tie-break order, so do not reorder.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Technology,
    Sports,
    Finance,
    Business,
    Health,
    Science,
    Entertainment,
    #[default]
    General,
}

impl Topic {
    /// Every keyword-scored category, in tie-break order. `General` is the fallback
    /// and is deliberately absent.
    pub const CATEGORIES: [Topic; 7] = [
        Topic::Technology,
        Topic::Sports,
        Topic::Finance,
        Topic::Business,
        Topic::Health,
        Topic::Science,
        Topic::Entertainment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Technology => "technology",
            Topic::Sports => "sports",
            Topic::Finance => "finance",
            Topic::Business => "business",
            Topic::Health => "health",
            Topic::Science => "science",
            Topic::Entertainment => "entertainment",
            Topic::General => "general",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Topic::CATEGORIES
            .iter()
            .chain(std::iter::once(&Topic::General))
            .find(|topic| topic.as_str() == wanted)
            .copied()
            .ok_or_else(|| Error::InvalidTopic(s.to_string()))
    }
}

/// A raw article plus the signals the enrichment stage derives from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedArticle {
    #[serde(flatten)]
    pub raw: RawArticle,
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default)]
    pub topic: Topic,
    #[serde(default)]
    pub sentiment_polarity: f64,
    #[serde(default)]
    pub sentiment_subjectivity: f64,
}

/// What a recommendation response carries per article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: String,
    pub source: String,
    pub category: Topic,
    pub sentiment: f64,
}

impl From<&EnrichedArticle> for ArticleSummary {
    fn from(article: &EnrichedArticle) -> Self {
        let content = &article.raw.content;
        let description = if content.is_empty() {
            String::new()
        } else {
            let truncated: String = content.chars().take(SUMMARY_DESCRIPTION_CHARS).collect();
            format!("{}...", truncated)
        };

        Self {
            title: article.raw.title.clone(),
            description,
            url: article.raw.url.clone(),
            image_url: article.raw.image_url.clone(),
            published_at: article.raw.published_at.clone(),
            source: article.raw.source.clone(),
            category: article.topic,
            sentiment: article.sentiment_polarity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

/// Summary numbers logged after each enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub total_articles: usize,
    pub articles_per_topic: BTreeMap<Topic, usize>,
    pub sentiment_distribution: SentimentDistribution,
    pub average_sentiment: f64,
}

impl CorpusStats {
    pub fn from_articles(articles: &[EnrichedArticle]) -> Self {
        let mut stats = CorpusStats {
            total_articles: articles.len(),
            ..Default::default()
        };

        let mut polarity_sum = 0.0;
        for article in articles {
            *stats.articles_per_topic.entry(article.topic).or_insert(0) += 1;
            let polarity = article.sentiment_polarity;
            polarity_sum += polarity;
            if polarity > 0.0 {
                stats.sentiment_distribution.positive += 1;
            } else if polarity < 0.0 {
                stats.sentiment_distribution.negative += 1;
            } else {
                stats.sentiment_distribution.neutral += 1;
            }
        }

        if !articles.is_empty() {
            stats.average_sentiment = polarity_sum / articles.len() as f64;
        }
        stats
    }
}
