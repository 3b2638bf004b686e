use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nr_core::{Error, RawArticle, Result};
use serde::{Deserialize, Serialize};

pub mod newsapi;

/// One (category, region) request against the feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedParams {
    pub category: String,
    pub region: String,
}

impl FeedParams {
    pub fn new(category: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            region: region.into(),
        }
    }
}

impl fmt::Display for FeedParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.region)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Article as the provider encodes it. Every field may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedArticle {
    #[serde(default)]
    pub source: Option<FeedSource>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "urlToImage", default)]
    pub url_to_image: Option<String>,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl FeedArticle {
    /// Stamp the article with the request it came from. Any category the
    /// provider reported is ignored.
    pub fn into_raw(self, params: &FeedParams, fetched_at: DateTime<Utc>) -> RawArticle {
        RawArticle {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            source: self.source.and_then(|s| s.name).unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            category: params.category.clone(),
            region: params.region.clone(),
            published_at: self.published_at.unwrap_or_default(),
            author: self.author,
            image_url: self.url_to_image,
            fetched_at: Some(fetched_at),
        }
    }
}

/// Response envelope: `{"status": "ok", "totalResults": n, "articles": [...]}` on
/// success, `{"status": "error", "code": .., "message": ..}` otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<u32>,
    #[serde(default)]
    pub articles: Option<Vec<FeedArticle>>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FeedEnvelope {
    pub fn ok(articles: Vec<FeedArticle>) -> Self {
        Self {
            status: Some("ok".to_string()),
            total_results: Some(articles.len() as u32),
            articles: Some(articles),
            code: None,
            message: None,
        }
    }

    /// Unwrap the article list, rejecting envelopes that are not explicitly `ok`
    /// or that lack the `articles` field.
    pub fn into_articles(self) -> Result<Vec<FeedArticle>> {
        match self.status.as_deref() {
            Some("ok") => self
                .articles
                .ok_or_else(|| Error::InvalidEnvelope("missing 'articles' field".to_string())),
            Some(status) => Err(Error::InvalidEnvelope(format!(
                "status={} code={} message={}",
                status,
                self.code.as_deref().unwrap_or("unknown"),
                self.message.as_deref().unwrap_or("none"),
            ))),
            None => Err(Error::InvalidEnvelope("missing 'status' field".to_string())),
        }
    }
}

#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Name of the provider, for log lines
    fn name(&self) -> &str;

    /// Issue a single request. Implementations report network trouble as
    /// `Error::Transport` and unreadable bodies as `Error::InvalidEnvelope`;
    /// envelope status checks are left to the caller.
    async fn fetch(&self, params: &FeedParams) -> Result<FeedEnvelope>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "status": "ok",
        "totalResults": 2,
        "articles": [
            {
                "source": {"id": null, "name": "Example Wire"},
                "author": null,
                "title": "Chipmaker unveils new processor",
                "description": "A faster chip.",
                "url": "https://example.com/chip",
                "urlToImage": "https://example.com/chip.jpg",
                "publishedAt": "2024-03-01T10:00:00Z",
                "content": "The company said the processor doubles throughput."
            },
            {
                "source": {"id": "bbc-news", "name": "BBC News"},
                "title": null,
                "url": "https://example.com/untitled"
            }
        ]
    }"#;

    #[test]
    fn test_parse_ok_envelope() {
        let envelope: FeedEnvelope = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(envelope.total_results, Some(2));
        let articles = envelope.into_articles().unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].url_to_image.as_deref(), Some("https://example.com/chip.jpg"));
        assert!(articles[1].title.is_none());
    }

    #[test]
    fn test_error_status_is_invalid_envelope() {
        let envelope: FeedEnvelope = serde_json::from_str(
            r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#,
        )
        .unwrap();
        let err = envelope.into_articles().unwrap_err();
        assert!(matches!(err, Error::InvalidEnvelope(ref m) if m.contains("apiKeyInvalid")));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_missing_fields_are_invalid_envelope() {
        let no_articles = FeedEnvelope {
            status: Some("ok".to_string()),
            ..Default::default()
        };
        assert!(matches!(no_articles.into_articles(), Err(Error::InvalidEnvelope(_))));

        let no_status: FeedEnvelope = serde_json::from_str(r#"{"articles": []}"#).unwrap();
        assert!(matches!(no_status.into_articles(), Err(Error::InvalidEnvelope(_))));
    }

    #[test]
    fn test_into_raw_tags_with_request() {
        let envelope: FeedEnvelope = serde_json::from_str(SAMPLE).unwrap();
        let params = FeedParams::new("technology", "gb");
        let now = Utc::now();
        let raw: Vec<RawArticle> = envelope
            .into_articles()
            .unwrap()
            .into_iter()
            .map(|a| a.into_raw(&params, now))
            .collect();

        assert_eq!(raw[0].category, "technology");
        assert_eq!(raw[0].region, "gb");
        assert_eq!(raw[0].source, "Example Wire");
        assert_eq!(raw[0].fetched_at, Some(now));
        assert_eq!(raw[1].title, "");
        assert_eq!(raw[1].content, "");
        assert_eq!(raw[1].source, "BBC News");
    }

    #[test]
    fn test_params_display() {
        assert_eq!(FeedParams::new("sports", "au").to_string(), "sports/au");
    }
}
