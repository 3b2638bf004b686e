use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use nr_core::{Error, Result};
use reqwest::Client;
use url::Url;

use super::{FeedClient, FeedEnvelope, FeedParams};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

/// `top-headlines` client for NewsAPI-compatible feeds.
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: Url,
    timeout: Duration,
}

impl NewsApiClient {
    pub fn new(api_key: impl Into<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid feed base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("Feed base URL cannot be a base: {}", base_url)));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("nr/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url,
            timeout,
        })
    }

    pub fn endpoint(&self, params: &FeedParams) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Feed base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .push("top-headlines");
        url.query_pairs_mut()
            .append_pair("country", &params.region)
            .append_pair("category", &params.category)
            .append_pair("apiKey", &self.api_key);
        Ok(url)
    }
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl FeedClient for NewsApiClient {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn fetch(&self, params: &FeedParams) -> Result<FeedEnvelope> {
        let url = self.endpoint(params)?;

        // `without_url` keeps the API key out of error messages.
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(Error::Transport(format!("server responded with HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read body: {}", e.without_url())))?;

        // Client errors still carry a JSON envelope with `status: "error"`, which the
        // gateway turns into an invalid-envelope failure.
        serde_json::from_str::<FeedEnvelope>(&body).map_err(|e| {
            Error::InvalidEnvelope(format!("HTTP {} with unparseable body: {}", status, e))
        })
    }
}
