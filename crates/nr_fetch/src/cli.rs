use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use nr_core::config::{FetchSettings, API_KEY_ENV_VAR};
use nr_core::{Error, Result};

use crate::feeds::newsapi::NewsApiClient;
use crate::gateway::{FetchConfig, FetchGateway};

/// Feed flags shared by every subcommand that fetches.
#[derive(Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    /// Comma-separated categories (e.g. technology,sports)
    #[arg(long, value_delimiter = ',')]
    pub categories: Vec<String>,
    /// Comma-separated country codes (e.g. us,gb)
    #[arg(long, value_delimiter = ',')]
    pub regions: Vec<String>,
    /// Pairs fetched at once
    #[arg(long)]
    pub concurrency: Option<usize>,
    /// Attempts per category/region pair
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

impl FetchArgs {
    /// Flags beat whatever the config file said.
    pub fn apply(&self, settings: &mut FetchSettings) {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            settings.api_key = Some(key.clone());
        }
        if !self.categories.is_empty() {
            settings.categories = normalize_list(&self.categories);
        }
        if !self.regions.is_empty() {
            settings.regions = normalize_list(&self.regions);
        }
        if let Some(concurrency) = self.concurrency {
            settings.concurrency = concurrency;
        }
        if let Some(max_attempts) = self.max_attempts {
            settings.max_attempts = max_attempts;
        }
    }
}

fn normalize_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Build a gateway backed by the NewsAPI client.
pub fn build_gateway(settings: &FetchSettings) -> Result<FetchGateway> {
    let api_key = settings.api_key.clone().ok_or_else(|| {
        Error::Config(format!(
            "No feed API key configured; pass --api-key or set {}",
            API_KEY_ENV_VAR
        ))
    })?;
    let client = NewsApiClient::new(
        api_key,
        &settings.base_url,
        Duration::from_secs(settings.timeout_secs),
    )?;
    Ok(FetchGateway::new(Arc::new(client), FetchConfig::from(settings)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        fetch: FetchArgs,
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = TestCli::parse_from([
            "nr",
            "--categories",
            "Technology, sports",
            "--regions",
            "us",
            "--concurrency",
            "2",
        ]);
        let mut settings = FetchSettings::default();
        cli.fetch.apply(&mut settings);

        assert_eq!(settings.categories, vec!["technology", "sports"]);
        assert_eq!(settings.regions, vec!["us"]);
        assert_eq!(settings.concurrency, 2);
        assert_eq!(settings.max_attempts, 3);
    }

    #[test]
    fn test_empty_flags_keep_settings() {
        let mut settings = FetchSettings::default();
        let before = settings.clone();
        FetchArgs::default().apply(&mut settings);
        assert_eq!(settings, before);
    }

    #[test]
    fn test_build_gateway_requires_api_key() {
        let settings = FetchSettings::default();
        assert!(matches!(build_gateway(&settings), Err(Error::Config(_))));

        let settings = FetchSettings {
            api_key: Some("key".to_string()),
            regions: vec!["us".to_string()],
            ..Default::default()
        };
        let gateway = build_gateway(&settings).unwrap();
        assert_eq!(gateway.params().len(), settings.categories.len());
    }
}
