use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nr_core::{EnrichedArticle, Error, RawArticle, Result, SnapshotStorage};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

pub const RAW_FILE: &str = "news_data.json";
pub const CORPUS_FILE: &str = "processed_news.json";

#[derive(Serialize)]
struct RawSnapshotRef<'a> {
    articles: &'a [RawArticle],
}

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

/// Snapshots as pretty-printed JSON files in one directory.
///
/// The raw snapshot is `news_data.json` holding `{"articles": [...]}`, the
/// corpus is `processed_news.json` holding an array of records. Every store
/// also leaves a timestamped copy next to them (`news_data_20240301_101500.json`).
#[derive(Debug, Clone)]
pub struct JsonStorage {
    dir: PathBuf,
}

impl JsonStorage {
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|e| {
            Error::Storage(format!("Failed to create data directory {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn write_snapshot(&self, file: &str, body: &[u8]) -> Result<()> {
        let stamped = self.dir.join(stamped_name(file, Utc::now()));
        fs::write(&stamped, body).await?;

        let latest = self.dir.join(file);
        let tmp = self.dir.join(format!(".{}.tmp", file));
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &latest).await?;

        debug!("💾 Wrote {} and {}", latest.display(), stamped.display());
        Ok(())
    }

    async fn read_snapshot(&self, file: &str) -> Result<Vec<u8>> {
        let path = self.dir.join(file);
        match fs::read(&path).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::Storage(format!("No snapshot at {}", path.display())))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// `news_data.json` -> `news_data_YYYYMMDD_HHMMSS.json`
fn stamped_name(file: &str, at: DateTime<Utc>) -> String {
    let stem = file.strip_suffix(".json").unwrap_or(file);
    format!("{}_{}.json", stem, at.format("%Y%m%d_%H%M%S"))
}

#[async_trait]
impl SnapshotStorage for JsonStorage {
    fn name(&self) -> &str {
        "json"
    }

    async fn store_raw(&self, articles: &[RawArticle]) -> Result<()> {
        let body = serde_json::to_vec_pretty(&RawSnapshotRef { articles })?;
        self.write_snapshot(RAW_FILE, &body).await
    }

    async fn load_raw(&self) -> Result<Vec<RawArticle>> {
        let body = self.read_snapshot(RAW_FILE).await?;
        let snapshot: RawSnapshot = serde_json::from_slice(&body)?;
        Ok(snapshot.articles)
    }

    async fn store_corpus(&self, articles: &[EnrichedArticle]) -> Result<()> {
        let body = serde_json::to_vec_pretty(articles)?;
        self.write_snapshot(CORPUS_FILE, &body).await
    }

    async fn load_corpus(&self) -> Result<Vec<EnrichedArticle>> {
        let body = self.read_snapshot(CORPUS_FILE).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nr_core::Topic;
    use tempfile::tempdir;

    fn raw(url: &str) -> RawArticle {
        RawArticle {
            title: "Chip shortage eases".to_string(),
            description: String::new(),
            content: "Foundries report \"record\" output.\nMore below.".to_string(),
            source: "Wire".to_string(),
            url: url.to_string(),
            category: "technology".to_string(),
            region: "gb".to_string(),
            published_at: "2024-03-01T10:00:00Z".to_string(),
            author: Some("A. Writer".to_string()),
            image_url: None,
            fetched_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 5, 0).unwrap()),
        }
    }

    #[test]
    fn test_stamped_name() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(stamped_name(RAW_FILE, at), "news_data_20240301_090507.json");
        assert_eq!(stamped_name(CORPUS_FILE, at), "processed_news_20240301_090507.json");
    }

    #[tokio::test]
    async fn test_raw_round_trip_and_layout() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path().join("data")).await.unwrap();
        let articles = vec![raw("https://a.test/1"), raw("https://a.test/2")];

        storage.store_raw(&articles).await.unwrap();
        assert_eq!(storage.load_raw().await.unwrap(), articles);

        let body = std::fs::read_to_string(storage.dir().join(RAW_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["articles"].as_array().unwrap().len(), 2);

        let stamped: Vec<_> = std::fs::read_dir(storage.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|name| name.starts_with("news_data_") && name.ends_with(".json"))
            .collect();
        assert_eq!(stamped.len(), 1);
    }

    #[tokio::test]
    async fn test_corpus_round_trip() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let corpus = vec![EnrichedArticle {
            raw: raw("https://a.test/1"),
            tokens: vec!["chip".to_string(), "shortage".to_string()],
            topic: Topic::Technology,
            sentiment_polarity: -0.25,
            sentiment_subjectivity: 0.75,
        }];

        storage.store_corpus(&corpus).await.unwrap();
        assert_eq!(storage.load_corpus().await.unwrap(), corpus);

        let body = std::fs::read_to_string(dir.path().join(CORPUS_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value[0]["topic"], "technology");
        assert_eq!(value[0]["title"], "Chip shortage eases");
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_storage_error() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        assert!(matches!(storage.load_raw().await, Err(Error::Storage(_))));
        assert!(matches!(storage.load_corpus().await, Err(Error::Storage(_))));
    }

    #[tokio::test]
    async fn test_hand_written_snapshot_with_gaps() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(RAW_FILE),
            r#"{"articles": [{"title": "Only a title", "description": null}]}"#,
        )
        .unwrap();

        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let articles = storage.load_raw().await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Only a title");
        assert_eq!(articles[0].description, "");
        assert_eq!(articles[0].content, "");
        assert_eq!(articles[0].fetched_at, None);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_serialization_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CORPUS_FILE), "not json").unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        assert!(matches!(storage.load_corpus().await, Err(Error::Serialization(_))));
    }
}
