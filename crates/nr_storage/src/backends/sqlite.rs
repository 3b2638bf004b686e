use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nr_core::{EnrichedArticle, Error, RawArticle, Result, SnapshotStorage, Topic};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS snapshots (
        kind TEXT PRIMARY KEY,
        stored_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS raw_articles (
        position INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        content TEXT NOT NULL,
        source TEXT NOT NULL,
        url TEXT NOT NULL,
        category TEXT NOT NULL,
        region TEXT NOT NULL,
        published_at TEXT NOT NULL,
        author TEXT,
        image_url TEXT,
        fetched_at TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS corpus_articles (
        position INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        content TEXT NOT NULL,
        source TEXT NOT NULL,
        url TEXT NOT NULL,
        category TEXT NOT NULL,
        region TEXT NOT NULL,
        published_at TEXT NOT NULL,
        author TEXT,
        image_url TEXT,
        fetched_at TEXT,
        tokens TEXT NOT NULL,
        topic TEXT NOT NULL,
        sentiment_polarity REAL NOT NULL,
        sentiment_subjectivity REAL NOT NULL
    )
    "#,
];

const RAW_KIND: &str = "raw";
const CORPUS_KIND: &str = "corpus";

fn db_error(context: &str) -> impl Fn(sqlx::Error) -> Error + '_ {
    move |e| Error::Database(format!("{}: {}", context, e))
}

/// Both snapshots in one SQLite file. A store swaps the whole table inside a
/// single transaction.
pub struct SqliteStorage {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl SqliteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!("Failed to create database directory: {}", e))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(db_error("Failed to connect to database"))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn mark_stored(tx: &mut Transaction<'_, Sqlite>, kind: &str) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO snapshots (kind, stored_at) VALUES (?, ?)")
            .bind(kind)
            .bind(Utc::now())
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to record snapshot"))?;
        Ok(())
    }

    async fn ensure_stored(&self, kind: &str) -> Result<()> {
        let row = sqlx::query("SELECT stored_at FROM snapshots WHERE kind = ?")
            .bind(kind)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to look up snapshot"))?;
        match row {
            Some(_) => Ok(()),
            None => Err(Error::Storage(format!(
                "No {} snapshot in {}",
                kind,
                self.db_path.display()
            ))),
        }
    }
}

fn raw_from_row(row: &SqliteRow) -> std::result::Result<RawArticle, sqlx::Error> {
    Ok(RawArticle {
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        content: row.try_get("content")?,
        source: row.try_get("source")?,
        url: row.try_get("url")?,
        category: row.try_get("category")?,
        region: row.try_get("region")?,
        published_at: row.try_get("published_at")?,
        author: row.try_get("author")?,
        image_url: row.try_get("image_url")?,
        fetched_at: row.try_get::<Option<DateTime<Utc>>, _>("fetched_at")?,
    })
}

#[async_trait]
impl SnapshotStorage for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn store_raw(&self, articles: &[RawArticle]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin"))?;
        sqlx::query("DELETE FROM raw_articles")
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to clear raw snapshot"))?;

        for (position, a) in articles.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO raw_articles
                (position, title, description, content, source, url, category, region,
                 published_at, author, image_url, fetched_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(position as i64)
            .bind(&a.title)
            .bind(&a.description)
            .bind(&a.content)
            .bind(&a.source)
            .bind(&a.url)
            .bind(&a.category)
            .bind(&a.region)
            .bind(&a.published_at)
            .bind(a.author.as_deref())
            .bind(a.image_url.as_deref())
            .bind(a.fetched_at)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to store raw article"))?;
        }

        Self::mark_stored(&mut tx, RAW_KIND).await?;
        tx.commit().await.map_err(db_error("Failed to commit raw snapshot"))?;
        Ok(())
    }

    async fn load_raw(&self) -> Result<Vec<RawArticle>> {
        self.ensure_stored(RAW_KIND).await?;
        let rows = sqlx::query("SELECT * FROM raw_articles ORDER BY position")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to load raw snapshot"))?;

        rows.iter()
            .map(|row| raw_from_row(row).map_err(db_error("Malformed raw row")))
            .collect()
    }

    async fn store_corpus(&self, articles: &[EnrichedArticle]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin"))?;
        sqlx::query("DELETE FROM corpus_articles")
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to clear corpus snapshot"))?;

        for (position, article) in articles.iter().enumerate() {
            let a = &article.raw;
            let tokens = serde_json::to_string(&article.tokens)?;
            sqlx::query(
                r#"
                INSERT INTO corpus_articles
                (position, title, description, content, source, url, category, region,
                 published_at, author, image_url, fetched_at, tokens, topic,
                 sentiment_polarity, sentiment_subjectivity)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(position as i64)
            .bind(&a.title)
            .bind(&a.description)
            .bind(&a.content)
            .bind(&a.source)
            .bind(&a.url)
            .bind(&a.category)
            .bind(&a.region)
            .bind(&a.published_at)
            .bind(a.author.as_deref())
            .bind(a.image_url.as_deref())
            .bind(a.fetched_at)
            .bind(tokens)
            .bind(article.topic.as_str())
            .bind(article.sentiment_polarity)
            .bind(article.sentiment_subjectivity)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to store corpus article"))?;
        }

        Self::mark_stored(&mut tx, CORPUS_KIND).await?;
        tx.commit().await.map_err(db_error("Failed to commit corpus snapshot"))?;
        Ok(())
    }

    async fn load_corpus(&self) -> Result<Vec<EnrichedArticle>> {
        self.ensure_stored(CORPUS_KIND).await?;
        let rows = sqlx::query("SELECT * FROM corpus_articles ORDER BY position")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to load corpus snapshot"))?;

        let mut articles = Vec::with_capacity(rows.len());
        for row in &rows {
            let raw = raw_from_row(row).map_err(db_error("Malformed corpus row"))?;
            let tokens: String = row.try_get("tokens").map_err(db_error("Malformed corpus row"))?;
            let topic: String = row.try_get("topic").map_err(db_error("Malformed corpus row"))?;
            articles.push(EnrichedArticle {
                raw,
                tokens: serde_json::from_str(&tokens)?,
                topic: Topic::from_str(&topic)?,
                sentiment_polarity: row
                    .try_get("sentiment_polarity")
                    .map_err(db_error("Malformed corpus row"))?,
                sentiment_subjectivity: row
                    .try_get("sentiment_subjectivity")
                    .map_err(db_error("Malformed corpus row"))?,
            });
        }
        Ok(articles)
    }
}
