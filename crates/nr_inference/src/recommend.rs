use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use nr_core::{CorpusStats, EnrichedArticle, Error, Result};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::tfidf::{SparseVector, TfIdfVectorizer};

/// A corpus snapshot with its fitted weighting model. Immutable once built;
/// retraining builds a new one.
#[derive(Debug)]
pub struct Corpus {
    articles: Vec<EnrichedArticle>,
    vectorizer: TfIdfVectorizer,
    rows: Vec<SparseVector>,
    trained_at: DateTime<Utc>,
}

impl Corpus {
    /// Fit TF–IDF over the article bodies.
    pub fn fit(articles: Vec<EnrichedArticle>) -> Result<Self> {
        if articles.is_empty() {
            return Err(Error::EmptyCorpus("no articles".to_string()));
        }
        let documents: Vec<&str> = articles.iter().map(|a| a.raw.content.as_str()).collect();
        let (vectorizer, rows) = TfIdfVectorizer::fit_transform(&documents)?;
        Ok(Self {
            articles,
            vectorizer,
            rows,
            trained_at: Utc::now(),
        })
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn articles(&self) -> &[EnrichedArticle] {
        &self.articles
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats::from_articles(&self.articles)
    }

    /// Sum over preferred topics of the mean row of that topic's articles.
    ///
    /// The per-topic means are added, not averaged, so a requester naming
    /// several matching topics gets a longer profile pulled toward all of
    /// them. This is a known modeling choice; cosine similarity ignores the
    /// length but the direction still favors whichever topics have the
    /// strongest mean vectors.
    fn profile(&self, preferences: &[String]) -> Vec<f64> {
        let mut profile = vec![0.0; self.vectorizer.vocabulary_size()];
        for preference in preferences {
            let matching: Vec<&SparseVector> = self
                .articles
                .iter()
                .zip(&self.rows)
                .filter(|(article, _)| article.topic.as_str() == preference)
                .map(|(_, row)| row)
                .collect();
            if matching.is_empty() {
                continue;
            }
            let scale = 1.0 / matching.len() as f64;
            for row in matching {
                row.add_scaled_to(&mut profile, scale);
            }
        }
        profile
    }

    fn rank(&self, preferences: &[String], n: usize) -> Vec<ScoredArticle> {
        let profile = self.profile(preferences);
        let profile_norm = profile.iter().map(|w| w * w).sum::<f64>().sqrt();

        let scores: Vec<f64> = self
            .rows
            .iter()
            .map(|row| cosine(&profile, profile_norm, row))
            .collect();

        let mut order: Vec<usize> = (0..self.articles.len()).collect();
        // stable: equal scores keep corpus order
        order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

        order
            .into_iter()
            .take(n)
            .map(|i| ScoredArticle {
                article: self.articles[i].clone(),
                score: scores[i],
            })
            .collect()
    }
}

fn cosine(profile: &[f64], profile_norm: f64, row: &SparseVector) -> f64 {
    let row_norm = row.norm();
    if profile_norm == 0.0 || row_norm == 0.0 {
        return 0.0;
    }
    (row.dot_dense(profile) / (profile_norm * row_norm)).clamp(0.0, 1.0)
}

/// Lowercase, trim, drop blanks and repeats. First occurrence wins.
pub fn normalize_preferences<S: AsRef<str>>(preferences: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    preferences
        .iter()
        .map(|p| p.as_ref().trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredArticle {
    pub article: EnrichedArticle,
    /// Cosine similarity to the requester profile, in [0, 1]
    pub score: f64,
}

/// Content-based recommender over the latest trained corpus.
///
/// Starts untrained. `train` builds the new corpus before taking the write
/// lock and swaps it in whole, so queries only ever see a complete corpus and
/// never wait on one another.
#[derive(Debug, Default)]
pub struct RecommendationEngine {
    corpus: RwLock<Option<Arc<Corpus>>>,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit on `articles` and replace the current corpus. On error the
    /// previous corpus, if any, stays in place.
    pub async fn train(&self, articles: Vec<EnrichedArticle>) -> Result<()> {
        let corpus = match Corpus::fit(articles) {
            Ok(corpus) => corpus,
            Err(e) => {
                warn!("🧠 Training failed, keeping the previous model: {}", e);
                return Err(e);
            }
        };
        info!(
            "🧠 Trained recommender on {} articles ({} terms)",
            corpus.len(),
            corpus.vectorizer().vocabulary_size()
        );
        *self.corpus.write().await = Some(Arc::new(corpus));
        Ok(())
    }

    pub async fn is_trained(&self) -> bool {
        self.corpus.read().await.is_some()
    }

    pub async fn corpus_size(&self) -> usize {
        self.corpus.read().await.as_ref().map_or(0, |c| c.len())
    }

    pub async fn stats(&self) -> Option<CorpusStats> {
        self.snapshot().await.map(|c| c.stats())
    }

    /// The corpus queries currently run against.
    pub async fn snapshot(&self) -> Option<Arc<Corpus>> {
        self.corpus.read().await.clone()
    }

    /// Top `n` articles for the preferred topics, or `UntrainedEngine` before
    /// the first successful `train`.
    pub async fn try_recommend_scored<S: AsRef<str>>(
        &self,
        preferences: &[S],
        n: usize,
    ) -> Result<Vec<ScoredArticle>> {
        let corpus = self.snapshot().await.ok_or(Error::UntrainedEngine)?;
        Ok(corpus.rank(&normalize_preferences(preferences), n))
    }

    /// Like [`Self::try_recommend_scored`], but an untrained engine yields an empty list.
    pub async fn recommend_scored<S: AsRef<str>>(&self, preferences: &[S], n: usize) -> Vec<ScoredArticle> {
        match self.try_recommend_scored(preferences, n).await {
            Ok(ranked) => ranked,
            Err(e) => {
                warn!("Recommendation query answered empty: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn recommend<S: AsRef<str>>(&self, preferences: &[S], n: usize) -> Vec<EnrichedArticle> {
        self.recommend_scored(preferences, n)
            .await
            .into_iter()
            .map(|scored| scored.article)
            .collect()
    }
}
