use std::fmt;
use std::sync::Arc;

use nr_core::logging::Logger;
use nr_core::{CorpusStats, EnrichedArticle, Error, RawArticle, Result, Sentiment, SentimentModel, Topic};
use tracing::info;

use crate::classify::classify;
use crate::models::LexiconSentiment;
use crate::text::normalize;

/// Turns raw feed articles into the enriched corpus: tokens, topic label and
/// sentiment for each one.
pub struct EnrichmentProcessor {
    model: Arc<dyn SentimentModel>,
}

impl fmt::Debug for EnrichmentProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichmentProcessor")
            .field("model", &self.model.name())
            .finish()
    }
}

impl Default for EnrichmentProcessor {
    fn default() -> Self {
        Self::new(Arc::new(LexiconSentiment::new()))
    }
}

impl EnrichmentProcessor {
    pub fn new(model: Arc<dyn SentimentModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Enrich a single article. Depends only on the article and the fixed
    /// keyword and lexicon tables.
    pub fn enrich(&self, article: &RawArticle) -> Result<EnrichedArticle> {
        let (tokens, topic, sentiment) = self.signals(article)?;
        Ok(assemble(article.clone(), tokens, topic, sentiment))
    }

    /// Enrich a batch, keeping input order. An article that fails is logged and
    /// left out; the rest of the batch carries on.
    pub fn process(&self, raw: Vec<RawArticle>) -> Vec<EnrichedArticle> {
        let logger = Logger::new().with_prefix("[enrich]");
        let total = raw.len();
        logger.info(&format!(
            "🧪 Enriching {} articles with the {} sentiment model",
            total,
            self.model.name()
        ));

        let mut corpus = Vec::with_capacity(total);
        for article in raw {
            match self.signals(&article) {
                Ok((tokens, topic, sentiment)) => {
                    corpus.push(assemble(article, tokens, topic, sentiment));
                }
                Err(e) => logger.warn(&format!("⚠️ Dropping article: {}", e)),
            }
        }

        let dropped = total - corpus.len();
        if dropped > 0 {
            logger.warn(&format!("🗑️ Dropped {} of {} articles", dropped, total));
        }
        log_stats(&CorpusStats::from_articles(&corpus));
        corpus
    }

    fn signals(&self, article: &RawArticle) -> Result<(Vec<String>, Topic, Sentiment)> {
        let text = article.full_text();
        let tokens = normalize(&text);
        let topic = classify(&tokens);

        let sentiment = self.model.score(&text).map_err(|e| Error::EnrichmentItem {
            article: article.label().to_string(),
            reason: e.to_string(),
        })?;
        if !sentiment.is_finite() {
            return Err(Error::EnrichmentItem {
                article: article.label().to_string(),
                reason: format!(
                    "{} returned a non-finite score ({}, {})",
                    self.model.name(),
                    sentiment.polarity,
                    sentiment.subjectivity
                ),
            });
        }

        Ok((tokens, topic, sentiment))
    }
}

fn assemble(raw: RawArticle, tokens: Vec<String>, topic: Topic, sentiment: Sentiment) -> EnrichedArticle {
    EnrichedArticle {
        raw,
        tokens,
        topic,
        sentiment_polarity: sentiment.polarity.clamp(-1.0, 1.0),
        sentiment_subjectivity: sentiment.subjectivity.clamp(0.0, 1.0),
    }
}

/// Log the corpus summary, one line per topic.
pub fn log_stats(stats: &CorpusStats) {
    info!("📊 Corpus: {} articles", stats.total_articles);
    for (topic, count) in &stats.articles_per_topic {
        info!("   {:<14} {}", topic.as_str(), count);
    }
    let dist = &stats.sentiment_distribution;
    info!(
        "   sentiment: {} positive, {} neutral, {} negative (mean {:.3})",
        dist.positive, dist.neutral, dist.negative, stats.average_sentiment
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NeutralSentiment;
    use chrono::Utc;

    /// Fails on any text mentioning "poison", returns NaN for "nan".
    #[derive(Debug)]
    struct FlakyModel;

    impl SentimentModel for FlakyModel {
        fn name(&self) -> &str {
            "flaky"
        }

        fn score(&self, text: &str) -> Result<Sentiment> {
            if text.contains("poison") {
                return Err(Error::External(anyhow::anyhow!("scorer blew up")));
            }
            if text.contains("nan") {
                return Ok(Sentiment {
                    polarity: f64::NAN,
                    subjectivity: 0.0,
                });
            }
            Ok(Sentiment {
                polarity: 3.0,
                subjectivity: -1.0,
            })
        }
    }

    fn raw(title: &str, content: &str) -> RawArticle {
        RawArticle {
            title: title.to_string(),
            description: String::new(),
            content: content.to_string(),
            source: "Wire".to_string(),
            url: format!("https://example.com/{}", title.replace(' ', "-")),
            category: "business".to_string(),
            region: "us".to_string(),
            published_at: "2024-03-01T10:00:00Z".to_string(),
            author: None,
            image_url: None,
            fetched_at: Some(Utc::now()),
        }
    }

    #[test]
    fn test_enrich_single_article() {
        let processor = EnrichmentProcessor::default();
        let article = raw(
            "Stocks rally",
            "Investors cheered as the stock market posted strong gains.",
        );
        let enriched = processor.enrich(&article).unwrap();

        assert_eq!(enriched.raw, article);
        assert_eq!(enriched.topic, Topic::Finance);
        assert!(enriched.tokens.contains(&"investor".to_string()));
        assert!(enriched.sentiment_polarity > 0.0);
        assert!((0.0..=1.0).contains(&enriched.sentiment_subjectivity));
    }

    #[test]
    fn test_empty_article_is_general_and_neutral() {
        let processor = EnrichmentProcessor::default();
        let mut article = raw("", "");
        article.url = String::new();
        let enriched = processor.enrich(&article).unwrap();

        assert!(enriched.tokens.is_empty());
        assert_eq!(enriched.topic, Topic::General);
        assert_eq!(enriched.sentiment_polarity, 0.0);
        assert_eq!(enriched.sentiment_subjectivity, 0.0);
    }

    #[test]
    fn test_scores_are_clamped() {
        let processor = EnrichmentProcessor::new(Arc::new(FlakyModel));
        let enriched = processor.enrich(&raw("fine", "fine")).unwrap();
        assert_eq!(enriched.sentiment_polarity, 1.0);
        assert_eq!(enriched.sentiment_subjectivity, 0.0);
    }

    #[test]
    fn test_scorer_failure_is_an_item_error() {
        let processor = EnrichmentProcessor::new(Arc::new(FlakyModel));
        let err = processor.enrich(&raw("poison pill", "")).unwrap_err();
        assert!(matches!(err, Error::EnrichmentItem { ref article, .. } if article.ends_with("poison-pill")));

        let err = processor.enrich(&raw("nan", "")).unwrap_err();
        assert!(matches!(err, Error::EnrichmentItem { .. }));
    }

    #[test]
    fn test_process_drops_failures_and_keeps_order() {
        let processor = EnrichmentProcessor::new(Arc::new(FlakyModel));
        let batch = vec![
            raw("first", "a"),
            raw("poison", "b"),
            raw("second", "c"),
            raw("nan", "d"),
            raw("third", "e"),
        ];

        let corpus = processor.process(batch);
        let titles: Vec<&str> = corpus.iter().map(|a| a.raw.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_process_empty_batch() {
        let processor = EnrichmentProcessor::new(Arc::new(NeutralSentiment::new()));
        assert!(processor.process(Vec::new()).is_empty());
    }
}
