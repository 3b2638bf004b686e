use std::collections::HashSet;

use lazy_static::lazy_static;
use nr_core::Topic;

use crate::text::lemmatize;

const TECHNOLOGY: &[&str] = &[
    "technology", "tech", "intelligence", "software", "hardware", "internet", "cyber",
    "cybersecurity", "robot", "robotics", "automation", "cloud", "computing", "computer",
    "digital", "blockchain", "cryptocurrency", "crypto", "startup", "innovation", "smartphone",
    "app", "apps", "chip", "semiconductor", "processor", "algorithm", "network", "gadget",
    "device", "iphone", "android", "silicon", "google", "microsoft", "openai", "data",
];

const SPORTS: &[&str] = &[
    "sport", "sports", "athlete", "tournament", "championship", "olympic", "olympics", "team",
    "player", "coach", "game", "match", "competition", "league", "stadium", "score", "win",
    "record", "season", "football", "soccer", "basketball", "baseball", "tennis", "golf",
    "cricket", "rugby", "hockey", "goal", "playoff", "playoffs", "medal", "race", "cup", "nba",
    "nfl", "fifa",
];

const FINANCE: &[&str] = &[
    "finance", "stock", "stocks", "market", "investment", "bank", "banking",
    "economy", "financial", "currency", "investor", "profit", "revenue", "growth", "share",
    "shares", "portfolio", "fund", "asset", "wealth", "dividend", "inflation", "interest",
    "bond", "earnings", "nasdaq", "dow", "bitcoin", "loan", "mortgage", "debt", "treasury",
    "recession",
];

const BUSINESS: &[&str] = &[
    "business", "company", "corporate", "industry", "enterprise", "startup", "merger",
    "acquisition", "ceo", "executive", "management", "strategy", "market", "commercial",
    "retail", "trade", "partnership", "deal", "firm", "layoffs", "employee", "sales", "customer",
    "brand", "supply", "factory", "tariff", "product", "consumer", "workforce",
];

const HEALTH: &[&str] = &[
    "health", "medical", "healthcare", "disease", "treatment", "hospital", "doctor", "patient",
    "medicine", "research", "clinical", "vaccine", "wellness", "therapy", "mental", "nutrition",
    "fitness", "virus", "covid", "cancer", "drug", "diet", "symptom", "infection", "outbreak",
    "pandemic", "nurse", "surgery", "diabetes",
];

const SCIENCE: &[&str] = &[
    "science", "research", "discovery", "discovered", "study", "experiment", "laboratory", "lab",
    "scientist", "physics", "chemistry", "biology", "space", "climate", "environment",
    "innovation", "technology", "breakthrough", "nasa", "planet", "astronomer", "telescope",
    "species", "fossil", "galaxy", "asteroid", "gene", "genetic", "evolution", "ocean", "quantum",
    "mars", "moon", "orbit", "satellite",
];

const ENTERTAINMENT: &[&str] = &[
    "entertainment", "movie", "film", "music", "celebrity", "actor", "actress", "singer",
    "album", "concert", "television", "show", "series", "star", "hollywood", "netflix",
    "streaming", "award", "oscar", "grammy", "premiere", "trailer", "drama", "comedy",
    "festival", "song", "band", "tour", "theater", "director", "episode", "sequel",
];

/// Surface keywords for a category. `General` has none.
pub fn raw_keywords(topic: Topic) -> &'static [&'static str] {
    match topic {
        Topic::Technology => TECHNOLOGY,
        Topic::Sports => SPORTS,
        Topic::Finance => FINANCE,
        Topic::Business => BUSINESS,
        Topic::Health => HEALTH,
        Topic::Science => SCIENCE,
        Topic::Entertainment => ENTERTAINMENT,
        Topic::General => &[],
    }
}

lazy_static! {
    /// Keyword sets in lemma form, ordered like `Topic::CATEGORIES`.
    static ref KEYWORDS: Vec<(Topic, HashSet<String>)> = Topic::CATEGORIES
        .iter()
        .map(|topic| {
            let lemmas = raw_keywords(*topic)
                .iter()
                .map(|word| lemmatize(word))
                .collect();
            (*topic, lemmas)
        })
        .collect();
}

/// Keyword overlap per category, in tie-break order.
pub fn topic_scores<S: AsRef<str>>(tokens: &[S]) -> Vec<(Topic, usize)> {
    let token_set: HashSet<&str> = tokens.iter().map(AsRef::as_ref).collect();
    KEYWORDS
        .iter()
        .map(|(topic, keywords)| {
            let score = keywords
                .iter()
                .filter(|keyword| token_set.contains(keyword.as_str()))
                .count();
            (*topic, score)
        })
        .collect()
}

/// Label normalized tokens with the category sharing the most keywords.
///
/// Only a strictly greater score replaces the current best, so ties go to the
/// category declared first. No overlap at all gives [`Topic::General`].
pub fn classify<S: AsRef<str>>(tokens: &[S]) -> Topic {
    let mut best = Topic::General;
    let mut best_score = 0;
    for (topic, score) in topic_scores(tokens) {
        if score > best_score {
            best = topic;
            best_score = score;
        }
    }
    best
}
