use std::collections::HashMap;

use lazy_static::lazy_static;
use nr_core::{Result, Sentiment, SentimentModel};
use unicode_segmentation::UnicodeSegmentation;

use crate::text::lemmatize;

/// Multiplier applied to polarity when a negation precedes a scored word.
const NEGATION_FACTOR: f64 = -0.5;

lazy_static! {
    /// word -> (polarity, subjectivity)
    static ref LEXICON: HashMap<&'static str, (f64, f64)> = [
        // positive
        ("good", (0.7, 0.6)),
        ("great", (0.8, 0.75)),
        ("excellent", (1.0, 1.0)),
        ("amazing", (0.6, 0.9)),
        ("awesome", (1.0, 1.0)),
        ("wonderful", (1.0, 1.0)),
        ("fantastic", (0.4, 0.9)),
        ("incredible", (0.9, 0.9)),
        ("brilliant", (0.9, 1.0)),
        ("impressive", (1.0, 1.0)),
        ("perfect", (1.0, 1.0)),
        ("beautiful", (0.85, 1.0)),
        ("best", (1.0, 0.3)),
        ("better", (0.5, 0.5)),
        ("nice", (0.6, 1.0)),
        ("happy", (0.8, 1.0)),
        ("glad", (0.5, 1.0)),
        ("proud", (0.8, 1.0)),
        ("thrilled", (0.6, 0.8)),
        ("love", (0.5, 0.6)),
        ("favorite", (0.5, 1.0)),
        ("popular", (0.6, 0.8)),
        ("positive", (0.23, 0.54)),
        ("success", (0.4, 0.5)),
        ("successful", (0.75, 0.95)),
        ("win", (0.6, 0.4)),
        ("winner", (0.6, 0.5)),
        ("victory", (0.6, 0.5)),
        ("gain", (0.3, 0.4)),
        ("growth", (0.2, 0.3)),
        ("boost", (0.4, 0.4)),
        ("surge", (0.3, 0.4)),
        ("rally", (0.3, 0.4)),
        ("recovery", (0.3, 0.4)),
        ("profit", (0.3, 0.3)),
        ("benefit", (0.4, 0.4)),
        ("improve", (0.4, 0.4)),
        ("progress", (0.4, 0.4)),
        ("breakthrough", (0.5, 0.5)),
        ("innovative", (0.5, 0.7)),
        ("exciting", (0.3, 0.8)),
        ("interesting", (0.5, 0.5)),
        ("fun", (0.3, 0.2)),
        ("hope", (0.4, 0.5)),
        ("hopeful", (0.5, 0.8)),
        ("optimistic", (0.6, 0.8)),
        ("promising", (0.5, 0.8)),
        ("strong", (0.43, 0.73)),
        ("safe", (0.5, 0.5)),
        ("healthy", (0.5, 0.5)),
        ("easy", (0.43, 0.83)),
        ("free", (0.4, 0.8)),
        ("top", (0.5, 0.5)),
        ("huge", (0.4, 0.9)),
        ("important", (0.4, 1.0)),
        ("significant", (0.375, 0.875)),
        ("celebrate", (0.6, 0.6)),
        ("praise", (0.5, 0.6)),
        ("award", (0.3, 0.3)),
        ("new", (0.14, 0.45)),
        // negative
        ("bad", (-0.7, 0.67)),
        ("terrible", (-1.0, 1.0)),
        ("awful", (-1.0, 1.0)),
        ("horrible", (-1.0, 1.0)),
        ("worst", (-1.0, 1.0)),
        ("worse", (-0.4, 0.6)),
        ("poor", (-0.4, 0.6)),
        ("negative", (-0.3, 0.4)),
        ("wrong", (-0.5, 0.9)),
        ("weak", (-0.375, 0.625)),
        ("hard", (-0.29, 0.54)),
        ("difficult", (-0.5, 1.0)),
        ("sad", (-0.5, 1.0)),
        ("angry", (-0.5, 1.0)),
        ("ugly", (-0.7, 1.0)),
        ("boring", (-1.0, 1.0)),
        ("stupid", (-0.8, 1.0)),
        ("dangerous", (-0.6, 0.9)),
        ("disappointing", (-0.6, 0.7)),
        ("unfortunately", (-0.5, 1.0)),
        ("violent", (-0.8, 0.8)),
        ("tragic", (-0.75, 0.75)),
        ("disaster", (-0.8, 0.8)),
        ("crisis", (-0.5, 0.5)),
        ("crash", (-0.6, 0.6)),
        ("collapse", (-0.6, 0.6)),
        ("plunge", (-0.5, 0.5)),
        ("slump", (-0.4, 0.5)),
        ("decline", (-0.3, 0.4)),
        ("loss", (-0.4, 0.4)),
        ("fail", (-0.5, 0.5)),
        ("failure", (-0.5, 0.5)),
        ("fear", (-0.5, 0.6)),
        ("risk", (-0.2, 0.4)),
        ("threat", (-0.5, 0.5)),
        ("concern", (-0.2, 0.4)),
        ("problem", (-0.3, 0.4)),
        ("controversy", (-0.4, 0.6)),
        ("scandal", (-0.6, 0.7)),
        ("fraud", (-0.7, 0.7)),
        ("illegal", (-0.5, 0.5)),
        ("lawsuit", (-0.3, 0.4)),
        ("layoff", (-0.4, 0.4)),
        ("recession", (-0.5, 0.5)),
        ("war", (-0.6, 0.5)),
        ("attack", (-0.5, 0.5)),
        ("kill", (-0.6, 0.6)),
        ("death", (-0.6, 0.5)),
        ("dead", (-0.2, 0.4)),
        ("injure", (-0.5, 0.5)),
        ("sick", (-0.71, 0.86)),
        ("pain", (-0.5, 0.6)),
    ]
    .into_iter()
    .collect();

    static ref INTENSIFIERS: HashMap<&'static str, f64> = [
        ("very", 1.3),
        ("really", 1.3),
        ("so", 1.3),
        ("extremely", 1.5),
        ("incredibly", 1.5),
        ("highly", 1.4),
        ("quite", 1.1),
        ("somewhat", 0.8),
        ("slightly", 0.5),
        ("barely", 0.5),
    ]
    .into_iter()
    .collect();
}

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "without", "hardly",
    "isn't", "aren't", "wasn't", "weren't", "don't", "doesn't", "didn't", "won't", "wouldn't",
    "can't", "cannot", "couldn't", "shouldn't", "haven't", "hasn't", "hadn't",
];

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word)
}

/// Word-lexicon polarity/subjectivity scorer.
///
/// Each lexicon word contributes its (polarity, subjectivity). An intensifier
/// right before it scales both, a negation within the two preceding words
/// flips and halves the polarity. The article score is the mean over scored
/// words, clamped into range. Text with no lexicon words is neutral.
#[derive(Debug, Default, Clone)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    pub fn new() -> Self {
        Self
    }

    fn lookup(word: &str) -> Option<(f64, f64)> {
        if let Some(entry) = LEXICON.get(word) {
            return Some(*entry);
        }
        if word.chars().all(char::is_alphabetic) {
            return LEXICON.get(lemmatize(word).as_str()).copied();
        }
        None
    }
}

impl SentimentModel for LexiconSentiment {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn score(&self, text: &str) -> Result<Sentiment> {
        let text = text.replace('\u{2019}', "'");
        let words: Vec<String> = text.unicode_words().map(str::to_lowercase).collect();

        let mut polarity_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        let mut scored = 0usize;

        for (i, word) in words.iter().enumerate() {
            let Some((mut polarity, mut subjectivity)) = Self::lookup(word) else {
                continue;
            };

            let mut lookback = i;
            if i > 0 {
                if let Some(factor) = INTENSIFIERS.get(words[i - 1].as_str()) {
                    polarity *= factor;
                    subjectivity *= factor;
                    lookback = i - 1;
                }
            }

            let negated = (lookback.saturating_sub(2)..lookback).any(|j| is_negation(&words[j]));
            if negated {
                polarity *= NEGATION_FACTOR;
            }

            polarity_sum += polarity;
            subjectivity_sum += subjectivity;
            scored += 1;
        }

        if scored == 0 {
            return Ok(Sentiment::default());
        }

        Ok(Sentiment {
            polarity: (polarity_sum / scored as f64).clamp(-1.0, 1.0),
            subjectivity: (subjectivity_sum / scored as f64).clamp(0.0, 1.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> Sentiment {
        LexiconSentiment::new().score(text).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_and_unscored_text_is_neutral() {
        assert_eq!(score(""), Sentiment::default());
        assert_eq!(score("   "), Sentiment::default());
        assert_eq!(score("1234 5678"), Sentiment::default());
        assert_eq!(score("The committee met to discuss the schedule"), Sentiment::default());
    }

    #[test]
    fn test_single_word() {
        let s = score("The results were good");
        assert!(approx(s.polarity, 0.7));
        assert!(approx(s.subjectivity, 0.6));
    }

    #[test]
    fn test_negation_flips_and_halves() {
        let s = score("The results were not good");
        assert!(approx(s.polarity, -0.35));

        let s = score("The launch wasn\u{2019}t a disaster");
        assert!(approx(s.polarity, 0.4));
    }

    #[test]
    fn test_intensifiers() {
        assert!(score("very good").polarity > score("good").polarity);
        assert!(score("slightly bad").polarity > score("bad").polarity);

        let s = score("not very good");
        assert!(approx(s.polarity, 0.7 * 1.3 * NEGATION_FACTOR));
    }

    #[test]
    fn test_mean_over_scored_words() {
        let s = score("A great start and a terrible finish");
        assert!(approx(s.polarity, (0.8 - 1.0) / 2.0));
        assert!(approx(s.subjectivity, (0.75 + 1.0) / 2.0));
    }

    #[test]
    fn test_clamped() {
        let s = score("extremely excellent");
        assert_eq!(s.polarity, 1.0);
        assert_eq!(s.subjectivity, 1.0);

        let s = score("extremely terrible");
        assert_eq!(s.polarity, -1.0);
    }

    #[test]
    fn test_inflected_forms_use_lemma() {
        let s = score("Markets crashed");
        assert!(s.polarity < 0.0);
    }
}
