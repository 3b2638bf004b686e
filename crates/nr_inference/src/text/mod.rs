use unicode_segmentation::UnicodeSegmentation;

pub mod lemmatize;
pub mod stopwords;

pub use lemmatize::lemmatize;
pub use stopwords::{is_stop_word, ENGLISH_STOP_WORDS};

/// Tokens shorter than this are dropped, before and after lemmatization.
pub const MIN_TOKEN_CHARS: usize = 3;

/// Normalize free text into lemma tokens.
///
/// Splits on Unicode word boundaries, lowercases, keeps purely alphabetic
/// words that are not stop words and have at least [`MIN_TOKEN_CHARS`]
/// characters, then reduces each to its lemma.
pub fn normalize(text: &str) -> Vec<String> {
    text.unicode_words()
        .map(str::to_lowercase)
        .filter(|word| word.chars().all(char::is_alphabetic))
        .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|word| !is_stop_word(word))
        .map(|word| lemmatize(&word))
        .filter(|lemma| lemma.chars().count() >= MIN_TOKEN_CHARS)
        .collect()
}
