//! Rule-based English lemmatizer.
//!
//! Reduces plural nouns and regular `-ing`/`-ed` verb forms to a dictionary-like
//! base form without a dictionary. Irregular-form tables and lists of words
//! that merely look inflected take precedence over the suffix rules.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

lazy_static! {
    static ref IRREGULAR_NOUNS: HashMap<&'static str, &'static str> = [
        ("men", "man"),
        ("women", "woman"),
        ("children", "child"),
        ("mice", "mouse"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("geese", "goose"),
        ("criteria", "criterion"),
        ("phenomena", "phenomenon"),
        ("analyses", "analysis"),
        ("crises", "crisis"),
        ("theses", "thesis"),
        ("diagnoses", "diagnosis"),
        ("leaves", "leaf"),
        ("lives", "life"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("halves", "half"),
        ("wolves", "wolf"),
        ("shelves", "shelf"),
        ("heroes", "hero"),
        ("potatoes", "potato"),
        ("tomatoes", "tomato"),
        ("echoes", "echo"),
        ("vetoes", "veto"),
        ("buses", "bus"),
        ("viruses", "virus"),
        ("bonuses", "bonus"),
        ("campuses", "campus"),
        ("statuses", "status"),
        ("censuses", "census"),
        ("aches", "ache"),
        ("headaches", "headache"),
    ]
    .into_iter()
    .collect();

    static ref IRREGULAR_VERBS: HashMap<&'static str, &'static str> = [
        ("ran", "run"),
        ("went", "go"),
        ("gone", "go"),
        ("made", "make"),
        ("said", "say"),
        ("took", "take"),
        ("taken", "take"),
        ("gave", "give"),
        ("given", "give"),
        ("lost", "lose"),
        ("sold", "sell"),
        ("bought", "buy"),
        ("brought", "bring"),
        ("thought", "think"),
        ("found", "find"),
        ("began", "begin"),
        ("begun", "begin"),
        ("grew", "grow"),
        ("grown", "grow"),
        ("risen", "rise"),
        ("fallen", "fall"),
        ("wrote", "write"),
        ("written", "write"),
        ("spoke", "speak"),
        ("spoken", "speak"),
        ("chose", "choose"),
        ("chosen", "choose"),
        ("broke", "break"),
        ("broken", "break"),
        ("knew", "know"),
        ("known", "know"),
        ("told", "tell"),
        ("held", "hold"),
        ("struck", "strike"),
    ]
    .into_iter()
    .collect();

    /// Look plural but are not.
    static ref INVARIANT: HashSet<&'static str> = [
        "news", "series", "species", "physics", "economics", "politics", "mathematics",
        "athletics", "electronics", "diabetes", "measles", "means", "always", "perhaps",
        "whereas", "sometimes", "afterwards", "towards", "chaos", "bias", "lens", "headquarters",
        "christmas", "texas", "kansas", "arkansas", "vegas", "athens",
    ]
    .into_iter()
    .collect();

    /// Look like `-ing`/`-ed` verb forms but are not.
    static ref VERB_LOOKALIKES: HashSet<&'static str> = [
        "thing", "something", "nothing", "anything", "everything", "morning", "evening",
        "ceiling", "wedding", "sibling", "pudding", "string", "spring", "viking", "sterling",
        "darling", "herring", "shilling",
        // look like -ed forms
        "need", "speed", "feed", "seed", "breed", "greed", "weed", "hundred", "indeed",
        "sacred", "naked", "wicked", "kindred", "embed", "united",
    ]
    .into_iter()
    .collect();

    /// Nouns whose singular ends in `-ie`, so `-ies` must not become `-y`.
    static ref IE_NOUNS: HashSet<&'static str> = [
        "movie", "cookie", "rookie", "zombie", "calorie", "selfie", "goalie", "brownie",
        "hippie", "prairie", "genie", "auntie", "sortie", "pixie",
    ]
    .into_iter()
    .collect();
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !is_vowel(c) && c != 'y'
}

/// Plural reduction only.
fn noun_lemma(word: &str) -> String {
    if INVARIANT.contains(word) {
        return word.to_string();
    }
    if let Some(lemma) = IRREGULAR_NOUNS.get(word) {
        return lemma.to_string();
    }
    if !word.is_ascii() {
        return word.to_string();
    }

    let len = word.len();

    if word.ends_with("ss") || (len > 3 && (word.ends_with("us") || word.ends_with("is"))) {
        return word.to_string();
    }

    if word.ends_with("ies") {
        let without_s = &word[..len - 1];
        if len <= 4 || IE_NOUNS.contains(without_s) {
            return without_s.to_string();
        }
        return format!("{}y", &word[..len - 3]);
    }

    if word.ends_with("sses")
        || word.ends_with("ches")
        || word.ends_with("shes")
        || word.ends_with("xes")
        || word.ends_with("zzes")
    {
        return word[..len - 2].to_string();
    }

    if word.ends_with('s') && len > 3 {
        return word[..len - 1].to_string();
    }

    word.to_string()
}

/// Lemma of an already-lowercased, purely alphabetic word.
pub fn lemmatize(word: &str) -> String {
    if let Some(lemma) = IRREGULAR_VERBS.get(word) {
        return lemma.to_string();
    }
    let noun = noun_lemma(word);
    if noun != word || VERB_LOOKALIKES.contains(word) || !word.is_ascii() {
        return noun;
    }

    let len = word.len();

    if word.ends_with("ied") {
        if len <= 4 {
            return word[..len - 1].to_string();
        }
        return format!("{}y", &word[..len - 3]);
    }

    if word.ends_with("ing") && len > 5 {
        return verb_stem(word, &word[..len - 3], false);
    }

    if word.ends_with("ed") && len > 4 {
        return verb_stem(word, &word[..len - 2], true);
    }

    noun
}

/// Turn the stem left after removing `-ing`/`-ed` into a base form, or give
/// back the original word when the stem is too short to trust.
fn verb_stem(word: &str, stem: &str, past: bool) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n < 3 {
        return word.to_string();
    }

    let last = chars[n - 1];
    let prev = chars[n - 2];

    // runn(ing) -> run, stopp(ed) -> stop; fall, pass, buzz, staff keep the pair
    if last == prev && is_consonant(last) && !matches!(last, 'l' | 's' | 'z' | 'f') {
        return if n >= 4 {
            stem[..stem.len() - 1].to_string()
        } else {
            stem.to_string()
        };
    }

    // produc(ed), achiev(ing), analyz(ed), continu(ed) lost a silent e
    if matches!(last, 'c' | 'v' | 'z' | 'u') {
        return format!("{}e", stem);
    }

    if is_vowel(last) {
        // agre(ed) -> agree; see(ing) -> see
        return if past { format!("{}e", stem) } else { stem.to_string() };
    }

    if last == 'y' || is_consonant(prev) {
        return stem.to_string();
    }

    // prev is a vowel from here on
    let vowel_pair = n >= 3 && is_vowel(chars[n - 3]);
    if vowel_pair {
        // rais(ed) -> raise, but rain(ed) -> rain
        return if last == 's' { format!("{}e", stem) } else { stem.to_string() };
    }

    if n >= 5 && stem.ends_with("at") {
        return format!("{}e", stem);
    }

    let keeps_bare = ["en", "er", "on", "el", "et", "it", "ow", "ew", "aw"]
        .iter()
        .any(|suffix| stem.ends_with(suffix));
    if n <= 4 && !keeps_bare && !matches!(last, 'x' | 'w') {
        // mak(ing) -> make, trad(ing) -> trade
        return format!("{}e", stem);
    }

    stem.to_string()
}
