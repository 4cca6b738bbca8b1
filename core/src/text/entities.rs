use crate::text::patterns::{ARTICLES, COMMON_CAPITALIZED, SENTENCE_STARTERS};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static DIGIT: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\d").ok());

/// Capitalized word of at least four letters: the proper-noun approximation.
static CAPITALIZED: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\b[A-ZÄÖÜ][a-zäöüß]{3,}\b").ok());

const TOKEN_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '"', '\''];

pub fn has_digit(text: &str) -> bool {
    DIGIT.as_ref().map(|re| re.is_match(text)).unwrap_or(false)
}

/// True when the text carries something checkable: a digit, or a capitalized
/// token longer than two characters that is not a sentence starter (first
/// position) or an article (later positions).
pub fn has_named_entity(text: &str) -> bool {
    if has_digit(text) {
        return true;
    }
    for (i, word) in text.split_whitespace().enumerate() {
        let clean = word.trim_matches(TOKEN_PUNCTUATION);
        let first = match clean.chars().next() {
            Some(c) => c,
            None => continue,
        };
        if !first.is_uppercase() || clean.chars().count() <= 2 {
            continue;
        }
        let stoplist = if i == 0 { SENTENCE_STARTERS } else { ARTICLES };
        if !stoplist.contains(&clean) {
            return true;
        }
    }
    false
}

/// Distinct capitalized tokens, sorted.
pub fn capitalized_tokens(text: &str) -> BTreeSet<String> {
    match CAPITALIZED.as_ref() {
        Some(re) => re.find_iter(text).map(|m| m.as_str().to_string()).collect(),
        None => BTreeSet::new(),
    }
}

/// The explanation names more than three capitalized tokens the claim never
/// mentions, after dropping common capitalized words.
pub fn irrelevant_entities(claim: &str, explanation: &str) -> bool {
    let claim_entities = capitalized_tokens(claim);
    let foreign = capitalized_tokens(explanation)
        .into_iter()
        .filter(|e| !claim_entities.contains(e))
        .filter(|e| !COMMON_CAPITALIZED.contains(&e.as_str()))
        .count();
    foreign > 3
}
