//! corpus-normalizer — phrase → stemmed-keyword-set.
//!
//! Stateless and pure: no I/O, no retained state beyond the lazily-built
//! stop-word set. [`Normalizer::norm`] is safe to call from any number of
//! concurrent tasks.
//!
//! # Pipeline
//!
//! 1. Reject phrases over [`MAX_PHRASE_LEN`] bytes.
//! 2. Split on any Unicode punctuation, whitespace, or `+`.
//! 3. Lowercase and Porter-stem each token (English algorithm).
//! 4. Drop stems that are English stop words.
//! 5. Deduplicate into a set; order of the result is unspecified.

use corpus_core::error::CoreError;
use corpus_core::ports::Normalizer as NormalizerPort;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

/// Phrases over this many bytes are rejected with `CoreError::BadArguments`,
/// surfaced at the edge as "bad arguments" / HTTP 400.
pub const MAX_PHRASE_LEN: usize = 20_480;

// `\p{P}` covers all Unicode punctuation categories; `\s` covers whitespace.
// `+` is split on explicitly because it is common in search phrases
// ("c++", "programming+language") but is in Unicode category Sm (symbol,
// math), not punctuation.
static SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{P}\s+]+").expect("valid regex"));

static STOP_WORDS: Lazy<HashSet<String>> =
    Lazy::new(|| stop_words::get(stop_words::LANGUAGE::English).into_iter().collect());

/// The stateless phrase normalizer described in spec §4.1.
#[derive(Debug, Default, Clone, Copy)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Reduce `phrase` to its deduplicated set of stemmed, non-stop-word
    /// keywords. Returns `Err(CoreError::BadArguments)` if `phrase` exceeds
    /// [`MAX_PHRASE_LEN`] bytes.
    pub fn norm(&self, phrase: &str) -> Result<Vec<String>, CoreError> {
        if phrase.len() > MAX_PHRASE_LEN {
            return Err(CoreError::bad_arguments(format!(
                "phrase exceeds {MAX_PHRASE_LEN} bytes"
            )));
        }

        let stemmer = Stemmer::create(Algorithm::English);
        let mut seen = HashSet::new();

        for token in SPLIT_RE.split(phrase) {
            if token.is_empty() {
                continue;
            }
            let lower = token.to_lowercase();
            let stemmed = stemmer.stem(&lower).into_owned();
            if STOP_WORDS.contains(&stemmed) {
                continue;
            }
            seen.insert(stemmed);
        }

        Ok(seen.into_iter().collect())
    }
}

impl NormalizerPort for Normalizer {
    fn norm(&self, phrase: &str) -> Result<Vec<String>, CoreError> {
        Normalizer::norm(self, phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet as Set;

    fn set(words: &[&str]) -> Set<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn splits_on_punctuation_and_lowercases() {
        let n = Normalizer::new();
        let got: Set<String> = n.norm("Hello, world! How are you?").unwrap().into_iter().collect();
        assert_eq!(got, set(&["hello", "world"]));
    }

    #[test]
    fn stems_and_drops_stop_words() {
        let n = Normalizer::new();
        let got: Set<String> = n.norm("running jumps quickly").unwrap().into_iter().collect();
        assert_eq!(got, set(&["run", "jump", "quick"]));
    }

    #[test]
    fn all_stop_words_yields_empty_set() {
        let n = Normalizer::new();
        assert!(n.norm("the and or but").unwrap().is_empty());
    }

    #[test]
    fn empty_phrase_yields_empty_set() {
        let n = Normalizer::new();
        assert!(n.norm("").unwrap().is_empty());
    }

    #[test]
    fn splits_on_plus_as_well_as_punctuation() {
        let n = Normalizer::new();
        let got: Set<String> = n
            .norm("c++ programming+language")
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(got, set(&["c", "program", "languag"]));
    }

    #[test]
    fn oversized_phrase_is_bad_arguments() {
        let n = Normalizer::new();
        let huge = "a".repeat(MAX_PHRASE_LEN + 1);
        match n.norm(&huge) {
            Err(CoreError::BadArguments(_)) => {}
            other => panic!("expected BadArguments, got {other:?}"),
        }
    }

    #[test]
    fn exactly_at_cap_is_accepted() {
        let n = Normalizer::new();
        let phrase = "a".repeat(MAX_PHRASE_LEN);
        assert!(n.norm(&phrase).is_ok());
    }

    #[test]
    fn deduplicates_repeated_words() {
        let n = Normalizer::new();
        let got = n.norm("cat cat cat").unwrap();
        assert_eq!(got, vec!["cat".to_string()]);
    }

    proptest::proptest! {
        #[test]
        fn normalization_is_idempotent(phrase in ".{0,200}") {
            let n = Normalizer::new();
            if let Ok(first) = n.norm(&phrase) {
                let rejoined = first.join(" ");
                let second = n.norm(&rejoined).unwrap();
                let first_set: Set<String> = first.into_iter().collect();
                let second_set: Set<String> = second.into_iter().collect();
                proptest::prop_assert_eq!(first_set, second_set);
            }
        }
    }
}
