//! The in-memory inverted index: `keyword -> [comic id, ...]`.
//!
//! Rebuilt atomically from a full corpus scan ([`crate::service::SearchService::build_index`]);
//! readers always observe a complete pre- or post-rebuild snapshot, published
//! through [`arc_swap::ArcSwap`] rather than a reader/writer lock — the swap
//! is the whole state machine, so there is no intermediate "stale" state
//! (spec §4.3, §9).

use std::collections::HashMap;

use corpus_core::types::Comic;

/// `keyword -> ordered sequence of comic ids containing it`.
#[derive(Debug, Default, Clone)]
pub struct Index {
    postings: HashMap<String, Vec<i64>>,
}

impl Index {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a fresh index from a full corpus scan.
    pub fn build(comics: &[Comic]) -> Self {
        let mut postings: HashMap<String, Vec<i64>> = HashMap::new();
        for comic in comics {
            for word in &comic.words {
                postings.entry(word.clone()).or_default().push(comic.id);
            }
        }
        Self { postings }
    }

    pub fn get(&self, keyword: &str) -> Option<&[i64]> {
        self.postings.get(keyword).map(Vec::as_slice)
    }

    pub fn keyword_count(&self) -> usize {
        self.postings.len()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.postings.contains_key(keyword)
    }
}
