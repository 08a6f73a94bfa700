//! Core types shared across all layers: the comic record, aggregate
//! statistics, and the two shapes a search operation returns.

use serde::{Deserialize, Serialize};

/// One persistent comic record: `{id, url, keywords}`.
///
/// `words` is an ordered multiset — duplicates are preserved, since the
/// storage-backed ranker counts occurrences (see [`SearchResult`] ranking in
/// `corpus-search`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comic {
    pub id: i64,
    pub url: String,
    pub words: Vec<String>,
}

/// Result of a `Search` or `IndexSearch` call.
///
/// `total` is the post-truncation row count, not the pre-limit match count —
/// this is intentional and preserved from the source system (see DESIGN.md).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub comics: Vec<Comic>,
    pub total: i64,
}

/// Storage-level word/comic counters, computed purely from the `comics`
/// table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DbStats {
    pub words_total: i64,
    pub words_unique: i64,
    pub comics_fetched: i64,
}

/// Aggregate ingestion statistics reported by `GET /api/db/stats`: the raw
/// [`DbStats`] plus `comics_total`, which is process-local state the
/// Ingestor computes from `LastID - |missing|` (spec §3, §4.2) and storage
/// has no way to know.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ServiceStats {
    pub words_total: i64,
    pub words_unique: i64,
    pub comics_fetched: i64,
    pub comics_total: i64,
}

impl ServiceStats {
    pub fn new(db: DbStats, comics_total: i64) -> Self {
        Self {
            words_total: db.words_total,
            words_unique: db.words_unique,
            comics_fetched: db.comics_fetched,
            comics_total,
        }
    }
}

/// Advisory ingestion status reported by `GET /api/db/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Idle,
    Running,
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceStatus::Idle => write!(f, "idle"),
            ServiceStatus::Running => write!(f, "running"),
        }
    }
}
