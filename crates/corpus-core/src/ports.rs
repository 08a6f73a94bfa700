//! Port traits — the seams each layer depends on, never a concrete sibling.
//!
//! `corpus-ingestor` and `corpus-search` both depend on [`Storage`] but never
//! on each other. `corpus-gateway` depends on the service-facing traits
//! ([`Updater`], [`Searcher`], [`Normalizer`], [`Detector`]) and is the only
//! crate that knows about HTTP.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::{Comic, DbStats, SearchResult, ServiceStats, ServiceStatus};

/// One upstream comic record, as decoded from the source adapter.
#[derive(Debug, Clone)]
pub struct UpstreamComic {
    pub id: i64,
    pub url: String,
    pub title: String,
    /// `transcript + alt + title`, concatenated with no separator — this is
    /// the upstream adapter's contract, not the normalizer's.
    pub description: String,
}

/// The remote comic source (spec §4.2, §6 "Upstream comic source").
#[async_trait]
pub trait UpstreamSource: Send + Sync {
    /// Highest id that currently exists upstream.
    async fn last_id(&self) -> Result<i64, CoreError>;

    /// Fetch one comic by id. Returns [`CoreError::NotFound`] on a definitive
    /// 404; any other transport failure is [`CoreError::Internal`].
    async fn get(&self, id: i64) -> Result<UpstreamComic, CoreError>;

    /// Process-local ids for which `get` has returned [`CoreError::NotFound`]
    /// in the current process lifetime. Appended-to, never pruned.
    async fn missing_ids(&self) -> Vec<i64>;
}

/// The shared `comics` relational store (spec §3, §6).
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upsert with `ON CONFLICT (id) DO NOTHING` semantics.
    async fn add(&self, comic: Comic) -> Result<(), CoreError>;

    /// All ids currently present, used by `Update` to skip already-stored
    /// comics.
    async fn ids(&self) -> Result<Vec<i64>, CoreError>;

    async fn stats(&self) -> Result<DbStats, CoreError>;

    async fn drop_all(&self) -> Result<(), CoreError>;

    /// Ranked search restricted to comics whose `words` overlaps `keywords`.
    /// `limit <= 0` means unbounded.
    async fn search_comics(
        &self,
        keywords: &[String],
        limit: i64,
    ) -> Result<Vec<Comic>, CoreError>;

    /// Every comic row, ordered by id — the full-corpus scan backing
    /// `BuildIndex`.
    async fn all_comics(&self) -> Result<Vec<Comic>, CoreError>;

    async fn comics_by_ids(&self, ids: &[i64]) -> Result<Vec<Comic>, CoreError>;
}

/// The Ingestor's public operations (spec §4.2).
#[async_trait]
pub trait Updater: Send + Sync {
    async fn update(&self) -> Result<(), CoreError>;
    async fn stats(&self) -> Result<ServiceStats, CoreError>;
    async fn status(&self) -> ServiceStatus;
    async fn drop_all(&self) -> Result<(), CoreError>;
}

/// The Search Engine's public operations (spec §4.3).
#[async_trait]
pub trait Searcher: Send + Sync {
    async fn search(&self, phrase: &str, limit: i64) -> Result<SearchResult, CoreError>;
    async fn index_search(&self, phrase: &str, limit: i64) -> Result<SearchResult, CoreError>;
    async fn build_index(&self) -> Result<(), CoreError>;
}

/// The pure phrase-normalization function, behind a trait so the gateway's
/// `/api/words` handler and the ingestor/search engine all share one
/// implementation without a direct crate dependency cycle.
pub trait Normalizer: Send + Sync {
    /// Returns the deduplicated set of stemmed, non-stop-word keywords, or
    /// `Err` if `phrase` exceeds the byte cap.
    fn norm(&self, phrase: &str) -> Result<Vec<String>, CoreError>;
}

/// The object-detection collaborator (spec §4.4 `/api/detect`), treated as an
/// opaque `imageBytes -> labels` operation.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, image: &[u8]) -> Result<Vec<String>, CoreError>;
}

/// A backend a ping fan-out can probe (spec §4.4 `GET /api/ping`).
#[async_trait]
pub trait Pingable: Send + Sync {
    async fn ping(&self) -> Result<(), CoreError>;
}
