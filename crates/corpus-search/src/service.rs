//! The Search Engine service: dual-mode ranked retrieval plus the background
//! index rebuild loop (spec §4.3).

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use corpus_core::error::CoreError;
use corpus_core::ports::{Normalizer, Searcher, Storage};
use corpus_core::types::SearchResult;

use crate::index::Index;
use crate::ranking::rank;

/// Default background index-rebuild period (spec §4.3: "default ~20s").
pub const DEFAULT_REBUILD_PERIOD: Duration = Duration::from_secs(20);

pub struct SearchService {
    storage: Arc<dyn Storage>,
    normalizer: Arc<dyn Normalizer>,
    index: ArcSwap<Index>,
}

impl SearchService {
    pub fn new(storage: Arc<dyn Storage>, normalizer: Arc<dyn Normalizer>) -> Self {
        Self {
            storage,
            normalizer,
            index: ArcSwap::from_pointee(Index::empty()),
        }
    }

    /// Run the first build synchronously, then spawn the periodic ticker.
    /// Returns the ticker's join handle; dropping or aborting it stops
    /// future rebuilds (the already-built index keeps serving reads).
    pub async fn spawn_background_rebuild(
        self: Arc<Self>,
        period: Duration,
    ) -> tokio::task::JoinHandle<()> {
        if let Err(err) = Searcher::build_index(self.as_ref()).await {
            tracing::error!(error = %err, "initial index build failed");
        }

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick fires immediately; the startup build above
            // already covers it, so skip it and wait a full period.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(err) = Searcher::build_index(self.as_ref()).await {
                    tracing::error!(error = %err, "index rebuild failed");
                }
            }
        })
    }

    /// Current index snapshot, for inspection/tests.
    pub fn current_index(&self) -> Arc<Index> {
        self.index.load_full()
    }
}

#[async_trait]
impl Searcher for SearchService {
    async fn search(&self, phrase: &str, limit: i64) -> Result<SearchResult, CoreError> {
        let keywords = self.normalizer.norm(phrase)?;
        if keywords.is_empty() {
            return Ok(SearchResult { comics: Vec::new(), total: 0 });
        }

        let comics = self.storage.search_comics(&keywords, limit).await?;
        // The SQL query already ranked and truncated; `total` is the
        // post-limit row count, not the pre-limit match count (spec §9 —
        // preserved intentionally, even though it reads oddly).
        let total = comics.len() as i64;
        Ok(SearchResult { comics, total })
    }

    async fn index_search(&self, phrase: &str, limit: i64) -> Result<SearchResult, CoreError> {
        let keywords = self.normalizer.norm(phrase)?;
        if keywords.is_empty() {
            return Ok(SearchResult { comics: Vec::new(), total: 0 });
        }

        let snapshot = self.index.load();
        let mut ids: Vec<i64> = keywords
            .iter()
            .filter_map(|kw| snapshot.get(kw))
            .flatten()
            .copied()
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let candidates = self.storage.comics_by_ids(&ids).await?;
        let ranked = rank(candidates, &keywords, limit);
        let total = ranked.len() as i64;
        Ok(SearchResult { comics: ranked, total })
    }

    async fn build_index(&self) -> Result<(), CoreError> {
        let comics = self.storage.all_comics().await?;
        let fresh = Index::build(&comics);
        let comic_count = comics.len();
        let keyword_count = fresh.keyword_count();
        self.index.store(Arc::new(fresh));
        tracing::info!(comics = comic_count, unique_words = keyword_count, "index rebuilt");
        Ok(())
    }
}
