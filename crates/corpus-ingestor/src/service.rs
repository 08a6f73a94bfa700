//! The Ingestor's update algorithm (spec §4.2): bounded-concurrency fetch,
//! normalize, upsert, with single-shot first-error capture.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use corpus_core::error::CoreError;
use corpus_core::ports::{Normalizer, Storage, Updater, UpstreamSource};
use corpus_core::types::{Comic, ServiceStats, ServiceStatus};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// The Ingestor service described in spec §4.2.
pub struct IngestService {
    storage: Arc<dyn Storage>,
    upstream: Arc<dyn UpstreamSource>,
    normalizer: Arc<dyn Normalizer>,
    concurrency: usize,
    running: AtomicBool,
}

impl IngestService {
    pub fn new(
        storage: Arc<dyn Storage>,
        upstream: Arc<dyn UpstreamSource>,
        normalizer: Arc<dyn Normalizer>,
        concurrency: usize,
    ) -> anyhow::Result<Self> {
        if concurrency < 1 {
            anyhow::bail!("wrong concurrency specified: {concurrency}");
        }
        Ok(Self {
            storage,
            upstream,
            normalizer,
            concurrency,
            running: AtomicBool::new(false),
        })
    }

    async fn count(&self) -> Result<i64, CoreError> {
        let last_id = self.upstream.last_id().await?;
        let missing = self.upstream.missing_ids().await;
        Ok(last_id - missing.len() as i64)
    }
}

#[async_trait]
impl Updater for IngestService {
    async fn update(&self) -> Result<(), CoreError> {
        self.running.store(true, Ordering::SeqCst);
        let result = self.run_update().await;
        self.running.store(false, Ordering::SeqCst);
        result
    }

    async fn stats(&self) -> Result<ServiceStats, CoreError> {
        let db_stats = self.storage.stats().await?;
        let comics_total = self.count().await?;
        Ok(ServiceStats::new(db_stats, comics_total))
    }

    async fn status(&self) -> ServiceStatus {
        if self.running.load(Ordering::SeqCst) {
            ServiceStatus::Running
        } else {
            ServiceStatus::Idle
        }
    }

    async fn drop_all(&self) -> Result<(), CoreError> {
        self.storage.drop_all().await
    }
}

impl IngestService {
    async fn run_update(&self) -> Result<(), CoreError> {
        let last_id = self.upstream.last_id().await?;
        let existing: HashSet<i64> = self.storage.ids().await?.into_iter().collect();

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        // First non-ignored worker error wins; every later write is discarded.
        let first_error: Arc<Mutex<Option<anyhow::Error>>> = Arc::new(Mutex::new(None));

        let mut workers = JoinSet::new();

        for id in 1..=last_id {
            if existing.contains(&id) {
                continue;
            }

            let semaphore = Arc::clone(&semaphore);
            let storage = Arc::clone(&self.storage);
            let upstream = Arc::clone(&self.upstream);
            let normalizer = Arc::clone(&self.normalizer);
            let first_error = Arc::clone(&first_error);

            workers.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore never closed");

                if let Err(err) = fetch_one(id, storage.as_ref(), upstream.as_ref(), normalizer.as_ref()).await {
                    match err {
                        CoreError::NotFound => {
                            // Missing-id bookkeeping already happened inside
                            // the upstream adapter; a 404 is not an error.
                        }
                        other => {
                            let mut slot = first_error.lock().expect("first_error lock poisoned");
                            if slot.is_none() {
                                *slot = Some(anyhow::anyhow!("failed to ingest comic {id}: {other}"));
                            }
                        }
                    }
                }
            });
        }

        while workers.join_next().await.is_some() {}

        let captured = first_error.lock().expect("first_error lock poisoned").take();
        match captured {
            Some(err) => Err(CoreError::Internal(err)),
            None => Ok(()),
        }
    }
}

async fn fetch_one(
    id: i64,
    storage: &dyn Storage,
    upstream: &dyn UpstreamSource,
    normalizer: &dyn Normalizer,
) -> Result<(), CoreError> {
    let info = upstream.get(id).await?;

    let phrase = format!("{} {}", info.title, info.description);
    let words = normalizer.norm(&phrase)?;

    storage
        .add(Comic {
            id: info.id,
            url: info.url,
            words,
        })
        .await
}
