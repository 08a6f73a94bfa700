//! The upstream comic source adapter: `GET <base>/<id>/info.0.json` for one
//! comic, `GET <base>/info.0.json` for the current `LastID` (spec §6).

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use corpus_core::error::CoreError;
use corpus_core::ports::{Pingable, UpstreamComic, UpstreamSource};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct XkcdInfo {
    num: i64,
    img: String,
    title: String,
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    alt: String,
}

/// HTTP client for the upstream comic source.
///
/// `missing_ids` accumulates under a single exclusive lock on every 404;
/// it is never pruned and is lost on restart, per spec §3.
pub struct XkcdClient {
    client: reqwest::Client,
    base_url: String,
    missing_ids: Mutex<Vec<i64>>,
}

impl XkcdClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            anyhow::bail!("empty base url specified");
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            missing_ids: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl UpstreamSource for XkcdClient {
    async fn last_id(&self) -> Result<i64, CoreError> {
        let url = format!("{}/info.0.json", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::Internal(anyhow::anyhow!("failed to get last comic: {e}")))?;

        if !resp.status().is_success() {
            return Err(CoreError::Internal(anyhow::anyhow!(
                "failed to get last comic: status {}",
                resp.status()
            )));
        }

        let info: XkcdInfo = resp
            .json()
            .await
            .map_err(|e| CoreError::Internal(anyhow::anyhow!("failed to decode last comic: {e}")))?;

        Ok(info.num)
    }

    async fn get(&self, id: i64) -> Result<UpstreamComic, CoreError> {
        let url = format!("{}/{}/info.0.json", self.base_url, id);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::Internal(anyhow::anyhow!("failed to get comic {id}: {e}")))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            self.missing_ids.lock().expect("missing_ids lock poisoned").push(id);
            return Err(CoreError::NotFound);
        }

        if !resp.status().is_success() {
            return Err(CoreError::Internal(anyhow::anyhow!(
                "failed to get comic {id}: status {}",
                resp.status()
            )));
        }

        let info: XkcdInfo = resp
            .json()
            .await
            .map_err(|e| CoreError::Internal(anyhow::anyhow!("failed to decode comic {id}: {e}")))?;

        Ok(UpstreamComic {
            id: info.num,
            url: info.img,
            title: info.title,
            description: format!("{}{}{}", info.transcript, info.alt, info.title),
        })
    }

    async fn missing_ids(&self) -> Vec<i64> {
        self.missing_ids.lock().expect("missing_ids lock poisoned").clone()
    }
}

#[async_trait]
impl Pingable for XkcdClient {
    async fn ping(&self) -> Result<(), CoreError> {
        UpstreamSource::last_id(self).await.map(|_| ())
    }
}
