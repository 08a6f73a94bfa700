//! The detection collaborator client (spec §4.4 "Image-based search",
//! §1 "deliberately out of scope"). Its internal model is not part of this
//! system; only the `imageBytes -> labels` HTTP call to it is.

use async_trait::async_trait;
use corpus_core::error::CoreError;
use corpus_core::ports::{Detector, Pingable};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct DetectResponse {
    labels: Vec<String>,
}

pub struct HttpDetector {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDetector {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            anyhow::bail!("empty detector url specified");
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl Detector for HttpDetector {
    async fn detect(&self, image: &[u8]) -> Result<Vec<String>, CoreError> {
        let part = reqwest::multipart::Part::bytes(image.to_vec()).file_name("image");
        let form = reqwest::multipart::Form::new().part("image", part);

        let resp = self
            .client
            .post(format!("{}/detect", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| CoreError::Internal(anyhow::anyhow!("detector request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(CoreError::Internal(anyhow::anyhow!(
                "detector request failed: status {}",
                resp.status()
            )));
        }

        let body: DetectResponse = resp
            .json()
            .await
            .map_err(|e| CoreError::Internal(anyhow::anyhow!("failed to decode detector reply: {e}")))?;

        Ok(body.labels)
    }
}

#[async_trait]
impl Pingable for HttpDetector {
    async fn ping(&self) -> Result<(), CoreError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| CoreError::Internal(anyhow::anyhow!("detector ping failed: {e}")))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(CoreError::Internal(anyhow::anyhow!(
                "detector ping failed: status {}",
                resp.status()
            )))
        }
    }
}
