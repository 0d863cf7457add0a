use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{TemplateError, TemplateProvider};

/// Official template location published by the government.
pub const DEFAULT_TEMPLATE_URL: &str =
    "https://github.com/LAB-MI/attestation-deplacement-derogatoire-q4-2020/raw/main/src/certificate.pdf";

/// Name of the cache file inside the cache directory.
pub const CACHE_FILE: &str = "certificate_template.pdf";

/// Downloads the template on first use and serves cached bytes afterwards.
///
/// The download is persisted under the cache directory so later runs skip
/// the network entirely; failing to persist only costs a warning. Every
/// request is bounded by the configured timeout.
pub struct RemoteTemplateProvider {
    url: String,
    cache_path: PathBuf,
    client: reqwest::Client,
    cached: RwLock<Option<Vec<u8>>>,
}

impl RemoteTemplateProvider {
    pub fn new(
        url: impl Into<String>,
        cache_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Result<Self, TemplateError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TemplateError::ClientInit)?;
        Ok(Self {
            url: url.into(),
            cache_path: cache_dir.into().join(CACHE_FILE),
            client,
            cached: RwLock::new(None),
        })
    }

    async fn download(&self) -> Result<Vec<u8>, TemplateError> {
        log::info!("downloading certificate template from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| TemplateError::Download {
                url: self.url.clone(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(TemplateError::DownloadStatus {
                url: self.url.clone(),
                status: response.status(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|source| TemplateError::Download {
                url: self.url.clone(),
                source,
            })?;
        Ok(bytes.to_vec())
    }

    async fn persist(&self, bytes: &[u8]) {
        if let Some(parent) = self.cache_path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                log::warn!("could not create template cache directory {parent:?}: {e}");
                return;
            }
        }
        if let Err(e) = tokio::fs::write(&self.cache_path, bytes).await {
            log::warn!(
                "could not persist template cache at {:?}: {}",
                self.cache_path,
                e
            );
        }
    }
}

#[async_trait]
impl TemplateProvider for RemoteTemplateProvider {
    async fn template_bytes(&self) -> Result<Vec<u8>, TemplateError> {
        if let Some(bytes) = self.cached.read().clone() {
            return Ok(bytes);
        }

        if let Ok(bytes) = tokio::fs::read(&self.cache_path).await {
            log::debug!("certificate template served from {:?}", self.cache_path);
            *self.cached.write() = Some(bytes.clone());
            return Ok(bytes);
        }

        let bytes = self.download().await?;
        self.persist(&bytes).await;
        *self.cached.write() = Some(bytes.clone());
        Ok(bytes)
    }
}
