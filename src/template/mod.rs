//! Template retrieval.
//!
//! The official form template is an external artifact: either bundled with
//! the deployment or fetched once from the government's published URL and
//! cached locally. Providers only hand out bytes; parsing belongs to the
//! renderer.

pub mod file;
pub mod remote;

pub use file::FileTemplateProvider;
pub use remote::{RemoteTemplateProvider, DEFAULT_TEMPLATE_URL};

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Source of the official form template bytes.
#[async_trait]
pub trait TemplateProvider: Send + Sync {
    async fn template_bytes(&self) -> Result<Vec<u8>, TemplateError>;
}

/// Errors that can occur while retrieving the template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read certificate template {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to initialize template download client: {0}")]
    ClientInit(#[source] reqwest::Error),
    #[error("failed to download certificate template from {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("certificate template download from {url} returned status {status}")]
    DownloadStatus {
        url: String,
        status: reqwest::StatusCode,
    },
}
