use std::path::PathBuf;

use async_trait::async_trait;

use super::{TemplateError, TemplateProvider};

/// Serves a template bundled on the local filesystem.
pub struct FileTemplateProvider {
    path: PathBuf,
}

impl FileTemplateProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TemplateProvider for FileTemplateProvider {
    async fn template_bytes(&self) -> Result<Vec<u8>, TemplateError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|source| TemplateError::Read {
                path: self.path.clone(),
                source,
            })
    }
}
