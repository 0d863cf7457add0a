use std::path::PathBuf;

use async_trait::async_trait;

use super::{OutputSink, SinkError};

/// Writes certificates into a local directory.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl OutputSink for DirectorySink {
    async fn prepare(&self) -> Result<(), SinkError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| SinkError::Prepare {
                path: self.dir.clone(),
                source,
            })
    }

    async fn save(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, SinkError> {
        let path = self.dir.join(sanitize_filename::sanitize(filename));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| SinkError::Write {
                path: path.clone(),
                source,
            })?;
        log::info!("certificate written to {:?}", path);
        Ok(path)
    }
}
