//! Output sinks for finished certificates.

pub mod directory;

pub use directory::DirectorySink;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Destination for generated certificate bytes.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Ensure the sink is usable, up front. A failure here is logged by the
    /// caller and does not stop generation; the eventual `save` reports the
    /// definitive error.
    async fn prepare(&self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Persist the document under the given filename and return the final
    /// location.
    async fn save(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, SinkError>;
}

/// Errors that can occur while writing a certificate out.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("output directory {path:?} is unavailable: {source}")]
    Prepare {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write certificate to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
