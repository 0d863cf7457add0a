//! Generation orchestration.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use thiserror::Error;

use crate::certificate::{CertificateRenderer, Reason, RenderError};
use crate::output::{OutputSink, SinkError};
use crate::template::{TemplateError, TemplateProvider};

/// One failure signal per generation call, naming the stage that failed and
/// carrying the underlying cause. No partial document ever reaches the sink.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("template retrieval failed: {0}")]
    Template(#[from] TemplateError),
    #[error("certificate rendering failed: {0}")]
    Render(#[from] RenderError),
    #[error("certificate write failed: {0}")]
    Write(#[from] SinkError),
}

/// Runs one generation call end to end: sample the clock once, await the
/// template, render, await the sink write.
///
/// Each call builds its own document; nothing is shared or retained between
/// calls, so concurrent generations need no coordination. There is no retry:
/// generation is user-triggered and idempotent on retry.
pub struct CertificateService {
    renderer: CertificateRenderer,
    template: Arc<dyn TemplateProvider>,
    sink: Arc<dyn OutputSink>,
}

impl CertificateService {
    pub fn new(
        renderer: CertificateRenderer,
        template: Arc<dyn TemplateProvider>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            renderer,
            template,
            sink,
        }
    }

    /// Generate one certificate for the given reasons and return where the
    /// sink put it.
    pub async fn generate(&self, reasons: &[Reason]) -> Result<PathBuf, GenerateError> {
        let now = Local::now();
        log::info!(
            "generating certificate, reasons: [{}]",
            reasons
                .iter()
                .map(|reason| reason.code())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let template = self.template.template_bytes().await?;
        let certificate = self.renderer.render(reasons, now, &template)?;
        log::info!(
            "certificate {} rendered ({} bytes)",
            certificate.filename,
            certificate.pdf.len()
        );

        let path = self.sink.save(&certificate.pdf, &certificate.filename).await?;
        Ok(path)
    }
}
