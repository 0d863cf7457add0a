//! Generator for the French movement-authorization certificate.
//!
//! Fills the official PDF form template with the configured holder's
//! identity, checks the selected travel reasons, stamps the capture date and
//! time, embeds a QR code carrying the same data and writes the result as
//! `attestation-<timestamp>.pdf`.

use std::sync::Arc;

use anyhow::Context;

pub mod certificate;
pub mod config;
pub mod output;
pub mod service;
pub mod template;

pub use crate::certificate::{
    CertificateRenderer, GeneratedCertificate, PersonalInformation, Reason, RenderError,
};
pub use crate::config::{AppConfig, ConfigError};
pub use crate::service::{CertificateService, GenerateError};

use crate::output::{DirectorySink, OutputSink};
use crate::template::{
    FileTemplateProvider, RemoteTemplateProvider, TemplateProvider, DEFAULT_TEMPLATE_URL,
};

/// Load the configuration and generate one certificate.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().context("loading configuration")?;
    let reasons = config.reasons().context("loading configuration")?;

    let provider: Arc<dyn TemplateProvider> = match &config.template_path {
        Some(path) => Arc::new(FileTemplateProvider::new(path.clone())),
        None => {
            let url = config
                .template_url
                .clone()
                .unwrap_or_else(|| DEFAULT_TEMPLATE_URL.to_string());
            Arc::new(RemoteTemplateProvider::new(
                url,
                config.cache_dir.clone(),
                config.download_timeout(),
            )?)
        }
    };

    let sink = Arc::new(DirectorySink::new(config.output_dir.clone()));
    if let Err(e) = sink.prepare().await {
        log::warn!("output directory not ready: {e}");
    }

    let renderer = CertificateRenderer::new(config.profile.clone(), config.city.clone());
    let service = CertificateService::new(renderer, provider, sink);

    let path = service.generate(&reasons).await?;
    log::info!("certificate generated at {:?}", path);
    Ok(())
}
