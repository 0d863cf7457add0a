//! Certificate module - business logic for rendering the movement
//! authorization certificate.
//!
//! The renderer takes the holder's identity, the selected travel reasons and
//! one sampled instant, stamps them onto the official PDF template and embeds
//! a QR code carrying the same data:
//! - `model` - identity record and the closed set of travel reasons
//! - `timestamp` - the three string forms derived from one instant
//! - `qr` - audit payload assembly and raster encoding
//! - `pdf` - low-level template mutation
//! - `renderer` - the fixed generation sequence

pub mod model;
pub mod pdf;
pub mod qr;
pub mod renderer;
pub mod timestamp;

pub use model::{PersonalInformation, Reason, UnknownReason};
pub use renderer::CertificateRenderer;
pub use timestamp::Timestamp;

use thiserror::Error;

/// Errors that can occur while rendering a certificate.
///
/// Each variant names the stage that failed; a failure at any stage aborts
/// the whole generation call and no partial document leaves the renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to parse certificate template: {0}")]
    TemplateLoad(#[source] lopdf::Error),
    #[error("certificate template has no pages")]
    EmptyTemplate,
    #[error("failed to embed overlay font: {0}")]
    FontEmbed(#[source] lopdf::Error),
    #[error("failed to encode QR payload: {0}")]
    QrEncode(#[from] qrcode::types::QrError),
    #[error("failed to embed QR image: {0}")]
    ImageEmbed(#[source] lopdf::Error),
    #[error("failed to draw page overlay: {0}")]
    Overlay(#[source] lopdf::Error),
    #[error("failed to serialize certificate: {0}")]
    Serialize(#[source] lopdf::Error),
}

/// Result of a successful certificate generation.
#[derive(Debug)]
pub struct GeneratedCertificate {
    pub filename: String,
    pub pdf: Vec<u8>,
    pub timestamp: Timestamp,
}
