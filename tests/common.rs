//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use lopdf::content::Content;
use lopdf::{dictionary, Document, Object, Stream};
use tokio::sync::Mutex;

use attestation_generator::certificate::PersonalInformation;
use attestation_generator::output::{OutputSink, SinkError};
use attestation_generator::template::{TemplateError, TemplateProvider};

/// Minimal one-page A4 document standing in for the official template.
pub fn minimal_template() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        Content { operations: vec![] }.encode().unwrap(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0f32.into(), 0f32.into(), 595.28f32.into(), 841.89f32.into()],
        "Resources" => dictionary! {},
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// The identity used across the test suite.
pub fn sample_profile() -> PersonalInformation {
    PersonalInformation {
        lastname: "John".to_string(),
        firstname: "Doe".to_string(),
        birthday: "08/08/1987".to_string(),
        placeofbirth: "FarAwayTown".to_string(),
        address: "42 victory street".to_string(),
        zipcode: "42666".to_string(),
        town: "LivingTown".to_string(),
    }
}

/// In-memory sink capturing saved certificates.
pub struct MemorySink {
    saved: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            saved: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn get(&self, filename: &str) -> Option<Vec<u8>> {
        self.saved.lock().await.get(filename).cloned()
    }

    pub async fn filenames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.saved.lock().await.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl OutputSink for MemorySink {
    async fn save(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, SinkError> {
        self.saved
            .lock()
            .await
            .insert(filename.to_string(), bytes.to_vec());
        Ok(PathBuf::from(filename))
    }
}

/// Provider serving fixed bytes.
pub struct StaticTemplateProvider {
    bytes: Vec<u8>,
}

impl StaticTemplateProvider {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

#[async_trait]
impl TemplateProvider for StaticTemplateProvider {
    async fn template_bytes(&self) -> Result<Vec<u8>, TemplateError> {
        Ok(self.bytes.clone())
    }
}

/// Provider that always fails, for exercising the template stage error.
pub struct FailingTemplateProvider;

#[async_trait]
impl TemplateProvider for FailingTemplateProvider {
    async fn template_bytes(&self) -> Result<Vec<u8>, TemplateError> {
        Err(TemplateError::Read {
            path: PathBuf::from("missing.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        })
    }
}
