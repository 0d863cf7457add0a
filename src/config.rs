//! Runtime configuration.
//!
//! The holder's identity, the city and the selected reasons are deployment
//! data, not code: they arrive from a JSON file named by `ATTESTATION_CONFIG`
//! (default `attestation.json`), with `ATTESTATION_OUTPUT_DIR` overriding the
//! output directory. Validation collects every problem before reporting.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::certificate::{PersonalInformation, Reason};

pub const DEFAULT_CONFIG_FILE: &str = "attestation.json";

const DEFAULT_OUTPUT_DIR: &str = "attestations";
const DEFAULT_CACHE_DIR: &str = "cache";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub profile: PersonalInformation,
    pub city: String,
    /// Reason codes to check on the generated certificate. May be empty;
    /// unknown codes are rejected during validation.
    pub reasons: Vec<String>,
    /// Local template file. When absent the template is fetched from
    /// `template_url` (default: the official government location).
    #[serde(default)]
    pub template_path: Option<PathBuf>,
    #[serde(default)]
    pub template_url: Option<String>,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_timeout_secs")]
    pub download_timeout_secs: u64,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_DIR)
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl AppConfig {
    /// Load and validate the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path =
            env::var("ATTESTATION_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        if let Ok(dir) = env::var("ATTESTATION_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    /// Load and validate the configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all fields and report every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = ValidationErrors::new();

        validate_required(&self.profile.lastname, "profile.lastname", "Last name", &mut errors);
        validate_required(
            &self.profile.firstname,
            "profile.firstname",
            "First name",
            &mut errors,
        );
        validate_required(&self.profile.birthday, "profile.birthday", "Birthday", &mut errors);
        validate_required(
            &self.profile.placeofbirth,
            "profile.placeofbirth",
            "Place of birth",
            &mut errors,
        );
        validate_required(&self.profile.address, "profile.address", "Address", &mut errors);
        validate_required(&self.profile.zipcode, "profile.zipcode", "Postal code", &mut errors);
        validate_required(&self.profile.town, "profile.town", "Town", &mut errors);
        validate_required(&self.city, "city", "Current city", &mut errors);

        for (i, code) in self.reasons.iter().enumerate() {
            if code.parse::<Reason>().is_err() {
                errors.add(ValidationError::unknown_reason(&format!("reasons[{i}]"), code));
            }
        }

        errors.into_result().map_err(ConfigError::Invalid)
    }

    /// The configured reasons as closed enum values.
    pub fn reasons(&self) -> Result<Vec<Reason>, ConfigError> {
        let mut errors = ValidationErrors::new();
        let mut parsed = Vec::with_capacity(self.reasons.len());
        for (i, code) in self.reasons.iter().enumerate() {
            match code.parse::<Reason>() {
                Ok(reason) => parsed.push(reason),
                Err(_) => {
                    errors.add(ValidationError::unknown_reason(&format!("reasons[{i}]"), code))
                }
            }
        }
        errors
            .into_result()
            .map(|_| parsed)
            .map_err(ConfigError::Invalid)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(#[source] ValidationErrors),
}

/// Single configuration failure with enough context to fix it.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{label} must not be empty")).with_suggestion(format!(
            "fill in {} before generating",
            label.to_lowercase()
        ))
    }

    pub fn unknown_reason(field: &str, code: &str) -> Self {
        Self::new(field, format!("unknown travel reason code {code:?}")).with_suggestion(
            format!(
                "use one of: {}",
                Reason::ALL.map(|reason| reason.code()).join(", ")
            ),
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors, reported together.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} problem(s) found", self.errors.len())?;
        for error in &self.errors {
            write!(f, "; {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate that a string is not empty after trimming.
fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}
