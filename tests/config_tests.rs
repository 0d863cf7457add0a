use attestation_generator::certificate::Reason;
use attestation_generator::config::{AppConfig, ConfigError};

const VALID_CONFIG: &str = r#"{
    "profile": {
        "lastname": "John",
        "firstname": "Doe",
        "birthday": "08/08/1987",
        "placeofbirth": "FarAwayTown",
        "address": "42 victory street",
        "zipcode": "42666",
        "town": "LivingTown"
    },
    "city": "Nantes",
    "reasons": ["travail", "achats"],
    "output_dir": "out",
    "download_timeout_secs": 5
}"#;

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attestation.json");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_loads_valid_config() {
    let (_dir, path) = write_config(VALID_CONFIG);
    let config = AppConfig::from_file(&path).unwrap();

    assert_eq!(config.profile.lastname, "John");
    assert_eq!(config.city, "Nantes");
    assert_eq!(
        config.reasons().unwrap(),
        vec![Reason::Work, Reason::Shopping]
    );
    assert_eq!(config.output_dir, std::path::PathBuf::from("out"));
    assert_eq!(config.download_timeout(), std::time::Duration::from_secs(5));
    assert!(config.template_path.is_none());
}

#[test]
fn test_missing_file_is_a_read_error() {
    let err = AppConfig::from_file(std::path::Path::new("/nonexistent/attestation.json"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    let (_dir, path) = write_config("{ not json");
    let err = AppConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_unknown_reason_code_fails_validation() {
    let (_dir, path) = write_config(&VALID_CONFIG.replace("achats", "joyride"));
    let err = AppConfig::from_file(&path).unwrap_err();
    match err {
        ConfigError::Invalid(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors.to_string().contains("joyride"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_blank_profile_field_fails_validation() {
    let (_dir, path) = write_config(&VALID_CONFIG.replace("\"John\"", "\"  \""));
    let err = AppConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}
