//! Integration tests for keel-config

use keel_config::*;
use std::fs;

#[test]
fn test_layers_apply_in_order() {
    let dir = tempfile::tempdir().unwrap();

    let json = dir.path().join("api.json");
    fs::write(&json, r#"{"title": "From JSON", "version": "2.0.0", "host": "json.local"}"#).unwrap();

    let toml = dir.path().join("api.toml");
    fs::write(
        &toml,
        r#"
            host = "toml.local"
            schemes = ["https"]

            [license]
            name = "Apache-2.0"
        "#,
    )
    .unwrap();

    let dotenv = dir.path().join("local.env");
    fs::write(&dotenv, "KEEL_DESCRIPTION=\"From dotenv\"\nKEEL_HOST=dotenv.local\n").unwrap();

    let config = ConfigBuilder::new()
        .file(&json)
        .file(&toml)
        .dotenv(&dotenv)
        .vars([("KEEL_HOST", "env.local")])
        .build()
        .unwrap();

    assert_eq!(config.title, "From JSON");
    assert_eq!(config.version, "2.0.0");
    assert_eq!(config.description, "From dotenv");
    assert_eq!(config.schemes, vec!["https"]);
    assert_eq!(config.license.name, "Apache-2.0");
    assert_eq!(config.license.url, "https://opensource.org/licenses/MIT");
    assert_eq!(config.host, "env.local");
}

#[test]
fn test_env_style_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.env");
    fs::write(&path, "KEEL_TITLE=Env File\nKEEL_CONTACT_NAME=Ops\nOTHER=1\n").unwrap();

    let config = ConfigBuilder::new().without_env().file(&path).build().unwrap();
    assert_eq!(config.title, "Env File");
    assert_eq!(config.contact.name, "Ops");
}

#[test]
fn test_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("api.toml");
    fs::write(&path, "title = \"Orders\"\ndebug = false\n").unwrap();

    let config = ApiConfig::from_file(&path).unwrap();
    assert_eq!(config.title, "Orders");
    assert!(!config.debug);
    assert_eq!(config.host, "localhost:8080");
}

#[test]
fn test_missing_and_unsupported_files() {
    let dir = tempfile::tempdir().unwrap();

    let missing = ConfigBuilder::new().without_env().file(dir.path().join("nope.json")).build();
    assert!(matches!(missing, Err(ConfigError::IoError(_))));

    let yaml = dir.path().join("api.yaml");
    fs::write(&yaml, "title: x").unwrap();
    let unsupported = ConfigBuilder::new().without_env().file(&yaml).build();
    assert!(matches!(unsupported, Err(ConfigError::LoadError(_))));

    let dotenv = ConfigBuilder::new().without_env().dotenv(dir.path().join(".env.missing")).build();
    assert!(matches!(dotenv, Err(ConfigError::IoError(_))));
}

#[test]
fn test_wrong_field_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("api.json");
    fs::write(&path, r#"{"schemes": "https"}"#).unwrap();

    let result = ApiConfig::from_file(&path);
    assert!(matches!(result, Err(ConfigError::DeserializationError(_))));
}

#[test]
fn test_config_error_maps_to_core_error() {
    let err: keel_core::Error = ConfigError::ValidationError("title cannot be empty".into()).into();
    assert_eq!(err.status_code(), 500);
    assert!(err.to_string().contains("title cannot be empty"));
}
