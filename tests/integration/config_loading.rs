//! Integration tests for connector configuration loading

use damon::config::{Capability, ConnectorsConfig};
use tempfile::TempDir;
use toml::Value;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("connectors.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[orchestrator.prod]
type = "dagster"
endpoint = "https://example.dagster.cloud/prod/graphql"
api_token = "token"

[io-manager.prod]
type = "s3"
bucket = "data-lake"
key_prefix = "warehouse"
region = "eu-west-1"
access_key_id = "AKIA"
secret_access_key = "secret"
"#,
    );

    let config = ConnectorsConfig::load(Some(&path)).unwrap();
    assert!(config.has_capability(Capability::Orchestrator));
    assert!(config.has_capability(Capability::ObjectStore));
    assert!(!config.has_capability(Capability::Warehouse));

    let resolved = config.resolve(Capability::ObjectStore, None).unwrap();
    assert_eq!(resolved.profile_name, "prod");
    assert_eq!(resolved.backend_type, "s3");
    assert_eq!(
        resolved.settings.get("bucket").and_then(Value::as_str),
        Some("data-lake")
    );
}

#[test]
fn test_load_missing_explicit_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nope.toml");
    assert!(ConnectorsConfig::load(Some(&path)).is_err());
}

#[test]
fn test_unknown_backend_type_rejected_before_any_command_runs() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[data-warehouse.prod]
type = "snowflake"
url = "postgres://localhost/db"
"#,
    );
    let err = ConnectorsConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("snowflake"));
}

#[test]
fn test_env_substitution_in_loaded_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[orchestrator.prod]
type = "dagster"
endpoint = "https://example.dagster.cloud/prod/graphql"
api_token = "${DAMON_TEST_CONFIG_TOKEN}"
"#,
    );

    std::env::set_var("DAMON_TEST_CONFIG_TOKEN", "from-env");
    let config = ConnectorsConfig::load(Some(&path)).unwrap();
    std::env::remove_var("DAMON_TEST_CONFIG_TOKEN");

    let resolved = config.resolve(Capability::Orchestrator, None).unwrap();
    assert_eq!(
        resolved.settings.get("api_token").and_then(Value::as_str),
        Some("from-env")
    );
}

#[test]
fn test_unset_env_variable_fails_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[orchestrator.prod]
type = "dagster"
endpoint = "https://example.dagster.cloud/prod/graphql"
api_token = "${DAMON_TEST_DEFINITELY_UNSET_VAR}"
"#,
    );
    let err = ConnectorsConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("DAMON_TEST_DEFINITELY_UNSET_VAR"));
}

#[test]
fn test_logging_table_parsed_with_defaults_for_omitted_fields() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[logging]
level = "debug"
format = "json"
"#,
    );
    let config = ConnectorsConfig::load(Some(&path)).unwrap();
    let logging = config.logging();
    assert_eq!(logging.level, "debug");
    assert_eq!(logging.format, "json");
    assert_eq!(logging.output, "stderr");
}

#[test]
fn test_missing_logging_table_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[orchestrator.prod]
type = "dagster"
endpoint = "https://example.dagster.cloud/prod/graphql"
api_token = "token"
"#,
    );
    let config = ConnectorsConfig::load(Some(&path)).unwrap();
    let logging = config.logging();
    assert_eq!(logging.level, "info");
    assert_eq!(logging.format, "text");
}
