//! Configuration resolution tests
//!
//! Uses serial_test: tests that touch POLIS_API_BASE_URL or POLIS_CONFIG are
//! marked #[serial] so they do not race each other.

use polis_common::config::{ConfigOrigin, ReportConfig, ENV_API_BASE_URL, ENV_CONFIG_PATH};
use polis_common::Error;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn clear_env() {
    env::remove_var(ENV_API_BASE_URL);
    env::remove_var(ENV_CONFIG_PATH);
}

#[test]
#[serial]
fn test_cli_config_file_is_loaded() {
    clear_env();
    let file = write_config(
        r#"
        api_base_url = "https://toml.example/"
        request_timeout_secs = 12
        "#,
    );

    let config = ReportConfig::resolve(Some(file.path()), None).unwrap();

    // Trailing slash is trimmed so paths can be appended directly
    assert_eq!(config.api_base_url, "https://toml.example");
    assert_eq!(config.request_timeout_secs, 12);
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    let file = write_config(r#"api_base_url = "https://toml.example""#);
    env::set_var(ENV_API_BASE_URL, "https://env.example");

    let config = ReportConfig::resolve(Some(file.path()), None).unwrap();
    assert_eq!(config.api_base_url, "https://env.example");

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    env::set_var(ENV_API_BASE_URL, "https://env.example");

    let config = ReportConfig::resolve(None, Some("https://cli.example")).unwrap();
    assert_eq!(config.api_base_url, "https://cli.example");

    clear_env();
}

#[test]
#[serial]
fn test_env_config_path() {
    clear_env();
    let file = write_config(r#"api_base_url = "https://from-env-path.example""#);
    env::set_var(ENV_CONFIG_PATH, file.path());

    let config = ReportConfig::resolve(None, None).unwrap();
    assert_eq!(config.api_base_url, "https://from-env-path.example");

    clear_env();
}

#[test]
#[serial]
fn test_missing_env_config_path_falls_back_to_defaults() {
    clear_env();
    env::set_var(ENV_CONFIG_PATH, "/nonexistent/polis/report.toml");

    let config = ReportConfig::resolve(None, None).unwrap();
    assert_eq!(config, ReportConfig::default());

    clear_env();
}

#[test]
#[serial]
fn test_missing_cli_config_is_an_error() {
    clear_env();
    let result = ReportConfig::resolve(
        Some(std::path::Path::new("/nonexistent/polis/report.toml")),
        None,
    );
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_malformed_config_file_is_an_error() {
    clear_env();
    let file = write_config("[logging\nlevel = ");

    let result = ReportConfig::resolve(Some(file.path()), None);
    assert!(matches!(result, Err(Error::Toml(_))));
}

#[test]
#[serial]
fn test_origin_reports_loaded_file() {
    clear_env();
    let file = write_config(r#"api_base_url = "https://toml.example""#);

    let (_, origin) = ReportConfig::resolve_with_origin(Some(file.path()), None).unwrap();
    assert_eq!(origin, ConfigOrigin::File(file.path().to_path_buf()));
}

#[test]
#[serial]
fn test_origin_reports_missing_file() {
    clear_env();
    env::set_var(ENV_CONFIG_PATH, "/nonexistent/polis/report.toml");

    let (config, origin) = ReportConfig::resolve_with_origin(None, None).unwrap();
    assert_eq!(config, ReportConfig::default());
    assert_eq!(
        origin,
        ConfigOrigin::Missing(std::path::PathBuf::from("/nonexistent/polis/report.toml"))
    );

    clear_env();
}
