//! Configuration loading from YAML files and environment overrides

use dashboard::config::{DashboardConfig, DeleteMode};
use std::io::Write;

#[test]
fn test_load_from_file_with_partial_sections() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
server:
  bind: "0.0.0.0:8080"
database:
  url: "postgres://app@db/dashboard"
  max_connections: 4
invoices:
  delete_mode: legacy
"#
    )
    .unwrap();

    let config = DashboardConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();

    assert_eq!(config.server.bind, "0.0.0.0:8080");
    assert_eq!(config.database.max_connections, 4);
    assert!(config.database.require_tls);
    assert_eq!(config.database.idle_timeout_secs, 20);
    assert_eq!(config.invoices.delete_mode, DeleteMode::Legacy);
    assert_eq!(config.invoices.listing_path, "/dashboard/invoices");
    assert_eq!(config.auth.default_redirect, "/dashboard");
    assert!(config.validate().is_ok());
}

#[test]
fn test_environment_overrides_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "database:\n  url: \"postgres://file/db\"").unwrap();

    let config = DashboardConfig::from_yaml_file(file.path().to_str().unwrap())
        .unwrap()
        .with_overrides(|key| match key {
            "POSTGRES_URL" => Some("postgres://env/db".to_string()),
            _ => None,
        });

    assert_eq!(config.database.url, "postgres://env/db");
    assert_eq!(config.server.bind, "127.0.0.1:3000");
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let err = DashboardConfig::from_yaml_file(path.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("reading config file"));
}

#[test]
fn test_unknown_delete_mode_is_rejected() {
    assert!(DashboardConfig::from_yaml_str("invoices:\n  delete_mode: sometimes\n").is_err());
}
