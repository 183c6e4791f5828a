//! Configuration loading and management
//!
//! Defaults, then an optional YAML file, then environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable holding the PostgreSQL connection string
pub const DATABASE_URL_ENV: &str = "POSTGRES_URL";
/// Environment variable overriding the listen address
pub const BIND_ENV: &str = "BIND_ADDR";
/// Environment variable pointing at a YAML config file
pub const CONFIG_PATH_ENV: &str = "DASHBOARD_CONFIG";

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Connection pool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string, normally supplied through `POSTGRES_URL`
    pub url: String,

    /// Refuse plaintext connections
    pub require_tls: bool,

    pub max_connections: u32,

    /// Seconds an idle connection is kept before being closed
    pub idle_timeout_secs: u64,

    /// Seconds before a connection is retired regardless of use
    pub max_lifetime_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            require_tls: true,
            max_connections: 10,
            idle_timeout_secs: 20,
            max_lifetime_secs: 60 * 30,
        }
    }
}

/// Which `deleteInvoice` behavior the server runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteMode {
    /// Delete by id, report database errors, revalidate the listing
    #[default]
    Intended,

    /// Always fail before touching storage
    Legacy,
}

/// Invoice action settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoicesConfig {
    /// Route of the invoice listing; revalidated and redirected to after mutations
    pub listing_path: String,

    pub delete_mode: DeleteMode,
}

impl InvoicesConfig {
    /// `listing_path` without trailing slashes, as mounted and redirected to
    pub fn listing_route(&self) -> &str {
        self.listing_path.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<()> {
        if !self.listing_path.starts_with('/') {
            anyhow::bail!("invoices.listing_path must be an absolute path");
        }
        if self.listing_route().is_empty() {
            anyhow::bail!("invoices.listing_path must not be the root path");
        }
        Ok(())
    }
}

impl Default for InvoicesConfig {
    fn default() -> Self {
        Self {
            listing_path: "/dashboard/invoices".to_string(),
            delete_mode: DeleteMode::Intended,
        }
    }
}

/// Sign-in settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Where a successful sign-in lands when the form names no `redirectTo`
    pub default_redirect: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            default_redirect: "/dashboard".to_string(),
        }
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub invoices: InvoicesConfig,
    pub auth: AuthConfig,
}

impl DashboardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup
    ///
    /// Takes the lookup as a function so tests need not touch the process
    /// environment.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_ENV) {
            self.database.url = url;
        }
        if let Some(bind) = lookup(BIND_ENV) {
            self.server.bind = bind;
        }
        self
    }

    /// Defaults, then `DASHBOARD_CONFIG` (if set), then environment overrides
    pub fn load() -> Result<Self> {
        let base = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        let config = base.with_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.database.url.is_empty() {
            anyhow::bail!("database url is not set (export {})", DATABASE_URL_ENV);
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be at least 1");
        }
        self.invoices.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();

        assert_eq!(config.invoices.listing_path, "/dashboard/invoices");
        assert_eq!(config.invoices.delete_mode, DeleteMode::Intended);
        assert_eq!(config.database.idle_timeout_secs, 20);
        assert_eq!(config.database.max_lifetime_secs, 1800);
        assert!(config.database.require_tls);
    }

    #[test]
    fn test_yaml_serialization() {
        let config = DashboardConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        // Should be able to parse it back
        let parsed = DashboardConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let parsed = DashboardConfig::from_yaml_str(
            "invoices:\n  delete_mode: legacy\ndatabase:\n  max_connections: 3\n",
        )
        .unwrap();

        assert_eq!(parsed.invoices.delete_mode, DeleteMode::Legacy);
        assert_eq!(parsed.invoices.listing_path, "/dashboard/invoices");
        assert_eq!(parsed.database.max_connections, 3);
        assert_eq!(parsed.database.idle_timeout_secs, 20);
    }

    #[test]
    fn test_env_overrides() {
        let config = DashboardConfig::default().with_overrides(|key| match key {
            "POSTGRES_URL" => Some("postgres://db/app".to_string()),
            "BIND_ADDR" => Some("0.0.0.0:8080".to_string()),
            _ => None,
        });

        assert_eq!(config.database.url, "postgres://db/app");
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_root_listing_path_is_rejected() {
        let mut config = DashboardConfig::default();
        config.database.url = "postgres://db/app".to_string();
        for path in ["/", "//", "dashboard"] {
            config.invoices.listing_path = path.to_string();
            assert!(config.validate().is_err(), "{:?} accepted", path);
        }
    }

    #[test]
    fn test_listing_route_drops_trailing_slash() {
        let config = InvoicesConfig {
            listing_path: "/dashboard/invoices/".to_string(),
            ..InvoicesConfig::default()
        };
        assert_eq!(config.listing_route(), "/dashboard/invoices");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_url() {
        let err = DashboardConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("POSTGRES_URL"));
    }
}
