//! # Application State
//!
//! Shared state for the Axum application: the access gate over the ledger,
//! the runtime configuration, and the Prometheus handle when metrics are
//! enabled.

use std::path::PathBuf;

use metrics_exporter_prometheus::PrometheusHandle;
use thiserror::Error;

use custody_core::{Identity, ValidationError};
use custody_ledger::{AccessGate, Genesis, GenesisError, Ledger};

/// Runtime configuration, read from the environment.
///
/// | Variable                  | Meaning                                   |
/// |---------------------------|-------------------------------------------|
/// | `PORT`                    | listen port, default 8080                 |
/// | `AUTH_TOKEN`              | shared bearer secret; unset = dev mode    |
/// | `CUSTODY_GENESIS`         | path to a genesis YAML file               |
/// | `CUSTODY_ADMIN`           | admin identity when no genesis file is set|
/// | `CUSTODY_METRICS_ENABLED` | `false` disables `/metrics`, default on   |
///
/// Custom `Debug` redacts the token value.
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub auth_token: Option<String>,
    pub genesis_path: Option<PathBuf>,
    pub admin: Option<Identity>,
    pub metrics_enabled: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("genesis_path", &self.genesis_path)
            .field("admin", &self.admin)
            .field("metrics_enabled", &self.metrics_enabled)
            .finish()
    }
}

/// Configuration could not be assembled.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid PORT value: {0:?}")]
    InvalidPort(String),

    #[error("invalid CUSTODY_ADMIN: {0}")]
    InvalidAdmin(#[source] ValidationError),

    #[error("no admin configured: set CUSTODY_GENESIS or CUSTODY_ADMIN")]
    MissingAdmin,

    #[error(transparent)]
    Genesis(#[from] GenesisError),
}

impl AppConfig {
    pub const DEFAULT_PORT: u16 = 8080;

    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns the value of a
    /// variable if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => Self::DEFAULT_PORT,
        };
        let auth_token = lookup("AUTH_TOKEN").filter(|token| !token.is_empty());
        let genesis_path = lookup("CUSTODY_GENESIS")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        let admin = lookup("CUSTODY_ADMIN")
            .map(Identity::new)
            .transpose()
            .map_err(ConfigError::InvalidAdmin)?;
        let metrics_enabled = lookup("CUSTODY_METRICS_ENABLED")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Ok(Self {
            port,
            auth_token,
            genesis_path,
            admin,
            metrics_enabled,
        })
    }

    /// The genesis configuration: the file when one is set, otherwise a
    /// genesis holding only `CUSTODY_ADMIN`.
    pub fn genesis(&self) -> Result<Genesis, ConfigError> {
        if let Some(path) = &self.genesis_path {
            return Ok(Genesis::from_path(path)?);
        }
        self.admin
            .clone()
            .map(Genesis::with_admin)
            .ok_or(ConfigError::MissingAdmin)
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub gate: AccessGate,
    pub config: AppConfig,
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(gate: AccessGate, config: AppConfig) -> Self {
        Self {
            gate,
            config,
            prometheus: None,
        }
    }

    /// State over a fresh ledger seeded from the configured genesis.
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        let genesis = config.genesis()?;
        let gate = AccessGate::new(Ledger::from_genesis(&genesis));
        Ok(Self::new(gate, config))
    }

    /// Serve `/metrics` from `handle`.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.auth_token.is_none());
        assert!(config.metrics_enabled);
        assert!(matches!(config.genesis(), Err(ConfigError::MissingAdmin)));
    }

    #[test]
    fn reads_port_token_and_admin() {
        let config = config_from(&[
            ("PORT", "9090"),
            ("AUTH_TOKEN", "s3cret"),
            ("CUSTODY_ADMIN", "deployer"),
            ("CUSTODY_METRICS_ENABLED", "false"),
        ])
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.auth_token.as_deref(), Some("s3cret"));
        assert!(!config.metrics_enabled);
        let genesis = config.genesis().unwrap();
        assert_eq!(genesis.admin.as_str(), "deployer");
        assert!(genesis.grants.is_empty());
    }

    #[test]
    fn rejects_bad_port_and_admin() {
        assert!(matches!(
            config_from(&[("PORT", "http")]),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            config_from(&[("CUSTODY_ADMIN", "two words")]),
            Err(ConfigError::InvalidAdmin(_))
        ));
    }

    #[test]
    fn empty_token_means_dev_mode() {
        let config = config_from(&[("AUTH_TOKEN", "")]).unwrap();
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn genesis_file_wins_over_admin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis.yaml");
        std::fs::write(
            &path,
            "admin: root\ngrants:\n  - role: MANUFACTURER\n    account: acme\n",
        )
        .unwrap();
        let config = config_from(&[
            ("CUSTODY_GENESIS", path.to_str().unwrap()),
            ("CUSTODY_ADMIN", "ignored"),
        ])
        .unwrap();
        let state = AppState::from_config(config).unwrap();
        let acme = Identity::new("acme").unwrap();
        assert!(state.gate.has_role(custody_core::Role::Manufacturer, &acme));
        assert!(state
            .gate
            .has_role(custody_core::Role::Admin, &Identity::new("root").unwrap()));
    }

    #[test]
    fn debug_redacts_token() {
        let config = config_from(&[("AUTH_TOKEN", "s3cret")]).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
