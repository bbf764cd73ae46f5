//! Dashboard Configuration: server, prediction service and printer backend
//!
//! Every section implements `Default`, so a missing file or a partial file
//! yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PRINTWATCH_CONFIG";
/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "printwatch.toml";
/// Environment override for `server.addr`.
pub const SERVER_ADDR_ENV: &str = "PRINTWATCH_SERVER_ADDR";

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("failed to parse {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a dashboard deployment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

impl DashboardConfig {
    /// Load configuration using the standard search order:
    ///
    /// 1. `$PRINTWATCH_CONFIG` environment variable
    /// 2. `./printwatch.toml`
    /// 3. Built-in defaults
    ///
    /// `$PRINTWATCH_SERVER_ADDR` then overrides `server.addr`.
    pub fn load() -> Self {
        Self::load_file_or_default().with_env_overrides()
    }

    /// Apply `$PRINTWATCH_SERVER_ADDR`, whichever file the config came from.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_server_addr(std::env::var(SERVER_ADDR_ENV).ok())
    }

    /// Replace `server.addr` when `addr` is set.
    #[must_use]
    pub fn with_server_addr(mut self, addr: Option<String>) -> Self {
        if let Some(addr) = addr {
            info!(addr = %addr, "Server address overridden by {}", SERVER_ADDR_ENV);
            self.server.addr = addr;
        }
        self
    }

    fn load_file_or_default() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded dashboard config from {}", CONFIG_ENV);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV);
            }
        }

        // 2. Check ./printwatch.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded dashboard config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document. Unknown keys are logged, not fatal.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let errors = super::validation::validate_ranges(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ============================================================================
// [server]
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP bind address for the dashboard API
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

// ============================================================================
// [prediction]
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// Base URL of the prediction service (`POST /predict`, `GET /health`)
    #[serde(default = "default_prediction_url")]
    pub base_url: String,
    /// Per-request timeout in seconds; 0 disables it
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_prediction_url() -> String {
    "http://localhost:5001".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            base_url: default_prediction_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

// ============================================================================
// [backend]
// ============================================================================

/// Where printer, health, maintenance and analytics data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Built-in demo fleet held in memory
    #[default]
    Fixtures,
    /// The printer backend at `backend.base_url`
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the printer API (`/printers/...`)
    #[serde(default = "default_backend_url")]
    pub base_url: String,
    #[serde(default)]
    pub source: DataSource,
}

fn default_backend_url() -> String {
    "http://localhost:5000/api".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            source: DataSource::default(),
        }
    }
}
