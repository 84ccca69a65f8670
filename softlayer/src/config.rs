//! Configuration for SoftLayer API clients.
//!
//! Config file resolution order:
//! 1. Explicit path passed to Config::load_from()
//! 2. SOFTLAYER_CONFIG environment variable
//! 3. config.toml in the platform config directory
//! 4. Built-in defaults
//!
//! SL_API_BASE_URL, when set, overrides the endpoint after loading.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Public XML-RPC endpoint.
pub const API_PUBLIC_ENDPOINT: &str = "https://api.softlayer.com/xmlrpc/v3.1/";

/// Endpoint reachable only from the private network.
pub const API_PRIVATE_ENDPOINT: &str = "https://api.service.softlayer.com/xmlrpc/v3.1/";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL service names are appended to.
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint_url() -> String {
    API_PUBLIC_ENDPOINT.to_string()
}

fn default_user_agent() -> String {
    format!("softlayer-api/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Default config pointed at another endpoint.
    pub fn with_endpoint(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            ..Self::default()
        }
    }

    /// Load config using the standard resolution order.
    pub fn load() -> Result<Self> {
        let config = match resolve_config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Load config from a specific TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Save config as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("SL_API_BASE_URL") {
            if !url.trim().is_empty() {
                self.endpoint_url = url;
            }
        }
        self
    }
}

/// Where the config file is expected, if anywhere.
pub fn resolve_config_path() -> Option<PathBuf> {
    // 1. Environment variable
    if let Ok(path) = std::env::var("SOFTLAYER_CONFIG") {
        return Some(PathBuf::from(path));
    }

    // 2. Platform config directory (via directories crate)
    ProjectDirs::from("com", "softlayer", "softlayer").map(|dirs| dirs.config_dir().join("config.toml"))
}
