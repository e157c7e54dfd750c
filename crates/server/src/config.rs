use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use ledgerlens_extract::{ProfileRegistry, RegistryError};

/// Env var naming the TOML config file.
pub const CONFIG_ENV: &str = "LEDGERLENS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid PORT value: '{0}'")]
    InvalidPort(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
    pub decode_timeout_secs: u64,
    /// Also accept `.txt` uploads that are already plain text.
    pub accept_plain_text: bool,
    /// Extra bank profiles merged over the built-in table.
    pub profiles_path: Option<PathBuf>,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            max_upload_bytes: 10 * 1024 * 1024,
            decode_timeout_secs: 30,
            accept_plain_text: false,
            profiles_path: None,
            log_filter: "info,tower_http=info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    /// Load from the file named by `LEDGERLENS_CONFIG` (defaults if unset),
    /// then let `PORT` override the listening port.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let port = std::env::var("PORT").ok();
        Self::load_from(path.as_deref(), port.as_deref())
    }

    pub fn load_from(path: Option<&Path>, port: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };
        if let Some(port) = port {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.to_string()))?;
            config.bind_addr.set_port(port);
        }
        Ok(config)
    }

    pub fn decode_timeout(&self) -> Duration {
        Duration::from_secs(self.decode_timeout_secs)
    }

    /// Built-in profiles, extended from `profiles_path` when configured.
    pub fn build_registry(&self) -> Result<Arc<ProfileRegistry>, RegistryError> {
        match &self.profiles_path {
            Some(path) => Ok(Arc::new(ProfileRegistry::from_toml_file(path)?)),
            None => Ok(ProfileRegistry::builtin()),
        }
    }
}
