use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by CORS. Empty means any origin, mirroring the
    /// open-by-default posture of the upload frontend this serves.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

/// Artifact storage configuration. Both directories are created at startup
/// and never cleaned.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            upload_dir: default_upload_dir(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading
    /// config. Looks for the config file in this order:
    /// 1. Path specified in LINEAGE_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("LINEAGE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str).context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("server.host must not be empty");
        }
        if self.storage.data_dir.as_os_str().is_empty() {
            anyhow::bail!("storage.data_dir must not be empty");
        }
        if self.storage.upload_dir.as_os_str().is_empty() {
            anyhow::bail!("storage.upload_dir must not be empty");
        }
        // The upload directory is served publicly; keep saved batches out of it.
        if self.storage.data_dir == self.storage.upload_dir {
            anyhow::bail!("storage.data_dir and storage.upload_dir must differ");
        }
        Ok(())
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
