//! Application configuration

use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory the file-backed store writes under
    pub data_dir: PathBuf,
    /// Which store backend to use
    pub store_backend: StoreBackend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Disk-persistent, one file per key (default)
    File,
    /// In-memory; state lasts for one invocation only
    Memory,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = env::var("SIMPLETEXT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let store_backend = match env::var("SIMPLETEXT_STORE") {
            Ok(value) => match value.to_lowercase().as_str() {
                "file" => StoreBackend::File,
                "memory" => StoreBackend::Memory,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "SIMPLETEXT_STORE",
                        value,
                    })
                }
            },
            Err(_) => StoreBackend::File,
        };

        Ok(Self {
            data_dir,
            store_backend,
        })
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("simpletext"))
        .unwrap_or_else(|| PathBuf::from("./simpletext-data"))
}
