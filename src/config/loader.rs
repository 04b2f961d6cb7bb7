use std::env;
use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use crate::types::MonitorError;

use super::{paths, Config};

pub const API_URL_ENV: &str = "ETHOSCOPE_API_URL";

impl Config {
    /// Load configuration from config.json in the app directory
    /// Falls back to defaults if the file doesn't exist or can't be parsed
    pub async fn load() -> Self {
        let config_path = match paths::get_config_path() {
            Ok(path) => path,
            Err(err) => {
                warn!(error = ?err, "Failed to locate config.json, using defaults");
                return Self::default().with_env_overrides();
            }
        };

        Self::load_from(&config_path).await.with_env_overrides()
    }

    /// Load configuration from an explicit path, without environment overrides.
    pub async fn load_from(path: &Path) -> Self {
        match Self::try_load(path).await {
            Ok(config) => {
                info!(
                    api = %config.api_url,
                    registry_secs = config.registry_interval_secs,
                    detail_secs = config.detail_interval_secs,
                    "Loaded configuration"
                );
                config
            }
            Err(err) => {
                warn!(error = ?err, "Failed to load config.json, using defaults");
                Self::default()
            }
        }
    }

    async fn try_load(config_path: &Path) -> Result<Self, MonitorError> {
        if !config_path.exists() {
            warn!(path = %config_path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path)
            .await
            .map_err(|err| MonitorError::Config(format!("Failed to read config file: {err}")))?;

        serde_json::from_str(&contents)
            .map_err(|err| MonitorError::Config(format!("Failed to parse config.json: {err}")))
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(custom) = env::var(API_URL_ENV) {
            let trimmed = custom.trim();
            if !trimmed.is_empty() {
                self.api_url = trimmed.to_string();
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn partial_file_keeps_defaults_for_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"api_url": "http://node.local:8000", "detail_interval_secs": 10}}"#)
            .unwrap();

        let config = Config::load_from(file.path()).await;
        assert_eq!(config.api_url, "http://node.local:8000");
        assert_eq!(config.detail_interval_secs, 10);
        assert_eq!(config.registry_interval_secs, 5);
        assert_eq!(config.upload_port, 9000);
        assert!(config.device_id.is_none());
    }

    #[tokio::test]
    async fn invalid_json_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let config = Config::load_from(file.path()).await;
        assert_eq!(config.api_url, Config::default().api_url);
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).await;
        assert_eq!(config.detail_interval_secs, 3);
    }
}
