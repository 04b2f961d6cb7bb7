use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the dashboard client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_registry_interval")]
    pub registry_interval_secs: u64,

    #[serde(default = "default_detail_interval")]
    pub detail_interval_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_upload_port")]
    pub upload_port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Device whose detail view is opened on startup instead of the list view.
    #[serde(default)]
    pub device_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            registry_interval_secs: default_registry_interval(),
            detail_interval_secs: default_detail_interval(),
            request_timeout_secs: default_request_timeout(),
            upload_port: default_upload_port(),
            log_level: default_log_level(),
            device_id: None,
        }
    }
}

impl Config {
    pub fn registry_interval(&self) -> Duration {
        Duration::from_secs(self.registry_interval_secs.max(1))
    }

    pub fn detail_interval(&self) -> Duration {
        Duration::from_secs(self.detail_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn default_api_url() -> String {
    "http://127.0.0.1".to_string()
}

fn default_registry_interval() -> u64 {
    5
}

fn default_detail_interval() -> u64 {
    3
}

fn default_request_timeout() -> u64 {
    8
}

fn default_upload_port() -> u16 {
    9000
}

fn default_log_level() -> String {
    "info".to_string()
}
