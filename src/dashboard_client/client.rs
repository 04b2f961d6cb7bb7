use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::types::MonitorError;

use super::api::{ClientTimeResponse, ControlResponse, DashboardApi, NodeTimestampResponse};
use super::models::{Device, DeviceCollection, LogBuffer};

/// HTTP client for the node's device-management API.
#[derive(Clone)]
pub struct DashboardClient {
    http: Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(config: &Config) -> Result<Self, MonitorError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(MonitorError::Http)?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path, e.g. a device's image or stream link.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get(&self, path: &str) -> Result<Response, MonitorError> {
        let url = self.url_for(path);
        debug!(url = %url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(MonitorError::Http)?;

        if !response.status().is_success() {
            return Err(MonitorError::Backend(format!(
                "{} returned {}",
                path,
                response.status()
            )));
        }

        Ok(response)
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, MonitorError>
    where
        T: DeserializeOwned,
    {
        self.get(path)
            .await?
            .json::<T>()
            .await
            .map_err(MonitorError::Http)
    }
}

#[async_trait]
impl DashboardApi for DashboardClient {
    async fn fetch_devices(&self) -> Result<DeviceCollection, MonitorError> {
        self.get_json("/devices").await
    }

    async fn fetch_client_time(&self) -> Result<ClientTimeResponse, MonitorError> {
        self.get_json("/client/time").await
    }

    async fn fetch_node_timestamp(&self) -> Result<NodeTimestampResponse, MonitorError> {
        self.get_json("/node/timestamp").await
    }

    async fn fetch_device_info(&self, device_id: &str) -> Result<Device, MonitorError> {
        self.get_json(&format!("/device/{device_id}/info")).await
    }

    async fn fetch_device_settings(&self, device_id: &str) -> Result<Value, MonitorError> {
        self.get_json(&format!("/device/{device_id}/settings")).await
    }

    async fn dispatch_control(
        &self,
        device_id: &str,
        module: &str,
        action: &str,
    ) -> Result<ControlResponse, MonitorError> {
        self.get_json(&format!("/device/{device_id}/controls/{module}/{action}"))
            .await
    }

    async fn fetch_logs(&self, device_id: &str) -> Result<LogBuffer, MonitorError> {
        self.get_json(&format!("/device/{device_id}/get_logs")).await
    }

    async fn fetch_last_image(&self, device_id: &str) -> Result<Vec<u8>, MonitorError> {
        let bytes = self
            .get(&format!("/device/{device_id}/last_img"))
            .await?
            .bytes()
            .await
            .map_err(MonitorError::Http)?;
        Ok(bytes.to_vec())
    }

    async fn restart_node(&self) -> Result<(), MonitorError> {
        self.get("/client-actions/restart").await.map(|_| ())
    }
}
