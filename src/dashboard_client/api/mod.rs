mod responses;

use async_trait::async_trait;
use serde_json::Value;

use crate::dashboard_client::models::{Device, DeviceCollection, LogBuffer};
use crate::types::MonitorError;

pub use responses::{ClientTimeResponse, ControlResponse, NodeTimestampResponse};

/// The backend REST surface the polling engine consumes.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn fetch_devices(&self) -> Result<DeviceCollection, MonitorError>;

    async fn fetch_client_time(&self) -> Result<ClientTimeResponse, MonitorError>;

    async fn fetch_node_timestamp(&self) -> Result<NodeTimestampResponse, MonitorError>;

    async fn fetch_device_info(&self, device_id: &str) -> Result<Device, MonitorError>;

    async fn fetch_device_settings(&self, device_id: &str) -> Result<Value, MonitorError>;

    async fn dispatch_control(
        &self,
        device_id: &str,
        module: &str,
        action: &str,
    ) -> Result<ControlResponse, MonitorError>;

    async fn fetch_logs(&self, device_id: &str) -> Result<LogBuffer, MonitorError>;

    async fn fetch_last_image(&self, device_id: &str) -> Result<Vec<u8>, MonitorError>;

    async fn restart_node(&self) -> Result<(), MonitorError>;
}
