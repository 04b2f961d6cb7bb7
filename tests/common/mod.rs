#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ethoscope_dashboard::dashboard_client::api::{
    ClientTimeResponse, ControlResponse, NodeTimestampResponse,
};
use ethoscope_dashboard::dashboard_client::models::{Device, DeviceCollection, LogBuffer};
use ethoscope_dashboard::engine::EngineOptions;
use ethoscope_dashboard::{DashboardApi, MonitorError};
use serde_json::{json, Value};
use tokio::sync::Semaphore;

pub const REGISTRY_INTERVAL: Duration = Duration::from_secs(5);
pub const DETAIL_INTERVAL: Duration = Duration::from_secs(3);

pub fn options() -> EngineOptions {
    EngineOptions {
        registry_interval: REGISTRY_INTERVAL,
        detail_interval: DETAIL_INTERVAL,
        upload_port: 9000,
    }
}

/// Lets spawned poll tasks run to completion under the paused test clock.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

pub async fn advance(duration: Duration) {
    tokio::time::advance(duration).await;
    settle().await;
}

/// In-memory backend. Responses are plain JSON so tests exercise the same
/// deserialization as the HTTP client. A `None` response means the endpoint
/// fails.
#[derive(Default)]
pub struct FakeBackend {
    devices: Mutex<Option<Value>>,
    info: Mutex<HashMap<String, Value>>,
    node_timestamp: Mutex<Option<f64>>,
    control_status: Mutex<Option<String>>,
    logs: Mutex<Option<Vec<String>>>,
    settings: Mutex<Option<Value>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    info_gate: Mutex<Option<Arc<Semaphore>>>,
    control_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        let backend = Self::default();
        *backend.logs.lock().unwrap() = Some(Vec::new());
        Arc::new(backend)
    }

    pub fn set_devices(&self, devices: Option<Value>) {
        *self.devices.lock().unwrap() = devices;
    }

    pub fn set_info(&self, device_id: &str, info: Value) {
        self.info.lock().unwrap().insert(device_id.to_string(), info);
    }

    pub fn remove_info(&self, device_id: &str) {
        self.info.lock().unwrap().remove(device_id);
    }

    pub fn set_node_timestamp(&self, timestamp: Option<f64>) {
        *self.node_timestamp.lock().unwrap() = timestamp;
    }

    pub fn set_control_status(&self, status: Option<&str>) {
        *self.control_status.lock().unwrap() = status.map(str::to_string);
    }

    pub fn set_logs(&self, logs: Option<Vec<&str>>) {
        *self.logs.lock().unwrap() = logs.map(|lines| lines.into_iter().map(str::to_string).collect());
    }

    pub fn set_settings(&self, settings: Option<Value>) {
        *self.settings.lock().unwrap() = settings;
    }

    /// Holds every subsequent info request until `release_info` is called.
    pub fn gate_info(&self) {
        *self.info_gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_info(&self, requests: usize) {
        if let Some(gate) = self.info_gate.lock().unwrap().as_ref() {
            gate.add_permits(requests);
        }
    }

    pub fn gate_control(&self) {
        *self.control_gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_control(&self, requests: usize) {
        if let Some(gate) = self.control_gate.lock().unwrap().as_ref() {
            gate.add_permits(requests);
        }
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls.lock().unwrap().get(endpoint).copied().unwrap_or(0)
    }

    fn record(&self, endpoint: &'static str) {
        *self.calls.lock().unwrap().entry(endpoint).or_insert(0) += 1;
    }

    async fn pass(gate: &Mutex<Option<Arc<Semaphore>>>) {
        let gate = gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

fn unavailable(endpoint: &str) -> MonitorError {
    MonitorError::Backend(format!("{endpoint} returned 503 Service Unavailable"))
}

#[async_trait]
impl DashboardApi for FakeBackend {
    async fn fetch_devices(&self) -> Result<DeviceCollection, MonitorError> {
        self.record("devices");
        let devices = self.devices.lock().unwrap().clone();
        let devices = devices.ok_or_else(|| unavailable("/devices"))?;
        Ok(serde_json::from_value(devices)?)
    }

    async fn fetch_client_time(&self) -> Result<ClientTimeResponse, MonitorError> {
        self.record("client_time");
        Ok(serde_json::from_value(json!({"time": "2024-03-01 12:00:00"}))?)
    }

    async fn fetch_node_timestamp(&self) -> Result<NodeTimestampResponse, MonitorError> {
        self.record("node_timestamp");
        let timestamp = *self.node_timestamp.lock().unwrap();
        let timestamp = timestamp.ok_or_else(|| unavailable("/node/timestamp"))?;
        Ok(NodeTimestampResponse { timestamp })
    }

    async fn fetch_device_info(&self, device_id: &str) -> Result<Device, MonitorError> {
        self.record("info");
        Self::pass(&self.info_gate).await;
        let info = self.info.lock().unwrap().get(device_id).cloned();
        let info = info.ok_or_else(|| unavailable("/device/info"))?;
        Ok(serde_json::from_value(info)?)
    }

    async fn fetch_device_settings(&self, _device_id: &str) -> Result<Value, MonitorError> {
        self.record("settings");
        let settings = self.settings.lock().unwrap().clone();
        settings.ok_or_else(|| unavailable("/device/settings"))
    }

    async fn dispatch_control(
        &self,
        _device_id: &str,
        _module: &str,
        _action: &str,
    ) -> Result<ControlResponse, MonitorError> {
        self.record("control");
        Self::pass(&self.control_gate).await;
        let status = self.control_status.lock().unwrap().clone();
        let status = status.ok_or_else(|| unavailable("/device/controls"))?;
        Ok(ControlResponse { status })
    }

    async fn fetch_logs(&self, _device_id: &str) -> Result<LogBuffer, MonitorError> {
        self.record("logs");
        let logs = self.logs.lock().unwrap().clone();
        let logs = logs.ok_or_else(|| unavailable("/device/get_logs"))?;
        Ok(LogBuffer { logs })
    }

    async fn fetch_last_image(&self, _device_id: &str) -> Result<Vec<u8>, MonitorError> {
        self.record("last_img");
        Ok(vec![0xFF, 0xD8, 0xFF])
    }

    async fn restart_node(&self) -> Result<(), MonitorError> {
        self.record("restart");
        Ok(())
    }
}
