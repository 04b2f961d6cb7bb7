use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::dashboard_client::models::{ClockSample, DeviceLinks};
use crate::dashboard_client::DashboardApi;

use super::store::DeviceViewStore;

/// Refreshes one device's detail snapshot, derived links and clock skew.
#[derive(Clone)]
pub(crate) struct DetailPoller {
    api: Arc<dyn DashboardApi>,
    store: DeviceViewStore,
    device_id: String,
    upload_port: u16,
}

impl DetailPoller {
    pub(crate) fn new(api: Arc<dyn DashboardApi>, store: DeviceViewStore, upload_port: u16) -> Self {
        let device_id = store.device_id();
        Self {
            api,
            store,
            device_id,
            upload_port,
        }
    }

    pub(crate) fn tick(&self) {
        let poller = self.clone();
        tokio::spawn(async move { poller.refresh().await });
    }

    /// Applies, in order: the device record, its links, then (without
    /// waiting) a clock reconciliation when the device reports its time.
    pub(crate) async fn refresh(&self) {
        let device = match self.api.fetch_device_info(&self.device_id).await {
            Ok(device) => device,
            Err(err) => {
                warn!(device = %self.device_id, error = ?err, "Failed to fetch device info");
                return;
            }
        };

        let record_id = if device.id.is_empty() {
            self.device_id.as_str()
        } else {
            device.id.as_str()
        };
        let links = DeviceLinks::build(
            record_id,
            device.ip.as_deref(),
            self.upload_port,
            Utc::now().timestamp(),
        );
        let device_time = device.current_timestamp;

        if !self.store.apply_snapshot(device, links) {
            debug!(device = %self.device_id, "Discarding detail response for closed view");
            return;
        }

        if let Some(device_time) = device_time {
            let poller = self.clone();
            tokio::spawn(async move { poller.reconcile_clock(device_time).await });
        }
    }

    /// A failed node-time fetch keeps the previous sample on display.
    async fn reconcile_clock(&self, device_time: f64) {
        match self.api.fetch_node_timestamp().await {
            Ok(node) => {
                let sample = ClockSample::capture(Utc::now(), node.timestamp, device_time);
                debug!(
                    device = %self.device_id,
                    delta_minutes = sample.delta_minutes,
                    "Clock reconciled"
                );
                self.store.apply_clock(sample);
            }
            Err(err) => {
                warn!(device = %self.device_id, error = ?err, "Failed to fetch node timestamp");
            }
        }
    }
}
