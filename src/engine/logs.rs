use std::sync::Arc;

use tracing::{trace, warn};

use crate::dashboard_client::models::LogBuffer;
use crate::dashboard_client::DashboardApi;
use crate::types::MonitorError;

use super::store::DeviceViewStore;

/// Pulls a device's log tail. The backend returns the whole tail each time,
/// so the buffer is replaced rather than appended to.
#[derive(Clone)]
pub(crate) struct LogFetcher {
    api: Arc<dyn DashboardApi>,
    store: DeviceViewStore,
    device_id: String,
}

impl LogFetcher {
    pub(crate) fn new(api: Arc<dyn DashboardApi>, store: DeviceViewStore) -> Self {
        let device_id = store.device_id();
        Self {
            api,
            store,
            device_id,
        }
    }

    pub(crate) async fn fetch(&self) -> Result<LogBuffer, MonitorError> {
        self.api.fetch_logs(&self.device_id).await
    }

    pub(crate) fn tick(&self) {
        let fetcher = self.clone();
        tokio::spawn(async move { fetcher.refresh().await });
    }

    pub(crate) async fn refresh(&self) {
        match self.fetch().await {
            Ok(logs) => {
                let lines = logs.len();
                if self.store.apply_logs(logs) {
                    trace!(device = %self.device_id, lines, "Logs refreshed");
                }
            }
            Err(err) => {
                warn!(device = %self.device_id, error = ?err, "Failed to fetch device logs");
            }
        }
    }
}
