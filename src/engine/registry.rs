use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::dashboard_client::DashboardApi;

use super::store::ListViewStore;

/// Refreshes the device registry and the list view's clocks.
#[derive(Clone)]
pub(crate) struct RegistryPoller {
    api: Arc<dyn DashboardApi>,
    store: ListViewStore,
}

impl RegistryPoller {
    pub(crate) fn new(api: Arc<dyn DashboardApi>, store: ListViewStore) -> Self {
        Self { api, store }
    }

    pub(crate) fn tick(&self) {
        let devices = self.clone();
        tokio::spawn(async move { devices.refresh_devices().await });

        let clocks = self.clone();
        tokio::spawn(async move { clocks.refresh_clocks().await });
    }

    /// A failed fetch leaves the previous collection in place.
    pub(crate) async fn refresh_devices(&self) {
        match self.api.fetch_devices().await {
            Ok(devices) => {
                let count = devices.len();
                if self.store.replace_devices(devices) {
                    debug!(devices = count, "Device registry refreshed");
                } else {
                    debug!("Discarding registry response for closed view");
                }
            }
            Err(err) => {
                warn!(error = ?err, "Failed to fetch device registry");
            }
        }
    }

    async fn refresh_clocks(&self) {
        let client_time = match self.api.fetch_client_time().await {
            Ok(response) => Some(response.display()),
            Err(err) => {
                warn!(error = ?err, "Failed to fetch client time");
                None
            }
        };
        self.store.set_clocks(client_time, Utc::now());
    }
}
