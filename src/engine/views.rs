use std::sync::Arc;

use tracing::{info, warn};

use crate::dashboard_client::DashboardApi;
use crate::types::MonitorError;

use super::commands::{ActionHandle, CommandDispatcher};
use super::store::{DeviceViewStore, ListViewStore};

/// Handle to the active device list view.
#[derive(Clone)]
pub struct ListView {
    api: Arc<dyn DashboardApi>,
    store: ListViewStore,
}

impl ListView {
    pub(crate) fn new(api: Arc<dyn DashboardApi>, store: ListViewStore) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &ListViewStore {
        &self.store
    }

    /// Asks the node to restart its client process. The response is ignored.
    pub async fn restart(&self) {
        info!("Requesting node restart");
        if let Err(err) = self.api.restart_node().await {
            warn!(error = ?err, "Restart request failed");
        }
    }
}

/// Handle to the active detail view of one device.
#[derive(Clone)]
pub struct DeviceView {
    api: Arc<dyn DashboardApi>,
    store: DeviceViewStore,
    dispatcher: CommandDispatcher,
}

impl DeviceView {
    pub(crate) fn new(api: Arc<dyn DashboardApi>, store: DeviceViewStore) -> Self {
        let dispatcher = CommandDispatcher::new(Arc::clone(&api), store.clone());
        Self {
            api,
            store,
            dispatcher,
        }
    }

    pub fn store(&self) -> &DeviceViewStore {
        &self.store
    }

    pub fn device_id(&self) -> String {
        self.store.device_id()
    }

    /// The bound action for `module`/`action`, once the first detail
    /// snapshot has arrived.
    pub fn action(&self, module: &str, action: &str) -> Option<ActionHandle> {
        self.store
            .snapshot()
            .actions
            .get(module)?
            .iter()
            .find(|handle| handle.action() == action)
            .cloned()
    }

    pub async fn dispatch(&self, handle: &ActionHandle) {
        self.dispatcher.dispatch(handle).await;
    }

    /// Fetches the backend's copy of the device settings and keeps it beside
    /// the device record.
    pub async fn sync_settings(&self) -> Result<(), MonitorError> {
        let settings = self.api.fetch_device_settings(&self.device_id()).await?;
        self.store.apply_settings(settings);
        Ok(())
    }

    pub async fn fetch_last_image(&self) -> Result<Vec<u8>, MonitorError> {
        self.api.fetch_last_image(&self.device_id()).await
    }
}
