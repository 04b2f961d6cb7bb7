use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::dashboard_client::DashboardApi;

use super::store::DeviceViewStore;

/// Actions offered per module on the device view.
pub const MODULE_ACTIONS: &[(&str, &[&str])] = &[
    ("tracker", &["ready", "run", "stop"]),
    ("controller", &["run", "stop"]),
];

/// One module action bound to a device, fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionHandle {
    device_id: String,
    module: String,
    action: String,
}

impl ActionHandle {
    pub fn new(device_id: &str, module: &str, action: &str) -> Self {
        Self {
            device_id: device_id.to_string(),
            module: module.to_string(),
            action: action.to_string(),
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub(crate) fn table(device_id: &str) -> BTreeMap<String, Vec<ActionHandle>> {
        MODULE_ACTIONS
            .iter()
            .map(|(module, actions)| {
                let handles = actions
                    .iter()
                    .map(|action| ActionHandle::new(device_id, module, action))
                    .collect();
                (module.to_string(), handles)
            })
            .collect()
    }
}

/// Sends module actions and writes the returned status into the view.
///
/// There is no retry and no rollback. A command racing the detail poller is
/// last-write-wins; the next successful poll is authoritative. Handles bound
/// to another device are refused without contacting the backend.
#[derive(Clone)]
pub struct CommandDispatcher {
    api: Arc<dyn DashboardApi>,
    store: DeviceViewStore,
}

impl CommandDispatcher {
    pub(crate) fn new(api: Arc<dyn DashboardApi>, store: DeviceViewStore) -> Self {
        Self { api, store }
    }

    pub async fn dispatch(&self, handle: &ActionHandle) {
        let view_device = self.store.device_id();
        if handle.device_id != view_device {
            warn!(
                device = %handle.device_id,
                view = %view_device,
                "Refusing action handle bound to another device"
            );
            return;
        }

        info!(
            device = %handle.device_id,
            module = %handle.module,
            action = %handle.action,
            "Dispatching module action"
        );

        match self
            .api
            .dispatch_control(&handle.device_id, &handle.module, &handle.action)
            .await
        {
            Ok(response) => {
                if !self.store.apply_module_status(&handle.module, response.status) {
                    debug!(device = %handle.device_id, "Action response not applied");
                }
            }
            Err(err) => {
                warn!(
                    device = %handle.device_id,
                    module = %handle.module,
                    action = %handle.action,
                    error = ?err,
                    "Module action failed"
                );
            }
        }
    }
}
