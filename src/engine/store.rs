//! Per-view state containers.
//!
//! Each view instance owns one store. Pollers and the command dispatcher
//! write through it; once the lifecycle manager closes a store every later
//! write is rejected, which is how responses arriving after a view exit are
//! discarded. The liveness check and the mutation happen under the same lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::watch;

use crate::dashboard_client::models::{ClockSample, Device, DeviceCollection, DeviceLinks, LogBuffer};

use super::commands::ActionHandle;

#[derive(Debug, Clone, Default)]
pub struct ListViewState {
    pub devices: Arc<DeviceCollection>,
    /// Server time as reported by `/client/time`.
    pub client_time: Option<String>,
    /// Local clock at the last refresh.
    pub local_time: Option<DateTime<Utc>>,
    pub revision: u64,
    closed: bool,
}

impl ListViewState {
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[derive(Debug, Clone)]
pub struct ListViewStore {
    state: Arc<watch::Sender<ListViewState>>,
}

impl ListViewStore {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(ListViewState::default());
        Self {
            state: Arc::new(state),
        }
    }

    pub fn snapshot(&self) -> ListViewState {
        self.state.borrow().clone()
    }

    /// The current registry snapshot. Holders keep a consistent view even
    /// while a newer snapshot replaces it.
    pub fn devices(&self) -> Arc<DeviceCollection> {
        Arc::clone(&self.state.borrow().devices)
    }

    pub fn subscribe(&self) -> watch::Receiver<ListViewState> {
        self.state.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    pub(crate) fn close(&self) {
        self.state.send_modify(|state| state.closed = true);
    }

    pub(crate) fn replace_devices(&self, devices: DeviceCollection) -> bool {
        let devices = Arc::new(devices);
        self.apply(move |state| state.devices = devices)
    }

    pub(crate) fn set_clocks(&self, client_time: Option<String>, local_time: DateTime<Utc>) -> bool {
        self.apply(move |state| {
            if client_time.is_some() {
                state.client_time = client_time;
            }
            state.local_time = Some(local_time);
        })
    }

    fn apply(&self, mutate: impl FnOnce(&mut ListViewState)) -> bool {
        self.state.send_if_modified(|state| {
            if state.closed {
                return false;
            }
            mutate(state);
            state.revision += 1;
            true
        })
    }
}

#[derive(Debug, Clone)]
pub struct DeviceViewState {
    pub device_id: String,
    /// Last server snapshot, possibly with one module status overridden by a
    /// dispatched command.
    pub device: Option<Device>,
    pub links: Option<DeviceLinks>,
    pub clock: Option<ClockSample>,
    pub logs: LogBuffer,
    pub actions: BTreeMap<String, Vec<ActionHandle>>,
    pub settings_echo: Option<Value>,
    pub revision: u64,
    closed: bool,
}

impl DeviceViewState {
    fn new(device_id: &str) -> Self {
        Self {
            device_id: device_id.to_string(),
            device: None,
            links: None,
            clock: None,
            logs: LogBuffer::default(),
            actions: BTreeMap::new(),
            settings_echo: None,
            revision: 0,
            closed: false,
        }
    }

    pub fn module_status(&self, module: &str) -> Option<&str> {
        self.device.as_ref()?.module_status(module)
    }

    /// True while the device is starting or stopping.
    pub fn is_transitioning(&self) -> bool {
        self.device
            .as_ref()
            .map(|device| device.status.is_transitioning())
            .unwrap_or(false)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[derive(Debug, Clone)]
pub struct DeviceViewStore {
    state: Arc<watch::Sender<DeviceViewState>>,
}

impl DeviceViewStore {
    pub(crate) fn new(device_id: &str) -> Self {
        let (state, _) = watch::channel(DeviceViewState::new(device_id));
        Self {
            state: Arc::new(state),
        }
    }

    pub fn device_id(&self) -> String {
        self.state.borrow().device_id.clone()
    }

    pub fn snapshot(&self) -> DeviceViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DeviceViewState> {
        self.state.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    pub(crate) fn close(&self) {
        self.state.send_modify(|state| state.closed = true);
    }

    /// Replaces the device record wholesale, dropping any optimistic
    /// module override. The action table is built on the first snapshot.
    pub(crate) fn apply_snapshot(&self, device: Device, links: DeviceLinks) -> bool {
        self.apply(move |state| {
            if state.actions.is_empty() {
                state.actions = ActionHandle::table(&state.device_id);
            }
            state.device = Some(device);
            state.links = Some(links);
        })
    }

    pub(crate) fn apply_clock(&self, sample: ClockSample) -> bool {
        self.apply(move |state| state.clock = Some(sample))
    }

    pub(crate) fn apply_logs(&self, logs: LogBuffer) -> bool {
        self.apply(move |state| state.logs = logs)
    }

    pub(crate) fn apply_settings(&self, settings: Value) -> bool {
        self.apply(move |state| state.settings_echo = Some(settings))
    }

    /// Overwrites one module's status. Without a device record yet there is
    /// nothing to override and the write is dropped.
    pub(crate) fn apply_module_status(&self, module: &str, status: String) -> bool {
        self.state.send_if_modified(|state| {
            if state.closed {
                return false;
            }
            let Some(device) = state.device.as_mut() else {
                return false;
            };
            device.module_status.insert(module.to_string(), status);
            state.revision += 1;
            true
        })
    }

    fn apply(&self, mutate: impl FnOnce(&mut DeviceViewState)) -> bool {
        self.state.send_if_modified(|state| {
            if state.closed {
                return false;
            }
            mutate(state);
            state.revision += 1;
            true
        })
    }
}
