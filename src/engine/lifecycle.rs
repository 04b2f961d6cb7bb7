use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::dashboard_client::DashboardApi;

use super::detail::DetailPoller;
use super::handle::PollHandle;
use super::logs::LogFetcher;
use super::registry::RegistryPoller;
use super::store::{DeviceViewStore, ListViewStore};
use super::views::{DeviceView, ListView};
use super::visibility::{PageVisibility, VisibilityGate};

/// Poll cadence and link settings for the engine.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub registry_interval: Duration,
    pub detail_interval: Duration,
    pub upload_port: u16,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for EngineOptions {
    fn from(config: &Config) -> Self {
        Self {
            registry_interval: config.registry_interval(),
            detail_interval: config.detail_interval(),
            upload_port: config.upload_port,
        }
    }
}

enum ViewStore {
    List(ListViewStore),
    Device(DeviceViewStore),
}

struct ActiveView {
    store: ViewStore,
    handles: Vec<PollHandle>,
}

impl ActiveView {
    fn shutdown(self) {
        for handle in &self.handles {
            handle.cancel();
        }
        match &self.store {
            ViewStore::List(store) => store.close(),
            ViewStore::Device(store) => store.close(),
        }
    }
}

/// Owns every running poller. At most one view is active; entering a view
/// tears down the previous one first.
pub struct PollLifecycleManager {
    api: Arc<dyn DashboardApi>,
    options: EngineOptions,
    visibility: VisibilityGate,
    active: Option<ActiveView>,
}

impl PollLifecycleManager {
    pub fn new(api: Arc<dyn DashboardApi>, options: EngineOptions) -> Self {
        Self {
            api,
            options,
            visibility: VisibilityGate::default(),
            active: None,
        }
    }

    /// Starts the registry poller against a fresh list view store.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime, since the poller is spawned onto it.
    pub fn enter_list_view(&mut self) -> ListView {
        self.exit_view();

        let store = ListViewStore::new();
        let registry = RegistryPoller::new(Arc::clone(&self.api), store.clone());
        let handles = vec![PollHandle::spawn(
            "registry",
            self.options.registry_interval,
            self.visibility.clone(),
            move || registry.tick(),
        )];

        info!("Entered device list view");
        self.active = Some(ActiveView {
            store: ViewStore::List(store.clone()),
            handles,
        });
        ListView::new(Arc::clone(&self.api), store)
    }

    /// Starts the detail and log pollers for `device_id` against a fresh store.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime, like [`Self::enter_list_view`].
    pub fn enter_device_view(&mut self, device_id: &str) -> DeviceView {
        self.exit_view();

        let store = DeviceViewStore::new(device_id);
        let detail = DetailPoller::new(Arc::clone(&self.api), store.clone(), self.options.upload_port);
        let logs = LogFetcher::new(Arc::clone(&self.api), store.clone());
        let handles = vec![
            PollHandle::spawn(
                "device-detail",
                self.options.detail_interval,
                self.visibility.clone(),
                move || detail.tick(),
            ),
            PollHandle::spawn(
                "device-logs",
                self.options.detail_interval,
                self.visibility.clone(),
                move || logs.tick(),
            ),
        ];

        info!(device = %device_id, "Entered device view");
        self.active = Some(ActiveView {
            store: ViewStore::Device(store.clone()),
            handles,
        });
        DeviceView::new(Arc::clone(&self.api), store)
    }

    /// Cancels every poller of the active view and closes its store. No tick
    /// or late response touches that view afterwards.
    pub fn exit_view(&mut self) {
        if let Some(active) = self.active.take() {
            let pollers = active.handles.len();
            active.shutdown();
            info!(pollers, "Exited view");
        }
    }

    pub fn set_visibility(&self, visibility: PageVisibility) {
        self.visibility.set(visibility);
    }

    pub fn visibility(&self) -> PageVisibility {
        self.visibility.get()
    }

    /// Number of live poll handles owned by the active view.
    pub fn live_pollers(&self) -> usize {
        self.active
            .as_ref()
            .map(|active| active.handles.iter().filter(|handle| handle.is_live()).count())
            .unwrap_or(0)
    }

    pub fn active_pollers(&self) -> Vec<&'static str> {
        self.active
            .as_ref()
            .map(|active| active.handles.iter().map(PollHandle::name).collect())
            .unwrap_or_default()
    }
}

impl Drop for PollLifecycleManager {
    fn drop(&mut self) {
        self.exit_view();
    }
}
