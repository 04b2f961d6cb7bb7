//! Monitoring client for a fleet of ethoscopes.
//!
//! [`dashboard_client`] speaks the node's REST API; [`engine`] keeps the
//! device list and device detail views fresh by polling it.

pub mod config;
pub mod dashboard_client;
pub mod engine;
pub mod types;

pub use config::Config;
pub use dashboard_client::{DashboardApi, DashboardClient};
pub use engine::{DeviceView, ListView, PageVisibility, PollLifecycleManager};
pub use types::MonitorError;
