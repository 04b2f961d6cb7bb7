//! Polling and state-reconciliation engine.
//!
//! The lifecycle manager starts pollers when a view is entered and cancels
//! them when it is left. Pollers fetch through [`DashboardApi`] and write into
//! the view's store; every tick spawns its own fetch, so overlapping fetches
//! are possible and the last response to complete wins.
//!
//! [`DashboardApi`]: crate::dashboard_client::DashboardApi

mod commands;
mod detail;
mod handle;
mod lifecycle;
mod logs;
mod registry;
mod store;
mod views;
mod visibility;

pub use commands::{ActionHandle, CommandDispatcher, MODULE_ACTIONS};
pub use handle::PollHandle;
pub use lifecycle::{EngineOptions, PollLifecycleManager};
pub use store::{DeviceViewState, DeviceViewStore, ListViewState, ListViewStore};
pub use views::{DeviceView, ListView};
pub use visibility::{PageVisibility, VisibilityGate};
