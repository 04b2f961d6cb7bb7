pub mod api;
mod client;
pub mod helpers;
pub mod models;

pub use api::DashboardApi;
pub use client::DashboardClient;
