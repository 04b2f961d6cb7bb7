use std::sync::Arc;

use ethoscope_dashboard::dashboard_client::helpers::{format_elapsed, readable_url};
use ethoscope_dashboard::engine::{DeviceView, EngineOptions, ListView};
use ethoscope_dashboard::{Config, DashboardApi, DashboardClient, MonitorError, PollLifecycleManager};
use tokio::signal;
use tracing::instrument::WithSubscriber;
use tracing::{debug, error, info, Subscriber};
use tracing_subscriber::EnvFilter;

const BOOTSTRAP_LOG_LEVEL: &str = "info";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // The configured level is only known once the config is read.
    let config = Config::load()
        .with_subscriber(subscriber(BOOTSTRAP_LOG_LEVEL))
        .await;
    init_tracing(&config.log_level);
    info!(api = %config.api_url, "Starting ethoscope dashboard");

    if let Err(err) = run(config).await {
        error!(error = ?err, "Dashboard stopped");
        std::process::exit(1);
    }
}

fn subscriber(level: &str) -> impl Subscriber + Send + Sync {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish()
}

fn init_tracing(level: &str) {
    if let Err(err) = tracing::subscriber::set_global_default(subscriber(level)) {
        eprintln!("Failed to install tracing subscriber: {err}");
    }
}

async fn run(config: Config) -> Result<(), MonitorError> {
    let client = DashboardClient::new(&config)?;
    let api: Arc<dyn DashboardApi> = Arc::new(client);
    let mut manager = PollLifecycleManager::new(api, EngineOptions::from(&config));

    match std::env::args().nth(1).or_else(|| config.device_id.clone()) {
        Some(device_id) => watch_device(manager.enter_device_view(&device_id)).await,
        None => watch_list(manager.enter_list_view()).await,
    }

    manager.exit_view();
    info!("Shut down");
    Ok(())
}

async fn watch_list(view: ListView) {
    let mut updates = view.store().subscribe();
    let mut shown = view.store().devices();
    let started = tokio::time::Instant::now();

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if Arc::ptr_eq(&shown, &state.devices) {
                    continue;
                }
                shown = Arc::clone(&state.devices);

                info!(
                    devices = state.device_count(),
                    server_time = state.client_time.as_deref().unwrap_or("-"),
                    uptime = %format_elapsed(started.elapsed().as_secs()),
                    "Device registry"
                );
                for (id, device) in state.devices.iter() {
                    info!(
                        device = %id,
                        name = device.name.as_deref().unwrap_or("-"),
                        status = %device.status,
                        ip = device.ip.as_deref().unwrap_or("-"),
                        "  device"
                    );
                }
            }
        }
    }
}

async fn watch_device(view: DeviceView) {
    let mut updates = view.store().subscribe();
    let mut last_log_len = 0;

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();

                if let Some(device) = &state.device {
                    info!(
                        device = %state.device_id,
                        status = %device.status,
                        transitioning = state.is_transitioning(),
                        modules = ?device.module_status,
                        "Device detail"
                    );
                }
                if let Some(links) = &state.links {
                    debug!(
                        image = %readable_url(&links.image_url),
                        stream = %links.stream_url,
                        upload = links.upload_url.as_deref().unwrap_or("-"),
                        "Links"
                    );
                }
                if let Some(clock) = &state.clock {
                    debug!(
                        node = %clock.node_display,
                        device = %clock.device_display,
                        delta_minutes = clock.delta_minutes,
                        "Clocks"
                    );
                }
                if state.logs.len() != last_log_len {
                    last_log_len = state.logs.len();
                    for line in state.logs.lines().iter().rev().take(5).rev() {
                        info!(device = %state.device_id, "log: {line}");
                    }
                }
            }
        }
    }
}
