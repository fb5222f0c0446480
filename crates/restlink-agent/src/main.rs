//! # restlink agent
//!
//! Polls a REST device on a fixed interval and exposes its state as
//! entity views for a home-automation host.
//!
//! ## Architecture
//!
//! 1. **Setup**: Validates the configured host, runs the first refresh
//! 2. **Poll loop**: One fetch cycle per interval, strictly serialized
//! 3. **Re-auth listener**: Surfaces rejected-credential signals
//! 4. **Entities**: Read-only views over the coordinator snapshot

use anyhow::Result;
use restlink_core::{ConnectivitySensor, DeviceInfo, EntityDescription, Sensor};
use tracing_subscriber::EnvFilter;

mod config;
mod diagnostics;
mod setup;

pub use config::AgentConfig;

const VALUE_SENSOR: EntityDescription = EntityDescription {
    key: "value",
    name: "Example sensor",
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting restlink agent"
    );

    let config = AgentConfig::from_env()?;

    let entry = setup::setup_entry(&config)
        .await
        .map_err(|err| anyhow::anyhow!("setup failed: {err}"))?;

    tracing::info!(
        interval_secs = config.scan_interval.as_secs(),
        "Polling started"
    );

    // Downstream consumer: log entity state after every cycle.
    let mut watcher = entry.handle.clone();
    let sensor = Sensor::new(entry.handle.clone(), VALUE_SENSOR);
    let connectivity = ConnectivitySensor::new(entry.handle.clone());
    let state_task = tokio::spawn(async move {
        while watcher.changed().await {
            tracing::debug!(
                value = ?sensor.value(),
                connected = connectivity.is_on(),
                "State updated"
            );
        }
    });

    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down");
    let device = DeviceInfo {
        identifier: "restlink".to_string(),
        name: "restlink device".to_string(),
        manufacturer: "Example Manufacturer".to_string(),
        model: "Example Model".to_string(),
        sw_version: "1.0.0".to_string(),
    };
    tracing::debug!(
        diagnostics = %diagnostics::config_entry_diagnostics(&config, &device, &entry.handle.snapshot()),
        "Final state"
    );

    state_task.abort();
    entry.poll_task.abort();
    entry.reauth_task.abort();

    Ok(())
}
