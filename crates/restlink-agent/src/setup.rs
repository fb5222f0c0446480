//! Entry setup: validate the configured host, run the first refresh, and
//! spawn the poll loop plus the re-authentication listener.

use restlink_api::{ApiError, DeviceApi, DeviceClient, DeviceClientConfig};
use restlink_core::{Coordinator, CoordinatorHandle, ReauthSignal, UpdateError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::AgentConfig;

/// Why a configuration was rejected.
///
/// The display strings are the stable error keys the host's configuration
/// UI maps to user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// Credentials rejected by the device
    #[error("invalid_auth")]
    InvalidAuth,
    /// Device did not answer the connectivity probe
    #[error("cannot_connect")]
    CannotConnect,
    /// Anything else that went wrong during validation
    #[error("unknown")]
    Unknown,
}

impl From<ApiError> for SetupError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth { .. } => Self::InvalidAuth,
            ApiError::CannotConnect { .. } => Self::CannotConnect,
            ApiError::Api { .. } => Self::Unknown,
        }
    }
}

impl From<UpdateError> for SetupError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::AuthFailed => Self::InvalidAuth,
            UpdateError::CannotConnect => Self::CannotConnect,
            UpdateError::Api(_) => Self::Unknown,
        }
    }
}

/// A running entry: read handle plus the background tasks owning it.
pub struct Entry {
    /// Read handle for entities and diagnostics
    pub handle: CoordinatorHandle,
    /// Poll loop task
    pub poll_task: JoinHandle<()>,
    /// Re-authentication listener task
    pub reauth_task: JoinHandle<()>,
}

/// Validate a host before accepting its configuration.
///
/// # Errors
///
/// Maps the probe outcome onto the configuration error keys:
/// auth failure → `invalid_auth`, connect failure → `cannot_connect`,
/// anything else → `unknown`.
pub async fn validate_input(client: &DeviceClient) -> Result<(), SetupError> {
    client.validate_connection().await.map_err(|err| {
        tracing::debug!(error = %err, "Connection validation failed");
        SetupError::from(err)
    })?;
    Ok(())
}

/// Set up one device entry.
///
/// Probes connectivity, runs the first refresh so the entry starts with
/// data, then spawns the poll loop and the re-auth listener.
///
/// # Errors
///
/// Returns [`SetupError`] if validation or the first refresh fails; no
/// tasks are left running in that case.
pub async fn setup_entry(config: &AgentConfig) -> Result<Entry, SetupError> {
    // One shared connection pool for everything the agent does.
    let http = reqwest::Client::new();
    let client = DeviceClient::new(
        http,
        DeviceClientConfig {
            host: config.host.clone(),
            timeout: config.timeout,
        },
    );

    validate_input(&client).await?;

    let (mut coordinator, handle, reauth_rx) = Coordinator::new(client, config.scan_interval);

    // First refresh before the entry is considered ready.
    coordinator.refresh().await.map_err(SetupError::from)?;

    let poll_task = tokio::spawn(coordinator.run());
    let reauth_task = tokio::spawn(reauth_listener(config.host.clone(), reauth_rx));

    Ok(Entry {
        handle,
        poll_task,
        reauth_task,
    })
}

/// Log each re-authentication signal from the coordinator.
///
/// The credential-collection flow itself lives in the host UI; this side
/// only makes the condition visible.
async fn reauth_listener(host: String, mut reauth_rx: mpsc::Receiver<ReauthSignal>) {
    while reauth_rx.recv().await.is_some() {
        tracing::warn!(host, "Stored credentials rejected, re-authentication required");
    }
}
