//! Polling coordinator for a single device.
//!
//! One coordinator instance owns the fetch loop for one device. It caches
//! the last successful payload, publishes a read-only snapshot after every
//! cycle, and tracks a single `unavailable_logged` flag so each
//! connectivity outage produces exactly one warning line and exactly one
//! "restored" line. Auth failures are forwarded to the host as a
//! fire-and-forget re-authentication signal.

use std::time::Duration;

use restlink_api::{ApiError, DeviceApi};
use serde_json::{Map, Value};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};

/// Default fetch interval.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(30);

/// Read-only view of the coordinator state, published after every cycle.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Last successful payload, kept across failed cycles
    pub data: Option<Map<String, Value>>,
    /// Whether the most recent completed cycle succeeded
    pub last_update_success: bool,
}

/// Signal to the host that stored credentials are invalid.
///
/// Carries no data; the host's re-authentication flow collects new
/// credentials out of band.
#[derive(Debug, Clone, Copy)]
pub struct ReauthSignal;

/// On-demand refresh request (button press, host nudge).
#[derive(Debug, Clone, Copy)]
struct RefreshRequest;

/// Failure of one fetch cycle, surfaced to the host loop.
///
/// Every variant means "this update failed, the next tick still runs"; the
/// variant tells the host how to present the failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpdateError {
    /// Credentials rejected; a re-authentication signal was emitted
    #[error("authentication failed, re-authentication requested")]
    AuthFailed,
    /// Device unreachable; retried on the next tick
    #[error("cannot connect to device")]
    CannotConnect,
    /// Unexpected API response, propagated without special handling
    #[error(transparent)]
    Api(ApiError),
}

/// Coordinates periodic fetches for one device.
///
/// `data` and `unavailable_logged` are owned exclusively by this struct and
/// mutated only inside [`refresh`](Self::refresh); readers see them through
/// the published [`Snapshot`].
pub struct Coordinator<C> {
    client: C,
    interval: Duration,
    data: Option<Map<String, Value>>,
    unavailable_logged: bool,
    snapshot_tx: watch::Sender<Snapshot>,
    refresh_rx: mpsc::Receiver<RefreshRequest>,
    reauth_tx: mpsc::Sender<ReauthSignal>,
}

impl<C: DeviceApi> Coordinator<C> {
    /// Create a coordinator plus its read handle and re-auth receiver.
    #[must_use]
    pub fn new(
        client: C,
        interval: Duration,
    ) -> (Self, CoordinatorHandle, mpsc::Receiver<ReauthSignal>) {
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::default());
        let (refresh_tx, refresh_rx) = mpsc::channel(8);
        let (reauth_tx, reauth_rx) = mpsc::channel(4);

        let coordinator = Self {
            client,
            interval,
            data: None,
            unavailable_logged: false,
            snapshot_tx,
            refresh_rx,
            reauth_tx,
        };
        let handle = CoordinatorHandle {
            snapshot_rx,
            refresh_tx,
        };

        (coordinator, handle, reauth_rx)
    }

    /// Run one fetch cycle.
    ///
    /// Exactly one outcome per cycle:
    /// - success: payload cached, "restored" logged once if an outage was
    ///   in progress
    /// - auth failure: re-auth signal emitted, suppression flag untouched
    /// - connect failure: warning logged on the first failure of a
    ///   consecutive run, suppressed afterwards
    /// - any other failure: propagated as [`UpdateError::Api`]
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError`] for the host to surface; the poll loop
    /// itself never stops on an error.
    pub async fn refresh(&mut self) -> Result<(), UpdateError> {
        match self.client.get_data().await {
            Ok(payload) => {
                if self.unavailable_logged {
                    tracing::info!(host = self.client.host(), "Connection restored");
                    self.unavailable_logged = false;
                }
                self.data = Some(payload);
                self.publish(true);
                Ok(())
            }
            Err(ApiError::Auth { status }) => {
                tracing::debug!(status, "Authentication rejected, requesting re-auth");
                // Fire-and-forget: a full or closed channel must not stall
                // the fetch cycle.
                let _ = self.reauth_tx.try_send(ReauthSignal);
                self.publish(false);
                Err(UpdateError::AuthFailed)
            }
            Err(err @ ApiError::CannotConnect { .. }) => {
                if !self.unavailable_logged {
                    tracing::warn!(
                        host = self.client.host(),
                        error = %err,
                        "Unable to connect"
                    );
                    self.unavailable_logged = true;
                }
                self.publish(false);
                Err(UpdateError::CannotConnect)
            }
            Err(err) => {
                self.publish(false);
                Err(UpdateError::Api(err))
            }
        }
    }

    /// Drive fetch cycles until every handle is dropped.
    ///
    /// One cycle runs per interval tick or on-demand refresh request,
    /// strictly serialized: the next tick is not observed until the current
    /// `refresh` call completes. The first tick fires one full interval
    /// after start, on the assumption that the caller already ran an
    /// initial refresh during setup. Cancellation (task abort, drop)
    /// propagates through the awaits.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                request = self.refresh_rx.recv() => {
                    if request.is_none() {
                        tracing::debug!("All coordinator handles dropped, stopping poll loop");
                        break;
                    }
                }
            }

            if let Err(err) = self.refresh().await {
                // Surfaced through the snapshot already; the next tick retries.
                tracing::debug!(error = %err, "Update failed");
            }
        }
    }

    fn publish(&self, last_update_success: bool) {
        self.snapshot_tx.send_replace(Snapshot {
            data: self.data.clone(),
            last_update_success,
        });
    }
}

/// Cloneable read handle vended by [`Coordinator::new`].
///
/// Readers only see the published snapshot; nothing here can mutate
/// coordinator state besides queueing a refresh request.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    snapshot_rx: watch::Receiver<Snapshot>,
    refresh_tx: mpsc::Sender<RefreshRequest>,
}

impl CoordinatorHandle {
    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Last successful payload, if any fetch has succeeded yet.
    #[must_use]
    pub fn data(&self) -> Option<Map<String, Value>> {
        self.snapshot_rx.borrow().data.clone()
    }

    /// Whether the most recent completed cycle succeeded.
    #[must_use]
    pub fn last_update_success(&self) -> bool {
        self.snapshot_rx.borrow().last_update_success
    }

    /// Wait until the next snapshot is published.
    ///
    /// Returns `false` once the coordinator has stopped publishing.
    pub async fn changed(&mut self) -> bool {
        self.snapshot_rx.changed().await.is_ok()
    }

    /// Ask the coordinator for an immediate refresh.
    ///
    /// A stopped coordinator is ignored; there is nothing useful for the
    /// caller to do about it.
    pub async fn request_refresh(&self) {
        let _ = self.refresh_tx.send(RefreshRequest).await;
    }
}
