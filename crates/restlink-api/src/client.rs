//! HTTP client for the device REST API.
//!
//! Two endpoints are consumed: `GET /api/status` as a connectivity probe
//! (body ignored) and `GET /api/data` for the payload. One timeout bounds
//! each request end to end, connect and body read included.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Default bound on a single request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Device client configuration.
#[derive(Debug, Clone)]
pub struct DeviceClientConfig {
    /// Host address of the device (e.g. `192.168.1.40:8123`)
    pub host: String,
    /// Bound on the entire request, connect and read together
    pub timeout: Duration,
}

impl Default for DeviceClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost:8080".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Abstraction over the device API consumed by the coordinator.
///
/// The seam exists so the coordinator can be driven by a scripted fake in
/// tests; [`DeviceClient`] is the one production implementation.
#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// Host address this client talks to.
    fn host(&self) -> &str;

    /// Probe connectivity; `Ok(true)` on any 2xx status, body ignored.
    ///
    /// Safe to call repeatedly: it mutates no shared state, so the outcome
    /// only changes when the device does.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] classified per the crate-level taxonomy.
    async fn validate_connection(&self) -> Result<bool, ApiError>;

    /// Fetch the current device payload, returned verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] classified per the crate-level taxonomy.
    async fn get_data(&self) -> Result<Map<String, Value>, ApiError>;
}

/// HTTP client for a single device endpoint.
///
/// The `reqwest::Client` is injected rather than built here so the one
/// connection pool can be shared across every component of the agent.
/// The host is immutable for the lifetime of the instance.
pub struct DeviceClient {
    http: reqwest::Client,
    config: DeviceClientConfig,
}

impl DeviceClient {
    /// Create a new device client around an injected HTTP client.
    #[must_use]
    pub fn new(http: reqwest::Client, config: DeviceClientConfig) -> Self {
        Self { http, config }
    }

    fn comm_error(&self, reason: impl fmt::Display) -> ApiError {
        ApiError::CannotConnect {
            host: self.config.host.clone(),
            reason: reason.to_string(),
        }
    }

    /// Issue `GET http://{host}{path}` and classify the response status.
    ///
    /// The returned response still has an unread body; callers read it (or
    /// not) inside the same [`Self::bounded`] window.
    async fn send(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        let url = format!("http://{}{}", self.config.host, path);
        tracing::debug!(url, "GET request");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.comm_error(e))?;

        match response.status().as_u16() {
            status @ (401 | 403) => Err(ApiError::Auth { status }),
            status if status >= 400 => Err(ApiError::Api {
                status,
                message: response.text().await.unwrap_or_default(),
            }),
            _ => Ok(response),
        }
    }

    /// Bound an exchange by the configured timeout.
    ///
    /// Timeout elapse becomes [`ApiError::CannotConnect`]; errors produced
    /// inside the exchange pass through unchanged, so an auth failure is
    /// never reclassified. Task cancellation simply drops the future and is
    /// not intercepted here.
    async fn bounded<T>(
        &self,
        exchange: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, ApiError> {
        match tokio::time::timeout(self.config.timeout, exchange).await {
            Ok(outcome) => outcome,
            Err(_) => Err(self.comm_error(format!(
                "timeout after {}s",
                self.config.timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl DeviceApi for DeviceClient {
    fn host(&self) -> &str {
        &self.config.host
    }

    async fn validate_connection(&self) -> Result<bool, ApiError> {
        self.bounded(self.send("/api/status")).await?;
        Ok(true)
    }

    async fn get_data(&self) -> Result<Map<String, Value>, ApiError> {
        self.bounded(async {
            let response = self.send("/api/data").await?;
            response.json().await.map_err(|e| self.comm_error(e))
        })
        .await
    }
}

/// Errors that can occur when talking to the device.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Credentials rejected by the device (HTTP 401 or 403)
    #[error("authentication failed: {status}")]
    Auth {
        /// The rejecting status code
        status: u16,
    },
    /// Device unreachable: timeout, refused connection, DNS failure, or a
    /// broken response body. The original cause is preserved in `reason`.
    #[error("error communicating with {host}: {reason}")]
    CannotConnect {
        /// Host the request was addressed to
        host: String,
        /// Text of the underlying failure
        reason: String,
    },
    /// Any other non-2xx status
    #[error("API error: {status}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, if it could be read
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default() {
        let config = DeviceClientConfig::default();
        assert_eq!(config.host, "localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn cannot_connect_display_names_host() {
        let err = ApiError::CannotConnect {
            host: "device.local:8080".to_string(),
            reason: "timeout after 10s".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("device.local:8080"));
        assert!(rendered.contains("timeout"));
    }

    #[test]
    fn auth_display_names_status() {
        let err = ApiError::Auth { status: 403 };
        assert_eq!(err.to_string(), "authentication failed: 403");
    }
}
