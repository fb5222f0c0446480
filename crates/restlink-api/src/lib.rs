//! # restlink API
//!
//! HTTP transport client for a single restlink device endpoint.
//!
//! Every failure is classified into exactly one of three kinds:
//!
//! - [`ApiError::Auth`] — credentials rejected (401/403), user-actionable
//! - [`ApiError::CannotConnect`] — device unreachable or timed out, transient
//! - [`ApiError::Api`] — any other non-2xx status
//!
//! The taxonomy is a closed enum on purpose: the coordinator chooses between
//! "start re-authentication" and "retry next tick" based on the variant, so
//! an auth failure must never surface as a connect failure or vice versa.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;

pub use client::{ApiError, DeviceApi, DeviceClient, DeviceClientConfig, DEFAULT_TIMEOUT};
