//! # restlink core
//!
//! Polling coordinator and entity read-views for restlink.
//!
//! This crate provides:
//! - A fixed-interval polling coordinator that caches the last successful
//!   payload and routes failures to the host (re-auth signal, retry)
//! - One-warning-per-outage log suppression for connectivity failures
//! - Read-only entity views (sensor, connectivity, switch, button) over the
//!   coordinator's published snapshot

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coordinator;
pub mod entity;

#[cfg(test)]
mod testutil;

pub use coordinator::{
    Coordinator, CoordinatorHandle, ReauthSignal, Snapshot, UpdateError, DEFAULT_SCAN_INTERVAL,
};
pub use entity::{Button, ConnectivitySensor, DeviceInfo, EntityDescription, Sensor, Switch};
