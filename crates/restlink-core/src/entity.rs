//! Entity read-views over the coordinator snapshot.
//!
//! Entities never talk to the device directly: they read the payload the
//! coordinator cached (and its last-success flag) through a
//! [`CoordinatorHandle`]. The one write path is the button, which queues a
//! refresh request.

use serde::Serialize;
use serde_json::Value;

use crate::coordinator::CoordinatorHandle;

/// Static description of an entity: stable key plus display name.
#[derive(Debug, Clone, Copy)]
pub struct EntityDescription {
    /// Stable key, also the payload field the entity reads
    pub key: &'static str,
    /// Human-readable name
    pub name: &'static str,
}

impl EntityDescription {
    /// Unique ID for this entity under a config entry.
    #[must_use]
    pub fn unique_id(&self, entry_id: &str) -> String {
        format!("{entry_id}_{}", self.key)
    }
}

/// Device metadata surfaced to the host's device registry.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    /// Stable identifier, usually the config entry id
    pub identifier: String,
    /// Display name
    pub name: String,
    /// Manufacturer string
    pub manufacturer: String,
    /// Model string
    pub model: String,
    /// Firmware/software version
    pub sw_version: String,
}

/// Numeric/state sensor reading one payload field.
#[derive(Debug, Clone)]
pub struct Sensor {
    handle: CoordinatorHandle,
    description: EntityDescription,
}

impl Sensor {
    /// Create a sensor bound to one payload field.
    #[must_use]
    pub fn new(handle: CoordinatorHandle, description: EntityDescription) -> Self {
        Self {
            handle,
            description,
        }
    }

    /// Entity description.
    #[must_use]
    pub fn description(&self) -> &EntityDescription {
        &self.description
    }

    /// Current value of the bound payload field, if present.
    #[must_use]
    pub fn value(&self) -> Option<Value> {
        self.handle.data()?.get(self.description.key).cloned()
    }

    /// Whether the value is current (last fetch cycle succeeded).
    #[must_use]
    pub fn available(&self) -> bool {
        self.handle.last_update_success()
    }
}

/// Connectivity sensor: on while the device answers polls.
#[derive(Debug, Clone)]
pub struct ConnectivitySensor {
    handle: CoordinatorHandle,
}

impl ConnectivitySensor {
    /// Create a connectivity sensor.
    #[must_use]
    pub fn new(handle: CoordinatorHandle) -> Self {
        Self { handle }
    }

    /// True while the most recent fetch cycle succeeded.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.handle.last_update_success()
    }
}

/// Switch with host-local state.
///
/// The scaffold device has no writable endpoint, so the switch only
/// tracks the state the host last set.
#[derive(Debug, Clone)]
pub struct Switch {
    description: EntityDescription,
    is_on: bool,
}

impl Switch {
    /// Create a switch, initially off.
    #[must_use]
    pub fn new(description: EntityDescription) -> Self {
        Self {
            description,
            is_on: false,
        }
    }

    /// Entity description.
    #[must_use]
    pub fn description(&self) -> &EntityDescription {
        &self.description
    }

    /// Turn the switch on.
    pub fn turn_on(&mut self) {
        self.is_on = true;
    }

    /// Turn the switch off.
    pub fn turn_off(&mut self) {
        self.is_on = false;
    }

    /// Current state.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.is_on
    }
}

/// Button that requests an immediate coordinator refresh when pressed.
#[derive(Debug, Clone)]
pub struct Button {
    handle: CoordinatorHandle,
    description: EntityDescription,
}

impl Button {
    /// Create a refresh button.
    #[must_use]
    pub fn new(handle: CoordinatorHandle, description: EntityDescription) -> Self {
        Self {
            handle,
            description,
        }
    }

    /// Entity description.
    #[must_use]
    pub fn description(&self) -> &EntityDescription {
        &self.description
    }

    /// Handle a press: queue one refresh with the coordinator.
    pub async fn press(&self) {
        self.handle.request_refresh().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::{Coordinator, DEFAULT_SCAN_INTERVAL};
    use crate::testutil::{comm_fail, ok, ScriptedApi};

    const VALUE_SENSOR: EntityDescription = EntityDescription {
        key: "value",
        name: "Example sensor",
    };

    #[tokio::test]
    async fn sensor_reads_payload_field() {
        let api = ScriptedApi::new(vec![ok(serde_json::json!({ "value": 21.5 }))]);
        let (mut coordinator, handle, _reauth) = Coordinator::new(api, DEFAULT_SCAN_INTERVAL);
        let sensor = Sensor::new(handle, VALUE_SENSOR);

        assert_eq!(sensor.value(), None);
        coordinator.refresh().await.unwrap();
        assert_eq!(sensor.value(), Some(serde_json::json!(21.5)));
        assert!(sensor.available());
    }

    #[tokio::test]
    async fn sensor_keeps_stale_value_while_unavailable() {
        let api = ScriptedApi::new(vec![ok(serde_json::json!({ "value": 3 })), comm_fail()]);
        let (mut coordinator, handle, _reauth) = Coordinator::new(api, DEFAULT_SCAN_INTERVAL);
        let sensor = Sensor::new(handle.clone(), VALUE_SENSOR);
        let connectivity = ConnectivitySensor::new(handle);

        coordinator.refresh().await.unwrap();
        assert!(connectivity.is_on());

        let _ = coordinator.refresh().await;
        assert!(!connectivity.is_on());
        assert!(!sensor.available());
        assert_eq!(sensor.value(), Some(serde_json::json!(3)));
    }

    #[tokio::test]
    async fn button_press_drives_a_refresh() {
        let api = ScriptedApi::new(vec![ok(serde_json::json!({ "value": 1 }))]);
        let (coordinator, handle, _reauth) = Coordinator::new(api, DEFAULT_SCAN_INTERVAL);
        let button = Button::new(
            handle.clone(),
            EntityDescription {
                key: "refresh",
                name: "Refresh",
            },
        );
        let mut watcher = handle.clone();

        let task = tokio::spawn(coordinator.run());
        button.press().await;

        let published = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            watcher.changed(),
        )
        .await
        .expect("press should cause a cycle");
        assert!(published);
        assert!(handle.last_update_success());

        task.abort();
    }

    #[test]
    fn unique_id_is_entry_scoped() {
        assert_eq!(VALUE_SENSOR.unique_id("entry1"), "entry1_value");
    }

    #[test]
    fn switch_tracks_local_state() {
        let mut switch = Switch::new(EntityDescription {
            key: "example_switch",
            name: "Example switch",
        });

        assert!(!switch.is_on());
        switch.turn_on();
        assert!(switch.is_on());
        switch.turn_off();
        assert!(!switch.is_on());
    }
}
