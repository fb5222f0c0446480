//! Diagnostics document with sensitive fields redacted.

use restlink_core::{DeviceInfo, Snapshot};
use serde_json::{json, Value};

use crate::config::AgentConfig;

const REDACTED: &str = "**REDACTED**";

/// Render a diagnostics document for a running entry.
///
/// The host address is redacted; the cached payload is included verbatim.
#[must_use]
pub fn config_entry_diagnostics(
    config: &AgentConfig,
    device: &DeviceInfo,
    snapshot: &Snapshot,
) -> Value {
    json!({
        "entry": {
            "host": REDACTED,
            "scan_interval_secs": config.scan_interval.as_secs(),
            "timeout_secs": config.timeout.as_secs(),
        },
        "device": device,
        "data": snapshot.data,
        "last_update_success": snapshot.last_update_success,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> DeviceInfo {
        DeviceInfo {
            identifier: "entry1".to_string(),
            name: "Example device".to_string(),
            manufacturer: "Example Manufacturer".to_string(),
            model: "Example Model".to_string(),
            sw_version: "1.0.0".to_string(),
        }
    }

    #[test]
    fn host_never_appears_in_diagnostics() {
        let config = AgentConfig {
            host: "secret-device.lan:8123".to_string(),
            ..AgentConfig::default()
        };
        let mut data = serde_json::Map::new();
        data.insert("value".to_string(), json!(42));
        let snapshot = Snapshot {
            data: Some(data),
            last_update_success: true,
        };

        let doc = config_entry_diagnostics(&config, &device(), &snapshot);
        let rendered = doc.to_string();

        assert!(!rendered.contains("secret-device.lan"));
        assert_eq!(doc["entry"]["host"], json!(REDACTED));
        assert_eq!(doc["data"]["value"], json!(42));
        assert_eq!(doc["device"]["manufacturer"], json!("Example Manufacturer"));
    }
}
