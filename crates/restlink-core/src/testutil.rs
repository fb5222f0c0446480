//! Scripted fake device API for coordinator and entity tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use restlink_api::{ApiError, DeviceApi};
use serde_json::{Map, Value};

pub const FAKE_HOST: &str = "device.local:8080";

/// Replays a fixed sequence of `get_data` outcomes.
pub struct ScriptedApi {
    outcomes: Mutex<VecDeque<Result<Map<String, Value>, ApiError>>>,
}

impl ScriptedApi {
    pub fn new(outcomes: Vec<Result<Map<String, Value>, ApiError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
        }
    }
}

#[async_trait]
impl DeviceApi for ScriptedApi {
    fn host(&self) -> &str {
        FAKE_HOST
    }

    async fn validate_connection(&self) -> Result<bool, ApiError> {
        Ok(true)
    }

    async fn get_data(&self) -> Result<Map<String, Value>, ApiError> {
        self.outcomes
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .expect("script exhausted")
    }
}

/// Successful outcome carrying `payload` (must be a JSON object).
pub fn ok(payload: Value) -> Result<Map<String, Value>, ApiError> {
    match payload {
        Value::Object(map) => Ok(map),
        other => panic!("scripted payload must be an object, got: {other}"),
    }
}

pub fn comm_fail() -> Result<Map<String, Value>, ApiError> {
    Err(ApiError::CannotConnect {
        host: FAKE_HOST.to_string(),
        reason: "connection refused".to_string(),
    })
}

pub fn auth_fail() -> Result<Map<String, Value>, ApiError> {
    Err(ApiError::Auth { status: 401 })
}
