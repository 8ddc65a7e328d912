use crate::utils::error::{MorseError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Body of `POST /decode-morse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeRequest {
    pub message: String,
}

impl DecodeRequest {
    /// Parses a raw request body.
    ///
    /// An empty or non-JSON body, or an object without `message`, is a
    /// [`MorseError::MissingMessage`]. A `message` that is present but not a
    /// string is a processing error.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        if body.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(MorseError::MissingMessage);
        }

        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|_| MorseError::MissingMessage)?;

        let message = value
            .as_object()
            .and_then(|obj| obj.get("message"))
            .ok_or(MorseError::MissingMessage)?;

        match message {
            serde_json::Value::String(message) => Ok(Self {
                message: message.clone(),
            }),
            other => Err(MorseError::ProcessingError {
                message: format!("message must be a string, got {}", json_type_name(other)),
            }),
        }
    }
}

/// Message returned by the beacon endpoint. Same shape as [`DecodeRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconMessage {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeResult {
    pub decoded: String,
    pub original: String,
    #[serde(skip_serializing_if = "is_false")]
    pub flag_found: bool,
}

/// Outcome of one successful beacon poll.
#[derive(Debug, Clone)]
pub struct BeaconReport {
    pub raw: String,
    pub decoded: String,
    pub flag_found: bool,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
