//! The `{ data, message?, statusCode? }` envelope every 2xx response uses.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerEnvelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Decode a 2xx body into its envelope.
///
/// The `data` field must be present even when the target type would accept
/// a missing value; an empty body stands for `{"data": null}`.
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<ServerEnvelope<T>, ApiError> {
    if body.trim().is_empty() {
        let data = serde_json::from_value(Value::Null).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        return Ok(ServerEnvelope {
            data,
            message: None,
            status_code: None,
        });
    }

    let value: Value = serde_json::from_str(body).map_err(|e| ApiError::Envelope(e.to_string()))?;
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(ApiError::Envelope(format!("expected an object, got {}", kind_of(&other))));
        }
    };
    let data = fields
        .remove("data")
        .ok_or_else(|| ApiError::Envelope("missing `data` field".to_string()))?;

    let message = match fields.remove("message") {
        Some(Value::String(message)) => Some(message),
        _ => None,
    };
    let status_code = fields
        .get("statusCode")
        .and_then(Value::as_u64)
        .and_then(|code| u16::try_from(code).ok());

    let data = serde_json::from_value(data).map_err(|e| ApiError::Deserialization(e.to_string()))?;
    Ok(ServerEnvelope {
        data,
        message,
        status_code,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
