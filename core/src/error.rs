//! Error types for the Allure API client.
//!
//! # Design
//! The transport never recovers from a failure, it only classifies it. A
//! request that reached the server and came back non-2xx is a `Transport`
//! error carrying the decoded server payload when there is one. A request
//! that never completed is a `Network` error. A 2xx response whose body does
//! not match the declared envelope is an `Envelope` error, so shape drift
//! fails loudly instead of producing an empty value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Errors returned by the transport and by every descriptor's `fetch`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {}", describe_failure(.body.as_ref(), .raw))]
    Transport {
        status: u16,
        body: Option<ErrorBody>,
        raw: String,
    },

    /// The request never completed (connect, DNS, timeout, I/O).
    #[error("network failure: {0}")]
    Network(String),

    /// A 2xx body was not a `{ "data": ... }` envelope.
    #[error("malformed envelope: {0}")]
    Envelope(String),

    /// The envelope's `data` did not match the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Request params or body could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A header or URL could not be formed from the inputs.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// HTTP status for `Transport` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server-provided error payload, if the failure carried one.
    pub fn error_body(&self) -> Option<&ErrorBody> {
        match self {
            ApiError::Transport { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Failure payload returned by the backend alongside a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ErrorMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Validation failures come back as a list, everything else as one string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMessage::One(msg) => f.write_str(msg),
            ErrorMessage::Many(msgs) => f.write_str(&msgs.join("; ")),
        }
    }
}

fn describe_failure(body: Option<&ErrorBody>, raw: &str) -> String {
    match body {
        Some(ErrorBody {
            message: Some(message),
            ..
        }) => message.to_string(),
        Some(ErrorBody {
            error: Some(error), ..
        }) => error.clone(),
        _ => raw.to_string(),
    }
}
