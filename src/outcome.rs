//! Tagged success/failure results for the API-facing generation flows.
//!
//! The question generator and transcript evaluator share a response
//! contract: a call either yields a schema-valid payload or an object
//! containing only an `error` key. [`Outcome`] makes that a tagged type
//! inside the process; [`failure_body`] / [`outcome_to_value`] render it
//! back into the wire shape at the HTTP boundary.

use serde::Serialize;
use serde_json::json;
use std::fmt;

/// Broad classification of why a generation flow failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Required input was missing; detected before any external call.
    MissingInput,
    /// The upstream API call itself failed (network, quota, HTTP error).
    UpstreamApi,
    /// The model answered, but not with parseable JSON for the schema.
    InvalidJson,
    /// The model returned no usable candidates.
    EmptyResponse,
}

#[derive(Debug, Clone)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn missing_input(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::MissingInput,
            message: message.into(),
        }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::InvalidJson,
            message: message.into(),
        }
    }

    /// Classify an upstream client error. Empty-candidate responses are
    /// distinguished from transport/API failures by message inspection,
    /// the same way the HTTP layer maps tool errors to status codes.
    pub fn from_upstream(err: &anyhow::Error) -> Self {
        let message = err.to_string();
        let kind = if message.contains("No valid response") {
            FailureKind::EmptyResponse
        } else {
            FailureKind::UpstreamApi
        };
        Self { kind, message }
    }

    /// The wire shape: an object with only an `error` key.
    pub fn to_body(&self) -> serde_json::Value {
        json!({ "error": self.message })
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

pub type Outcome<T> = Result<T, Failure>;

/// Render an outcome as the JSON value stored in session state and
/// returned to clients: the payload on success, `{"error": ...}` on failure.
pub fn outcome_to_value<T: Serialize>(outcome: &Outcome<T>) -> serde_json::Value {
    match outcome {
        Ok(payload) => serde_json::to_value(payload)
            .unwrap_or_else(|e| json!({ "error": format!("serialization failed: {}", e) })),
        Err(failure) => failure.to_body(),
    }
}
