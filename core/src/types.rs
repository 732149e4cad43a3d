//! Protocol DTOs shared by every catalog call.
//!
//! # Design
//! The catalog protocol reports failures as a JSON error object. Servers send
//! it either bare (`{"message", "type", "code"}`) or wrapped under an
//! `"error"` key; both shapes deserialize into `ErrorResponse`. When neither
//! shape fits, the client synthesizes one from the status line instead.

use derive_more::Display;
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Type tag used for error responses the client synthesizes itself.
pub const DEFAULT_ERROR_TYPE: &str = "RESTException";

/// A decoded catalog failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("ErrorResponse(code={code}, type={error_type}, message={message})")]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stack: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorPayload {
    Wrapped { error: ErrorResponse },
    Bare(ErrorResponse),
}

impl ErrorResponse {
    pub fn new(code: u16, message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            error_type: error_type.into(),
            stack: Vec::new(),
        }
    }

    /// Interpret an already-decoded JSON value as an error payload.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let payload: ErrorPayload = serde_json::from_value(value)?;
        Ok(match payload {
            ErrorPayload::Wrapped { error } => error,
            ErrorPayload::Bare(error) => error,
        })
    }

    /// Build the fallback error for a failed response without a usable body.
    ///
    /// The message is the reason phrase when present, otherwise the standard
    /// description of the status code.
    pub fn from_status(code: u16, reason: Option<&str>) -> Self {
        let message = match reason {
            Some(reason) if !reason.is_empty() => reason.to_string(),
            _ => StatusCode::from_u16(code)
                .ok()
                .and_then(|status| status.canonical_reason())
                .unwrap_or("Unknown Status")
                .to_string(),
        };
        Self::new(code, message, DEFAULT_ERROR_TYPE)
    }
}
