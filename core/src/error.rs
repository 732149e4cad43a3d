//! Error types for the catalog client.
//!
//! # Design
//! One enum covers every way a call can fail, grouped by when it happens:
//! before any I/O (`InvalidConfig`, `MalformedPath`, `RequestSerialization`),
//! on the wire (`Transport`), on a failed status (`Handled`, `Unhandled`), or
//! on a successful status whose body breaks the contract (`MissingBody`,
//! `ResponseDeserialization`).
//!
//! A failed status always produces exactly one `ErrorResponse`. It is offered
//! to the caller's error handler, which may turn it into a domain failure;
//! if the handler declines, the call still fails with `Unhandled`.

use derive_more::{Display, Error, From};

use crate::http::HttpMethod;
use crate::transport::TransportError;
use crate::types::ErrorResponse;

/// A failure produced by a caller's error handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by `RestClient` and `RestClientBuilder`.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The builder was given unusable input.
    #[display("invalid client configuration: {_0}")]
    #[from(skip)]
    InvalidConfig(#[error(not(source))] String),

    #[display("Received a malformed path for a REST request: {_0}. Paths should not start with /")]
    #[from(skip)]
    MalformedPath(#[error(not(source))] String),

    /// The request body could not be encoded. `payload` is its `Debug` form.
    #[display("Failed to write request body: {payload}")]
    #[from(skip)]
    RequestSerialization {
        payload: String,
        source: serde_json::Error,
    },

    #[display("Error occurred while processing {method} request: {source}")]
    #[from(skip)]
    Transport {
        method: HttpMethod,
        source: TransportError,
    },

    /// The error handler turned a failed response into its own failure.
    #[display("{failure}")]
    #[from(skip)]
    Handled {
        response: ErrorResponse,
        #[error(not(source))]
        failure: HandlerError,
    },

    /// A failed response the error handler did not raise for.
    #[display("Unhandled error: {_0}")]
    #[from]
    Unhandled(#[error(not(source))] ErrorResponse),

    #[display(
        "Invalid (null) response body for request (expected {expected}): method={method}, path={path}, status={status}"
    )]
    #[from(skip)]
    MissingBody {
        method: HttpMethod,
        path: String,
        expected: &'static str,
        status: u16,
    },

    #[display("Received a success response code of {status}, but failed to parse response body into {expected}")]
    #[from(skip)]
    ResponseDeserialization {
        status: u16,
        expected: &'static str,
        source: serde_json::Error,
    },
}

impl Error {
    /// The decoded error response, for failures caused by a failed status.
    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            Error::Handled { response, .. } | Error::Unhandled(response) => Some(response),
            _ => None,
        }
    }

    /// Downcast the handler's failure to the caller's own error type.
    pub fn handled<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Error::Handled { failure, .. } => failure.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Error handler that never raises, leaving every failure as `Error::Unhandled`.
pub fn unhandled(_: &ErrorResponse) -> Option<HandlerError> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Display, Error)]
    #[display("namespace already exists")]
    struct AlreadyExists;

    #[test]
    fn handled_downcasts_to_caller_type() {
        let err = Error::Handled {
            response: ErrorResponse::new(409, "conflict", "AlreadyExistsException"),
            failure: Box::new(AlreadyExists),
        };
        assert!(err.handled::<AlreadyExists>().is_some());
        assert_eq!(err.to_string(), "namespace already exists");
        assert_eq!(err.error_response().map(|r| r.code), Some(409));
    }

    #[test]
    fn unhandled_embeds_error_response() {
        let err = Error::from(ErrorResponse::new(500, "Internal Server Error", "RESTException"));
        assert_eq!(
            err.to_string(),
            "Unhandled error: ErrorResponse(code=500, type=RESTException, message=Internal Server Error)"
        );
        assert!(err.handled::<AlreadyExists>().is_none());
    }

    #[test]
    fn malformed_path_names_the_path() {
        let err = Error::MalformedPath("/v1/config".to_string());
        assert!(err.to_string().contains("/v1/config"));
        assert!(err.error_response().is_none());
    }
}
