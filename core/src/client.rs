//! Blocking client for the catalog REST protocol.
//!
//! # Design
//! Every call goes through one pipeline: build the request, hand it to the
//! `Transport`, classify the status, then either decode the body into the
//! caller's type or decode an `ErrorResponse` and route it through the
//! caller's error handler. `RestClient` holds only frozen configuration and
//! shared handles, so it can be used from many threads without locking.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use derive_more::Debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn, Span};

use crate::builder::RestClientBuilder;
use crate::codec::Codec;
use crate::config::ClientConfig;
use crate::error::{Error, HandlerError, Result};
use crate::http::{is_success, HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::ErrorResponse;

type Handler<'a> = &'a dyn Fn(&ErrorResponse) -> Option<HandlerError>;

/// Body of a successful response that still has to be decoded.
struct SuccessBody {
    status: u16,
    text: String,
    expected: &'static str,
}

#[derive(Debug)]
pub struct RestClient {
    config: ClientConfig,
    #[debug(skip)]
    transport: Arc<dyn Transport>,
    #[debug(skip)]
    codec: Arc<dyn Codec>,
    span: Span,
}

impl RestClient {
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::new()
    }

    pub(crate) fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        codec: Arc<dyn Codec>,
        span: Span,
    ) -> Self {
        Self {
            config,
            transport,
            codec,
            span,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a bodiless request for `path`, relative to the base URI.
    ///
    /// Fails with `Error::MalformedPath` if `path` starts with `/`.
    pub fn build_request(&self, method: HttpMethod, path: &str) -> Result<HttpRequest> {
        if path.starts_with('/') {
            return Err(Error::MalformedPath(path.to_string()));
        }
        Ok(HttpRequest {
            method,
            url: format!("{}/{}", self.config.base_uri(), path),
            headers: self.config.request_headers(),
            body: None,
            expects_body: true,
        })
    }

    /// Check that `path` exists. Success carries no result.
    pub fn head<H>(&self, path: &str, handler: H) -> Result<()>
    where
        H: Fn(&ErrorResponse) -> Option<HandlerError>,
    {
        let request = self.build_request(HttpMethod::Head, path)?;
        self.execute(request, path, None, &handler).map(|_| ())
    }

    /// `None` when the server answers 204 No Content.
    pub fn get<T, H>(&self, path: &str, handler: H) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        H: Fn(&ErrorResponse) -> Option<HandlerError>,
    {
        let request = self.build_request(HttpMethod::Get, path)?;
        self.execute(request, path, Some(type_name::<T>()), &handler)?
            .map(|body| self.decode(body))
            .transpose()
    }

    pub fn post<B, T, H>(&self, path: &str, body: &B, handler: H) -> Result<Option<T>>
    where
        B: Serialize + fmt::Debug + ?Sized,
        T: DeserializeOwned,
        H: Fn(&ErrorResponse) -> Option<HandlerError>,
    {
        let mut request = self.build_request(HttpMethod::Post, path)?;
        request.body = Some(self.encode(body)?);
        self.execute(request, path, Some(type_name::<T>()), &handler)?
            .map(|body| self.decode(body))
            .transpose()
    }

    /// POST where no result is expected. A successful response body is
    /// ignored without being parsed.
    pub fn post_no_result<B, H>(&self, path: &str, body: &B, handler: H) -> Result<()>
    where
        B: Serialize + fmt::Debug + ?Sized,
        H: Fn(&ErrorResponse) -> Option<HandlerError>,
    {
        let mut request = self.build_request(HttpMethod::Post, path)?;
        request.body = Some(self.encode(body)?);
        self.execute(request, path, None, &handler).map(|_| ())
    }

    pub fn delete<T, H>(&self, path: &str, handler: H) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        H: Fn(&ErrorResponse) -> Option<HandlerError>,
    {
        let request = self.build_request(HttpMethod::Delete, path)?;
        self.execute(request, path, Some(type_name::<T>()), &handler)?
            .map(|body| self.decode(body))
            .transpose()
    }

    /// Release the transport. Taking `self` means no call can still be in
    /// flight through this client.
    pub fn close(self) {
        let _entered = self.span.enter();
        debug!("closing client");
        self.transport.close();
    }

    fn encode<B>(&self, body: &B) -> Result<String>
    where
        B: Serialize + fmt::Debug + ?Sized,
    {
        serde_json::to_value(body)
            .and_then(|value| self.codec.encode(&value))
            .map_err(|source| Error::RequestSerialization {
                payload: format!("{body:?}"),
                source,
            })
    }

    fn decode<T: DeserializeOwned>(&self, body: SuccessBody) -> Result<T> {
        self.codec
            .decode(&body.text)
            .and_then(serde_json::from_value::<T>)
            .map_err(|source| Error::ResponseDeserialization {
                status: body.status,
                expected: body.expected,
                source,
            })
    }

    /// Run one request. Returns the body to decode, or `None` when the call
    /// succeeded without a result (`expected` is `None`, or 204).
    fn execute(
        &self,
        mut request: HttpRequest,
        path: &str,
        expected: Option<&'static str>,
        handler: Handler<'_>,
    ) -> Result<Option<SuccessBody>> {
        let _entered = self.span.enter();
        let method = request.method;
        request.expects_body = expected.is_some();
        debug!(%method, url = %request.url, "sending request");

        let response = self
            .transport
            .execute(&request)
            .map_err(|source| Error::Transport { method, source })?;
        let status = response.status;
        debug!(%method, status, "received response");

        if !is_success(status) {
            return Err(self.failure(&response, handler));
        }
        let Some(expected) = expected else {
            return Ok(None);
        };
        if status == 204 {
            return Ok(None);
        }

        match response.body {
            Some(text) => Ok(Some(SuccessBody {
                status,
                text,
                expected,
            })),
            None => Err(Error::MissingBody {
                method,
                path: path.to_string(),
                expected,
                status,
            }),
        }
    }

    /// Offer the decoded error to `handler`; if it does not raise, fail with
    /// `Error::Unhandled` anyway.
    fn failure(&self, response: &HttpResponse, handler: Handler<'_>) -> Error {
        let error = self.error_response(response);
        match handler(&error) {
            Some(failure) => Error::Handled {
                response: error,
                failure,
            },
            None => {
                warn!(code = error.code, error_type = %error.error_type, "error handler did not raise");
                Error::Unhandled(error)
            }
        }
    }

    fn error_response(&self, response: &HttpResponse) -> ErrorResponse {
        if let Some(text) = response.body.as_deref() {
            match self.codec.decode(text).and_then(ErrorResponse::from_value) {
                Ok(error) => return error,
                // A proxy in front of the server can answer with its own page.
                Err(e) => error!(
                    status = response.status,
                    error = %e,
                    "failed to parse an error response, creating a default one"
                ),
            }
        }
        ErrorResponse::from_status(response.status, response.reason.as_deref())
    }
}
