//! The transport handle: executes one `HttpRequest` and returns its response.
//!
//! # Design
//! `Transport` is the seam between the client's protocol logic and the wire.
//! Implementations must be safe to share across threads; connection pooling
//! and timeouts are their concern, not the client's. The response resource
//! never outlives `execute`: the body is drained into the returned
//! `HttpResponse` (or left unread when nobody needs it) and the underlying
//! handle is dropped on every path. Bodies are decoded as lossy UTF-8, and a
//! failed status is always returned as data, never as a read error.

use std::io;

use derive_more::{Debug, Display, Error, From};
use http::HeaderMap;

use tracing::{debug, warn};

use crate::http::{is_success, HttpMethod, HttpRequest, HttpResponse};

/// Low-level failure while talking to the server.
#[derive(Debug, Display, Error, From)]
pub enum TransportError {
    #[display("{_0}")]
    Http(ureq::Error),

    #[display("{_0}")]
    Io(io::Error),
}

/// A blocking HTTP executor shared by every call a client makes.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Release pooled resources. Called once when the owning client closes.
    fn close(&self) {}
}

/// Default transport backed by a pooled `ureq::Agent`.
///
/// Status codes are returned as data rather than errors so the client can
/// classify them itself.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    #[debug(skip)]
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ureq::Agent> for UreqTransport {
    /// Wrap an agent configured elsewhere. It should keep `http_status_as_error`
    /// disabled, otherwise failed statuses surface as transport errors.
    fn from(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let headers = &request.headers;

        let mut response = match (request.method, request.body.as_deref()) {
            (HttpMethod::Head, _) => with_headers(self.agent.head(url), headers).call(),
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
        }?;

        let status = response.status().as_u16();
        let success = is_success(status);
        // HEAD and 204 never carry content, and a success nobody asked a
        // result for is left unread.
        let unread = request.method == HttpMethod::Head || status == 204 || (success && !request.expects_body);
        let body = if unread {
            None
        } else if success {
            Some(lossy_text(response.body_mut().read_to_vec()?))
        } else {
            // A failed status must still reach the error decoder, so an
            // unreadable body is dropped rather than propagated.
            match response.body_mut().read_to_vec() {
                Ok(bytes) if bytes.is_empty() => None,
                Ok(bytes) => Some(lossy_text(bytes)),
                Err(e) => {
                    warn!(status, error = %e, "failed to read error response body");
                    None
                }
            }
        };

        Ok(HttpResponse {
            status,
            reason: None,
            body,
        })
    }

    fn close(&self) {
        debug!("releasing ureq agent");
    }
}

fn lossy_text(bytes: Vec<u8>) -> String {
    String::from_utf8_lossy(&bytes).into_owned()
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &HeaderMap) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.clone(), value.clone());
    }
    builder
}
