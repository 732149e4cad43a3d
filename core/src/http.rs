//! HTTP transport types for the catalog client.
//!
//! # Design
//! Requests and responses are plain data. `RestClient` builds an `HttpRequest`,
//! hands it to a `Transport`, and interprets the returned `HttpResponse`.
//! Keeping both sides as owned values lets tests swap in a fake transport and
//! inspect exactly what would have gone over the wire.

use std::fmt;

use http::HeaderMap;

/// HTTP method for a catalog request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Head,
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Head => "HEAD",
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-qualified request described as plain data.
///
/// Built by `RestClient::build_request`. `url` already includes the base URI.
///
/// `expects_body` is false when the caller asked for no result; a transport
/// must then leave the body of a successful response unread.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub expects_body: bool,
}

/// A response described as plain data.
///
/// `reason` is the status line's reason phrase when the transport exposes one.
/// `body` is `None` when the response carried no entity or it was not read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub body: Option<String>,
}

impl HttpResponse {
    pub fn new(status: u16, body: Option<&str>) -> Self {
        Self {
            status,
            reason: None,
            body: body.map(str::to_string),
        }
    }

    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }
}

/// Whether `status` is one of the catalog protocol's success codes.
///
/// Only 200 OK, 202 Accepted and 204 No Content count. Every other code,
/// including 201 and the rest of the 2xx range, is a failure.
pub fn is_success(status: u16) -> bool {
    matches!(status, 200 | 202 | 204)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_protocol_codes_are_successful() {
        for status in 100..600 {
            assert_eq!(
                is_success(status),
                status == 200 || status == 202 || status == 204,
                "status {status}"
            );
        }
    }

    #[test]
    fn method_renders_wire_name() {
        assert_eq!(HttpMethod::Head.to_string(), "HEAD");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
