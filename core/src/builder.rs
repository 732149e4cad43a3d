//! Accumulate configuration, then freeze it into a `RestClient`.
//!
//! # Design
//! The builder is a plain mutable value. Invalid input is recorded rather than
//! rejected immediately so the fluent chain stays unbroken; `build` reports
//! the first problem as `Error::InvalidConfig`. `build` consumes the builder,
//! so a client never observes later changes. Clone the builder first to make
//! several clients from the same configuration.

use std::collections::HashMap;
use std::sync::Arc;

use derive_more::Debug;
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderName, HeaderValue};
use tracing::Span;
use url::Url;

use crate::client::RestClient;
use crate::codec::{Codec, JsonCodec};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::transport::{Transport, UreqTransport};

/// Property holding the base URI.
pub const URI_PROPERTY: &str = "uri";
/// Property holding a static bearer token.
pub const TOKEN_PROPERTY: &str = "token";
/// Prefix of properties that become request headers, e.g. `header.X-Client-Version`.
pub const HEADER_PREFIX: &str = "header.";

#[derive(Debug, Clone, Default)]
pub struct RestClientBuilder {
    uri: Option<String>,
    headers: HeaderMap,
    problems: Vec<String>,
    #[debug(skip)]
    transport: Option<Arc<dyn Transport>>,
    #[debug(skip)]
    codec: Option<Arc<dyn Codec>>,
    span: Option<Span>,
}

impl RestClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from catalog properties: `uri`, `token` and `header.*` keys.
    pub fn from_properties(properties: &HashMap<String, String>) -> Self {
        let mut builder = Self::new();
        if let Some(uri) = properties.get(URI_PROPERTY) {
            builder = builder.uri(uri);
        }
        if let Some(token) = properties.get(TOKEN_PROPERTY) {
            builder = builder.with_bearer_auth(token);
        }
        for (key, value) in properties {
            if let Some(name) = key.strip_prefix(HEADER_PREFIX) {
                builder = builder.with_header(name, value);
            }
        }
        builder
    }

    /// Set the base URI. A single trailing `/` is removed.
    pub fn uri(mut self, base_uri: impl Into<String>) -> Self {
        let mut base_uri = base_uri.into();
        if base_uri.ends_with('/') {
            base_uri.pop();
        }
        self.uri = Some(base_uri);
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Some(Arc::new(codec));
        self
    }

    /// Span every call of the built client runs in.
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Add a header sent with every request. A later value for the same
    /// name (case-insensitive) replaces the earlier one.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let (name, value) = (name.as_ref(), value.as_ref());
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            (Err(_), _) => self.problems.push(format!("Invalid header name: {name:?}")),
            (_, Err(_)) => self.problems.push(format!("Invalid value for header {name}")),
        }
        self
    }

    pub fn with_headers<K, V>(self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| builder.with_header(name, value))
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        let token = token.as_ref();
        if token.is_empty() {
            self.problems.push("Invalid auth token: empty".to_string());
            return self;
        }
        match HeaderValue::try_from(format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => self.problems.push("Invalid auth token: not a valid header value".to_string()),
        }
        self
    }

    pub fn build(self) -> Result<RestClient> {
        let uri = self
            .uri
            .ok_or_else(|| Error::InvalidConfig("Invalid uri for http client: null".to_string()))?;
        Url::parse(&uri).map_err(|e| Error::InvalidConfig(format!("Invalid uri for http client: {uri}: {e}")))?;
        if !self.problems.is_empty() {
            return Err(Error::InvalidConfig(self.problems.join("; ")));
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(UreqTransport::new()),
        };
        let codec: Arc<dyn Codec> = match self.codec {
            Some(codec) => codec,
            None => Arc::new(JsonCodec),
        };
        let span = self
            .span
            .unwrap_or_else(|| tracing::info_span!("rest_client", uri = %uri));

        Ok(RestClient::new(ClientConfig::new(uri, self.headers), transport, codec, span))
    }
}
