//! Frozen client configuration.

use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};

const APPLICATION_JSON: &str = "application/json";

/// Base URI and extra headers of a built client. Never mutated after build.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_uri: String,
    headers: HeaderMap,
}

impl ClientConfig {
    pub(crate) fn new(base_uri: String, headers: HeaderMap) -> Self {
        Self { base_uri, headers }
    }

    /// The base URI, without a trailing `/`.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Headers added on top of the JSON defaults.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Headers for one request: JSON `Accept` and `Content-Type` first, then
    /// the configured headers, which replace a default with the same name.
    pub fn request_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(self.headers.len() + 2);
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }
        headers
    }
}
