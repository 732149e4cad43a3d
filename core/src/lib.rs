//! Blocking HTTP transport core for the catalog REST protocol.
//!
//! # Overview
//! `RestClient` builds requests from relative paths, executes them through a
//! pooled `Transport`, classifies the status, and decodes the body into the
//! caller's type or into an `ErrorResponse` routed through the caller's error
//! handler.
//!
//! # Design
//! - Configuration is accumulated in `RestClientBuilder` and frozen on
//!   `build`; a built client holds no mutable state and can be shared.
//! - Only 200, 202 and 204 count as success.
//! - A failed status always yields exactly one `ErrorResponse`, parsed from the
//!   body when possible and synthesized from the status line otherwise.
//! - Transport and codec are injectable so tests run without a network.
//!
//! ```no_run
//! use catalog_core::{unhandled, RestClient};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct CatalogConfig {
//!     defaults: std::collections::HashMap<String, String>,
//! }
//!
//! let client = RestClient::builder()
//!     .uri("http://localhost:8181")
//!     .with_bearer_auth("secret")
//!     .build()?;
//! let config: Option<CatalogConfig> = client.get("v1/config", unhandled)?;
//! # Ok::<(), catalog_core::Error>(())
//! ```

pub mod builder;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use builder::RestClientBuilder;
pub use client::RestClient;
pub use codec::{Codec, JsonCodec};
pub use config::ClientConfig;
pub use error::{unhandled, Error, HandlerError, Result};
pub use crate::http::{is_success, HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, TransportError, UreqTransport};
pub use types::{ErrorResponse, DEFAULT_ERROR_TYPE};
