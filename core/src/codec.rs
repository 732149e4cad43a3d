//! Injectable JSON encoding for request and response bodies.
//!
//! Typed values cross this seam as `serde_json::Value`, which keeps `Codec`
//! object safe so a client can hold any implementation behind an `Arc`.

use serde_json::Value;

/// Converts between JSON values and their wire text.
pub trait Codec: Send + Sync {
    fn encode(&self, value: &Value) -> Result<String, serde_json::Error>;

    fn decode(&self, text: &str) -> Result<Value, serde_json::Error>;
}

/// Compact `serde_json` encoding. Used unless a builder injects another codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<String, serde_json::Error> {
        serde_json::to_string(value)
    }

    fn decode(&self, text: &str) -> Result<Value, serde_json::Error> {
        serde_json::from_str(text)
    }
}
