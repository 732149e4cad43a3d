//! Verify response handling against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector names a call, the response a fake transport answers with, and
//! the outcome the client must produce. Results are compared as parsed JSON so
//! field order does not matter.

use std::cell::Cell;
use std::sync::{Arc, Mutex};

use catalog_core::{
    Error, ErrorResponse, HandlerError, HttpMethod, HttpRequest, HttpResponse, RestClient, Transport, TransportError,
};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8181/catalog";

/// Answers every request with one canned response and records what was sent.
#[derive(Clone)]
struct CannedTransport {
    response: HttpResponse,
    sent: Arc<Mutex<Vec<HttpRequest>>>,
}

impl Transport for CannedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        Ok(self.response.clone())
    }
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "HEAD" => HttpMethod::Head,
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(sim: &Value) -> HttpResponse {
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        reason: sim.get("reason").and_then(Value::as_str).map(str::to_string),
        body: sim.get("body").and_then(Value::as_str).map(str::to_string),
    }
}

fn call(
    client: &RestClient,
    method: HttpMethod,
    path: &str,
    handler: impl Fn(&ErrorResponse) -> Option<HandlerError>,
) -> Result<Option<Value>, Error> {
    match method {
        HttpMethod::Head => client.head(path, handler).map(|()| None),
        HttpMethod::Get => client.get(path, handler),
        HttpMethod::Post => client.post(path, &json!({"namespace": ["db"]}), handler),
        HttpMethod::Delete => client.delete(path, handler),
    }
}

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let method = parse_method(case["method"].as_str().unwrap());
        let path = case["path"].as_str().unwrap();
        let expected = &case["expected"];

        let transport = CannedTransport {
            response: simulated_response(&case["simulated_response"]),
            sent: Arc::default(),
        };
        let client = RestClient::builder()
            .uri(BASE_URL)
            .transport(transport.clone())
            .build()
            .unwrap();

        let handler_calls = Cell::new(0);
        let result = call(&client, method, path, |_| {
            handler_calls.set(handler_calls.get() + 1);
            None
        });

        // Verify what went over the wire
        let sent = transport.sent.lock().unwrap().clone();
        if expected.get("malformed_path").is_some() {
            assert!(sent.is_empty(), "{name}: nothing should be sent");
        } else {
            assert_eq!(sent.len(), 1, "{name}: exactly one request");
            assert_eq!(sent[0].method, method, "{name}: method");
            assert_eq!(sent[0].url, format!("{BASE_URL}/{path}"), "{name}: url");
        }

        // Verify the outcome
        if let Some(result_json) = expected.get("result") {
            assert_eq!(result.unwrap().as_ref(), Some(result_json), "{name}: result");
        } else if expected.get("none").is_some() {
            assert!(result.unwrap().is_none(), "{name}: expected no result");
        } else if let Some(error_json) = expected.get("unhandled") {
            let expected_error: ErrorResponse = serde_json::from_value(error_json.clone()).unwrap();
            match result.unwrap_err() {
                Error::Unhandled(error) => assert_eq!(error, expected_error, "{name}: error response"),
                other => panic!("{name}: unexpected error: {other}"),
            }
            assert_eq!(handler_calls.get(), 1, "{name}: handler calls");
        } else if expected.get("missing_body").is_some() {
            let err = result.unwrap_err();
            assert!(matches!(err, Error::MissingBody { .. }), "{name}: {err}");
        } else if expected.get("deserialization").is_some() {
            let err = result.unwrap_err();
            assert!(matches!(err, Error::ResponseDeserialization { .. }), "{name}: {err}");
        } else if expected.get("malformed_path").is_some() {
            let err = result.unwrap_err();
            assert!(matches!(err, Error::MalformedPath(_)), "{name}: {err}");
        } else {
            panic!("{name}: unknown expectation");
        }

        if expected.get("unhandled").is_none() {
            assert_eq!(handler_calls.get(), 0, "{name}: handler must not run");
        }
    }
}
