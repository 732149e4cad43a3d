use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub namespace: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Namespace {
    fn name(&self) -> String {
        self.namespace.join(".")
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListNamespaces {
    pub namespaces: Vec<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorModel {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub code: u16,
}

/// Catalog error body: the error object wrapped under `"error"`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorModel,
}

pub type Db = Arc<RwLock<BTreeMap<String, Namespace>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(BTreeMap::new()));
    Router::new()
        .route("/v1/config", get(config))
        .route("/v1/namespaces", get(list_namespaces).post(create_namespace))
        .route(
            "/v1/namespaces/{name}",
            get(load_namespace).head(namespace_exists).delete(drop_namespace),
        )
        .route("/v1/debug/headers", get(echo_headers))
        .route("/v1/debug/status/{code}", any(respond_with_status))
        .route("/v1/debug/garbage/{code}", any(respond_with_garbage))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error_response(status: StatusCode, error_type: &str, message: String) -> Response {
    let body = ErrorEnvelope {
        error: ErrorModel {
            message,
            error_type: error_type.to_string(),
            code: status.as_u16(),
        },
    };
    (status, Json(body)).into_response()
}

fn no_such_namespace(name: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "NoSuchNamespaceException",
        format!("Namespace does not exist: {name}"),
    )
}

async fn config() -> Json<serde_json::Value> {
    Json(json!({"defaults": {}, "overrides": {}}))
}

async fn list_namespaces(State(db): State<Db>) -> Json<ListNamespaces> {
    let namespaces = db.read().await;
    Json(ListNamespaces {
        namespaces: namespaces.values().map(|ns| ns.namespace.clone()).collect(),
    })
}

async fn create_namespace(
    State(db): State<Db>,
    Json(input): Json<Namespace>,
) -> Result<Json<Namespace>, Response> {
    let name = input.name();
    let mut namespaces = db.write().await;
    if namespaces.contains_key(&name) {
        return Err(error_response(
            StatusCode::CONFLICT,
            "AlreadyExistsException",
            format!("Namespace already exists: {name}"),
        ));
    }
    namespaces.insert(name, input.clone());
    Ok(Json(input))
}

async fn namespace_exists(State(db): State<Db>, Path(name): Path<String>) -> StatusCode {
    if db.read().await.contains_key(&name) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn load_namespace(
    State(db): State<Db>,
    Path(name): Path<String>,
) -> Result<Json<Namespace>, Response> {
    let namespaces = db.read().await;
    namespaces
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| no_such_namespace(&name))
}

async fn drop_namespace(
    State(db): State<Db>,
    Path(name): Path<String>,
) -> Result<StatusCode, Response> {
    let mut namespaces = db.write().await;
    namespaces
        .remove(&name)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| no_such_namespace(&name))
}

async fn echo_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    let echoed = headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect();
    Json(echoed)
}

fn parse_status(code: u16) -> Option<StatusCode> {
    StatusCode::from_u16(code).ok().filter(|status| status.as_u16() >= 200)
}

/// Answer with `code` and a small JSON body, unless the status forbids one.
async fn respond_with_status(Path(code): Path<u16>) -> Response {
    match parse_status(code) {
        Some(status @ (StatusCode::NO_CONTENT | StatusCode::NOT_MODIFIED)) => status.into_response(),
        Some(status) => (status, Json(json!({"x": 1}))).into_response(),
        None => StatusCode::BAD_REQUEST.into_response(),
    }
}

/// Answer with `code` and an HTML page, like a proxy in front of the catalog.
async fn respond_with_garbage(Path(code): Path<u16>) -> Response {
    match parse_status(code) {
        Some(status) => (
            status,
            [(header::CONTENT_TYPE, "text/html")],
            "<html><body>upstream unavailable</body></html>",
        )
            .into_response(),
        None => StatusCode::BAD_REQUEST.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_properties_default_to_empty() {
        let ns: Namespace = serde_json::from_str(r#"{"namespace":["db","sales"]}"#).unwrap();
        assert_eq!(ns.name(), "db.sales");
        assert!(ns.properties.is_empty());
    }

    #[test]
    fn namespace_rejects_missing_levels() {
        let result: Result<Namespace, _> = serde_json::from_str(r#"{"properties":{}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn error_envelope_uses_type_key() {
        let body = ErrorEnvelope {
            error: ErrorModel {
                message: "gone".to_string(),
                error_type: "NoSuchNamespaceException".to_string(),
                code: 404,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"]["type"], "NoSuchNamespaceException");
        assert_eq!(json["error"]["code"], 404);
    }

    #[test]
    fn informational_statuses_are_refused() {
        assert!(parse_status(101).is_none());
        assert!(parse_status(1000).is_none());
        assert_eq!(parse_status(409), Some(StatusCode::CONFLICT));
    }
}
