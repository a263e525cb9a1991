//! Object listing endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

use crate::mock_server::state::{MockState, RecordedQuery};

const GUARD_LINE: &str = "throw 'allowIllegalResourceCall is false.';";

/// Query parameters of a listing request.
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    pub workspace: Option<String>,
    pub query: Option<String>,
    pub start: Option<u64>,
    pub pagesize: Option<u32>,
    pub fetch: Option<bool>,
}

/// GET /slm/webservice/{version}/{type}.js
pub async fn query_objects(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((_version, resource)): Path<(String, String)>,
    headers: HeaderMap,
    Query(params): Query<QueryParams>,
) -> Response {
    let Some(object_type) = resource.strip_suffix(".js") else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let mut state = state.write().await;

    if !authorized(&state, &headers) {
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"Rally ALM\"")],
            "Unauthorized",
        )
            .into_response();
    }

    let start = params.start.unwrap_or(1).max(1);
    let page_size = params.pagesize.unwrap_or(20).max(1);

    state.requests.push(RecordedQuery {
        object_type: object_type.to_string(),
        workspace: params.workspace.clone().unwrap_or_default(),
        query: params.query.clone().unwrap_or_default(),
        start,
        page_size,
    });

    let served = state
        .max_page_size
        .map_or(page_size, |max| page_size.min(max));

    let envelope = match state.objects_of(object_type) {
        Some(objects) => {
            let total = state.reported_total.unwrap_or(objects.len() as u64);
            let results: Vec<Value> = objects
                .iter()
                .skip((start - 1) as usize)
                .take(served as usize)
                .map(|object| {
                    if params.fetch == Some(true) {
                        object.clone()
                    } else {
                        ref_stub(object)
                    }
                })
                .collect();

            json!({
                "QueryResult": {
                    "_rallyAPIMajor": "1",
                    "_rallyAPIMinor": "39",
                    "Errors": [],
                    "Warnings": [],
                    "TotalResultCount": total,
                    "StartIndex": start,
                    "PageSize": page_size,
                    "Results": results
                }
            })
        }
        None => json!({
            "QueryResult": {
                "Errors": [format!("Not able to parse artifact type: {object_type}")],
                "Warnings": [],
                "TotalResultCount": 0,
                "StartIndex": 0,
                "PageSize": 0,
                "Results": []
            }
        }),
    };

    let mut body = serde_json::to_string_pretty(&envelope).unwrap_or_default();
    if state.guard_line {
        body = format!("{GUARD_LINE}\n{body}");
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        body,
    )
        .into_response()
}

fn authorized(state: &MockState, headers: &HeaderMap) -> bool {
    if state.required_credentials.is_none() {
        return true;
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .and_then(|encoded| STANDARD.decode(encoded).ok())
        .and_then(|decoded| String::from_utf8(decoded).ok())
        .and_then(|pair| {
            pair.split_once(':')
                .map(|(user, pass)| state.accepts(user, pass))
        })
        .unwrap_or(false)
}

/// The reference-only form returned when `fetch` is not requested.
fn ref_stub(object: &Value) -> Value {
    let mut stub = Map::new();
    if let Some(fields) = object.as_object() {
        for key in ["_ref", "_refObjectName", "_type"] {
            if let Some(value) = fields.get(key) {
                stub.insert(key.to_string(), value.clone());
            }
        }
    }
    Value::Object(stub)
}
