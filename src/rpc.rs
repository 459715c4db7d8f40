// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! JSON-RPC 2.0 adapter over HTTP.
//!
//! Exposes the [`ZoneService`] operations as named methods on `POST /rpc`,
//! plus `GET /health` and `GET /metrics`.
//!
//! # Methods
//!
//! | Method | Positional params |
//! |--------|-------------------|
//! | `addZone` | `[name, zonedata?, pattern?]` (`null` zonedata skips the write) |
//! | `updateZone` | `[name, zonedata]` |
//! | `delZone`, `zoneStatus`, `reloadZone`, `notifyZone`, `transferZone` | `[name]` |
//! | `reconfig` | `[]` |
//! | `stats` | `[noreset?]` (defaults to `true`) |
//!
//! Params may also be passed by name (`{"name": "example.com"}`).
//!
//! Business failures (zone exists, zone missing, command failed) are regular
//! results carrying a non-1000 `code`. Only hard faults are JSON-RPC errors.
//! Replies are always sent with HTTP 200. A request without an `id` is a
//! notification: it is executed and answered with an empty HTTP 204.
//!
//! # Example
//!
//! ```text
//! POST /rpc
//! {"jsonrpc": "2.0", "id": 1, "method": "zoneStatus", "params": ["example.com"]}
//!
//! {"jsonrpc": "2.0", "id": 1,
//!  "result": {"code": 1000, "msg": "Command completed successfully",
//!             "nsdresult": "zone: example.com\n\tstate: ok"}}
//! ```

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::constants::{
    HEALTH_PATH, JSONRPC_VERSION, METRICS_PATH, OP_ADD_ZONE, OP_DEL_ZONE, OP_NOTIFY_ZONE,
    OP_RECONFIG, OP_RELOAD_ZONE, OP_STATS, OP_TRANSFER_ZONE, OP_UPDATE_ZONE, OP_ZONE_STATUS,
    RPC_PATH,
};
use crate::errors::RpcError;
use crate::metrics::gather_metrics;
use crate::nsd::ControlClient;
use crate::result::ZoneResult;
use crate::service::ZoneService;

// ============================================================================
// Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
struct AddZoneParams {
    name: String,
    #[serde(default)]
    zonedata: Option<String>,
    #[serde(default)]
    pattern: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateZoneParams {
    name: String,
    zonedata: String,
}

#[derive(Debug, Deserialize)]
struct NameParams {
    name: String,
}

#[derive(Debug, Deserialize)]
struct NoParams {}

#[derive(Debug, Deserialize)]
struct StatsParams {
    #[serde(default = "default_noreset")]
    noreset: bool,
}

fn default_noreset() -> bool {
    true
}

/// Decode positional (array) or named (object) params. Absent params are an empty list.
fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, RpcError> {
    let params = match params {
        Value::Null => Value::Array(Vec::new()),
        Value::Array(_) | Value::Object(_) => params,
        _ => {
            return Err(RpcError::InvalidParams(
                "params must be an array or an object".to_string(),
            ))
        }
    };
    serde_json::from_value(params).map_err(|e| RpcError::InvalidParams(e.to_string()))
}

// ============================================================================
// Dispatch
// ============================================================================

/// Run the operation named `method` with `params`.
///
/// This is the synchronous core of the `/rpc` handler.
///
/// # Errors
///
/// Returns [`RpcError::MethodNotFound`] for an unknown method,
/// [`RpcError::InvalidParams`] when `params` do not match the method and
/// [`RpcError::Service`] when the operation hits a hard fault.
pub fn dispatch<C: ControlClient>(
    service: &ZoneService<C>,
    method: &str,
    params: Value,
) -> Result<ZoneResult, RpcError> {
    let result = match method {
        OP_ADD_ZONE => {
            let p: AddZoneParams = parse_params(params)?;
            service.add_zone(
                &p.name,
                p.zonedata.as_deref().unwrap_or_default(),
                p.pattern.as_deref(),
            )?
        }
        OP_UPDATE_ZONE => {
            let p: UpdateZoneParams = parse_params(params)?;
            service.update_zone(&p.name, &p.zonedata)?
        }
        OP_DEL_ZONE => service.del_zone(&parse_params::<NameParams>(params)?.name)?,
        OP_ZONE_STATUS => service.zone_status(&parse_params::<NameParams>(params)?.name)?,
        OP_RELOAD_ZONE => service.reload_zone(&parse_params::<NameParams>(params)?.name)?,
        OP_NOTIFY_ZONE => service.notify_zone(&parse_params::<NameParams>(params)?.name)?,
        OP_TRANSFER_ZONE => service.transfer_zone(&parse_params::<NameParams>(params)?.name)?,
        OP_RECONFIG => {
            let NoParams {} = parse_params(params)?;
            service.reconfig()?
        }
        OP_STATS => service.stats(parse_params::<StatsParams>(params)?.noreset)?,
        other => return Err(RpcError::MethodNotFound(other.to_string())),
    };
    Ok(result)
}

// ============================================================================
// Router
// ============================================================================

/// Build the HTTP router serving `service`.
pub fn router<C: ControlClient + 'static>(service: Arc<ZoneService<C>>) -> Router {
    Router::new()
        .route(RPC_PATH, post(handle_rpc::<C>))
        .route(HEALTH_PATH, get(health_check))
        .route(METRICS_PATH, get(prometheus_metrics))
        .with_state(service)
}

#[derive(Debug)]
struct RpcRequest {
    /// `None` for a notification
    id: Option<Value>,
    method: String,
    params: Value,
}

/// Validate the JSON-RPC envelope. On failure, returns the request id (if any) with the error.
fn parse_request(body: &[u8]) -> Result<RpcRequest, (Value, RpcError)> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| (Value::Null, RpcError::Parse(e.to_string())))?;

    let Value::Object(mut object) = value else {
        return Err((
            Value::Null,
            RpcError::InvalidRequest("expected a request object".to_string()),
        ));
    };

    let id = object.remove("id");

    if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err((
            id.unwrap_or(Value::Null),
            RpcError::InvalidRequest(format!("jsonrpc must be \"{JSONRPC_VERSION}\"")),
        ));
    }

    let method = match object.remove("method") {
        Some(Value::String(method)) => method,
        _ => {
            return Err((
                id.unwrap_or(Value::Null),
                RpcError::InvalidRequest("method must be a string".to_string()),
            ))
        }
    };

    Ok(RpcRequest {
        id,
        method,
        params: object.remove("params").unwrap_or(Value::Null),
    })
}

fn success_response(id: Value, result: &ZoneResult) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "result": result,
    })
}

fn error_response(id: Value, error: &RpcError) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "error": {
            "code": error.code(),
            "message": error.to_string(),
        },
    })
}

/// `POST /rpc`
async fn handle_rpc<C: ControlClient + 'static>(
    State(service): State<Arc<ZoneService<C>>>,
    body: Bytes,
) -> Response {
    let RpcRequest { id, method, params } = match parse_request(&body) {
        Ok(request) => request,
        Err((id, e)) => {
            warn!(error = %e, "Rejected JSON-RPC request");
            return Json(error_response(id, &e)).into_response();
        }
    };

    debug!(method = %method, id = ?id, "JSON-RPC request");

    let call_method = method.clone();
    let outcome = tokio::task::spawn_blocking(move || dispatch(&service, &call_method, params))
        .await
        .unwrap_or_else(|e| Err(RpcError::Aborted(e.to_string())));

    if let Err(e) = &outcome {
        match e {
            RpcError::Service(_) | RpcError::Aborted(_) => {
                error!(method = %method, error = %e, "JSON-RPC call failed");
            }
            _ => warn!(method = %method, error = %e, "JSON-RPC call rejected"),
        }
    }

    let Some(id) = id else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let reply = match outcome {
        Ok(result) => success_response(id, &result),
        Err(e) => error_response(id, &e),
    };
    Json(reply).into_response()
}

/// `GET /health`
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// `GET /metrics`
async fn prometheus_metrics() -> Response {
    match gather_metrics() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
#[path = "rpc_tests.rs"]
mod rpc_tests;
