//! Route handlers.
//!
//! Each handler names its operation and hands off to [`relay`], which runs
//! the one upstream call and shapes the reply. Inbound bodies are never read.
//! The `{id}` segment is taken from the raw URI, not a `Path` extractor, so
//! ids that do not decode to UTF-8 are still relayed.

use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, Uri},
    response::{IntoResponse, Response},
    routing::{on, MethodFilter, MethodRouter},
};

use crate::http::request::request_id_of;
use crate::http::response::{relay_response, GatewayError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{Operation, RouteBinding};

/// Method router serving `binding`, or `None` if its method has no filter.
pub fn method_router(binding: &RouteBinding) -> Option<MethodRouter<AppState>> {
    let filter = MethodFilter::try_from(binding.method.clone()).ok()?;
    let router = match binding.operation {
        Operation::ListEvents => on(filter, list_events),
        Operation::GetEvent => on(filter, get_event),
        Operation::CreateEvent => on(filter, create_event),
        Operation::UpdateEvent => on(filter, update_event),
        Operation::CancelEvent => on(filter, cancel_event),
        Operation::DeleteEvent => on(filter, delete_event),
    };
    Some(router)
}

pub async fn list_events(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    relay(&state, Operation::ListEvents, &uri, &headers).await
}

pub async fn get_event(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    relay(&state, Operation::GetEvent, &uri, &headers).await
}

pub async fn create_event(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    relay(&state, Operation::CreateEvent, &uri, &headers).await
}

pub async fn update_event(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    relay(&state, Operation::UpdateEvent, &uri, &headers).await
}

pub async fn cancel_event(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    relay(&state, Operation::CancelEvent, &uri, &headers).await
}

pub async fn delete_event(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    relay(&state, Operation::DeleteEvent, &uri, &headers).await
}

async fn relay(
    state: &AppState,
    operation: Operation,
    uri: &Uri,
    headers: &HeaderMap,
) -> Response {
    let start = Instant::now();
    let request_id = request_id_of(headers);
    let binding = state.routes.binding(operation);
    let event_id = binding.raw_event_id(uri.path());

    match state
        .upstream
        .execute(binding, event_id, request_id)
        .await
    {
        Ok(reply) => {
            tracing::info!(
                request_id = request_id.unwrap_or("unknown"),
                operation = %operation,
                upstream_status = reply.status.as_u16(),
                bytes = reply.body.len(),
                "Relayed upstream response"
            );
            let response = relay_response(&reply, state.mirror_upstream_status);
            metrics::record_request(operation, response.status().as_u16(), start);
            response
        }
        Err(source) => {
            tracing::error!(
                request_id = request_id.unwrap_or("unknown"),
                operation = %operation,
                error = %source,
                "Upstream call failed"
            );
            metrics::record_upstream_failure(operation, source.kind());

            let err = GatewayError::Upstream { operation, source };
            metrics::record_request(operation, err.status_code().as_u16(), start);
            err.into_response()
        }
    }
}
