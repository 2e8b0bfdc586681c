//! Response shaping.
//!
//! # Responsibilities
//! - Wrap the upstream reply as `{"status": "<status line>", "body": "<raw>"}`
//! - Map gateway failures to `{"error": "<message>"}`
//! - Give middleware failures (inbound deadline) the same `{"error"}` shape
//!
//! # Design Decisions
//! - The gateway answers 200 for any upstream status unless mirroring is on
//! - Failure messages are generic per operation; causes are logged only
//! - Bodies are relayed as text; invalid UTF-8 becomes U+FFFD

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower::timeout::error::Elapsed;

use crate::routing::Operation;
use crate::upstream::{UpstreamError, UpstreamReply};

/// Successful relay: upstream status line and raw body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayedResponse {
    pub status: String,
    pub body: String,
}

impl RelayedResponse {
    pub fn from_reply(reply: &UpstreamReply) -> Self {
        Self {
            status: status_line(reply.status),
            body: String::from_utf8_lossy(&reply.body).into_owned(),
        }
    }
}

/// Failure payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `"404 Not Found"`, or just the code when no reason phrase is known.
pub fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

/// Build the client-facing response for an upstream reply.
pub fn relay_response(reply: &UpstreamReply, mirror_upstream_status: bool) -> Response {
    let status = if mirror_upstream_status {
        reply.status
    } else {
        StatusCode::OK
    };
    (status, Json(RelayedResponse::from_reply(reply))).into_response()
}

/// Errors surfaced to gateway callers.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{operation} failed: {source}")]
    Upstream {
        operation: Operation,
        #[source]
        source: UpstreamError,
    },
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Upstream {
                source: UpstreamError::InvalidUrl(_),
                ..
            } => StatusCode::BAD_REQUEST,
            GatewayError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Upstream {
                source: UpstreamError::InvalidUrl(e),
                ..
            } => e.to_string(),
            GatewayError::Upstream { operation, .. } => operation.failure_message().to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Error handler for the middleware stack. An elapsed inbound deadline is
/// 408, anything else 500.
pub async fn handle_middleware_error(err: BoxError) -> Response {
    let (status, message) = if err.is::<Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out")
    } else {
        tracing::error!(error = %err, "Middleware failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };
    let body = ErrorBody {
        error: message.to_string(),
    };
    (status, Json(body)).into_response()
}
