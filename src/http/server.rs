//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router from the static route table
//! - Wire up middleware (request ID, tracing, deadline, concurrency limit)
//! - Answer an elapsed inbound deadline with a JSON 408
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use axum::{error_handling::HandleErrorLayer, Router};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::{limit::GlobalConcurrencyLimitLayer, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::handlers;
use crate::http::request::{make_span, UuidRequestId};
use crate::http::response::handle_middleware_error;
use crate::routing::{RouteTable, RoutingError};
use crate::upstream::{ClientBuildError, UpstreamClient};

/// Application state injected into handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub upstream: UpstreamClient,
    pub mirror_upstream_status: bool,
}

/// Errors assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Client(#[from] ClientBuildError),

    #[error(transparent)]
    Routes(#[from] RoutingError),

    #[error("route {path} uses unsupported method {method}")]
    UnsupportedMethod { method: String, path: &'static str },
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given (validated) configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let routes = Arc::new(RouteTable::standard()?);
        let upstream = UpstreamClient::new(&config.upstream)?;

        let state = AppState {
            routes,
            upstream,
            mirror_upstream_status: config.responses.mirror_upstream_status,
        };

        let router = Self::build_router(&config, state)?;
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Result<Router, ServerError> {
        let mut router = Router::new();
        for binding in state.routes.bindings() {
            let method_router =
                handlers::method_router(binding).ok_or_else(|| ServerError::UnsupportedMethod {
                    method: binding.method.to_string(),
                    path: binding.path,
                })?;
            tracing::debug!(
                operation = %binding.operation,
                method = %binding.method,
                path = binding.path,
                upstream = %binding.upstream_template(),
                "Route registered"
            );
            // Same-path routes with different methods are merged by axum.
            router = router.route(binding.path, method_router);
        }

        Ok(router
            .with_state(state)
            .layer(GlobalConcurrencyLimitLayer::new(
                config.listener.max_concurrent_requests,
            ))
            .layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(handle_middleware_error))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId)))
    }

    /// Run the server until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
