//! Eventbrite gateway library.
//!
//! A small HTTP gateway that relays event operations to the Eventbrite REST
//! API: each inbound route becomes one outbound request, and the upstream
//! status line and raw body come back wrapped as `{"status", "body"}`.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
