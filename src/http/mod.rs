//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, request span)
//!     → handlers.rs (operation for method + path)
//!     → [upstream client executes the route binding]
//!     → response.rs ({status, body} or {error})
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{ErrorBody, GatewayError, RelayedResponse};
pub use server::{AppState, HttpServer, ServerError};
