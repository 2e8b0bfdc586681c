//! Upstream (Eventbrite) subsystem.
//!
//! # Data Flow
//! ```text
//! RouteBinding + :id + request id
//!     → client.rs (build URL, attach auth/content type, send)
//!     → UpstreamReply { status, raw body }   on any HTTP response
//!     → UpstreamError                        on DNS/connect/timeout
//!
//! templates.rs: fixed create/update payloads (serialized at startup)
//! model.rs:     typed event schema, documentation and client tooling only
//! ```
//!
//! # Design Decisions
//! - The upstream owns validation; nothing here inspects relayed bodies
//! - Every call has a deadline

pub mod client;
pub mod model;
pub mod templates;

pub use client::{ClientBuildError, UpstreamClient, UpstreamError, UpstreamReply, X_REQUEST_ID};
