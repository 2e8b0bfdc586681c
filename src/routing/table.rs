//! The static route table.
//!
//! # Responsibilities
//! - Name every operation the gateway exposes
//! - Bind each operation to its inbound method/path and upstream method/path
//! - Hold the serialized payload template sent upstream, if any
//!
//! # Design Decisions
//! - Built once at startup, shared read-only via Arc
//! - Upstream paths are segment lists. Ids arrive still percent-encoded and
//!   are decoded to bytes, then re-encoded, so any byte sequence survives
//! - Payloads are serialized once; every request reuses the same bytes

use axum::body::Bytes;
use axum::http::Method;
use percent_encoding::{percent_decode_str, percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;
use url::Url;

use crate::upstream::templates::{create_event_template, update_event_template};

/// Everything but RFC 3986 unreserved characters is escaped in a segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// URL parsers collapse `.` and `..` (in any escaped form) as dot segments.
pub fn is_dot_segment(decoded: &[u8]) -> bool {
    decoded == b"." || decoded == b".."
}

/// An operation the gateway relays upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListEvents,
    GetEvent,
    CreateEvent,
    UpdateEvent,
    CancelEvent,
    DeleteEvent,
}

impl Operation {
    #[cfg(test)]
    pub const ALL: [Operation; 6] = [
        Operation::ListEvents,
        Operation::GetEvent,
        Operation::CreateEvent,
        Operation::UpdateEvent,
        Operation::CancelEvent,
        Operation::DeleteEvent,
    ];

    /// Stable label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::ListEvents => "list_events",
            Operation::GetEvent => "get_event",
            Operation::CreateEvent => "create_event",
            Operation::UpdateEvent => "update_event",
            Operation::CancelEvent => "cancel_event",
            Operation::DeleteEvent => "delete_event",
        }
    }

    /// Message returned to callers when the upstream call cannot complete.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::ListEvents => "Failed to fetch events",
            Operation::GetEvent => "Failed to fetch the event",
            Operation::CreateEvent => "Failed to create the event",
            Operation::UpdateEvent => "Failed to update the event",
            Operation::CancelEvent => "Failed to cancel the event",
            Operation::DeleteEvent => "Failed to delete the event",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One piece of an upstream path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Literal(&'static str),
    /// The `:id` captured from the inbound path.
    EventId,
    /// The configured organization id.
    OrgId,
}

/// Errors building an upstream URL.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("{0} requires an event id")]
    MissingEventId(Operation),

    #[error("event id '{0}' cannot be used as a path segment")]
    InvalidEventId(String),

    #[error("base URL '{0}' cannot carry path segments")]
    InvalidBase(String),

    #[error("failed to serialize payload template: {0}")]
    Payload(#[from] serde_json::Error),
}

/// (inbound method, path) → (upstream method, path template, payload).
#[derive(Debug, Clone)]
pub struct RouteBinding {
    pub operation: Operation,
    /// Inbound method.
    pub method: Method,
    /// Inbound path pattern in router syntax.
    pub path: &'static str,
    pub upstream_method: Method,
    upstream_path: &'static [Segment],
    payload: Option<Bytes>,
}

impl RouteBinding {
    /// Serialized payload sent with every upstream request, if any.
    pub fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }

    /// Human-readable upstream path, e.g. `/events/{id}/`.
    pub fn upstream_template(&self) -> String {
        let mut out = String::new();
        for segment in self.upstream_path {
            out.push('/');
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::EventId => out.push_str("{id}"),
                Segment::OrgId => out.push_str("{org}"),
            }
        }
        out.push('/');
        out
    }

    /// The `{id}` segment of an inbound `path`, exactly as it arrived.
    pub fn raw_event_id<'a>(&self, path: &'a str) -> Option<&'a str> {
        let index = self.path.split('/').position(|s| s == "{id}")?;
        path.split('/').nth(index).filter(|s| !s.is_empty())
    }

    /// Append this binding's path (with a trailing slash) to `base`.
    ///
    /// `raw_event_id` is the inbound segment, still percent-encoded.
    pub fn upstream_url(
        &self,
        base: &Url,
        org_id: &str,
        raw_event_id: Option<&str>,
    ) -> Result<Url, RoutingError> {
        if base.cannot_be_a_base() {
            return Err(RoutingError::InvalidBase(base.to_string()));
        }

        let needs_id = self.upstream_path.contains(&Segment::EventId);
        let event_id: Vec<u8> = match raw_event_id.filter(|id| !id.is_empty()) {
            Some(raw) => percent_decode_str(raw).collect(),
            None if needs_id => return Err(RoutingError::MissingEventId(self.operation)),
            None => Vec::new(),
        };
        if needs_id && is_dot_segment(&event_id) {
            return Err(RoutingError::InvalidEventId(
                String::from_utf8_lossy(&event_id).into_owned(),
            ));
        }

        let mut path = base.path().trim_end_matches('/').to_string();
        for segment in self.upstream_path {
            let bytes: &[u8] = match segment {
                Segment::Literal(s) => s.as_bytes(),
                Segment::EventId => &event_id,
                Segment::OrgId => org_id.as_bytes(),
            };
            path.push('/');
            path.extend(percent_encode(bytes, SEGMENT));
        }
        path.push('/');

        let mut url = base.clone();
        url.set_path(&path);
        Ok(url)
    }
}

/// Immutable table of every binding, indexed by operation.
#[derive(Debug, Clone)]
pub struct RouteTable {
    bindings: Vec<RouteBinding>,
}

impl RouteTable {
    /// The gateway's fixed routes.
    pub fn standard() -> Result<Self, RoutingError> {
        use Segment::*;

        let create = Bytes::from(serde_json::to_vec(&create_event_template())?);
        let update = Bytes::from(serde_json::to_vec(&update_event_template())?);

        let bindings = vec![
            RouteBinding {
                operation: Operation::ListEvents,
                method: Method::GET,
                path: "/events",
                upstream_method: Method::GET,
                upstream_path: &[Literal("events")],
                payload: None,
            },
            RouteBinding {
                operation: Operation::GetEvent,
                method: Method::GET,
                path: "/events/{id}",
                upstream_method: Method::GET,
                upstream_path: &[Literal("events"), EventId],
                payload: None,
            },
            RouteBinding {
                operation: Operation::CreateEvent,
                method: Method::POST,
                path: "/createEvent",
                upstream_method: Method::POST,
                upstream_path: &[Literal("organizations"), OrgId, Literal("events")],
                payload: Some(create),
            },
            RouteBinding {
                operation: Operation::UpdateEvent,
                method: Method::POST,
                path: "/events/{id}",
                upstream_method: Method::POST,
                upstream_path: &[Literal("events"), EventId],
                payload: Some(update),
            },
            RouteBinding {
                operation: Operation::CancelEvent,
                method: Method::POST,
                path: "/events/{id}/cancel",
                upstream_method: Method::POST,
                upstream_path: &[Literal("events"), EventId, Literal("cancel")],
                payload: None,
            },
            RouteBinding {
                operation: Operation::DeleteEvent,
                method: Method::DELETE,
                path: "/events/{id}",
                upstream_method: Method::DELETE,
                upstream_path: &[Literal("events"), EventId],
                payload: None,
            },
        ];

        Ok(Self { bindings })
    }

    /// Binding for an operation. Every operation has exactly one.
    pub fn binding(&self, operation: Operation) -> &RouteBinding {
        &self.bindings[operation as usize]
    }

    pub fn bindings(&self) -> &[RouteBinding] {
        &self.bindings
    }
}
