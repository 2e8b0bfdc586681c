//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check the upstream base URL can carry path segments
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;
use crate::routing::table::is_dot_segment;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. "upstream.base_url").
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every failure.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(message) = check_bind_address(&config.listener.bind_address) {
        errors.push(ValidationError::new("listener.bind_address", message));
    }
    if config.listener.max_concurrent_requests == 0 {
        errors.push(ValidationError::new(
            "listener.max_concurrent_requests",
            "must be greater than 0",
        ));
    }

    let upstream = &config.upstream;
    if let Err(message) = check_base_url(&upstream.base_url) {
        errors.push(ValidationError::new("upstream.base_url", message));
    }
    if upstream.bearer_token.trim().is_empty() {
        errors.push(ValidationError::new(
            "upstream.bearer_token",
            "must be set (or provide EVENTBRITE_BEARER_TOKEN)",
        ));
    }
    if upstream.org_id.trim().is_empty() {
        errors.push(ValidationError::new(
            "upstream.org_id",
            "must be set (or provide EVENTBRITE_ORG_ID)",
        ));
    } else if is_dot_segment(upstream.org_id.as_bytes()) {
        errors.push(ValidationError::new(
            "upstream.org_id",
            format!("'{}' cannot be used as a path segment", upstream.org_id),
        ));
    }
    if upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "upstream.connect_timeout_secs",
            "must be greater than 0",
        ));
    }
    if upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "upstream.request_timeout_secs",
            "must be greater than 0",
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            "must be greater than 0",
        ));
    } else if upstream.request_timeout_secs >= config.timeouts.request_secs {
        // The inbound deadline starts first, so it must outlast the upstream call.
        errors.push(ValidationError::new(
            "upstream.request_timeout_secs",
            format!(
                "must be shorter than timeouts.request_secs ({})",
                config.timeouts.request_secs
            ),
        ));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Accepts "host:port" where host may be a name ("localhost:8080").
fn check_bind_address(addr: &str) -> Result<(), String> {
    let (host, port) = addr
        .rsplit_once(':')
        .ok_or_else(|| format!("'{}' is missing a port", addr))?;
    if host.is_empty() {
        return Err(format!("'{}' is missing a host", addr));
    }
    port.parse::<u16>()
        .map(|_| ())
        .map_err(|_| format!("'{}' has an invalid port", addr))
}

fn check_base_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("'{}' is not a valid URL: {}", raw, e))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("scheme '{}' is not http or https", url.scheme()));
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(format!("'{}' cannot be used as a base URL", raw));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(format!("'{}' must not carry a query or fragment", raw));
    }
    Ok(())
}
