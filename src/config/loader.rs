//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `upstream.bearer_token`.
pub const ENV_BEARER_TOKEN: &str = "EVENTBRITE_BEARER_TOKEN";
/// Environment variable overriding `upstream.org_id`.
pub const ENV_ORG_ID: &str = "EVENTBRITE_ORG_ID";
/// Environment variable overriding `upstream.base_url`.
pub const ENV_BASE_URL: &str = "EVENTBRITE_BASE_URL";
/// Environment variable overriding `listener.bind_address`.
pub const ENV_LISTEN_ADDR: &str = "GATEWAY_LISTEN_ADDR";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
///
/// Without a file every field starts from its default.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path).map_err(ConfigError::Io)?)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse TOML text without validating it.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Overlay values from the environment. Unset or blank variables are ignored.
///
/// `lookup` is injected so callers (and tests) decide where values come from.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(token) = get(ENV_BEARER_TOKEN) {
        config.upstream.bearer_token = token;
    }
    if let Some(org_id) = get(ENV_ORG_ID) {
        config.upstream.org_id = org_id;
    }
    if let Some(base_url) = get(ENV_BASE_URL) {
        config.upstream.base_url = base_url;
    }
    if let Some(addr) = get(ENV_LISTEN_ADDR) {
        config.listener.bind_address = addr;
    }
}
