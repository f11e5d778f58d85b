//! Gateway configuration (environment driven).

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

use ajaxgate_observability::TracingOptions;

pub const ENV_BIND: &str = "AJAXGATE_BIND";
pub const ENV_DEBUG: &str = "AJAXGATE_DEBUG";
pub const ENV_SCOPE: &str = "AJAXGATE_SCOPE";
pub const ENV_MAX_PAYLOAD: &str = "AJAXGATE_MAX_PAYLOAD_BYTES";
pub const ENV_NONCE_SECRET: &str = "NONCE_SECRET";
pub const ENV_NONCE_TTL: &str = "NONCE_TTL_SECS";

const DEV_NONCE_SECRET: &str = "dev-nonce-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: invalid socket address '{value}'")]
    InvalidAddr { key: &'static str, value: String },

    #[error("{key}: expected a positive integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key}: must not be empty")]
    Empty { key: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub bind_addr: SocketAddr,
    /// Debug mode: verbose error text in client payloads, debug-level logs.
    pub debug: bool,
    /// Channel prefix; action channels are `<scope>:<action>`.
    pub scope: String,
    pub nonce_secret: String,
    /// True when `NONCE_SECRET` was unset and the insecure dev default is used.
    pub nonce_secret_is_default: bool,
    pub nonce_ttl: Duration,
    /// Upper bound for an inflated `vcv-zip` payload.
    pub max_payload_bytes: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            debug: false,
            scope: "ajax".to_string(),
            nonce_secret: DEV_NONCE_SECRET.to_string(),
            nonce_secret_is_default: true,
            nonce_ttl: Duration::seconds(86_400),
            max_payload_bytes: 8 * 1024 * 1024,
        }
    }
}

impl GateConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_BIND) {
            config.bind_addr = value.trim().parse().map_err(|_| ConfigError::InvalidAddr {
                key: ENV_BIND,
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup(ENV_DEBUG) {
            config.debug = is_truthy(&value);
        }

        if let Some(value) = lookup(ENV_SCOPE) {
            let scope = value.trim();
            if scope.is_empty() {
                return Err(ConfigError::Empty { key: ENV_SCOPE });
            }
            config.scope = scope.to_string();
        }

        if let Some(value) = lookup(ENV_NONCE_SECRET) {
            if value.is_empty() {
                return Err(ConfigError::Empty {
                    key: ENV_NONCE_SECRET,
                });
            }
            config.nonce_secret = value;
            config.nonce_secret_is_default = false;
        }

        if let Some(value) = lookup(ENV_NONCE_TTL) {
            let secs = parse_positive(ENV_NONCE_TTL, &value)?;
            config.nonce_ttl = Duration::seconds(secs as i64);
        }

        if let Some(value) = lookup(ENV_MAX_PAYLOAD) {
            config.max_payload_bytes = parse_positive(ENV_MAX_PAYLOAD, &value)? as usize;
        }

        Ok(config)
    }

    pub fn tracing_options(&self) -> TracingOptions {
        if self.debug {
            TracingOptions::debug()
        } else {
            TracingOptions::default()
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_positive(key: &'static str, value: &str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        }),
    }
}
