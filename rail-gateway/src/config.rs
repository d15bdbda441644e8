//! Gateway configuration.
//!
//! Loaded once at startup from the process environment (after an optional
//! `.env` file has been merged in) and passed by value from then on.

use std::net::SocketAddr;

use crate::rtt::{Credentials, DEFAULT_BASE_URL, RttConfig};

/// Upstream base URL.
pub const ENV_BASE_URL: &str = "REALTIME_TRAINS_URI";
/// Upstream Basic Auth username.
pub const ENV_USERNAME: &str = "TRAINS_USERNAME";
/// Upstream Basic Auth password.
pub const ENV_PASSWORD: &str = "PASSWORD";
/// Address the gateway listens on.
pub const ENV_BIND: &str = "GATEWAY_BIND";
/// Upstream request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";
/// Cap on simultaneous upstream requests.
pub const ENV_MAX_CONCURRENT: &str = "UPSTREAM_MAX_CONCURRENT";

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Configuration errors. All of them stop the gateway before it serves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Immutable gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Upstream client settings, credentials included.
    pub upstream: RttConfig,

    /// Listen address.
    pub bind: SocketAddr,
}

impl GatewayConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let base_url = required(ENV_BASE_URL)?;
        let username = required(ENV_USERNAME)?;
        let password = required(ENV_PASSWORD)?;

        validate_base_url(&base_url)?;

        let mut upstream = RttConfig::new(Credentials::new(username.trim(), password))
            .with_base_url(base_url.trim());

        if let Some(secs) = optional::<u64>(&lookup, ENV_TIMEOUT_SECS)? {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    key: ENV_TIMEOUT_SECS,
                    message: "must be at least 1 second".to_string(),
                });
            }
            upstream = upstream.with_timeout(secs);
        }

        if let Some(n) = optional::<usize>(&lookup, ENV_MAX_CONCURRENT)? {
            if n == 0 {
                return Err(ConfigError::Invalid {
                    key: ENV_MAX_CONCURRENT,
                    message: "must be at least 1".to_string(),
                });
            }
            upstream = upstream.with_max_concurrent(n);
        }

        let bind = match optional::<SocketAddr>(&lookup, ENV_BIND)? {
            Some(addr) => addr,
            None => DEFAULT_BIND.parse().map_err(|_| ConfigError::Invalid {
                key: ENV_BIND,
                message: format!("bad default {DEFAULT_BIND}"),
            })?,
        };

        Ok(Self { upstream, bind })
    }
}

/// Parse an optional variable; unset or blank means "use the default".
fn optional<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => {
            v.trim()
                .parse()
                .map(Some)
                .map_err(|e: T::Err| ConfigError::Invalid {
                    key,
                    message: e.to_string(),
                })
        }
        _ => Ok(None),
    }
}

fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(base_url.trim()).map_err(|e| ConfigError::Invalid {
        key: ENV_BASE_URL,
        message: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            key: ENV_BASE_URL,
            message: format!("expected http or https URL like {DEFAULT_BASE_URL}"),
        });
    }
    Ok(())
}
