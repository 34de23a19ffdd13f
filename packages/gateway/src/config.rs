//! Environment configuration for the server side.

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

pub const JOBS_API_URL_VAR: &str = "DISPATCH_JOBS_API_URL";
pub const AUTH_API_URL_VAR: &str = "DISPATCH_AUTH_API_URL";
pub const UPSTREAM_TIMEOUT_VAR: &str = "DISPATCH_UPSTREAM_TIMEOUT_MS";

const DEFAULT_JOBS_API_URL: &str = "http://localhost:3000/api/jobs";
const DEFAULT_AUTH_API_URL: &str = "http://localhost:3001";
const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 10_000;

type UrlParseError = <Url as std::str::FromStr>::Err;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        source: UrlParseError,
    },
    #[error("{var} must be a whole number of milliseconds, got '{value}'")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Where the upstream collaborators live.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Endpoint returning the job snapshot.
    pub jobs_api_url: Url,
    /// Base URL of the user-account API.
    pub auth_api_url: Url,
    pub upstream_timeout: Duration,
}

impl GatewayConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Unset variables fall back to
    /// the local development defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jobs_api_url = parse_url(
            JOBS_API_URL_VAR,
            lookup(JOBS_API_URL_VAR).as_deref(),
            DEFAULT_JOBS_API_URL,
        )?;
        let auth_api_url = parse_url(
            AUTH_API_URL_VAR,
            lookup(AUTH_API_URL_VAR).as_deref(),
            DEFAULT_AUTH_API_URL,
        )?;

        let upstream_timeout = match lookup(UPSTREAM_TIMEOUT_VAR) {
            Some(value) => {
                let ms: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidTimeout {
                    var: UPSTREAM_TIMEOUT_VAR,
                    value: value.clone(),
                })?;
                Duration::from_millis(ms)
            }
            None => Duration::from_millis(DEFAULT_UPSTREAM_TIMEOUT_MS),
        };

        Ok(Self {
            jobs_api_url,
            auth_api_url,
            upstream_timeout,
        })
    }
}

fn parse_url(var: &'static str, value: Option<&str>, default: &str) -> Result<Url, ConfigError> {
    let raw = value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(default);
    Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { var, source })
}
