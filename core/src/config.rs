//! Backend endpoint and retry settings.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::retry::RetryPolicy;

pub const LOCAL_API: &str = "http://localhost:3000";
pub const PRODUCTION_API: &str = "https://backend-gestor-zfez.onrender.com";

pub const ENV_API_BASE: &str = "CLINIC_API_BASE";
pub const ENV_HOST: &str = "CLINIC_HOST";
pub const ENV_RETRY_ATTEMPTS: &str = "CLINIC_RETRY_ATTEMPTS";
pub const ENV_RETRY_DELAY_MS: &str = "CLINIC_RETRY_DELAY_MS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub retry: RetryPolicy,
}

impl ApiConfig {
    /// Local backend when running on a loopback host, production otherwise.
    pub fn for_host(host: &str) -> Self {
        let base_url = if matches!(host, "localhost" | "127.0.0.1") {
            LOCAL_API
        } else {
            PRODUCTION_API
        };
        Self {
            base_url: base_url.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ApiConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(ENV_HOST).unwrap_or_else(|| "localhost".to_string());
        let mut config = Self::for_host(&host);

        if let Some(base) = lookup(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            config.base_url = base.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_RETRY_ATTEMPTS) {
            config.retry.max_attempts = parse_number(ENV_RETRY_ATTEMPTS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_RETRY_DELAY_MS) {
            config.retry.delay = Duration::from_millis(parse_number(ENV_RETRY_DELAY_MS, &raw)?);
        }

        tracing::debug!(base_url = %config.base_url, retry = ?config.retry, "loaded api config");
        Ok(config)
    }
}

fn parse_number<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: raw.to_string(),
    })
}
