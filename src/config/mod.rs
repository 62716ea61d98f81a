/// Application configuration module
use crate::errors::{ApiError, ApiResult};
use std::env;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Where catalog records come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataSource {
    /// The LaunchDate REST backend.
    Api,
    /// The bundled sample catalog.
    Sample,
}

impl DataSource {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "api" | "rest" => Some(Self::Api),
            "sample" | "static" => Some(Self::Sample),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Sample => "sample",
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_base_url: String,
    pub data_source: DataSource,
    pub http_timeout: Duration,
    pub countdown_tick: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_source: DataSource::Api,
            http_timeout: Duration::from_secs(30),
            countdown_tick: Duration::from_millis(1000),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> ApiResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = lookup("LAUNCHDATE_BIND_ADDR").unwrap_or(defaults.bind_addr);

        let api_base_url = lookup("LAUNCHDATE_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ApiError::Config(format!(
                "LAUNCHDATE_API_BASE_URL must be an http(s) URL, got '{api_base_url}'"
            )));
        }

        let data_source = match lookup("LAUNCHDATE_DATA_SOURCE") {
            Some(raw) => DataSource::parse(&raw).ok_or_else(|| {
                ApiError::Config(format!(
                    "LAUNCHDATE_DATA_SOURCE must be 'api' or 'sample', got '{raw}'"
                ))
            })?,
            None => defaults.data_source,
        };

        let timeout_secs = env_u64(
            &lookup,
            "LAUNCHDATE_HTTP_TIMEOUT_SECONDS",
            defaults.http_timeout.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(ApiError::Config(
                "LAUNCHDATE_HTTP_TIMEOUT_SECONDS must be greater than zero".to_string(),
            ));
        }
        let http_timeout = Duration::from_secs(timeout_secs);

        let tick_ms = env_u64(&lookup, "LAUNCHDATE_COUNTDOWN_TICK_MS", 1000)?;
        if tick_ms == 0 {
            return Err(ApiError::Config(
                "LAUNCHDATE_COUNTDOWN_TICK_MS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            bind_addr,
            api_base_url,
            data_source,
            http_timeout,
            countdown_tick: Duration::from_millis(tick_ms),
        })
    }
}

fn env_u64<F>(lookup: &F, key: &str, default: u64) -> ApiResult<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ApiError::Config(format!("{key} must be an unsigned integer, got '{raw}'"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.data_source, DataSource::Api);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.countdown_tick, Duration::from_secs(1));
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("LAUNCHDATE_API_BASE_URL", "https://api.example.com/"),
            ("LAUNCHDATE_DATA_SOURCE", "Sample"),
            ("LAUNCHDATE_COUNTDOWN_TICK_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.data_source, DataSource::Sample);
        assert_eq!(config.countdown_tick, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_data_source_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("LAUNCHDATE_DATA_SOURCE", "disk")]))
            .unwrap_err();
        assert!(err.to_string().contains("LAUNCHDATE_DATA_SOURCE"));
    }

    #[test]
    fn test_non_numeric_timeout_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[(
            "LAUNCHDATE_HTTP_TIMEOUT_SECONDS",
            "soon",
        )]))
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_zero_tick_is_rejected() {
        assert!(
            AppConfig::from_lookup(lookup_from(&[("LAUNCHDATE_COUNTDOWN_TICK_MS", "0")])).is_err()
        );
    }

    #[test]
    fn test_zero_http_timeout_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("LAUNCHDATE_HTTP_TIMEOUT_SECONDS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_base_url_must_be_http() {
        assert!(
            AppConfig::from_lookup(lookup_from(&[("LAUNCHDATE_API_BASE_URL", "localhost:8080")]))
                .is_err()
        );
    }
}
