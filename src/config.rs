use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::deal_engine::{EngineConfig, DEFAULT_BASE_URL};

/// Service configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub base_url: String,
    pub request_timeout: Option<Duration>,
    pub session_idle: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("DEALS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        url::Url::parse(&base_url).context("DEALS_BASE_URL must be an absolute URL")?;

        let request_timeout = lookup("DEALS_REQUEST_TIMEOUT_SECS")
            .map(|secs| secs.parse().map(Duration::from_secs))
            .transpose()
            .context("DEALS_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Self {
            bind_addr: lookup("DEALS_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8001".to_string()),
            base_url,
            request_timeout,
            session_idle: Duration::from_secs(
                lookup("DEALS_SESSION_IDLE_SECS")
                    .unwrap_or_else(|| "1800".to_string())
                    .parse()
                    .context("DEALS_SESSION_IDLE_SECS must be a whole number of seconds")?,
            ),
        })
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            base_url: self.base_url.clone(),
            request_timeout: self.request_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8001");
        assert_eq!(config.base_url, "https://dealsheaven.in");
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.session_idle, Duration::from_secs(1800));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DEALS_BASE_URL", "http://localhost:9000"),
            ("DEALS_REQUEST_TIMEOUT_SECS", "15"),
            ("DEALS_SESSION_IDLE_SECS", "60"),
        ])
        .unwrap();
        assert_eq!(config.engine().base_url, "http://localhost:9000");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.session_idle, Duration::from_secs(60));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(load(&[("DEALS_BASE_URL", "dealsheaven.in")]).is_err());
        assert!(load(&[("DEALS_REQUEST_TIMEOUT_SECS", "soon")]).is_err());
    }
}
