//! Gateway configuration from environment variables

use heat_risk::aggregator::{DEFAULT_BATCH_DELAY_MS, DEFAULT_BATCH_SIZE};
use heat_risk::AggregatorConfig;
use nws_client::{NwsConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 18700;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub nws: NwsConfig,
    pub aggregator: AggregatorConfig,
    /// JSON probe catalog; the built-in metro list when unset
    pub catalog_path: Option<PathBuf>,
    /// JSON subscription snapshot; in-memory only when unset
    pub subscriptions_path: Option<PathBuf>,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("ALERT_GATEWAY_PORT").or_else(|| get("PORT")) {
            Some(raw) => parse_value("ALERT_GATEWAY_PORT", raw, "a port number")?,
            None => DEFAULT_PORT,
        };

        let bind = match get("ALERT_GATEWAY_BIND") {
            Some(raw) => parse_value("ALERT_GATEWAY_BIND", raw, "an IP address")?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let timeout_sec: u64 = match get("NWS_TIMEOUT_SECS") {
            Some(raw) => parse_value("NWS_TIMEOUT_SECS", raw, "a whole number of seconds")?,
            None => NwsConfig::default().timeout_sec,
        };

        let batch_size: usize = match get("HEAT_RISK_BATCH_SIZE") {
            Some(raw) => parse_value("HEAT_RISK_BATCH_SIZE", raw, "a positive integer")?,
            None => DEFAULT_BATCH_SIZE,
        };
        if batch_size == 0 {
            return Err(ConfigError::Invalid {
                key: "HEAT_RISK_BATCH_SIZE",
                value: "0".to_string(),
                expected: "a positive integer",
            });
        }

        let batch_delay_ms: u64 = match get("HEAT_RISK_BATCH_DELAY_MS") {
            Some(raw) => parse_value("HEAT_RISK_BATCH_DELAY_MS", raw, "a whole number of milliseconds")?,
            None => DEFAULT_BATCH_DELAY_MS,
        };

        Ok(Self {
            bind,
            port,
            nws: NwsConfig {
                base_url: get("NWS_BASE_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                user_agent: get("NWS_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                timeout_sec,
            },
            aggregator: AggregatorConfig {
                batch_size,
                batch_delay: Duration::from_millis(batch_delay_ms),
            },
            catalog_path: get("HEAT_RISK_CATALOG_PATH").map(PathBuf::from),
            subscriptions_path: get("SUBSCRIPTIONS_PATH").map(PathBuf::from),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

fn parse_value<T: FromStr>(
    key: &'static str,
    raw: String,
    expected: &'static str,
) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw,
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:18700");
        assert_eq!(config.nws.base_url, "https://api.weather.gov");
        assert_eq!(config.nws.timeout_sec, 10);
        assert_eq!(config.aggregator.batch_size, 10);
        assert_eq!(config.aggregator.batch_delay, Duration::from_millis(150));
        assert!(config.catalog_path.is_none());
        assert!(config.subscriptions_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("ALERT_GATEWAY_BIND", "127.0.0.1"),
            ("NWS_BASE_URL", "http://localhost:8080/"),
            ("HEAT_RISK_BATCH_SIZE", "4"),
            ("HEAT_RISK_BATCH_DELAY_MS", "0"),
            ("SUBSCRIPTIONS_PATH", "/tmp/subs.json"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.nws.base_url, "http://localhost:8080");
        assert_eq!(config.aggregator.batch_size, 4);
        assert!(config.aggregator.batch_delay.is_zero());
        assert_eq!(config.subscriptions_path, Some(PathBuf::from("/tmp/subs.json")));
    }

    #[test]
    fn test_gateway_port_wins_over_port() {
        let config = config_from(&[("ALERT_GATEWAY_PORT", "8100"), ("PORT", "9000")]).unwrap();
        assert_eq!(config.port, 8100);
    }

    #[test]
    fn test_malformed_values_rejected() {
        assert!(matches!(
            config_from(&[("NWS_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::Invalid { key: "NWS_TIMEOUT_SECS", .. })
        ));
        assert!(config_from(&[("HEAT_RISK_BATCH_SIZE", "0")]).is_err());
        assert!(config_from(&[("PORT", "70000")]).is_err());
    }

    #[test]
    fn test_blank_is_unset() {
        let config = config_from(&[("HEAT_RISK_CATALOG_PATH", "  ")]).unwrap();
        assert!(config.catalog_path.is_none());
    }
}
