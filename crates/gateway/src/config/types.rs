use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infrastructure::ws_client::ReconnectPolicy;

/// Root configuration for the market data feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfigFile {
    /// REST API base URL
    pub rest_url: String,
    /// WebSocket base URL
    pub ws_url: String,
    /// Symbols to watch
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

/// REST polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Period of the wholesale snapshot refresh
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Transport-level timeout for each REST call
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        PollingConfig {
            poll_interval_ms: default_poll_interval(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl PollingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Stream reconnect configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        ReconnectConfig {
            base_delay_ms: default_base_delay(),
            max_delay_ms: default_max_delay(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl ReconnectConfig {
    /// Convert to the stream client's backoff policy
    pub fn to_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy::new(
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.max_delay_ms),
            self.max_attempts,
        )
    }
}

// Default value functions for serde
fn default_symbols() -> Vec<String> {
    pulse_core::DEFAULT_SYMBOLS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_poll_interval() -> u64 {
    30_000
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_base_delay() -> u64 {
    1_000
}

fn default_max_delay() -> u64 {
    30_000
}

fn default_max_attempts() -> u32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let json = r#"{
            "rest_url": "https://api.binance.com/api/v3",
            "ws_url": "wss://stream.binance.com:9443"
        }"#;

        let config: FeedConfigFile = serde_json::from_str(json).unwrap();
        assert_eq!(config.symbols.len(), 8);
        assert_eq!(config.polling.poll_interval_ms, 30_000);
        assert_eq!(config.polling.request_timeout_ms, 10_000);
        assert_eq!(config.reconnect.max_attempts, 5);
    }

    #[test]
    fn test_deserialize_overrides() {
        let json = r#"{
            "rest_url": "http://localhost:8080",
            "ws_url": "ws://localhost:8080",
            "symbols": ["BTCUSDT"],
            "polling": { "poll_interval_ms": 5000, "request_timeout_ms": 1000 },
            "reconnect": { "base_delay_ms": 50, "max_delay_ms": 200, "max_attempts": 2 }
        }"#;

        let config: FeedConfigFile = serde_json::from_str(json).unwrap();
        assert_eq!(config.symbols, vec!["BTCUSDT".to_string()]);
        assert_eq!(config.polling.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.reconnect.to_policy().max_attempts(), 2);
    }
}
