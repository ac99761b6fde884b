use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical market snapshot for one trading symbol.
///
/// Produced by normalizing either a REST 24-hour ticker or a streaming
/// ticker event; stored keyed by `symbol` and read by the presentation
/// layer, so the serialized form uses camelCase field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Lowercased symbol, e.g. "btcusdt"
    pub id: String,
    /// Exchange-native symbol, e.g. "BTCUSDT"
    pub symbol: String,
    /// Human-readable label, e.g. "Bitcoin"
    pub name: String,
    /// Last traded price
    pub price: f64,
    /// Absolute 24h price change
    pub change24h: f64,
    /// Relative 24h price change, in percent
    pub change_percent24h: f64,
    /// 24h traded base-asset volume
    pub volume24h: f64,
    /// 24h high
    pub high24h: f64,
    /// 24h low
    pub low24h: f64,
    /// Time of the underlying exchange event
    pub last_updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    /// Recent close prices, oldest first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparkline: Option<Vec<f64>>,
}

impl Asset {
    /// True when the asset gained over the last 24 hours.
    pub fn is_gaining(&self) -> bool {
        self.change_percent24h > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Asset {
        Asset {
            id: "btcusdt".to_string(),
            symbol: "BTCUSDT".to_string(),
            name: "Bitcoin".to_string(),
            price: 43250.50,
            change24h: 100.0,
            change_percent24h: 0.23,
            volume24h: 1000.0,
            high24h: 44000.0,
            low24h: 42000.0,
            last_updated: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            market_cap: None,
            sparkline: None,
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["changePercent24h"].as_f64().unwrap(), 0.23);
        assert_eq!(json["lastUpdated"].as_str().unwrap(), "2023-11-14T22:13:20Z");
        // Optional fields are omitted entirely when absent
        assert!(json.get("marketCap").is_none());
        assert!(json.get("sparkline").is_none());
    }

    #[test]
    fn test_is_gaining() {
        let mut asset = sample();
        assert!(asset.is_gaining());
        asset.change_percent24h = -2.15;
        assert!(!asset.is_gaining());
    }
}
