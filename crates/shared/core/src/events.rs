use serde::{Deserialize, Serialize};

/// Event-type discriminator carried by streaming ticker frames.
pub const TICKER_EVENT_TYPE: &str = "24hrTicker";

/// Binance-style 24-hour rolling window ticker (REST).
///
/// All numeric fields arrive text-encoded and are parsed during
/// normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticker24hrEvent {
    pub symbol: String,
    #[serde(rename = "priceChange")]
    pub price_change: String,
    #[serde(rename = "priceChangePercent")]
    pub price_change_percent: String,
    #[serde(rename = "lastPrice")]
    pub last_price: String,
    pub volume: String,
    #[serde(rename = "highPrice")]
    pub high_price: String,
    #[serde(rename = "lowPrice")]
    pub low_price: String,
    #[serde(rename = "closeTime")]
    pub close_time: i64,
}

/// Binance-style streaming ticker event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerStreamEvent {
    #[serde(rename = "e")]
    pub event_type: String,
    #[serde(rename = "E")]
    pub event_time: i64,
    #[serde(rename = "s")]
    pub symbol: String,
    /// Close (last) price
    #[serde(rename = "c")]
    pub last_price: String,
    #[serde(rename = "o")]
    pub open_price: String,
    #[serde(rename = "h")]
    pub high_price: String,
    #[serde(rename = "l")]
    pub low_price: String,
    /// Base asset volume
    #[serde(rename = "v")]
    pub volume: String,
    /// Quote asset volume
    #[serde(rename = "q")]
    pub quote_volume: String,
    #[serde(rename = "P")]
    pub price_change_percent: String,
}
