use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use pulse_core::{Asset, SchemaError, Ticker24hrEvent};
use pulse_ports::{FetchError, TickerFetcher};

use super::normalize;

#[derive(Error, Debug)]
pub enum RestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {code} - {msg}")]
    Api { code: i32, msg: String },
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convert infrastructure RestError to the port-level FetchError
impl From<RestError> for FetchError {
    fn from(err: RestError) -> Self {
        match err {
            RestError::Http(e) => FetchError::Network(e.to_string()),
            RestError::Api { code, msg } => FetchError::Api { code, message: msg },
            RestError::Schema(e) => FetchError::Schema(e.to_string()),
            RestError::Parse(msg) => FetchError::Schema(msg),
        }
    }
}

/// REST client for Binance-shaped ticker endpoints.
/// Infrastructure component - handles HTTP communication.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    /// Build a client with the request timeout applied at the transport
    /// layer, so every call is bounded without per-call plumbing.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RestError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(RestClient {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch and normalize the 24-hour ticker for a single symbol.
    pub async fn fetch_ticker(&self, symbol: &str) -> Result<Asset, RestError> {
        let path = format!("/ticker/24hr?symbol={}", symbol);
        let raw: Ticker24hrEvent = self.get(&path).await?;
        Ok(normalize::normalize_rest_ticker(&raw)?)
    }

    /// Fetch and normalize the 24-hour ticker for every given symbol in one
    /// call, preserving response order.
    pub async fn fetch_all(&self, symbols: &[String]) -> Result<Vec<Asset>, RestError> {
        let joined = symbols.join("\",\"");
        let path = format!("/ticker/24hr?symbols=[\"{}\"]", joined);
        let raw: Vec<Ticker24hrEvent> = self.get(&path).await?;
        raw.iter()
            .map(|ticker| normalize::normalize_rest_ticker(ticker).map_err(RestError::from))
            .collect()
    }

    /// Fetch kline close prices, oldest first, at most `limit` entries.
    pub async fn fetch_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<f64>, RestError> {
        let path = format!(
            "/klines?symbol={}&interval={}&limit={}",
            symbol, interval, limit
        );
        let rows: Vec<Value> = self.get(&path).await?;
        close_prices(&rows)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RestError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, RestError> {
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            if let Ok(err) = serde_json::from_str::<ApiError>(&text) {
                return Err(RestError::Api {
                    code: err.code,
                    msg: err.msg,
                });
            }
            return Err(RestError::Parse(format!("HTTP {}: {}", status, text)));
        }

        serde_json::from_str(&text).map_err(|e| RestError::Parse(e.to_string()))
    }
}

#[derive(Deserialize)]
struct ApiError {
    code: i32,
    msg: String,
}

/// Extract the close price (index 4, text-encoded) from each kline row.
fn close_prices(rows: &[Value]) -> Result<Vec<f64>, RestError> {
    rows.iter()
        .map(|row| {
            let close = row
                .get(4)
                .and_then(Value::as_str)
                .ok_or_else(|| RestError::Parse(format!("Kline row missing close price: {}", row)))?;
            Ok(normalize::parse_decimal("close", close)?)
        })
        .collect()
}

/// Implement TickerFetcher for RestClient (Dependency Inversion)
///
/// Converts infrastructure RestError to the port-level FetchError so the
/// coordinator never sees transport details.
#[async_trait]
impl TickerFetcher for RestClient {
    async fn fetch_all(&self, symbols: &[String]) -> Result<Vec<Asset>, FetchError> {
        RestClient::fetch_all(self, symbols)
            .await
            .map_err(FetchError::from)
    }
}
