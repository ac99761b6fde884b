use async_trait::async_trait;
use thiserror::Error;

use pulse_core::Asset;

/// Domain error for ticker fetching operations.
///
/// Infrastructure implementations convert their specific errors to this
/// type so callers never see transport details.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network or communication failure, including timeouts
    #[error("Network error: {0}")]
    Network(String),

    /// The exchange returned an error response
    #[error("API error {code}: {message}")]
    Api { code: i32, message: String },

    /// The response body did not match the expected schema
    #[error("Schema error: {0}")]
    Schema(String),
}

/// Trait for fetching full ticker snapshots.
///
/// Only snapshot capability - kline history stays an inherent method on
/// the concrete client, since the ingestion loop never needs it.
#[async_trait]
pub trait TickerFetcher: Send + Sync {
    /// Fetch the 24-hour ticker for every watched symbol, in response order.
    async fn fetch_all(&self, symbols: &[String]) -> Result<Vec<Asset>, FetchError>;
}
