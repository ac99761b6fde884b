use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use pulse_gateway::{
    ConfigError, FeedConfigFile, IngestConfig, IngestCoordinator, RestClient, RestError,
    StreamClient, load_config, load_default_config,
};
use pulse_store::AssetStore;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("REST client error: {0}")]
    Rest(#[from] RestError),
}

/// The assembled market data feed.
///
/// Owns the store and the coordinator; `start` brings the feed up and
/// `shutdown` tears both client lifecycles down.
pub struct FeedRuntime {
    store: Arc<AssetStore>,
    coordinator: IngestCoordinator<RestClient, AssetStore>,
}

impl FeedRuntime {
    /// Build the feed from the embedded default configuration.
    pub fn new() -> Result<Self, BootstrapError> {
        Self::with_config(load_default_config()?)
    }

    /// Build the feed from a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BootstrapError> {
        Self::with_config(load_config(path)?)
    }

    /// Build the feed from an already-loaded configuration.
    pub fn with_config(config: FeedConfigFile) -> Result<Self, BootstrapError> {
        config.validate()?;

        let store = Arc::new(AssetStore::new());
        let fetcher = Arc::new(RestClient::new(
            config.rest_url.clone(),
            config.polling.request_timeout(),
        )?);
        let stream = Arc::new(StreamClient::new(
            config.ws_url.clone(),
            config.reconnect.to_policy(),
        ));

        let coordinator = IngestCoordinator::new(
            IngestConfig {
                symbols: config.symbols.clone(),
                poll_interval: config.polling.poll_interval(),
            },
            fetcher,
            Arc::clone(&store),
            stream,
        );

        Ok(FeedRuntime { store, coordinator })
    }

    /// The shared read model. Presentation code only ever reads this.
    pub fn store(&self) -> &Arc<AssetStore> {
        &self.store
    }

    pub async fn start(&self) {
        self.coordinator.start().await;
    }

    pub fn shutdown(&self) {
        self.coordinator.shutdown();
    }
}
