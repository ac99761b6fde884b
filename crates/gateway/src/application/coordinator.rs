use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;

use pulse_core::ConnectionStatus;
use pulse_ports::{AssetWriter, TickerFetcher};

use crate::domain::handlers::HandlerId;
use crate::infrastructure::ws_client::StreamClient;

/// Ingestion settings owned by the coordinator.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Watched symbols, exchange-native form
    pub symbols: Vec<String>,
    /// Period of the wholesale REST refresh
    pub poll_interval: Duration,
}

struct CoordinatorState {
    poll_task: Option<JoinHandle<()>>,
    handler_ids: Vec<HandlerId>,
}

/// Wires the REST client and the stream client to the asset store and owns
/// both lifecycles.
///
/// Application layer - orchestrates the ingestion path using infrastructure.
///
/// Generic over:
/// - `F`: TickerFetcher - for the snapshot and polling path
/// - `S`: AssetWriter - for writing into shared state
pub struct IngestCoordinator<F, S>
where
    F: TickerFetcher + 'static,
    S: AssetWriter + 'static,
{
    config: IngestConfig,
    fetcher: Arc<F>,
    store: Arc<S>,
    stream: Arc<StreamClient>,
    state: Mutex<CoordinatorState>,
}

impl<F, S> IngestCoordinator<F, S>
where
    F: TickerFetcher + 'static,
    S: AssetWriter + 'static,
{
    pub fn new(
        config: IngestConfig,
        fetcher: Arc<F>,
        store: Arc<S>,
        stream: Arc<StreamClient>,
    ) -> Self {
        IngestCoordinator {
            config,
            fetcher,
            store,
            stream,
            state: Mutex::new(CoordinatorState {
                poll_task: None,
                handler_ids: Vec::new(),
            }),
        }
    }

    /// Populate the store, open the stream, and start the poll loop.
    ///
    /// The REST and stream lifecycles are independent: a failed initial
    /// fetch is surfaced to the store, and the stream is opened regardless.
    pub async fn start(&self) {
        if self.state.lock().poll_task.is_some() {
            tracing::debug!("start() ignored, coordinator is already running");
            return;
        }

        self.store.set_loading(true);

        match self.fetcher.fetch_all(&self.config.symbols).await {
            Ok(assets) => {
                tracing::info!(count = assets.len(), "Initial ticker snapshot loaded");
                self.store.set_assets(assets);
                self.store.set_connection_status(ConnectionStatus::Connected);
                self.store.set_loading(false);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Initial ticker snapshot failed");
                self.store
                    .set_connection_status(ConnectionStatus::Disconnected);
                self.store.set_error(Some(e.to_string()));
            }
        }

        let handler_ids = vec![
            {
                let store = Arc::clone(&self.store);
                self.stream
                    .on_ticker(move |asset| store.update_asset(asset.clone()))
            },
            {
                let store = Arc::clone(&self.store);
                self.stream
                    .on_connection(move |event| store.set_connection_status(event.status))
            },
        ];

        let streams: Vec<String> = self
            .config
            .symbols
            .iter()
            .map(|s| format!("{}@ticker", s.to_lowercase()))
            .collect();
        self.stream.connect(streams);

        let fetcher = Arc::clone(&self.fetcher);
        let store = Arc::clone(&self.store);
        let symbols = self.config.symbols.clone();
        let poll_interval = self.config.poll_interval;
        let poll_task = tokio::spawn(async move {
            let mut ticker = interval(poll_interval);
            // The first tick fires immediately; the initial fetch already ran.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match fetcher.fetch_all(&symbols).await {
                    Ok(assets) => {
                        tracing::debug!(count = assets.len(), "Poll refreshed asset snapshot");
                        store.set_assets(assets);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Poll failed, keeping previous assets");
                        store.set_error(Some(e.to_string()));
                    }
                }
            }
        });

        let mut state = self.state.lock();
        state.poll_task = Some(poll_task);
        state.handler_ids = handler_ids;
    }

    /// Deregister handlers, stop polling, and close the stream.
    ///
    /// Safe to call more than once, and even if `start` never ran.
    pub fn shutdown(&self) {
        let (poll_task, handler_ids) = {
            let mut state = self.state.lock();
            (
                state.poll_task.take(),
                std::mem::take(&mut state.handler_ids),
            )
        };

        for id in handler_ids {
            self.stream.off(id);
        }
        if let Some(task) = poll_task {
            task.abort();
        }
        self.stream.disconnect();
    }
}

impl<F, S> Drop for IngestCoordinator<F, S>
where
    F: TickerFetcher + 'static,
    S: AssetWriter + 'static,
{
    fn drop(&mut self) {
        if let Some(task) = self.state.lock().poll_task.take() {
            task.abort();
        }
    }
}
