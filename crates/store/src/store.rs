use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use pulse_core::{Asset, ConnectionStatus, DEFAULT_WATCHLIST};
use pulse_ports::AssetWriter;

struct StoreState {
    assets: HashMap<String, Asset>,
    watchlist: Vec<String>,
    is_loading: bool,
    error: Option<String>,
    last_updated: Option<DateTime<Utc>>,
    connection_status: ConnectionStatus,
    is_connected: bool,
}

impl StoreState {
    fn initial() -> Self {
        StoreState {
            assets: HashMap::new(),
            watchlist: DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect(),
            is_loading: false,
            error: None,
            last_updated: None,
            connection_status: ConnectionStatus::default(),
            is_connected: false,
        }
    }
}

/// Shared asset state, keyed by exchange-native symbol.
///
/// Every mutation takes the write lock once, so each field-group update is
/// atomic to readers; no partially applied write is ever observable.
pub struct AssetStore {
    state: RwLock<StoreState>,
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetStore {
    pub fn new() -> Self {
        AssetStore {
            state: RwLock::new(StoreState::initial()),
        }
    }

    /// Restore every field to its initial default.
    pub fn reset(&self) {
        *self.state.write() = StoreState::initial();
    }

    // Read side

    pub fn asset(&self, symbol: &str) -> Option<Asset> {
        self.state.read().assets.get(symbol).cloned()
    }

    /// Snapshot of every tracked asset, in no particular order.
    pub fn assets(&self) -> Vec<Asset> {
        self.state.read().assets.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().assets.is_empty()
    }

    pub fn watchlist(&self) -> Vec<String> {
        self.state.read().watchlist.clone()
    }

    /// Watchlist entries that have data, in watchlist order.
    pub fn watchlist_assets(&self) -> Vec<Asset> {
        let state = self.state.read();
        state
            .watchlist
            .iter()
            .filter_map(|symbol| state.assets.get(symbol).cloned())
            .collect()
    }

    /// The `n` best performers by 24h percent change, best first.
    pub fn top_gainers(&self, n: usize) -> Vec<Asset> {
        let mut assets = self.assets();
        assets.sort_by(|a, b| b.change_percent24h.total_cmp(&a.change_percent24h));
        assets.truncate(n);
        assets
    }

    /// The `n` worst performers by 24h percent change, worst first.
    pub fn top_losers(&self, n: usize) -> Vec<Asset> {
        let mut assets = self.assets();
        assets.sort_by(|a, b| a.change_percent24h.total_cmp(&b.change_percent24h));
        assets.truncate(n);
        assets
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.state.read().last_updated
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.state.read().connection_status
    }

    pub fn is_connected(&self) -> bool {
        self.state.read().is_connected
    }

    // Watchlist management

    /// Add a symbol to the watchlist. Idempotent, order-preserving.
    pub fn add_to_watchlist(&self, symbol: &str) {
        let mut state = self.state.write();
        if !state.watchlist.iter().any(|s| s == symbol) {
            state.watchlist.push(symbol.to_string());
        }
    }

    pub fn remove_from_watchlist(&self, symbol: &str) {
        self.state.write().watchlist.retain(|s| s != symbol);
    }
}

impl AssetWriter for AssetStore {
    fn set_assets(&self, assets: Vec<Asset>) {
        let map: HashMap<String, Asset> = assets
            .into_iter()
            .map(|asset| (asset.symbol.clone(), asset))
            .collect();

        let mut state = self.state.write();
        state.assets = map;
        state.last_updated = Some(Utc::now());
        state.error = None;
    }

    fn update_asset(&self, asset: Asset) {
        let mut state = self.state.write();
        state.assets.insert(asset.symbol.clone(), asset);
        state.last_updated = Some(Utc::now());
    }

    fn set_connection_status(&self, status: ConnectionStatus) {
        let mut state = self.state.write();
        state.connection_status = status;
        state.is_connected = status.is_connected();
    }

    fn set_loading(&self, loading: bool) {
        self.state.write().is_loading = loading;
    }

    fn set_error(&self, error: Option<String>) {
        let mut state = self.state.write();
        state.error = error;
        state.is_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn asset(symbol: &str, change_percent: f64) -> Asset {
        Asset {
            id: symbol.to_lowercase(),
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            price: 100.0,
            change24h: 1.0,
            change_percent24h: change_percent,
            volume24h: 10.0,
            high24h: 110.0,
            low24h: 90.0,
            last_updated: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            market_cap: None,
            sparkline: None,
        }
    }

    #[test]
    fn test_set_assets_replaces_the_whole_map() {
        let store = AssetStore::new();
        store.set_assets(vec![asset("BTCUSDT", 1.0), asset("ETHUSDT", 2.0)]);
        assert_eq!(store.len(), 2);

        // A symbol absent from the new list must be gone afterwards.
        store.set_assets(vec![asset("ETHUSDT", 3.0)]);
        assert_eq!(store.len(), 1);
        assert!(store.asset("BTCUSDT").is_none());
        assert_eq!(store.asset("ETHUSDT").unwrap().change_percent24h, 3.0);
    }

    #[test]
    fn test_set_assets_clears_error_and_stamps_time() {
        let store = AssetStore::new();
        store.set_error(Some("boom".to_string()));
        assert!(store.last_updated().is_none());

        store.set_assets(vec![asset("BTCUSDT", 1.0)]);
        assert_eq!(store.error(), None);
        assert!(store.last_updated().is_some());
    }

    #[test]
    fn test_update_asset_leaves_other_keys_untouched() {
        let store = AssetStore::new();
        store.set_assets(vec![asset("BTCUSDT", 1.0), asset("ETHUSDT", 2.0)]);
        let before = store.asset("BTCUSDT").unwrap();

        let mut updated = asset("ETHUSDT", -5.0);
        updated.price = 42.0;
        store.update_asset(updated);

        assert_eq!(store.asset("BTCUSDT").unwrap(), before);
        assert_eq!(store.asset("ETHUSDT").unwrap().price, 42.0);
    }

    #[test]
    fn test_update_asset_inserts_new_symbols() {
        let store = AssetStore::new();
        store.update_asset(asset("SOLUSDT", 4.0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_connection_status_updates_derived_flag_together() {
        let store = AssetStore::new();
        assert!(!store.is_connected());

        store.set_connection_status(ConnectionStatus::Connected);
        assert!(store.is_connected());
        assert_eq!(store.connection_status(), ConnectionStatus::Connected);

        store.set_connection_status(ConnectionStatus::Error);
        assert!(!store.is_connected());
    }

    #[test]
    fn test_set_error_ends_loading() {
        let store = AssetStore::new();
        store.set_loading(true);
        store.set_error(Some("fetch failed".to_string()));
        assert!(!store.is_loading());
        assert_eq!(store.error(), Some("fetch failed".to_string()));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let store = AssetStore::new();
        store.set_assets(vec![asset("BTCUSDT", 1.0)]);
        store.set_connection_status(ConnectionStatus::Connected);
        store.add_to_watchlist("SOLUSDT");
        store.set_loading(true);

        store.reset();
        assert!(store.is_empty());
        assert!(!store.is_connected());
        assert!(!store.is_loading());
        assert_eq!(store.watchlist().len(), DEFAULT_WATCHLIST.len());
    }

    #[test]
    fn test_watchlist_add_is_idempotent_and_ordered() {
        let store = AssetStore::new();
        store.add_to_watchlist("SOLUSDT");
        store.add_to_watchlist("SOLUSDT");

        let watchlist = store.watchlist();
        assert_eq!(watchlist.last().map(String::as_str), Some("SOLUSDT"));
        assert_eq!(
            watchlist.iter().filter(|s| *s == "SOLUSDT").count(),
            1
        );

        store.remove_from_watchlist("SOLUSDT");
        assert!(!store.watchlist().contains(&"SOLUSDT".to_string()));
    }

    #[test]
    fn test_watchlist_assets_skips_symbols_without_data() {
        let store = AssetStore::new();
        store.set_assets(vec![asset("ETHUSDT", 2.0)]);
        let assets = store.watchlist_assets();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].symbol, "ETHUSDT");
    }

    #[test]
    fn test_top_gainers_and_losers() {
        let store = AssetStore::new();
        store.set_assets(vec![
            asset("BTCUSDT", 0.5),
            asset("ETHUSDT", -2.15),
            asset("SOLUSDT", 7.3),
            asset("ADAUSDT", 1.1),
        ]);

        let gainers = store.top_gainers(2);
        assert_eq!(gainers[0].symbol, "SOLUSDT");
        assert_eq!(gainers[1].symbol, "ADAUSDT");

        let losers = store.top_losers(2);
        assert_eq!(losers[0].symbol, "ETHUSDT");
        assert_eq!(losers[1].symbol, "BTCUSDT");
    }
}
