use pulse_core::{Asset, ConnectionStatus};

/// Trait for writing into the shared asset state.
///
/// The ingestion engine depends on this abstraction and never holds a
/// reference into the concrete store.
pub trait AssetWriter: Send + Sync {
    /// Replace the whole asset map atomically.
    fn set_assets(&self, assets: Vec<Asset>);

    /// Upsert a single asset, leaving every other entry untouched.
    fn update_asset(&self, asset: Asset);

    /// Record live socket health together with the derived connected flag.
    fn set_connection_status(&self, status: ConnectionStatus);

    fn set_loading(&self, loading: bool);

    /// Record or clear the most recent unrecovered failure.
    /// Setting an error also ends the loading state.
    fn set_error(&self, error: Option<String>);
}
