//! Pulse Core
//!
//! Shared domain types for the Pulse market data system: the canonical
//! [`Asset`] record, raw exchange event payloads, connection status, and the
//! symbol vocabulary. Everything here is plain data - no IO, no runtime.

mod asset;
mod error;
mod events;
mod status;
mod symbols;

pub use asset::Asset;
pub use error::SchemaError;
pub use events::{Ticker24hrEvent, TickerStreamEvent, TICKER_EVENT_TYPE};
pub use status::ConnectionStatus;
pub use symbols::{asset_name, DEFAULT_SYMBOLS, DEFAULT_WATCHLIST};
