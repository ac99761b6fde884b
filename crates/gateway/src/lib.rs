//! Pulse Gateway
//!
//! Market data ingestion engine: connects to a Binance-shaped exchange via
//! REST and WebSocket, normalizes ticker payloads into the canonical
//! [`Asset`](pulse_core::Asset) record, and feeds the shared asset store.
//!
//! ```text
//!                ┌──────────────┐
//!                │   Exchange   │
//!                └──┬────────┬──┘
//!        REST poll  │        │  combined ticker stream
//!                   ▼        ▼
//!           ┌────────────┐ ┌──────────────┐
//!           │ RestClient │ │ StreamClient │
//!           └─────┬──────┘ └──────┬───────┘
//!                 │   normalize   │
//!                 ▼               ▼
//!           ┌──────────────────────────┐
//!           │    IngestCoordinator     │
//!           └────────────┬─────────────┘
//!                        │ AssetWriter
//!                        ▼
//!                  ┌───────────┐
//!                  │   Store   │
//!                  └───────────┘
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export key types
pub use domain::events::{ConnectionEvent, WsRequest};
pub use domain::handlers::{EventHandlers, HandlerId};

pub use application::coordinator::{IngestConfig, IngestCoordinator};

pub use infrastructure::normalize::{normalize_rest_ticker, normalize_stream_ticker};
pub use infrastructure::rest_client::{RestClient, RestError};
pub use infrastructure::ws_client::{ConnectionPhase, ReconnectPolicy, StreamClient};

pub use config::{
    ConfigError, FeedConfigFile, load_config, load_config_from_str, load_default_config,
};
