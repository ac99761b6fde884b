//! Pulse Runner
//!
//! Composition root for the market data feed: loads configuration, builds
//! the REST and stream clients, the shared store, and the coordinator that
//! wires them together.

mod bootstrap;

pub use bootstrap::{BootstrapError, FeedRuntime};
