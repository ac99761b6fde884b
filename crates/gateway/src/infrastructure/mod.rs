pub mod normalize;
pub mod rest_client;
pub mod ws_client;

pub use normalize::{normalize_rest_ticker, normalize_stream_ticker};
pub use rest_client::{RestClient, RestError};
pub use ws_client::{ConnectionPhase, ReconnectPolicy, StreamClient};
