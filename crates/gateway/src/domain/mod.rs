pub mod events;
pub mod handlers;

pub use events::{ConnectionEvent, WsRequest, is_ticker_frame, unwrap_stream_envelope};
pub use handlers::{EventHandlers, HandlerId};
