use serde::Serialize;
use serde_json::Value;

use pulse_core::{ConnectionStatus, TICKER_EVENT_TYPE};

/// Socket health change, delivered to `connection` handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionEvent {
    pub status: ConnectionStatus,
    /// Present on error events
    pub detail: Option<String>,
}

impl ConnectionEvent {
    pub fn connected() -> Self {
        ConnectionEvent {
            status: ConnectionStatus::Connected,
            detail: None,
        }
    }

    pub fn disconnected() -> Self {
        ConnectionEvent {
            status: ConnectionStatus::Disconnected,
            detail: None,
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        ConnectionEvent {
            status: ConnectionStatus::Error,
            detail: Some(detail.into()),
        }
    }
}

/// WebSocket control frames (Binance-compatible)
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", rename_all = "UPPERCASE")]
pub enum WsRequest {
    Subscribe { params: Vec<String>, id: u64 },
    Unsubscribe { params: Vec<String>, id: u64 },
}

impl WsRequest {
    pub fn subscribe(id: u64, streams: Vec<String>) -> Self {
        WsRequest::Subscribe {
            params: streams,
            id,
        }
    }

    pub fn unsubscribe(id: u64, streams: Vec<String>) -> Self {
        WsRequest::Unsubscribe {
            params: streams,
            id,
        }
    }
}

/// Unwrap a combined-stream envelope (`{"stream": ..., "data": ...}`),
/// returning the inner payload. Bare frames are returned as-is.
pub fn unwrap_stream_envelope(frame: Value) -> Value {
    match frame {
        Value::Object(mut map) if map.contains_key("stream") && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// True when the payload carries the 24-hour ticker discriminator.
pub fn is_ticker_frame(payload: &Value) -> bool {
    payload.get("e").and_then(Value::as_str) == Some(TICKER_EVENT_TYPE)
}
