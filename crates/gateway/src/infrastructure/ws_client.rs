use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use pulse_core::TickerStreamEvent;

use crate::domain::events::{ConnectionEvent, WsRequest, is_ticker_frame, unwrap_stream_envelope};
use crate::domain::handlers::{EventHandlers, HandlerId};

use super::normalize;

/// Where the client currently is in its connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// No lifecycle running
    Idle,
    /// Dialing the endpoint
    Connecting,
    /// Socket established, frames flowing
    Open,
    /// Socket lost; a reconnect may be pending
    Closed,
}

/// Exponential backoff schedule for socket reconnects.
///
/// The attempt counter increments before each scheduled attempt and is
/// reset on every successful open.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    base_delay: Duration,
    max_delay: Duration,
    max_attempts: u32,
    attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ReconnectPolicy::new(Duration::from_millis(1000), Duration::from_secs(30), 5)
    }
}

impl ReconnectPolicy {
    pub fn new(base_delay: Duration, max_delay: Duration, max_attempts: u32) -> Self {
        ReconnectPolicy {
            base_delay,
            max_delay,
            max_attempts,
            attempts: 0,
        }
    }

    /// Delay before the next attempt, or None once attempts are exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= self.max_attempts {
            return None;
        }
        self.attempts += 1;
        let factor = 1u32.checked_shl(self.attempts).unwrap_or(u32::MAX);
        Some(self.base_delay.saturating_mul(factor).min(self.max_delay))
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// State shared between the client handle and its supervisor task.
struct Shared {
    phase: Mutex<ConnectionPhase>,
    should_reconnect: AtomicBool,
    outbound: Mutex<Option<mpsc::UnboundedSender<Message>>>,
    request_id: AtomicU64,
}

/// WebSocket client for the combined ticker stream.
///
/// Owns one persistent socket at a time and manages its whole lifecycle on
/// a single supervisor task: dial, read frames, and on loss reconnect with
/// capped exponential backoff. Running everything on one task also means a
/// socket error followed by a close can never schedule two reconnects.
pub struct StreamClient {
    url: String,
    policy: ReconnectPolicy,
    handlers: Arc<EventHandlers>,
    shared: Arc<Shared>,
    supervisor: Mutex<Option<JoinHandle<()>>>,
}

impl StreamClient {
    pub fn new(url: impl Into<String>, policy: ReconnectPolicy) -> Self {
        StreamClient {
            url: url.into(),
            policy,
            handlers: Arc::new(EventHandlers::new()),
            shared: Arc::new(Shared {
                phase: Mutex::new(ConnectionPhase::Idle),
                should_reconnect: AtomicBool::new(true),
                outbound: Mutex::new(None),
                request_id: AtomicU64::new(1),
            }),
            supervisor: Mutex::new(None),
        }
    }

    /// Open the stream for the given set of stream names.
    ///
    /// No-op while a lifecycle is already running (connecting, open, or
    /// waiting out a backoff). Must be called from within a tokio runtime.
    pub fn connect(&self, streams: Vec<String>) {
        let mut supervisor = self.supervisor.lock();
        if let Some(handle) = supervisor.as_ref()
            && !handle.is_finished()
        {
            tracing::debug!("connect() ignored, a connection lifecycle is already running");
            return;
        }

        self.shared.should_reconnect.store(true, Ordering::SeqCst);

        let url = format!("{}/stream?streams={}", self.url, streams.join("/"));
        let mut policy = self.policy.clone();
        policy.reset();

        *supervisor = Some(tokio::spawn(run_lifecycle(
            url,
            policy,
            Arc::clone(&self.shared),
            Arc::clone(&self.handlers),
        )));
    }

    /// Tear the connection down for good.
    ///
    /// Cancels any pending backoff, drops the socket, clears every
    /// registered handler, and returns the client to `Idle`. A later
    /// `connect()` starts a fresh lifecycle.
    pub fn disconnect(&self) {
        self.shared.should_reconnect.store(false, Ordering::SeqCst);

        if let Some(handle) = self.supervisor.lock().take() {
            handle.abort();
        }

        self.shared.outbound.lock().take();
        self.handlers.clear();
        *self.shared.phase.lock() = ConnectionPhase::Idle;
    }

    /// Send a SUBSCRIBE control frame. Dropped unless the stream is open.
    pub fn subscribe(&self, streams: Vec<String>) {
        self.send_request(WsRequest::subscribe(self.next_id(), streams));
    }

    /// Send an UNSUBSCRIBE control frame. Dropped unless the stream is open.
    pub fn unsubscribe(&self, streams: Vec<String>) {
        self.send_request(WsRequest::unsubscribe(self.next_id(), streams));
    }

    pub fn phase(&self) -> ConnectionPhase {
        *self.shared.phase.lock()
    }

    pub fn on_ticker(
        &self,
        handler: impl Fn(&pulse_core::Asset) + Send + Sync + 'static,
    ) -> HandlerId {
        self.handlers.on_ticker(handler)
    }

    pub fn on_connection(
        &self,
        handler: impl Fn(&ConnectionEvent) + Send + Sync + 'static,
    ) -> HandlerId {
        self.handlers.on_connection(handler)
    }

    pub fn on_message(
        &self,
        handler: impl Fn(&serde_json::Value) + Send + Sync + 'static,
    ) -> HandlerId {
        self.handlers.on_message(handler)
    }

    pub fn off(&self, id: HandlerId) -> bool {
        self.handlers.off(id)
    }

    fn next_id(&self) -> u64 {
        self.shared.request_id.fetch_add(1, Ordering::SeqCst)
    }

    fn send_request(&self, request: WsRequest) {
        if *self.shared.phase.lock() != ConnectionPhase::Open {
            tracing::debug!(?request, "Dropping control frame, stream is not open");
            return;
        }

        let json = match serde_json::to_string(&request) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize control frame");
                return;
            }
        };

        if let Some(tx) = self.shared.outbound.lock().as_ref()
            && tx.send(Message::Text(json.into())).is_err()
        {
            tracing::debug!("Dropping control frame, writer task is gone");
        }
    }
}

impl Drop for StreamClient {
    fn drop(&mut self) {
        if let Some(handle) = self.supervisor.lock().take() {
            handle.abort();
        }
    }
}

/// One connection lifecycle: dial, serve the session, back off, repeat.
async fn run_lifecycle(
    url: String,
    mut policy: ReconnectPolicy,
    shared: Arc<Shared>,
    handlers: Arc<EventHandlers>,
) {
    loop {
        *shared.phase.lock() = ConnectionPhase::Connecting;
        tracing::info!(url = %url, "Connecting to stream endpoint");

        match connect_async(&url).await {
            Ok((ws_stream, _)) => {
                policy.reset();
                *shared.phase.lock() = ConnectionPhase::Open;
                handlers.emit_connection(&ConnectionEvent::connected());

                run_session(ws_stream, &shared, &handlers).await;

                shared.outbound.lock().take();
                *shared.phase.lock() = ConnectionPhase::Closed;
                handlers.emit_connection(&ConnectionEvent::disconnected());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stream connection failed");
                *shared.phase.lock() = ConnectionPhase::Closed;
                handlers.emit_connection(&ConnectionEvent::error(e.to_string()));
            }
        }

        if !shared.should_reconnect.load(Ordering::SeqCst) {
            *shared.phase.lock() = ConnectionPhase::Idle;
            return;
        }

        match policy.next_delay() {
            Some(delay) => {
                tracing::info!(
                    attempt = policy.attempts(),
                    delay_ms = delay.as_millis() as u64,
                    "Reconnecting after backoff"
                );
                tokio::time::sleep(delay).await;
                if !shared.should_reconnect.load(Ordering::SeqCst) {
                    *shared.phase.lock() = ConnectionPhase::Idle;
                    return;
                }
            }
            None => {
                tracing::warn!(
                    max_attempts = policy.max_attempts(),
                    "Reconnect attempts exhausted, staying closed until connected manually"
                );
                return;
            }
        }
    }
}

/// Serve one open socket until it closes or errors.
async fn run_session(
    ws_stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    shared: &Arc<Shared>,
    handlers: &Arc<EventHandlers>,
) {
    let (mut write, mut read) = ws_stream.split();

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
    *shared.outbound.lock() = Some(out_tx);

    let writer = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            if let Err(e) = write.send(msg).await {
                tracing::warn!(error = %e, "Failed to send control frame");
                break;
            }
        }
    });

    while let Some(msg) = read.next().await {
        match msg {
            Ok(Message::Text(text)) => handle_frame(&text, handlers),
            Ok(Message::Close(frame)) => {
                tracing::info!(?frame, "Stream closed by peer");
                break;
            }
            Ok(Message::Ping(payload)) => {
                tracing::trace!(len = payload.len(), "Received ping");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Stream socket error");
                handlers.emit_connection(&ConnectionEvent::error(e.to_string()));
                break;
            }
        }
    }

    writer.abort();
}

/// Handle one inbound text frame. Malformed frames are logged and skipped;
/// they never terminate the connection.
fn handle_frame(text: &str, handlers: &EventHandlers) {
    let frame: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Dropping malformed stream frame");
            return;
        }
    };

    let payload = unwrap_stream_envelope(frame);

    if is_ticker_frame(&payload) {
        match serde_json::from_value::<TickerStreamEvent>(payload.clone()) {
            Ok(event) => match normalize::normalize_stream_ticker(&event) {
                Ok(asset) => handlers.emit_ticker(&asset),
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping ticker frame that failed normalization");
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Dropping ticker frame with unexpected shape");
            }
        }
    }

    handlers.emit_message(&payload);
}
