use parking_lot::Mutex;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use pulse_core::Asset;

use super::events::ConnectionEvent;

/// Deregistration handle returned by `on_*` registration calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    entries: Vec<(HandlerId, Handler<T>)>,
}

impl<T> Registry<T> {
    fn new() -> Self {
        Registry {
            entries: Vec::new(),
        }
    }

    fn insert(&mut self, id: HandlerId, handler: Handler<T>) {
        self.entries.push((id, handler));
    }

    fn remove(&mut self, id: HandlerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Snapshot so handlers can register or deregister from inside a callback.
    fn snapshot(&self) -> Vec<(HandlerId, Handler<T>)> {
        self.entries.clone()
    }
}

/// Typed publish/subscribe registries for stream client events.
///
/// Handlers for one event run synchronously in registration order. A
/// panicking handler is caught and logged; the remaining handlers for that
/// event still run.
pub struct EventHandlers {
    next_id: AtomicU64,
    ticker: Mutex<Registry<Asset>>,
    connection: Mutex<Registry<ConnectionEvent>>,
    message: Mutex<Registry<Value>>,
}

impl Default for EventHandlers {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandlers {
    pub fn new() -> Self {
        EventHandlers {
            next_id: AtomicU64::new(1),
            ticker: Mutex::new(Registry::new()),
            connection: Mutex::new(Registry::new()),
            message: Mutex::new(Registry::new()),
        }
    }

    fn next_id(&self) -> HandlerId {
        HandlerId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Register a handler for normalized ticker events.
    pub fn on_ticker(&self, handler: impl Fn(&Asset) + Send + Sync + 'static) -> HandlerId {
        let id = self.next_id();
        self.ticker.lock().insert(id, Arc::new(handler));
        id
    }

    /// Register a handler for connection status events.
    pub fn on_connection(
        &self,
        handler: impl Fn(&ConnectionEvent) + Send + Sync + 'static,
    ) -> HandlerId {
        let id = self.next_id();
        self.connection.lock().insert(id, Arc::new(handler));
        id
    }

    /// Register a handler for every parsed inbound frame.
    pub fn on_message(&self, handler: impl Fn(&Value) + Send + Sync + 'static) -> HandlerId {
        let id = self.next_id();
        self.message.lock().insert(id, Arc::new(handler));
        id
    }

    /// Deregister a handler. Returns false if the id was already removed.
    pub fn off(&self, id: HandlerId) -> bool {
        self.ticker.lock().remove(id)
            || self.connection.lock().remove(id)
            || self.message.lock().remove(id)
    }

    /// Drop every registered handler.
    pub fn clear(&self) {
        self.ticker.lock().entries.clear();
        self.connection.lock().entries.clear();
        self.message.lock().entries.clear();
    }

    pub fn emit_ticker(&self, asset: &Asset) {
        emit(self.ticker.lock().snapshot(), asset, "ticker");
    }

    pub fn emit_connection(&self, event: &ConnectionEvent) {
        emit(self.connection.lock().snapshot(), event, "connection");
    }

    pub fn emit_message(&self, payload: &Value) {
        emit(self.message.lock().snapshot(), payload, "message");
    }
}

fn emit<T>(entries: Vec<(HandlerId, Handler<T>)>, event: &T, event_name: &str) {
    for (id, handler) in entries {
        if std::panic::catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
            tracing::error!(
                event = event_name,
                handler = id.0,
                "Event handler panicked, continuing with remaining handlers"
            );
        }
    }
}
