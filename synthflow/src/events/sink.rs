//! Event sink trait and implementations.

use super::RunEvent;
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info, Level};

/// Receives the events of a run.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Emits an event asynchronously.
    async fn emit(&self, event: RunEvent, data: Option<serde_json::Value>);

    /// Emits an event without awaiting.
    ///
    /// Must not fail; sinks log and drop what they cannot deliver.
    fn try_emit(&self, event: RunEvent, data: Option<serde_json::Value>);
}

/// Discards every event. The runner's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: RunEvent, _data: Option<serde_json::Value>) {}

    fn try_emit(&self, _event: RunEvent, _data: Option<serde_json::Value>) {}
}

/// Writes events to `tracing`.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a logging sink at `level`. Anything but `DEBUG` logs at info.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn log_event(&self, event: RunEvent, data: Option<&serde_json::Value>) {
        if self.level == Level::DEBUG {
            debug!(event_type = %event, event_data = ?data, "Event: {}", event);
        } else {
            info!(event_type = %event, event_data = ?data, "Event: {}", event);
        }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event: RunEvent, data: Option<serde_json::Value>) {
        self.log_event(event, data.as_ref());
    }

    fn try_emit(&self, event: RunEvent, data: Option<serde_json::Value>) {
        self.log_event(event, data.as_ref());
    }
}

/// Keeps every event in memory, for tests.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: RwLock<Vec<(RunEvent, Option<serde_json::Value>)>>,
}

impl CollectingEventSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<(RunEvent, Option<serde_json::Value>)> {
        self.events.read().clone()
    }

    /// Returns the collected event types, in order.
    #[must_use]
    pub fn event_types(&self) -> Vec<RunEvent> {
        self.events.read().iter().map(|(event, _)| *event).collect()
    }

    /// Returns the payloads of every `event`.
    #[must_use]
    pub fn payloads(&self, event: RunEvent) -> Vec<serde_json::Value> {
        self.events
            .read()
            .iter()
            .filter(|(e, _)| *e == event)
            .filter_map(|(_, data)| data.clone())
            .collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event: RunEvent, data: Option<serde_json::Value>) {
        self.events.write().push((event, data));
    }

    fn try_emit(&self, event: RunEvent, data: Option<serde_json::Value>) {
        self.events.write().push((event, data));
    }
}
