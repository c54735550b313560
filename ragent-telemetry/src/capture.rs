//! In-memory capture of log events.
//!
//! [`EventCaptureLayer`] records every event it sees into a shared
//! [`CapturedEvents`] buffer so tests can assert on what a component logged.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, Registry};

/// A single recorded log event.
#[derive(Debug, Clone, Serialize)]
pub struct CapturedEvent {
    #[serde(serialize_with = "serialize_level")]
    pub level: Level,
    pub target: String,
    /// The formatted `message` field, empty if the event had none.
    pub message: String,
    /// All other fields, keyed by name.
    pub fields: HashMap<String, serde_json::Value>,
}

fn serialize_level<S: serde::Serializer>(level: &Level, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(level.as_str())
}

/// Shared storage for captured events.
#[derive(Debug, Clone, Default)]
pub struct CapturedEvents {
    events: Arc<RwLock<Vec<CapturedEvent>>>,
}

impl CapturedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything captured so far, in emission order.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.read().map(|events| events.clone()).unwrap_or_default()
    }

    /// Whether an event at `level` has a message containing `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.events
            .read()
            .map(|events| events.iter().any(|e| e.level == level && e.message.contains(needle)))
            .unwrap_or(false)
    }

    /// Number of captured events at `level`.
    pub fn count(&self, level: Level) -> usize {
        self.events
            .read()
            .map(|events| events.iter().filter(|e| e.level == level).count())
            .unwrap_or(0)
    }

    fn push(&self, event: CapturedEvent) {
        if let Ok(mut events) = self.events.write() {
            events.push(event);
        }
    }
}

/// A tracing layer that records events into [`CapturedEvents`].
pub struct EventCaptureLayer {
    storage: CapturedEvents,
}

impl EventCaptureLayer {
    pub fn new(storage: CapturedEvents) -> Self {
        Self { storage }
    }
}

impl<S> Layer<S> for EventCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);
        let mut fields = visitor.0;

        let message = match fields.remove("message") {
            Some(serde_json::Value::String(message)) => message,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        let metadata = event.metadata();
        self.storage.push(CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message,
            fields,
        });
    }
}

/// Build a subscriber that only captures events, plus a handle to read them.
///
/// Install it for the current thread with `tracing::subscriber::set_default`.
pub fn capture_subscriber() -> (impl Subscriber + Send + Sync, CapturedEvents) {
    let storage = CapturedEvents::new();
    let subscriber = Registry::default().with(EventCaptureLayer::new(storage.clone()));
    (subscriber, storage)
}

#[derive(Default)]
struct JsonVisitor(HashMap<String, serde_json::Value>);

impl tracing::field::Visit for JsonVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), serde_json::Value::String(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::Value::Bool(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_message_level_and_fields() {
        let (subscriber, captured) = capture_subscriber();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(collection = "facts", count = 2u64, "ingested documents");
            tracing::warn!("could not delete collection");
        });

        let events = captured.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "ingested documents");
        assert_eq!(events[0].fields["collection"], serde_json::json!("facts"));
        assert_eq!(events[0].fields["count"], serde_json::json!(2));
        assert!(captured.contains(Level::WARN, "could not delete"));
        assert_eq!(captured.count(Level::INFO), 1);
    }

    #[tokio::test]
    async fn captures_events_from_async_code_on_the_current_thread() {
        let (subscriber, captured) = capture_subscriber();
        let _guard = tracing::subscriber::set_default(subscriber);

        async { tracing::info!("inside async block") }.await;

        assert!(captured.contains(Level::INFO, "inside async block"));
    }
}
