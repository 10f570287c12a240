//! In-memory event capture for log assertions in tests

use flatstate_core_types::schema::{FIELD_EVENT, FIELD_OP};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event, every field rendered as a string
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

#[derive(Default)]
struct Fields(HashMap<String, String>);

impl Visit for Fields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

struct CaptureLayer(Arc<Mutex<Vec<CapturedEvent>>>);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);
        let fields = fields.0;
        let captured = CapturedEvent {
            level: *event.metadata().level(),
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            fields,
        };
        if let Ok(mut events) = self.0.lock() {
            events.push(captured);
        }
    }
}

/// Shared handle onto every event captured in this process
#[derive(Clone)]
pub struct TestCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events for one operation and event name whose `field` equals `value`
    pub fn events_where(
        &self,
        op: &str,
        event: &str,
        field: &str,
        value: &str,
    ) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| {
                e.op.as_deref() == Some(op)
                    && e.event.as_deref() == Some(event)
                    && e.fields.get(field).map(String::as_str) == Some(value)
            })
            .collect()
    }

    /// # Panics
    ///
    /// Panics if no event with this operation and event name was captured
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events
                .iter()
                .any(|e| e.op.as_deref() == Some(op) && e.event.as_deref() == Some(event)),
            "Expected event op={} event={} not found in {} captured events",
            op,
            event,
            events.len()
        );
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber on first use
///
/// Every test in a binary shares the same capture, so assertions should
/// filter on an operation or field value unique to the test.
///
/// ```
/// use flatstate_core::logging_facility::test_capture::init_test_capture;
/// use flatstate_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_op");
/// capture.assert_event_exists("doc_op", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let events = Arc::new(Mutex::new(Vec::new()));
            tracing_subscriber::registry()
                .with(CaptureLayer(events.clone()))
                .init();
            TestCapture { events }
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_and_numbers_render_as_text() {
        let capture = init_test_capture();
        tracing::info!(op = "capture_render_unique", event = "end", exists = true, n = 3u64);

        let found = capture.events_where("capture_render_unique", "end", "exists", "true");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].fields.get("n").map(String::as_str), Some("3"));
        assert_eq!(found[0].level, Level::INFO);
    }
}
