#![forbid(unsafe_code)]

//! Tracing span hierarchy and structured field checks for the layout passes.
//!
//! Verifies:
//! - `arrange` opens one span carrying the pane count and the `finalize` flag
//! - every `auto_position` span is a child of `arrange`
//! - a measure with fresh panes runs its provisional arrange under `measure`
//! - pane lifecycle events are structured and name the pane
//!
//! Run:
//!   cargo test -p dockweave-layout --test tracing_span_hierarchy

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dockweave_layout::{DockSnapshot, DockingPanel, FromRecords, PaneId, PaneProps, Point, Side, Size};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    fields: HashMap<String, String>,
    message: Option<String>,
    parent_span_name: Option<String>,
}

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

struct Captured {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

impl Captured {
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn spans_named(&self, name: &str) -> Vec<CapturedSpan> {
        self.spans
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.name == name)
            .cloned()
            .collect()
    }

    fn events_with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.message.as_deref() == Some(message))
            .collect()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.get("message").cloned();
        let parent_span_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields,
            message,
            parent_span_name,
        });
    }
}

fn with_captured<F: FnOnce()>(f: F) -> Captured {
    let events = Arc::new(Mutex::new(Vec::new()));
    let spans = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: events.clone(),
        spans: spans.clone(),
    };
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(layer);
    tracing::subscriber::with_default(subscriber, f);
    Captured { events, spans }
}

fn grid(panel: &mut DockingPanel) -> Vec<PaneId> {
    // a | b over c
    let a = panel.add_pane(PaneProps::new("a"));
    let b = panel.add_pane(PaneProps::new("b"));
    let c = panel.add_pane(PaneProps::new("c"));
    panel.insert_to_right_of(b, a).expect("insert");
    panel.insert_relative(c, a, Side::Bottom).expect("insert");
    vec![a, b, c]
}

// ============================================================================
// Span hierarchy
// ============================================================================

#[test]
fn arrange_span_carries_pass_fields() {
    let captured = with_captured(|| {
        let mut panel = DockingPanel::new();
        grid(&mut panel);
        panel.arrange(Size::new(300.0, 200.0));
    });

    let arranges = captured.spans_named("arrange");
    assert_eq!(arranges.len(), 1, "one arrange span per pass");
    let fields = &arranges[0].fields;
    assert_eq!(fields.get("panes").map(String::as_str), Some("3"));
    assert_eq!(fields.get("finalize").map(String::as_str), Some("true"));
    assert_eq!(arranges[0].parent_name, None);
}

#[test]
fn auto_position_spans_nest_under_arrange() {
    let captured = with_captured(|| {
        let mut panel = DockingPanel::new();
        grid(&mut panel);
        panel.arrange(Size::new(300.0, 200.0));
    });

    let positions = captured.spans_named("auto_position");
    assert!(!positions.is_empty());
    for span in &positions {
        assert_eq!(span.parent_name.as_deref(), Some("arrange"), "{span:?}");
        assert!(span.fields.contains_key("axis"));
        assert!(span.fields.contains_key("members"));
        assert!(span.fields.contains_key("total"));
    }
    let axes: Vec<&str> = positions.iter().filter_map(|s| s.fields.get("axis").map(String::as_str)).collect();
    assert!(axes.contains(&"Horizontal"));
    assert!(axes.contains(&"Vertical"));
}

#[test]
fn provisional_arrange_runs_inside_measure() {
    let captured = with_captured(|| {
        let mut panel = DockingPanel::new();
        grid(&mut panel);
        let mut host = |_: PaneId, _: Size| Size::new(40.0, 40.0);
        panel.measure(Size::new(300.0, 200.0), &mut host);
    });

    let measures = captured.spans_named("measure");
    assert_eq!(measures.len(), 1);
    let arranges = captured.spans_named("arrange");
    assert_eq!(arranges.len(), 1);
    assert_eq!(arranges[0].parent_name.as_deref(), Some("measure"));
    assert_eq!(arranges[0].fields.get("finalize").map(String::as_str), Some("false"));

    let provisional = captured.events_with_message("provisional arrange");
    assert_eq!(provisional.len(), 1);
    assert_eq!(provisional[0].parent_span_name.as_deref(), Some("measure"));
}

#[test]
fn empty_panel_arrange_opens_no_span() {
    let captured = with_captured(|| {
        let mut panel = DockingPanel::new();
        panel.arrange(Size::new(100.0, 100.0));
    });
    assert!(captured.spans_named("arrange").is_empty());
}

// ============================================================================
// Structured events
// ============================================================================

#[test]
fn pane_lifecycle_events_name_the_pane() {
    let captured = with_captured(|| {
        let mut panel = DockingPanel::new();
        let ids = grid(&mut panel);
        panel.collapse(ids[1], Side::Right).expect("collapse");
        panel.remove_pane(ids[2]).expect("remove");
    });

    for message in ["pane added", "pane removed", "collapse state changed"] {
        let events = captured.events_with_message(message);
        assert!(!events.is_empty(), "missing '{message}' event");
        for event in &events {
            assert_eq!(event.level, tracing::Level::DEBUG);
            assert!(
                event.fields.contains_key("pane"),
                "'{message}' lacks a pane field: {:?}",
                event.fields.keys().collect::<Vec<_>>()
            );
        }
    }
    assert_eq!(captured.events_with_message("pane added").len(), 3);
    let collapse = &captured.events_with_message("collapse state changed")[0];
    assert_eq!(collapse.fields.get("collapsed").map(String::as_str), Some("true"));
    assert_eq!(collapse.fields.get("pane").map(String::as_str), Some("P1"));
}

#[test]
fn splitter_events_record_delta() {
    let captured = with_captured(|| {
        let mut panel = DockingPanel::new();
        let ids = grid(&mut panel);
        panel.arrange(Size::new(400.0, 300.0));
        panel.splitter_moved(ids[0], Side::Right, 20.0).expect("move");
    });

    let moved = captured.events_with_message("splitter moved");
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].fields.get("delta").map(String::as_str), Some("20"));
    assert_eq!(moved[0].fields.get("side").map(String::as_str), Some("right"));
}

#[test]
fn restore_logs_size_change_only_when_area_differs() {
    let mut saved = DockingPanel::new();
    grid(&mut saved);
    saved.arrange(Size::new(300.0, 200.0));
    let snapshot = DockSnapshot::capture(&saved, Point::new(0.0, 0.0));

    for (area, expected) in [(Size::new(300.0, 200.0), 0), (Size::new(600.0, 200.0), 1)] {
        let captured = with_captured(|| {
            let mut panel = DockingPanel::new();
            snapshot.restore_into(&mut panel, &mut FromRecords).expect("restore");
            panel.arrange(area);
            panel.arrange(area);
        });
        let resized = captured.events_with_message("restored at a different size");
        assert_eq!(resized.len(), expected, "area {area:?}");
        for event in &resized {
            assert_eq!(event.parent_span_name.as_deref(), Some("arrange"));
            assert_eq!(event.fields.get("saved_width").map(String::as_str), Some("300"));
        }
    }
}

#[test]
fn no_warnings_for_consistent_layout() {
    let captured = with_captured(|| {
        let mut panel = DockingPanel::new();
        grid(&mut panel);
        panel.arrange(Size::new(300.0, 200.0));
        panel.arrange(Size::new(600.0, 400.0));
    });
    let warnings: Vec<_> = captured
        .events()
        .into_iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
}
