//! Event sink boundary.
//!
//! Core logic MUST NOT depend on obs::metrics directly. All instrumentation
//! flows through `QueryEvent` and `EventSink`.

use crate::{obs::metrics, template::DialectId};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn EventSink>>> = RefCell::new(None);
}

///
/// StatementKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatementKind {
    Select,
    Count,
    Insert,
    Update,
    Delete,
}

///
/// QueryEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueryEvent {
    Normalized {
        joins_added: u64,
    },
    Serialized {
        dialect: DialectId,
        kind: StatementKind,
        params: u64,
    },
    Bound {
        slots: u64,
    },
    Executed {
        kind: StatementKind,
        rows: u64,
    },
}

///
/// EventSink
///

pub trait EventSink {
    fn record(&self, event: QueryEvent);
}

/// GlobalEventSink
/// Default sink writing into the thread-local counters. Used whenever no
/// scoped override is installed.

pub(crate) struct GlobalEventSink;

impl EventSink for GlobalEventSink {
    fn record(&self, event: QueryEvent) {
        match event {
            QueryEvent::Normalized { joins_added } => metrics::with_state_mut(|m| {
                m.ops.normalize_calls = m.ops.normalize_calls.saturating_add(1);
                m.ops.synthetic_joins = m.ops.synthetic_joins.saturating_add(joins_added);
            }),

            QueryEvent::Serialized {
                dialect,
                kind,
                params,
            } => metrics::with_state_mut(|m| {
                match kind {
                    StatementKind::Select | StatementKind::Count => {
                        m.ops.queries_serialized = m.ops.queries_serialized.saturating_add(1);
                    }
                    StatementKind::Insert | StatementKind::Update | StatementKind::Delete => {
                        m.ops.statements_serialized =
                            m.ops.statements_serialized.saturating_add(1);
                    }
                }
                m.ops.params_emitted = m.ops.params_emitted.saturating_add(params);

                let entry = m.dialects.entry(dialect.to_string()).or_default();
                entry.serialized = entry.serialized.saturating_add(1);
                entry.params_emitted = entry.params_emitted.saturating_add(params);
            }),

            QueryEvent::Bound { slots } => metrics::with_state_mut(|m| {
                m.ops.slots_bound = m.ops.slots_bound.saturating_add(slots);
            }),

            QueryEvent::Executed { kind, rows } => metrics::with_state_mut(|m| match kind {
                StatementKind::Select => {
                    m.ops.select_calls = m.ops.select_calls.saturating_add(1);
                    m.ops.rows_returned = m.ops.rows_returned.saturating_add(rows);
                }
                StatementKind::Count => {
                    m.ops.count_calls = m.ops.count_calls.saturating_add(1);
                }
                StatementKind::Insert => {
                    m.ops.insert_calls = m.ops.insert_calls.saturating_add(1);
                    m.ops.rows_affected = m.ops.rows_affected.saturating_add(rows);
                }
                StatementKind::Update => {
                    m.ops.update_calls = m.ops.update_calls.saturating_add(1);
                    m.ops.rows_affected = m.ops.rows_affected.saturating_add(rows);
                }
                StatementKind::Delete => {
                    m.ops.delete_calls = m.ops.delete_calls.saturating_add(1);
                    m.ops.rows_affected = m.ops.rows_affected.saturating_add(rows);
                }
            }),
        }
    }
}

pub(crate) const GLOBAL_EVENT_SINK: GlobalEventSink = GlobalEventSink;

pub(crate) fn record(event: QueryEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_EVENT_SINK.record(event),
    }
}

/// Snapshot the current counters.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary sink override.
pub fn with_event_sink<T>(sink: Rc<dyn EventSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn EventSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}
