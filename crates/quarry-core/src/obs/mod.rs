//! Observability: process-local counters and the event sink boundary.
//!
//! Builder, serializer and DML code never touch counters directly; they
//! emit `QueryEvent`s through `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

pub use metrics::{DialectCounters, EventOps, EventReport};
pub use sink::{
    EventSink, QueryEvent, StatementKind, metrics_report, metrics_reset_all, with_event_sink,
};
