use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for builder, serializer and executor
/// activity on this thread.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub dialects: BTreeMap<String, DialectCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Builder
    pub normalize_calls: u64,
    pub synthetic_joins: u64,

    // Serializer
    pub queries_serialized: u64,
    pub statements_serialized: u64,
    pub params_emitted: u64,

    // Binding and execution
    pub slots_bound: u64,
    pub select_calls: u64,
    pub count_calls: u64,
    pub insert_calls: u64,
    pub update_calls: u64,
    pub delete_calls: u64,
    pub rows_returned: u64,
    pub rows_affected: u64,
}

///
/// DialectCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct DialectCounters {
    pub serialized: u64,
    pub params_emitted: u64,
}

///
/// EventReport
/// Point-in-time copy of the counters.
///

pub type EventReport = EventState;

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Snapshot the current counters.
#[must_use]
pub fn report() -> EventReport {
    with_state(Clone::clone)
}

/// Reset all counters (useful in tests).
pub fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}
