//! Module: exec
//! Responsibility: narrow capabilities the core consumes from a backend
//! (statement preparation, value coercion, execution) and the scoped
//! statement guard.
//! Does not own: connections, transactions, or result mapping.
//! Boundary: the core never performs I/O itself; everything here is a trait
//! seam implemented outside the crate.


use crate::{expr::Path, query::QueryModifiers, value::Value};
use derive_more::Deref;
use thiserror::Error as ThisError;

///
/// CoercionError
///
/// Raised by a `TypeCoercion` implementation that cannot bind a value for
/// the target path's type.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum CoercionError {
    #[error("coercion rejected value at slot {slot}: {message}")]
    Rejected { slot: usize, message: String },

    #[error("cannot bind {value:?} to {target} at slot {slot}")]
    TypeMismatch {
        slot: usize,
        target: String,
        value: Value,
    },
}

///
/// ExecutorError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ExecutorError {
    #[error("statement backend failure: {0}")]
    Backend(String),

    #[error("statement already closed")]
    Closed,

    #[error("failed to prepare statement: {0}")]
    Prepare(String),
}

///
/// TypeCoercion
///
/// Binds one value for a path's semantic type starting at a 1-based slot
/// and reports how many positional slots it consumed.
///

pub trait TypeCoercion {
    fn bind(
        &mut self,
        slot: usize,
        path: Option<&Path>,
        value: &Value,
    ) -> Result<usize, CoercionError>;
}

///
/// Statement
///
/// Live prepared statement handle owned by the backend.
///

pub trait Statement: TypeCoercion {
    fn execute(&mut self) -> Result<ExecuteOutcome, ExecutorError>;

    fn close(&mut self) -> Result<(), ExecutorError>;

    /// Apply pagination on dialects that leave it to the statement handle.
    fn set_range(&mut self, _modifiers: &QueryModifiers) -> Result<(), ExecutorError> {
        Ok(())
    }
}

///
/// StatementExecutor
///

pub trait StatementExecutor {
    type Statement: Statement;

    fn prepare(&self, text: &str) -> Result<Self::Statement, ExecutorError>;
}

///
/// Row
///

#[derive(Clone, Debug, Default, Deref, PartialEq)]
pub struct Row(Vec<Value>);

impl Row {
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

///
/// ExecuteOutcome
///

#[derive(Clone, Debug, PartialEq)]
pub enum ExecuteOutcome {
    Rows(Vec<Row>),
    Affected(u64),
}

impl ExecuteOutcome {
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Self::Rows(rows) => rows,
            Self::Affected(_) => Vec::new(),
        }
    }

    /// Affected-row count; result sets report their row count.
    #[must_use]
    pub fn affected(&self) -> u64 {
        match self {
            Self::Rows(rows) => rows.len() as u64,
            Self::Affected(n) => *n,
        }
    }
}

///
/// ScopedStatement
///
/// Guard that closes the wrapped statement on every exit path. Call
/// `finish` to observe the close result; dropping closes silently.
///

pub struct ScopedStatement<S: Statement> {
    inner: S,
    closed: bool,
}

impl<S: Statement> ScopedStatement<S> {
    pub const fn new(statement: S) -> Self {
        Self {
            inner: statement,
            closed: false,
        }
    }

    /// Prepare `text` on `executor` and guard the resulting handle.
    pub fn prepare<E>(executor: &E, text: &str) -> Result<Self, ExecutorError>
    where
        E: StatementExecutor<Statement = S>,
    {
        executor.prepare(text).map(Self::new)
    }

    /// Close now, reporting any close failure.
    pub fn finish(mut self) -> Result<(), ExecutorError> {
        self.closed = true;
        self.inner.close()
    }
}

impl<S: Statement> std::ops::Deref for ScopedStatement<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.inner
    }
}

impl<S: Statement> std::ops::DerefMut for ScopedStatement<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.inner
    }
}

impl<S: Statement> Drop for ScopedStatement<S> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            let _ = self.inner.close();
        }
    }
}
