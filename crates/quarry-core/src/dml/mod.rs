//! Module: dml
//! Responsibility: insert/update/delete clauses, positional parameter
//! binding, and the prepare/bind/execute/close sequence shared with
//! query execution.
//! Does not own: statement text (see `serialize`) or backend I/O (see `exec`).
//! Boundary: every prepared handle is released through `ScopedStatement`,
//! whatever step fails.

mod binding;
mod delete;
mod insert;
mod update;


pub use crate::serialize::Binding;
pub use binding::bind_parameters;
pub use delete::DeleteClause;
pub use insert::InsertClause;
pub use update::UpdateClause;

use crate::{
    config::Configuration,
    error::QueryError,
    exec::{ExecuteOutcome, ScopedStatement, Statement, StatementExecutor},
    expr::{ParamMap, Path},
    obs::sink::{self, QueryEvent, StatementKind},
    query::QueryModifiers,
    schema::EntityDescriptor,
    serialize::SerializedStatement,
};

/// Declared field path for `name`, or `UnknownField`.
fn resolve_field<'d>(descriptor: &'d EntityDescriptor, name: &str) -> Result<&'d Path, QueryError> {
    descriptor.get(name).ok_or_else(|| QueryError::UnknownField {
        entity: descriptor
            .root()
            .entity_name()
            .map_or_else(|| descriptor.root().dotted(), |entity| entity.simple_name().to_string()),
        field: name.to_string(),
    })
}

///
/// StatementRunner
///
/// Runs one serialized statement against an executor. Debug output is
/// scoped to the configuration that produced the statement.
///

pub(crate) struct StatementRunner {
    debug: bool,
}

impl StatementRunner {
    #[must_use]
    pub(crate) const fn new(config: &Configuration) -> Self {
        Self {
            debug: config.debug(),
        }
    }

    fn debug_log(&self, s: impl Into<String>) {
        if self.debug {
            println!("[debug] {}", s.into());
        }
    }

    /// Prepare, optionally apply an executor-side range, bind, execute and
    /// close. The handle is closed on every exit path.
    pub(crate) fn run<E: StatementExecutor>(
        &self,
        executor: &E,
        statement: &SerializedStatement,
        params: &ParamMap,
        range: Option<QueryModifiers>,
        kind: StatementKind,
    ) -> Result<ExecuteOutcome, QueryError> {
        let fingerprint = statement.fingerprint().short();
        self.debug_log(format!("{kind:?} [{fingerprint}] {}", statement.text()));

        let mut handle = ScopedStatement::prepare(executor, statement.text())?;
        if let Some(range) = range {
            handle.set_range(&range)?;
        }

        let slots = bind_parameters(&mut *handle, statement.bindings(), statement.paths(), params)?;
        let outcome = handle.execute()?;
        handle.finish()?;

        let rows = outcome.affected();
        sink::record(QueryEvent::Executed { kind, rows });
        self.debug_log(format!(
            "[{fingerprint}] bound {slots} slot(s), {rows} row(s)"
        ));

        Ok(outcome)
    }
}
