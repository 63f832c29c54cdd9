use crate::{
    config::Configuration,
    dml::{StatementRunner, resolve_field},
    error::QueryError,
    exec::StatementExecutor,
    expr::{Expr, Param, ParamMap, Path},
    obs::sink::StatementKind,
    query::Condition,
    schema::{EntityDescriptor, Populate},
    serialize::{self, SerializedStatement},
    value::Value,
};

///
/// UpdateClause
///

#[derive(Clone, Debug)]
pub struct UpdateClause {
    config: Configuration,
    entity: Path,
    assignments: Vec<(Path, Expr)>,
    where_: Option<Expr>,
    params: ParamMap,
}

impl UpdateClause {
    #[must_use]
    pub fn new(config: &Configuration, entity: &Path) -> Self {
        Self {
            config: config.clone(),
            entity: entity.clone(),
            assignments: Vec::new(),
            where_: None,
            params: ParamMap::new(),
        }
    }

    /// Assign `value` to `column`. A later assignment to the same column
    /// replaces the earlier one.
    pub fn set(&mut self, column: &Path, value: impl Into<Expr>) -> &mut Self {
        let value = value.into();
        match self.assignments.iter_mut().find(|(path, _)| path == column) {
            Some((_, existing)) => *existing = value,
            None => self.assignments.push((column.clone(), value)),
        }
        self
    }

    /// Set every field of `row`; each name must be declared on `descriptor`.
    pub fn populate<R: Populate>(
        &mut self,
        descriptor: &EntityDescriptor,
        row: &R,
    ) -> Result<&mut Self, QueryError> {
        for (name, value) in row.field_values() {
            let column = resolve_field(descriptor, name)?.clone();
            self.set(&column, Expr::Constant(value));
        }

        Ok(self)
    }

    /// AND-fold conditions into the filter; unset conditions are skipped.
    pub fn where_<I>(&mut self, conditions: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Condition>,
    {
        for condition in conditions {
            if let Some(predicate) = condition.into().into_expr() {
                self.where_ = Some(match self.where_.take() {
                    Some(current) => current.and(predicate),
                    None => predicate,
                });
            }
        }
        self
    }

    pub fn bind(&mut self, param: &Param, value: impl Into<Value>) -> &mut Self {
        self.params.set(param, value);
        self
    }

    pub fn serialize(&self) -> Result<SerializedStatement, QueryError> {
        serialize::serialize_update(
            &self.entity,
            &self.assignments,
            self.where_.as_ref(),
            &self.params,
            &self.config,
        )
    }

    /// Run the update, returning the affected-row count.
    pub fn execute<E: StatementExecutor>(&self, executor: &E) -> Result<u64, QueryError> {
        let statement = self.serialize()?;
        let outcome = StatementRunner::new(&self.config).run(
            executor,
            &statement,
            &self.params,
            None,
            StatementKind::Update,
        )?;

        Ok(outcome.affected())
    }
}
