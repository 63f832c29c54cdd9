use crate::{
    config::Configuration,
    dml::{StatementRunner, resolve_field},
    error::QueryError,
    exec::StatementExecutor,
    expr::{Expr, Param, ParamMap, Path},
    obs::sink::StatementKind,
    schema::{EntityDescriptor, Populate},
    serialize::{self, SerializedStatement},
    value::Value,
};

///
/// InsertClause
///
/// Column list plus one row of values. `columns`/`values` and `set` may be
/// mixed; arity is checked when the statement is serialized.
///

#[derive(Clone, Debug)]
pub struct InsertClause {
    config: Configuration,
    entity: Path,
    columns: Vec<Path>,
    values: Vec<Expr>,
    params: ParamMap,
}

impl InsertClause {
    #[must_use]
    pub fn new(config: &Configuration, entity: &Path) -> Self {
        Self {
            config: config.clone(),
            entity: entity.clone(),
            columns: Vec::new(),
            values: Vec::new(),
            params: ParamMap::new(),
        }
    }

    pub fn columns<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Path>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn values<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    /// Append one column and its value together.
    pub fn set(&mut self, column: &Path, value: impl Into<Expr>) -> &mut Self {
        self.columns.push(column.clone());
        self.values.push(value.into());
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

    /// Bind a runtime value for a param used in `values`.
    pub fn bind(&mut self, param: &Param, value: impl Into<Value>) -> &mut Self {
        self.params.set(param, value);
        self
    }

    pub fn serialize(&self) -> Result<SerializedStatement, QueryError> {
        serialize::serialize_insert(
            &self.entity,
            &self.columns,
            &self.values,
            &self.params,
            &self.config,
        )
    }

    /// Run the insert, returning the affected-row count.
    pub fn execute<E: StatementExecutor>(&self, executor: &E) -> Result<u64, QueryError> {
        let statement = self.serialize()?;
        let outcome = StatementRunner::new(&self.config).run(
            executor,
            &statement,
            &self.params,
            None,
            StatementKind::Insert,
        )?;

        Ok(outcome.affected())
    }
}
