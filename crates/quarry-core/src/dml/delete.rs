use crate::{
    config::Configuration,
    dml::StatementRunner,
    error::QueryError,
    exec::StatementExecutor,
    expr::{Expr, Param, ParamMap, Path},
    obs::sink::StatementKind,
    query::Condition,
    serialize::{self, SerializedStatement},
    value::Value,
};

///
/// DeleteClause
///
/// Without a filter, deletes every row of the entity.
///

#[derive(Clone, Debug)]
pub struct DeleteClause {
    config: Configuration,
    entity: Path,
    where_: Option<Expr>,
    params: ParamMap,
}

impl DeleteClause {
    #[must_use]
    pub fn new(config: &Configuration, entity: &Path) -> Self {
        Self {
            config: config.clone(),
            entity: entity.clone(),
            where_: None,
            params: ParamMap::new(),
        }
    }

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
        serialize::serialize_delete(
            &self.entity,
            self.where_.as_ref(),
            &self.params,
            &self.config,
        )
    }

    pub fn execute<E: StatementExecutor>(&self, executor: &E) -> Result<u64, QueryError> {
        let statement = self.serialize()?;
        let outcome = StatementRunner::new(&self.config).run(
            executor,
            &statement,
            &self.params,
            None,
            StatementKind::Delete,
        )?;

        Ok(outcome.affected())
    }
}
