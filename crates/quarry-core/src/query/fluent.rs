use crate::{
    config::Configuration,
    dml::StatementRunner,
    error::QueryError,
    exec::{ExecutorError, Row, StatementExecutor},
    expr::{Expr, Param, ParamMap, Path},
    obs::sink::StatementKind,
    query::{Condition, JoinType, OrderSpecifier, QueryMetadata, QueryMixin, QueryModifiers},
    serialize::{self, Fingerprint, SerializedQuery, SerializedStatement},
    template::PaginationStyle,
    value::Value,
};
use std::fmt;

///
/// Query
///
/// Consuming builder over a `QueryMixin`, bound to the configuration it
/// renders with. `Display` shows the dialect text with bound params
/// inlined.
///

#[derive(Clone, Debug)]
pub struct Query {
    mixin: QueryMixin,
    config: Configuration,
}

impl Query {
    #[must_use]
    pub fn new(config: &Configuration) -> Self {
        Self {
            mixin: QueryMixin::for_templates(config.templates()),
            config: config.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Sources and joins
    // ------------------------------------------------------------------

    #[must_use]
    pub fn from<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        self.mixin.from(sources);
        self
    }

    #[must_use]
    pub fn join(mut self, target: impl Into<Expr>) -> Self {
        self.mixin.join(target);
        self
    }

    #[must_use]
    pub fn inner_join(mut self, target: impl Into<Expr>) -> Self {
        self.mixin.inner_join(target);
        self
    }

    #[must_use]
    pub fn left_join(mut self, target: impl Into<Expr>) -> Self {
        self.mixin.left_join(target);
        self
    }

    #[must_use]
    pub fn right_join(mut self, target: impl Into<Expr>) -> Self {
        self.mixin.right_join(target);
        self
    }

    #[must_use]
    pub fn full_join(mut self, target: impl Into<Expr>) -> Self {
        self.mixin.full_join(target);
        self
    }

    pub fn join_on(
        mut self,
        join_type: JoinType,
        target: impl Into<Expr>,
        on: impl Into<Condition>,
    ) -> Result<Self, QueryError> {
        self.mixin.add_join(join_type, target, on)?;
        Ok(self)
    }

    #[must_use]
    pub fn inner_join_as(mut self, target: &Path, alias: &Path) -> Self {
        self.mixin.inner_join_as(target, alias);
        self
    }

    #[must_use]
    pub fn left_join_as(mut self, target: &Path, alias: &Path) -> Self {
        self.mixin.left_join_as(target, alias);
        self
    }

    /// AND-fold into the last join's condition.
    pub fn on<I>(mut self, conditions: I) -> Result<Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Condition>,
    {
        self.mixin.on(conditions)?;
        Ok(self)
    }

    pub fn with<I>(mut self, conditions: I) -> Result<Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Condition>,
    {
        self.mixin.with(conditions)?;
        Ok(self)
    }

    pub fn fetch(mut self) -> Result<Self, QueryError> {
        self.mixin.fetch()?;
        Ok(self)
    }

    pub fn fetch_all(mut self) -> Result<Self, QueryError> {
        self.mixin.fetch_all()?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Filters and shape
    // ------------------------------------------------------------------

    #[must_use]
    pub fn where_<I>(mut self, conditions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Condition>,
    {
        self.mixin.where_(conditions);
        self
    }

    #[must_use]
    pub fn having<I>(mut self, conditions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Condition>,
    {
        self.mixin.having(conditions);
        self
    }

    #[must_use]
    pub fn group_by<I>(mut self, exprs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        self.mixin.group_by(exprs);
        self
    }

    #[must_use]
    pub fn order_by(mut self, orders: impl IntoIterator<Item = OrderSpecifier>) -> Self {
        self.mixin.order_by(orders);
        self
    }

    #[must_use]
    pub fn select<I>(mut self, exprs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        self.mixin.add_projection(exprs);
        self
    }

    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.mixin.distinct();
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.mixin.unique();
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.mixin.limit(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.mixin.offset(offset);
        self
    }

    #[must_use]
    pub fn restrict(mut self, modifiers: QueryModifiers) -> Self {
        self.mixin.restrict(modifiers);
        self
    }

    #[must_use]
    pub fn bind(mut self, param: &Param, value: impl Into<Value>) -> Self {
        self.mixin.set(param, value);
        self
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn metadata(&self) -> &QueryMetadata {
        self.mixin.metadata()
    }

    #[must_use]
    pub fn into_metadata(self) -> QueryMetadata {
        self.mixin.into_metadata()
    }

    #[must_use]
    pub const fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn serialize(&self) -> Result<SerializedQuery, QueryError> {
        serialize::serialize(self.metadata(), &self.config)
    }

    pub fn serialize_count(&self) -> Result<SerializedQuery, QueryError> {
        serialize::serialize_count(self.metadata(), &self.config)
    }

    pub fn fingerprint(&self) -> Result<Fingerprint, QueryError> {
        Ok(self.serialize()?.fingerprint())
    }

    /// Execute the list form and return every row.
    pub fn list<E: StatementExecutor>(&self, executor: &E) -> Result<Vec<Row>, QueryError> {
        let query = self.serialize()?;
        let range = match self.config.templates().pagination() {
            PaginationStyle::External if query.modifiers().is_restricting() => {
                Some(query.modifiers())
            }
            _ => None,
        };

        let outcome = StatementRunner::new(&self.config).run(
            executor,
            &SerializedStatement::from_query(&query),
            &ParamMap::new(),
            range,
            StatementKind::Select,
        )?;

        Ok(outcome.into_rows())
    }

    /// Execute the count form; the first column of the first row is the
    /// count.
    pub fn count<E: StatementExecutor>(&self, executor: &E) -> Result<u64, QueryError> {
        let query = self.serialize_count()?;
        let outcome = StatementRunner::new(&self.config).run(
            executor,
            &SerializedStatement::from_query(&query),
            &ParamMap::new(),
            None,
            StatementKind::Count,
        )?;

        let rows = outcome.into_rows();
        match rows.first().and_then(|row| row.first()) {
            Some(Value::Uint(count)) => Ok(*count),
            Some(Value::Int(count)) => u64::try_from(*count).map_err(|_| {
                ExecutorError::Backend(format!("negative count {count}")).into()
            }),
            other => Err(ExecutorError::Backend(format!(
                "count query returned {other:?} instead of a number"
            ))
            .into()),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serialize::preview_query(self.metadata(), &self.config) {
            Ok(text) => f.write_str(&text),
            Err(err) => write!(f, "<unrenderable: {err}>"),
        }
    }
}
