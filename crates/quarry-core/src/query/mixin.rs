use crate::{
    error::QueryError,
    expr::{Expr, Operator, Param, Path},
    obs::sink::{self, QueryEvent},
    query::{
        Condition, JoinExpression, JoinFlag, JoinType, OrderSpecifier, QueryMetadata,
        QueryModifiers, normalize::AnyJoins,
    },
    template::Templates,
    value::Value,
};

///
/// QueryMixin
///
/// Single-owner builder over one `QueryMetadata`. Conditions pass through
/// collection-any normalization (when enabled for the dialect) before they
/// are folded in.
///

#[derive(Clone, Debug, Default)]
pub struct QueryMixin {
    metadata: QueryMetadata,
    normalize_any: bool,
    any_counter: usize,
}

impl QueryMixin {
    #[must_use]
    pub fn new(normalize_any: bool) -> Self {
        Self {
            metadata: QueryMetadata::new(),
            normalize_any,
            any_counter: 0,
        }
    }

    /// Builder configured for the given dialect's normalization rules.
    #[must_use]
    pub fn for_templates(templates: &Templates) -> Self {
        Self::new(templates.collection_any_joins())
    }

    // ------------------------------------------------------------------
    // Sources and joins
    // ------------------------------------------------------------------

    /// Append DEFAULT sources in call order.
    pub fn from<I>(&mut self, sources: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        for source in sources {
            self.metadata
                .add_join(JoinExpression::new(JoinType::Default, source));
        }
        self
    }

    /// Append a join, normalizing its condition first. Joins the condition
    /// needs for collection-any paths are placed ahead of it.
    pub fn add_join(
        &mut self,
        join_type: JoinType,
        target: impl Into<Expr>,
        condition: impl Into<Condition>,
    ) -> Result<&mut Self, QueryError> {
        let mut join = JoinExpression::new(join_type, target);
        if let Some((condition, extra)) = self.join_condition(condition.into(), &join)? {
            for synthetic in extra {
                self.metadata.add_synthetic_join(synthetic);
            }
            join.add_condition(condition);
        }
        self.metadata.add_join(join);

        Ok(self)
    }

    fn push_join(&mut self, join_type: JoinType, target: impl Into<Expr>) -> &mut Self {
        self.metadata
            .add_join(JoinExpression::new(join_type, target));
        self
    }

    pub fn join(&mut self, target: impl Into<Expr>) -> &mut Self {
        self.push_join(JoinType::Join, target)
    }

    pub fn inner_join(&mut self, target: impl Into<Expr>) -> &mut Self {
        self.push_join(JoinType::InnerJoin, target)
    }

    pub fn left_join(&mut self, target: impl Into<Expr>) -> &mut Self {
        self.push_join(JoinType::LeftJoin, target)
    }

    pub fn right_join(&mut self, target: impl Into<Expr>) -> &mut Self {
        self.push_join(JoinType::RightJoin, target)
    }

    pub fn full_join(&mut self, target: impl Into<Expr>) -> &mut Self {
        self.push_join(JoinType::FullJoin, target)
    }

    pub fn join_on(
        &mut self,
        target: impl Into<Expr>,
        on: impl Into<Condition>,
    ) -> Result<&mut Self, QueryError> {
        self.add_join(JoinType::Join, target, on)
    }

    pub fn inner_join_on(
        &mut self,
        target: impl Into<Expr>,
        on: impl Into<Condition>,
    ) -> Result<&mut Self, QueryError> {
        self.add_join(JoinType::InnerJoin, target, on)
    }

    pub fn left_join_on(
        &mut self,
        target: impl Into<Expr>,
        on: impl Into<Condition>,
    ) -> Result<&mut Self, QueryError> {
        self.add_join(JoinType::LeftJoin, target, on)
    }

    pub fn right_join_on(
        &mut self,
        target: impl Into<Expr>,
        on: impl Into<Condition>,
    ) -> Result<&mut Self, QueryError> {
        self.add_join(JoinType::RightJoin, target, on)
    }

    pub fn full_join_on(
        &mut self,
        target: impl Into<Expr>,
        on: impl Into<Condition>,
    ) -> Result<&mut Self, QueryError> {
        self.add_join(JoinType::FullJoin, target, on)
    }

    /// Join a collection or reference path under an explicit alias.
    pub fn join_as(&mut self, join_type: JoinType, target: &Path, alias: &Path) -> &mut Self {
        self.push_join(join_type, Expr::alias(target, alias.clone()))
    }

    pub fn inner_join_as(&mut self, target: &Path, alias: &Path) -> &mut Self {
        self.join_as(JoinType::InnerJoin, target, alias)
    }

    pub fn left_join_as(&mut self, target: &Path, alias: &Path) -> &mut Self {
        self.join_as(JoinType::LeftJoin, target, alias)
    }

    /// AND-fold conditions into the current join. Joins introduced for
    /// collection-any paths are inserted ahead of it.
    pub fn on<I>(&mut self, conditions: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Condition>,
    {
        let Some(current) = self.metadata.current_join().cloned() else {
            return Err(QueryError::precondition("no joins given"));
        };

        for condition in conditions {
            let Some((condition, extra)) = self.join_condition(condition.into(), &current)? else {
                continue;
            };
            self.metadata.insert_before_current_join(extra)?;
            self.metadata.add_join_condition(condition)?;
        }

        Ok(self)
    }

    /// Same as `on`; the JPQL spelling.
    pub fn with<I>(&mut self, conditions: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Condition>,
    {
        self.on(conditions)
    }

    pub fn fetch(&mut self) -> Result<&mut Self, QueryError> {
        self.metadata.add_join_flag(JoinFlag::FETCH)?;

        Ok(self)
    }

    pub fn fetch_all(&mut self) -> Result<&mut Self, QueryError> {
        self.metadata
            .add_join_flag(JoinFlag::FETCH_ALL_PROPERTIES)?;

        Ok(self)
    }

    pub fn add_flag(&mut self, flag: JoinFlag) -> Result<&mut Self, QueryError> {
        self.metadata.add_join_flag(flag)?;

        Ok(self)
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    pub fn where_<I>(&mut self, conditions: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Condition>,
    {
        for condition in conditions {
            if let Some((predicate, extra)) = self.normalize(condition.into()) {
                for join in extra {
                    self.metadata.add_synthetic_join(join);
                }
                self.metadata.add_where(predicate);
            }
        }
        self
    }

    pub fn having<I>(&mut self, conditions: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Condition>,
    {
        for condition in conditions {
            if let Some((predicate, extra)) = self.normalize(condition.into()) {
                for join in extra {
                    self.metadata.add_synthetic_join(join);
                }
                self.metadata.add_having(predicate);
            }
        }
        self
    }

    // ------------------------------------------------------------------
    // Shape and pagination
    // ------------------------------------------------------------------

    pub fn group_by<I>(&mut self, exprs: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        for expr in exprs {
            self.metadata.add_group_by(expr.into());
        }
        self
    }

    pub fn order_by(&mut self, orders: impl IntoIterator<Item = OrderSpecifier>) -> &mut Self {
        for order in orders {
            self.metadata.add_order_by(order);
        }
        self
    }

    pub fn add_projection<I>(&mut self, exprs: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        for expr in exprs {
            self.metadata.add_projection(expr.into());
        }
        self
    }

    pub const fn distinct(&mut self) -> &mut Self {
        self.metadata.set_distinct(true);
        self
    }

    pub const fn unique(&mut self) -> &mut Self {
        self.metadata.set_unique(true);
        self
    }

    pub const fn limit(&mut self, limit: u64) -> &mut Self {
        self.metadata.set_limit(limit);
        self
    }

    pub const fn offset(&mut self, offset: u64) -> &mut Self {
        self.metadata.set_offset(offset);
        self
    }

    pub const fn restrict(&mut self, modifiers: QueryModifiers) -> &mut Self {
        self.metadata.set_modifiers(modifiers);
        self
    }

    /// Bind a runtime value for `param`.
    pub fn set(&mut self, param: &Param, value: impl Into<Value>) -> &mut Self {
        self.metadata.set_param(param, value);
        self
    }

    // ------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn metadata(&self) -> &QueryMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn into_metadata(self) -> QueryMetadata {
        self.metadata
    }

    // Unset conditions pass through untouched.
    fn normalize(&mut self, condition: Condition) -> Option<(Expr, Vec<JoinExpression>)> {
        let predicate = condition.into_expr()?;
        if !self.normalize_any {
            return Some((predicate, Vec::new()));
        }

        let mut any_joins = AnyJoins::new(&mut self.any_counter);
        let predicate = any_joins.rewrite(&predicate);
        let joins = any_joins.into_joins();

        if !joins.is_empty() {
            sink::record(QueryEvent::Normalized {
                joins_added: u64::try_from(joins.len()).unwrap_or(u64::MAX),
            });
        }

        Some((predicate, joins))
    }

    /// Normalize a condition bound for `join`. Synthetic joins must precede
    /// `join`, so any-paths under the variable `join` itself declares are
    /// rejected.
    fn join_condition(
        &mut self,
        condition: Condition,
        join: &JoinExpression,
    ) -> Result<Option<(Expr, Vec<JoinExpression>)>, QueryError> {
        let Some((condition, extra)) = self.normalize(condition) else {
            return Ok(None);
        };

        if let Some(variable) = declared_variable(join)
            && let Some(collection) = extra
                .iter()
                .filter_map(collection_of)
                .find(|collection| collection.root() == variable)
        {
            return Err(QueryError::precondition(format!(
                "collection any-path over '{}' in the condition of the join declaring '{}'",
                collection.dotted(),
                variable.name()
            )));
        }

        Ok(Some((condition, extra)))
    }
}

/// Variable a join brings into scope: an entity root or an explicit alias.
fn declared_variable(join: &JoinExpression) -> Option<&Path> {
    match join.target() {
        Expr::Path(path) if path.is_root() => Some(path),
        Expr::Operation(op) if op.op() == Operator::Alias => op.arg(1).and_then(Expr::as_path),
        _ => None,
    }
}

/// Collection path an alias join iterates.
fn collection_of(join: &JoinExpression) -> Option<&Path> {
    match join.target() {
        Expr::Operation(op) if op.op() == Operator::Alias => op.arg(0).and_then(Expr::as_path),
        _ => None,
    }
}
