use crate::{
    error::QueryError,
    expr::{Expr, Operator, Param, ParamMap},
    query::{JoinExpression, JoinFlag, OrderSpecifier, QueryModifiers},
    value::Value,
};

///
/// QueryMetadata
///
/// Per-query aggregate of sources, filters, grouping, ordering, projection
/// and pagination. Every mutator appends or AND-folds; nothing removes a
/// join or clears a filter.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryMetadata {
    joins: Vec<JoinExpression>,
    // join that conditions and flags attach to; synthetic joins never take it
    current_join: Option<usize>,
    where_: Option<Expr>,
    having: Option<Expr>,
    group_by: Vec<Expr>,
    order_by: Vec<OrderSpecifier>,
    projection: Vec<Expr>,
    distinct: bool,
    unique: bool,
    modifiers: QueryModifiers,
    params: ParamMap,
}

impl QueryMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Append a join; it becomes the current join.
    pub fn add_join(&mut self, join: JoinExpression) {
        self.current_join = Some(self.joins.len());
        self.joins.push(join);
    }

    /// Append a join introduced by normalization. The current join is
    /// unchanged.
    pub fn add_synthetic_join(&mut self, join: JoinExpression) {
        self.joins.push(join);
    }

    /// Insert joins ahead of the current join, which stays current.
    pub fn insert_before_current_join(
        &mut self,
        joins: Vec<JoinExpression>,
    ) -> Result<(), QueryError> {
        let at = self
            .current_join
            .ok_or_else(|| QueryError::precondition("no joins given"))?;
        let count = joins.len();
        self.joins.splice(at..at, joins);
        self.current_join = Some(at + count);

        Ok(())
    }

    /// AND-fold a condition into the current join.
    pub fn add_join_condition(&mut self, condition: Expr) -> Result<(), QueryError> {
        self.current_join_mut()?.add_condition(condition);

        Ok(())
    }

    pub fn add_join_flag(&mut self, flag: JoinFlag) -> Result<(), QueryError> {
        self.current_join_mut()?.add_flag(flag);

        Ok(())
    }

    pub fn add_where(&mut self, predicate: Expr) {
        fold_and(&mut self.where_, predicate);
    }

    pub fn add_having(&mut self, predicate: Expr) {
        fold_and(&mut self.having, predicate);
    }

    pub fn add_group_by(&mut self, expr: Expr) {
        self.group_by.push(expr);
    }

    pub fn add_order_by(&mut self, order: OrderSpecifier) {
        self.order_by.push(order);
    }

    pub fn add_projection(&mut self, expr: Expr) {
        self.projection.push(expr);
    }

    pub const fn set_distinct(&mut self, distinct: bool) {
        self.distinct = distinct;
    }

    pub const fn set_unique(&mut self, unique: bool) {
        self.unique = unique;
    }

    pub const fn set_limit(&mut self, limit: u64) {
        self.modifiers = self.modifiers.with_limit(limit);
    }

    pub const fn set_offset(&mut self, offset: u64) {
        self.modifiers = self.modifiers.with_offset(offset);
    }

    pub const fn set_modifiers(&mut self, modifiers: QueryModifiers) {
        self.modifiers = modifiers;
    }

    pub fn set_param(&mut self, param: &Param, value: impl Into<Value>) {
        self.params.set(param, value);
    }

    fn current_join_mut(&mut self) -> Result<&mut JoinExpression, QueryError> {
        self.current_join
            .and_then(|at| self.joins.get_mut(at))
            .ok_or_else(|| QueryError::precondition("no joins given"))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn joins(&self) -> &[JoinExpression] {
        &self.joins
    }

    /// Most recent caller-added join.
    #[must_use]
    pub fn current_join(&self) -> Option<&JoinExpression> {
        self.current_join.and_then(|at| self.joins.get(at))
    }

    #[must_use]
    pub const fn where_clause(&self) -> Option<&Expr> {
        self.where_.as_ref()
    }

    #[must_use]
    pub const fn having(&self) -> Option<&Expr> {
        self.having.as_ref()
    }

    #[must_use]
    pub fn group_by(&self) -> &[Expr] {
        &self.group_by
    }

    #[must_use]
    pub fn order_by(&self) -> &[OrderSpecifier] {
        &self.order_by
    }

    #[must_use]
    pub fn projection(&self) -> &[Expr] {
        &self.projection
    }

    #[must_use]
    pub const fn is_distinct(&self) -> bool {
        self.distinct
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    #[must_use]
    pub const fn modifiers(&self) -> QueryModifiers {
        self.modifiers
    }

    #[must_use]
    pub const fn params(&self) -> &ParamMap {
        &self.params
    }
}

fn fold_and(slot: &mut Option<Expr>, predicate: Expr) {
    *slot = Some(match slot.take() {
        Some(existing) => Expr::binary(Operator::And, existing, predicate),
        None => predicate,
    });
}
