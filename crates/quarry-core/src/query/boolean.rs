use crate::expr::{Expr, Operator};

///
/// Condition
///
/// Explicit tri-state input for `where`/`having`/`on`: either a realized
/// predicate or nothing at all. `Unset` is skipped, never read as `true`.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Condition {
    #[default]
    Unset,
    Expr(Expr),
}

impl Condition {
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    #[must_use]
    pub const fn as_expr(&self) -> Option<&Expr> {
        match self {
            Self::Unset => None,
            Self::Expr(expr) => Some(expr),
        }
    }

    #[must_use]
    pub fn into_expr(self) -> Option<Expr> {
        match self {
            Self::Unset => None,
            Self::Expr(expr) => Some(expr),
        }
    }
}

impl From<Expr> for Condition {
    fn from(expr: Expr) -> Self {
        Self::Expr(expr)
    }
}

impl From<Option<Expr>> for Condition {
    fn from(expr: Option<Expr>) -> Self {
        expr.map_or(Self::Unset, Self::Expr)
    }
}

impl From<BooleanBuilder> for Condition {
    fn from(builder: BooleanBuilder) -> Self {
        builder.value.into()
    }
}

impl From<&BooleanBuilder> for Condition {
    fn from(builder: &BooleanBuilder) -> Self {
        builder.value.clone().into()
    }
}

///
/// BooleanBuilder
///
/// Left-associative AND/OR accumulator. Starts absent; the first realized
/// predicate becomes the value, later ones wrap it.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BooleanBuilder {
    value: Option<Expr>,
}

impl BooleanBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Builder seeded with `initial`.
    #[must_use]
    pub fn of(initial: impl Into<Condition>) -> Self {
        Self {
            value: initial.into().into_expr(),
        }
    }

    pub fn and(&mut self, predicate: impl Into<Condition>) -> &mut Self {
        self.combine(Operator::And, predicate.into());
        self
    }

    pub fn or(&mut self, predicate: impl Into<Condition>) -> &mut Self {
        self.combine(Operator::Or, predicate.into());
        self
    }

    /// AND the disjunction of `predicates`.
    pub fn and_any_of<I>(&mut self, predicates: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Condition>,
    {
        let mut any = Self::new();
        for predicate in predicates {
            any.or(predicate);
        }
        self.and(any)
    }

    /// OR the conjunction of `predicates`.
    pub fn or_all_of<I>(&mut self, predicates: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Condition>,
    {
        let mut all = Self::new();
        for predicate in predicates {
            all.and(predicate);
        }
        self.or(all)
    }

    /// Negate the current value; no-op while absent.
    #[expect(clippy::should_implement_trait)]
    pub fn not(&mut self) -> &mut Self {
        if let Some(current) = self.value.take() {
            self.value = Some(Expr::unary(Operator::Not, current));
        }
        self
    }

    #[must_use]
    pub const fn value(&self) -> Option<&Expr> {
        self.value.as_ref()
    }

    #[must_use]
    pub const fn has_value(&self) -> bool {
        self.value.is_some()
    }

    #[must_use]
    pub fn condition(&self) -> Condition {
        self.into()
    }

    fn combine(&mut self, op: Operator, predicate: Condition) {
        let Condition::Expr(predicate) = predicate else {
            return;
        };

        self.value = Some(match self.value.take() {
            Some(current) => Expr::binary(op, current, predicate),
            None => predicate,
        });
    }
}
