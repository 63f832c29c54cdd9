use crate::expr::Expr;
use derive_more::Display;

///
/// Order
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Order {
    Asc,
    Desc,
}

///
/// NullHandling
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
pub enum NullHandling {
    #[default]
    Default,
    NullsFirst,
    NullsLast,
}

///
/// OrderSpecifier
///

#[derive(Clone, Debug, PartialEq)]
pub struct OrderSpecifier {
    target: Expr,
    order: Order,
    nulls: NullHandling,
}

impl OrderSpecifier {
    #[must_use]
    pub fn new(target: impl Into<Expr>, order: Order) -> Self {
        Self {
            target: target.into(),
            order,
            nulls: NullHandling::Default,
        }
    }

    #[must_use]
    pub fn asc(target: impl Into<Expr>) -> Self {
        Self::new(target, Order::Asc)
    }

    #[must_use]
    pub fn desc(target: impl Into<Expr>) -> Self {
        Self::new(target, Order::Desc)
    }

    #[must_use]
    pub const fn nulls_first(mut self) -> Self {
        self.nulls = NullHandling::NullsFirst;
        self
    }

    #[must_use]
    pub const fn nulls_last(mut self) -> Self {
        self.nulls = NullHandling::NullsLast;
        self
    }

    #[must_use]
    pub const fn target(&self) -> &Expr {
        &self.target
    }

    #[must_use]
    pub const fn order(&self) -> Order {
        self.order
    }

    #[must_use]
    pub const fn nulls(&self) -> NullHandling {
        self.nulls
    }
}
