//! Module: expr
//! Responsibility: immutable, typed expression AST (paths, operations,
//! constants, params, custom fragments, sub-queries).
//! Does not own: rendering (see `serialize`) or builder normalization.
//! Boundary: nodes are never mutated after construction and are shared by `Arc`.

mod dsl;
mod ops;
mod param;
mod path;

#[cfg(test)]
mod tests;

pub use dsl::exists;
pub use ops::Operator;
pub use param::{Param, ParamId, ParamMap};
pub use path::{ANY_ELEMENT, Path, PathKind};

use crate::{
    error::QueryError,
    query::QueryMetadata,
    template::{DialectId, Template},
    value::{Value, ValueType},
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::{fmt, sync::Arc};

///
/// Expr
///
/// Closed set of expression node kinds. A predicate is an `Expr` whose
/// value type is `Bool`.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Path(Path),
    Operation(Operation),
    Constant(Value),
    Param(Param),
    Custom(Custom),
    SubQuery(Arc<QueryMetadata>),
}

impl Expr {
    /// Build an operation, checking the operator's arity.
    pub fn operation(op: Operator, args: Vec<Self>) -> Result<Self, QueryError> {
        if args.len() != op.arity() {
            return Err(QueryError::OperatorArity {
                op,
                expected: op.arity(),
                actual: args.len(),
            });
        }

        Ok(Self::Operation(Operation {
            op,
            args: args.into(),
        }))
    }

    // Arity is fixed by the caller's signature.
    pub(crate) fn unary(op: Operator, arg: Self) -> Self {
        debug_assert_eq!(op.arity(), 1);
        Self::Operation(Operation {
            op,
            args: Arc::new([arg]),
        })
    }

    pub(crate) fn binary(op: Operator, lhs: Self, rhs: Self) -> Self {
        debug_assert_eq!(op.arity(), 2);
        Self::Operation(Operation {
            op,
            args: Arc::new([lhs, rhs]),
        })
    }

    pub(crate) fn ternary(op: Operator, a: Self, b: Self, c: Self) -> Self {
        debug_assert_eq!(op.arity(), 3);
        Self::Operation(Operation {
            op,
            args: Arc::new([a, b, c]),
        })
    }

    #[must_use]
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    #[must_use]
    pub const fn param(param: Param) -> Self {
        Self::Param(param)
    }

    /// Raw template fragment with `{n}` argument slots.
    #[must_use]
    pub fn custom(pattern: &str, args: Vec<Self>, ty: ValueType) -> Self {
        Self::Custom(Custom::new(Template::new(pattern), args, ty))
    }

    #[must_use]
    pub fn sub_query(metadata: QueryMetadata) -> Self {
        Self::SubQuery(Arc::new(metadata))
    }

    /// `target AS alias`, used for join targets.
    #[must_use]
    pub fn alias(target: impl Into<Self>, alias: Path) -> Self {
        Self::binary(Operator::Alias, target.into(), Self::Path(alias))
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Path(path) => path.value_type().clone(),
            Self::Operation(op) => op.value_type(),
            Self::Constant(value) => value.value_type(),
            Self::Param(param) => param.value_type().clone(),
            Self::Custom(custom) => custom.ty.clone(),
            Self::SubQuery(metadata) => metadata
                .projection()
                .first()
                .map_or(ValueType::Any, Self::value_type),
        }
    }

    #[must_use]
    pub fn is_predicate(&self) -> bool {
        self.value_type() == ValueType::Bool
    }

    /// Nodes that never need grouping parentheses.
    #[must_use]
    pub const fn is_atomic(&self) -> bool {
        matches!(
            self,
            Self::Path(_) | Self::Constant(_) | Self::Param(_) | Self::SubQuery(_)
        )
    }

    #[must_use]
    pub const fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_operation(&self) -> Option<&Operation> {
        match self {
            Self::Operation(op) => Some(op),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = crate::serialize::preview_expr(self).map_err(|_| fmt::Error)?;

        f.write_str(&text)
    }
}

///
/// Operation
///

#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    op: Operator,
    args: Arc<[Expr]>,
}

impl Operation {
    #[must_use]
    pub const fn op(&self) -> Operator {
        self.op
    }

    #[must_use]
    pub fn args(&self) -> &[Expr] {
        &self.args
    }

    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&Expr> {
        self.args.get(index)
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        let first = self.args.first().map_or(ValueType::Any, Expr::value_type);

        self.op.result_type(&first)
    }

    /// Same operator over new arguments of the same count.
    pub(crate) fn with_args(&self, args: Vec<Expr>) -> Self {
        debug_assert_eq!(args.len(), self.args.len());
        Self {
            op: self.op,
            args: args.into(),
        }
    }
}

///
/// Custom
///
/// Dialect escape hatch. An optional dialect list restricts where the
/// fragment may be rendered.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Custom {
    template: Template,
    args: Arc<[Expr]>,
    dialects: Option<Arc<[DialectId]>>,
    ty: ValueType,
}

impl Custom {
    #[must_use]
    pub fn new(template: Template, args: Vec<Expr>, ty: ValueType) -> Self {
        Self {
            template,
            args: args.into(),
            dialects: None,
            ty,
        }
    }

    /// Restrict rendering to the given dialects.
    #[must_use]
    pub fn only_for(mut self, dialects: &[DialectId]) -> Self {
        self.dialects = Some(dialects.into());
        self
    }

    #[must_use]
    pub const fn template(&self) -> &Template {
        &self.template
    }

    #[must_use]
    pub fn args(&self) -> &[Expr] {
        &self.args
    }

    #[must_use]
    pub fn supports(&self, dialect: DialectId) -> bool {
        self.dialects
            .as_ref()
            .is_none_or(|allowed| allowed.contains(&dialect))
    }

    pub(crate) fn with_args(&self, args: Vec<Expr>) -> Self {
        Self {
            template: self.template.clone(),
            args: args.into(),
            dialects: self.dialects.clone(),
            ty: self.ty.clone(),
        }
    }
}

impl From<Custom> for Expr {
    fn from(custom: Custom) -> Self {
        Self::Custom(custom)
    }
}

// ----------------------------------------------------------------------
// Conversions
// ----------------------------------------------------------------------

impl From<Path> for Expr {
    fn from(path: Path) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for Expr {
    fn from(path: &Path) -> Self {
        Self::Path(path.clone())
    }
}

impl From<Param> for Expr {
    fn from(param: Param) -> Self {
        Self::Param(param)
    }
}

impl From<&Param> for Expr {
    fn from(param: &Param) -> Self {
        Self::Param(param.clone())
    }
}

impl From<&Self> for Expr {
    fn from(expr: &Self) -> Self {
        expr.clone()
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Constant(value)
    }
}

macro_rules! impl_constant_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Expr {
                fn from(v: $ty) -> Self {
                    Self::Constant(v.into())
                }
            }
        )*
    };
}

impl_constant_from!(
    bool,
    i32,
    i64,
    u32,
    u64,
    f64,
    &str,
    String,
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
);
