//! Core of quarry: the typed expression AST, query builders, dialect
//! templates, the serializer, DML clauses, and the executor seam.
#![warn(unreachable_pub)]

pub mod config;
pub mod dml;
pub mod error;
pub mod exec;
pub mod expr;
pub mod obs;
pub mod query;
pub mod schema;
pub mod serialize;
pub mod template;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only query vocabulary.
/// No executors, serializers, or metrics are re-exported here.
///

pub mod prelude {
    pub use crate::{
        config::Configuration,
        expr::{Expr, Param, Path, exists},
        query::{BooleanBuilder, Condition, JoinType, OrderSpecifier, Query, QueryModifiers},
        schema::{EntityDescriptor, EntityName},
        value::{Value, ValueType},
    };
}
