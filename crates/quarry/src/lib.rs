//! ## Crate layout
//! - `core`: expression AST, builders, dialect templates, serializer, DML
//!   clauses and the executor seam.
//! - `error`: the public error type with a stable kind + origin taxonomy.
//!
//! The `prelude` module carries the vocabulary needed to build and render
//! queries.

pub use quarry_core as core;

pub mod error;

pub use error::{Error, ErrorKind, ErrorOrigin};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        config::Configuration,
        dml::{DeleteClause, InsertClause, UpdateClause},
        exec::{Row, StatementExecutor},
        expr::{Expr, Param, Path, exists},
        query::{BooleanBuilder, Condition, JoinType, OrderSpecifier, Query, QueryModifiers},
        schema::{EntityDescriptor, EntityName, Populate},
        template::DialectId,
        value::{Value, ValueType},
    };
}
