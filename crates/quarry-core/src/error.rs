use crate::{
    exec::{CoercionError, ExecutorError},
    expr::{Operator, Param},
    template::DialectId,
};
use derive_more::Display;
use thiserror::Error as ThisError;

///
/// QueryError
///
/// Local, synchronous failures raised while building, rendering, binding
/// or executing a statement. None of them are retried by the core.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum QueryError {
    #[error("expected {paths} values for {paths} paths, but got {values}")]
    ArityMismatch { paths: usize, values: usize },

    #[error("builder precondition violated: {0}")]
    BuilderPrecondition(String),

    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error("operator {op} takes {expected} arguments, but got {actual}")]
    OperatorArity {
        op: Operator,
        expected: usize,
        actual: usize,
    },

    #[error("parameter not set: {param}")]
    ParameterNotSet { param: Param },

    #[error("entity {entity} has no field '{field}'")]
    UnknownField { entity: String, field: String },

    #[error("{construct} is not supported by the {dialect} dialect")]
    UnsupportedConstruct {
        construct: String,
        dialect: DialectId,
    },
}

impl QueryError {
    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        Self::BuilderPrecondition(message.into())
    }

    pub(crate) fn unsupported(construct: impl Into<String>, dialect: DialectId) -> Self {
        Self::UnsupportedConstruct {
            construct: construct.into(),
            dialect,
        }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::ArityMismatch { .. }
            | Self::BuilderPrecondition(_)
            | Self::OperatorArity { .. }
            | Self::UnknownField { .. } => ErrorClass::Precondition,
            Self::ParameterNotSet { .. } => ErrorClass::NotSet,
            Self::UnsupportedConstruct { .. } => ErrorClass::Unsupported,
            Self::Coercion(_) => ErrorClass::Coercion,
            Self::Executor(_) => ErrorClass::Executor,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::BuilderPrecondition(_) | Self::OperatorArity { .. } => ErrorOrigin::Builder,
            Self::UnsupportedConstruct { .. } => ErrorOrigin::Serialize,
            Self::ArityMismatch { .. }
            | Self::Coercion(_)
            | Self::ParameterNotSet { .. }
            | Self::UnknownField { .. } => ErrorOrigin::Bind,
            Self::Executor(_) => ErrorOrigin::Execute,
        }
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorClass {
    Coercion,
    Executor,
    NotSet,
    Precondition,
    Unsupported,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorOrigin {
    Bind,
    Builder,
    Execute,
    Serialize,
}
