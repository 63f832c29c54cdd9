use derive_more::Display;
use quarry_core::{
    config::ConfigError,
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, QueryError},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Self::new(err.class().into(), err.origin().into(), err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Config, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Configuration could not be loaded.
    Config,

    /// A value was refused by the backend's type coercion.
    Coercion,

    /// The backend failed to prepare, run or close a statement.
    Executor,

    /// A parameter was used without a bound value.
    NotSet,

    /// The builder was used out of order or with mismatched inputs.
    Precondition,

    /// The target dialect cannot express the construct.
    Unsupported,
}

impl From<ErrorClass> for ErrorKind {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::Coercion => Self::Coercion,
            ErrorClass::Executor => Self::Executor,
            ErrorClass::NotSet => Self::NotSet,
            ErrorClass::Precondition => Self::Precondition,
            ErrorClass::Unsupported => Self::Unsupported,
        }
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Bind,
    Builder,
    Config,
    Execute,
    Serialize,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Bind => Self::Bind,
            CoreErrorOrigin::Builder => Self::Builder,
            CoreErrorOrigin::Execute => Self::Execute,
            CoreErrorOrigin::Serialize => Self::Serialize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::template::DialectId;

    #[test]
    fn query_error_maps_class_and_origin() {
        let err: Error = QueryError::UnsupportedConstruct {
            construct: "full join".to_string(),
            dialect: DialectId::Derby,
        }
        .into();

        assert_eq!(err.kind, ErrorKind::Unsupported);
        assert_eq!(err.origin, ErrorOrigin::Serialize);
        assert!(err.message.contains("derby"));
    }

    #[test]
    fn config_error_maps_to_config_kind() {
        let err: Error = ConfigError::UnknownDialect("oracle".to_string()).into();

        assert_eq!(err.kind, ErrorKind::Config);
        assert_eq!(err.origin, ErrorOrigin::Config);
        assert_eq!(err.to_string(), "unknown dialect 'oracle'");
    }
}
