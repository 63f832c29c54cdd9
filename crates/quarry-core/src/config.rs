//! Module: config
//! Responsibility: serializer configuration (dialect templates, literal
//! mode, debug logging) and its TOML file form.
//! Does not own: template contents (see `template`).

use crate::template::{DialectId, Templates};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown dialect '{0}'")]
    UnknownDialect(String),
}

///
/// ConfigFile
///
/// On-disk shape:
///
/// ```toml
/// dialect = "postgres"
/// use_literals = false
/// new_line_to_single_space = true
/// debug = false
/// ```
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub dialect: String,
    pub use_literals: bool,
    pub new_line_to_single_space: bool,
    pub debug: bool,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            dialect: DialectId::Ansi.to_string(),
            use_literals: false,
            new_line_to_single_space: false,
            debug: false,
        }
    }
}

///
/// Configuration
///
/// Immutable, shareable rendering settings for one dialect.
///

#[derive(Clone, Debug)]
pub struct Configuration {
    templates: Arc<Templates>,
    use_literals: bool,
    debug: bool,
}

impl Configuration {
    #[must_use]
    pub const fn new(templates: Arc<Templates>) -> Self {
        Self {
            templates,
            use_literals: false,
            debug: false,
        }
    }

    #[must_use]
    pub fn for_dialect(dialect: DialectId) -> Self {
        Self::new(Arc::new(Templates::for_dialect(dialect)))
    }

    /// Inline constants as literals instead of binding them.
    #[must_use]
    pub const fn with_literals(mut self, use_literals: bool) -> Self {
        self.use_literals = use_literals;
        self
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn from_file(file: &ConfigFile) -> Result<Self, ConfigError> {
        let dialect = DialectId::from_name(&file.dialect)
            .ok_or_else(|| ConfigError::UnknownDialect(file.dialect.clone()))?;

        let mut templates = Templates::for_dialect(dialect);
        if file.new_line_to_single_space {
            templates = templates.new_line_to_single_space();
        }

        Ok(Self::new(Arc::new(templates))
            .with_literals(file.use_literals)
            .with_debug(file.debug))
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(source)?;

        Self::from_file(&file)
    }

    #[must_use]
    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    #[must_use]
    pub fn shared_templates(&self) -> Arc<Templates> {
        Arc::clone(&self.templates)
    }

    #[must_use]
    pub fn dialect(&self) -> DialectId {
        self.templates.dialect()
    }

    #[must_use]
    pub const fn use_literals(&self) -> bool {
        self.use_literals
    }

    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::for_dialect(DialectId::Ansi)
    }
}
