//! Module: schema
//! Responsibility: explicit entity descriptors and their ordered field paths.
//! Does not own: code generation of descriptors or row mapping.
//! Boundary: descriptors are built once at schema-definition time and shared.


use crate::{
    expr::Path,
    value::{Value, ValueType},
};
use convert_case::{Case, Casing};
use std::{fmt, sync::Arc};

///
/// EntityName
///
/// Naming facts for one queryable entity: the fully qualified type name
/// (object-query dialects) and the table it maps to (SQL dialects).
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EntityName {
    type_name: Arc<str>,
    table: Arc<str>,
    schema: Option<Arc<str>>,
}

impl EntityName {
    /// Create an entity name, deriving the table name from the simple type
    /// name (`com.acme.OrderLine` maps to `ORDER_LINE`).
    #[must_use]
    pub fn new(type_name: impl Into<Arc<str>>) -> Self {
        let type_name = type_name.into();
        let table = simple_name(&type_name).to_case(Case::UpperSnake);

        Self {
            type_name,
            table: table.into(),
            schema: None,
        }
    }

    #[must_use]
    pub fn with_table(mut self, table: impl Into<Arc<str>>) -> Self {
        self.table = table.into();
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<Arc<str>>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Type name without its package/module qualifier.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        simple_name(&self.type_name)
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Conventional variable name for this entity (`OrderLine` → `orderLine`).
    #[must_use]
    pub fn default_alias(&self) -> String {
        self.simple_name().to_case(Case::Camel)
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name)
    }
}

fn simple_name(type_name: &str) -> &str {
    type_name.rsplit(['.', ':']).next().unwrap_or(type_name)
}

///
/// EntityDescriptor
///
/// Explicit registry of an entity's root path and its declared field paths,
/// in declaration order. Replaces runtime discovery of path fields.
///

#[derive(Clone, Debug, PartialEq)]
pub struct EntityDescriptor {
    root: Path,
    fields: Vec<Path>,
}

impl EntityDescriptor {
    /// Start a descriptor rooted at the entity's conventional alias.
    #[must_use]
    pub fn new(entity: EntityName) -> Self {
        let alias = entity.default_alias();

        Self::with_alias(entity, alias)
    }

    #[must_use]
    pub fn with_alias(entity: EntityName, alias: impl Into<String>) -> Self {
        Self {
            root: Path::entity(entity, alias),
            fields: Vec::new(),
        }
    }

    /// Declare a field. Re-declaring a name keeps the first declaration.
    #[must_use]
    pub fn field(mut self, name: &str, ty: ValueType) -> Self {
        if self.get(name).is_none() {
            self.fields.push(self.root.property(name, ty));
        }
        self
    }

    #[must_use]
    pub const fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn fields(&self) -> &[Path] {
        &self.fields
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.fields.iter().find(|path| path.name() == name)
    }

    /// Rebind the descriptor to another variable name, e.g. for self-joins.
    #[must_use]
    pub fn aliased(&self, alias: impl Into<String>) -> Self {
        let root = self.root.with_name(alias);
        let fields = self
            .fields
            .iter()
            .map(|field| field.with_parent(root.clone()))
            .collect();

        Self { root, fields }
    }
}

///
/// Populate
///
/// Implemented by row types that can hand their field values to DML
/// clauses by declared field name.
///

pub trait Populate {
    fn field_values(&self) -> Vec<(&str, Value)>;
}
