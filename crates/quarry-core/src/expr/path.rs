use crate::{schema::EntityName, value::ValueType};
use std::{fmt, sync::Arc};

///
/// PathKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PathKind {
    /// Root variable (entity alias or synthetic join alias).
    Variable,

    /// Named attribute of the parent path.
    Property,

    /// Any element of the parent collection path.
    CollectionAny,
}

///
/// Path
///
/// Typed reference to a named, possibly nested attribute. Immutable and
/// shared; clones are reference-count bumps and equality is structural.
///

#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Path(Arc<PathInner>);

#[derive(Debug, Eq, Hash, PartialEq)]
struct PathInner {
    parent: Option<Path>,
    name: String,
    kind: PathKind,
    ty: ValueType,
}

/// Element name used for collection-any paths.
pub const ANY_ELEMENT: &str = "any";

impl Path {
    fn from_parts(parent: Option<Self>, name: String, kind: PathKind, ty: ValueType) -> Self {
        Self(Arc::new(PathInner {
            parent,
            name,
            kind,
            ty,
        }))
    }

    /// Root variable of an arbitrary type.
    #[must_use]
    pub fn variable(name: impl Into<String>, ty: ValueType) -> Self {
        Self::from_parts(None, name.into(), PathKind::Variable, ty)
    }

    /// Root variable for an entity source.
    #[must_use]
    pub fn entity(entity: EntityName, alias: impl Into<String>) -> Self {
        Self::variable(alias, ValueType::Entity(entity))
    }

    /// Child attribute of this path.
    #[must_use]
    pub fn property(&self, name: impl Into<String>, ty: ValueType) -> Self {
        Self::from_parts(Some(self.clone()), name.into(), PathKind::Property, ty)
    }

    /// Child collection attribute holding elements of `element` type.
    #[must_use]
    pub fn collection(&self, name: impl Into<String>, element: ValueType) -> Self {
        self.property(name, ValueType::Collection(Box::new(element)))
    }

    /// Any element of this collection path. Used inside predicates; the
    /// builder rewrites it into a correlated join on dialects that need it.
    #[must_use]
    pub fn any(&self) -> Self {
        let ty = self.0.ty.element().cloned().unwrap_or(ValueType::Any);

        Self::from_parts(
            Some(self.clone()),
            ANY_ELEMENT.to_string(),
            PathKind::CollectionAny,
            ty,
        )
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.0.parent.as_ref()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    #[must_use]
    pub fn kind(&self) -> PathKind {
        self.0.kind
    }

    #[must_use]
    pub fn value_type(&self) -> &ValueType {
        &self.0.ty
    }

    /// Entity naming for entity-typed paths.
    #[must_use]
    pub fn entity_name(&self) -> Option<&EntityName> {
        self.0.ty.entity()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.parent.is_none()
    }

    /// Walk up to the root variable.
    #[must_use]
    pub fn root(&self) -> &Self {
        let mut current = self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Depth below the root (root = 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Some(parent) = current.parent() {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// True when this path or any ancestor is a collection-any element.
    #[must_use]
    pub fn contains_any(&self) -> bool {
        let mut current = Some(self);
        while let Some(path) = current {
            if path.kind() == PathKind::CollectionAny {
                return true;
            }
            current = path.parent();
        }
        false
    }

    /// Same path re-rooted under a new parent.
    #[must_use]
    pub fn with_parent(&self, parent: Self) -> Self {
        Self::from_parts(
            Some(parent),
            self.0.name.clone(),
            self.0.kind,
            self.0.ty.clone(),
        )
    }

    /// Same path with a different element name.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self::from_parts(
            self.0.parent.clone(),
            name.into(),
            self.0.kind,
            self.0.ty.clone(),
        )
    }

    /// Dotted, dialect-neutral name (`cat.kittens.any`).
    #[must_use]
    pub fn dotted(&self) -> String {
        match self.parent() {
            Some(parent) => format!("{}.{}", parent.dotted(), self.name()),
            None => self.name().to_string(),
        }
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({}: {})", self.dotted(), self.0.ty)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}
