use crate::value::{Value, ValueType};
use std::{
    collections::HashMap,
    fmt,
    hash::{Hash, Hasher},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

static NEXT_PARAM_ID: AtomicU64 = AtomicU64::new(1);

///
/// ParamId
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ParamId(u64);

impl ParamId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

///
/// Param
///
/// Placeholder whose value is supplied later through a `ParamMap`.
/// Identity is the process-unique id; two params with the same name are
/// still distinct.
///

#[derive(Clone)]
pub struct Param {
    id: ParamId,
    name: Arc<str>,
    ty: ValueType,
}

impl Param {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, ty: ValueType) -> Self {
        Self {
            id: ParamId(NEXT_PARAM_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            ty,
        }
    }

    /// Anonymous param, named after its id.
    #[must_use]
    pub fn anonymous(ty: ValueType) -> Self {
        let id = ParamId(NEXT_PARAM_ID.fetch_add(1, Ordering::Relaxed));

        Self {
            id,
            name: format!("param{}", id.0).into(),
            ty,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ParamId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn value_type(&self) -> &ValueType {
        &self.ty
    }
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Param {}

impl Hash for Param {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Param({} {})", self.name, self.id)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

///
/// ParamMap
///
/// Runtime values for params, keyed by param identity.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamMap {
    values: HashMap<ParamId, Value>,
}

impl ParamMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind or rebind a value.
    pub fn set(&mut self, param: &Param, value: impl Into<Value>) {
        self.values.insert(param.id, value.into());
    }

    #[must_use]
    pub fn get(&self, param: &Param) -> Option<&Value> {
        self.values.get(&param.id)
    }

    #[must_use]
    pub fn contains(&self, param: &Param) -> bool {
        self.values.contains_key(&param.id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
