
use crate::schema::EntityName;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use derive_more::Display;

///
/// Value
///
/// Runtime literal carried by constants, bound parameters and DML values.
/// Equality is structural; floats compare by value.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Bytes(Vec<u8>),
    List(Vec<Self>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Semantic type tag of this value.
    ///
    /// Lists report the type of their first element; empty lists and nulls
    /// report `Any`.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Any,
            Self::Bool(_) => ValueType::Bool,
            Self::Int(_) | Self::Uint(_) => ValueType::Int,
            Self::Float(_) => ValueType::Float,
            Self::Text(_) => ValueType::Text,
            Self::Date(_) => ValueType::Date,
            Self::DateTime(_) => ValueType::DateTime,
            Self::Time(_) => ValueType::Time,
            Self::Bytes(_) => ValueType::Bytes,
            Self::List(items) => ValueType::Collection(Box::new(
                items.first().map_or(ValueType::Any, Self::value_type),
            )),
        }
    }
}

// ----------------------------------------------------------------------
// Conversions
// ----------------------------------------------------------------------

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_value_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
    f32 => Float,
    f64 => Float,
    String => Text,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    NaiveTime => Time,
    Vec<u8> => Bytes,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::List(iter.into_iter().map(Into::into).collect())
    }
}

///
/// ValueType
///
/// Semantic type tag carried by paths, constants and parameters.
///

#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
pub enum ValueType {
    Any,
    Bool,
    Int,
    Float,
    Text,
    Date,
    DateTime,
    Time,
    Bytes,
    #[display("Entity({_0})")]
    Entity(EntityName),
    #[display("Collection({_0})")]
    Collection(Box<Self>),
}

impl ValueType {
    /// Element type of a collection; `None` for scalars and entities.
    #[must_use]
    pub fn element(&self) -> Option<&Self> {
        match self {
            Self::Collection(inner) => Some(inner),
            _ => None,
        }
    }

    #[must_use]
    pub const fn entity(&self) -> Option<&EntityName> {
        match self {
            Self::Entity(name) => Some(name),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }
}
