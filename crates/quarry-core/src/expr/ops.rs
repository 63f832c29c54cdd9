use crate::value::ValueType;
use derive_more::Display;

///
/// Operator
///
/// Logical operator symbol. Arity is fixed per operator; rendering patterns
/// and precedence live in the dialect templates.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Operator {
    // logical
    And,
    Or,
    Not,

    // comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Loe,
    Goe,
    Between,
    Like,
    In,
    NotIn,
    IsNull,
    IsNotNull,
    Exists,

    // arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Negate,

    // string
    Concat,
    Lower,
    Upper,
    Trim,
    Length,
    Substr1,
    Substr2,
    StartsWith,
    EndsWith,
    StringContains,
    IndexOf,

    // numeric
    Abs,
    Sqrt,

    // aggregate
    Count,
    CountDistinct,
    Sum,
    Avg,
    Min,
    Max,

    // collection
    IsEmpty,
    IsNotEmpty,
    Size,

    // type
    InstanceOf,

    // structural
    Alias,
}

impl Operator {
    /// Fixed number of arguments.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Not
            | Self::IsNull
            | Self::IsNotNull
            | Self::Exists
            | Self::Negate
            | Self::Lower
            | Self::Upper
            | Self::Trim
            | Self::Length
            | Self::Abs
            | Self::Sqrt
            | Self::Count
            | Self::CountDistinct
            | Self::Sum
            | Self::Avg
            | Self::Min
            | Self::Max
            | Self::IsEmpty
            | Self::IsNotEmpty
            | Self::Size => 1,

            Self::Between | Self::Substr2 => 3,

            Self::And
            | Self::Or
            | Self::Eq
            | Self::Ne
            | Self::Lt
            | Self::Gt
            | Self::Loe
            | Self::Goe
            | Self::Like
            | Self::In
            | Self::NotIn
            | Self::Add
            | Self::Sub
            | Self::Mul
            | Self::Div
            | Self::Mod
            | Self::Concat
            | Self::Substr1
            | Self::StartsWith
            | Self::EndsWith
            | Self::StringContains
            | Self::IndexOf
            | Self::InstanceOf
            | Self::Alias => 2,
        }
    }

    /// Operators where `(a op b) op c == a op (b op c)`.
    #[must_use]
    pub const fn is_associative(self) -> bool {
        matches!(
            self,
            Self::And | Self::Or | Self::Add | Self::Mul | Self::Concat
        )
    }

    /// True for operators producing a boolean.
    #[must_use]
    pub const fn is_predicate(self) -> bool {
        matches!(
            self,
            Self::And
                | Self::Or
                | Self::Not
                | Self::Eq
                | Self::Ne
                | Self::Lt
                | Self::Gt
                | Self::Loe
                | Self::Goe
                | Self::Between
                | Self::Like
                | Self::In
                | Self::NotIn
                | Self::IsNull
                | Self::IsNotNull
                | Self::Exists
                | Self::StartsWith
                | Self::EndsWith
                | Self::StringContains
                | Self::IsEmpty
                | Self::IsNotEmpty
                | Self::InstanceOf
        )
    }

    /// Result type given the type of the first argument.
    #[must_use]
    pub fn result_type(self, first: &ValueType) -> ValueType {
        if self.is_predicate() {
            return ValueType::Bool;
        }

        match self {
            Self::Concat | Self::Lower | Self::Upper | Self::Trim | Self::Substr1 | Self::Substr2 => {
                ValueType::Text
            }
            Self::Length | Self::IndexOf | Self::Count | Self::CountDistinct | Self::Size => {
                ValueType::Int
            }
            Self::Avg | Self::Sqrt => ValueType::Float,
            _ => first.clone(),
        }
    }
}
