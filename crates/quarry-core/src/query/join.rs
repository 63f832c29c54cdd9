use crate::expr::{Expr, Operator};
use derive_more::Display;
use std::{
    borrow::Cow,
    cmp::Ordering,
    collections::BTreeSet,
    fmt,
    hash::{Hash, Hasher},
    sync::atomic::{AtomicU32, Ordering as AtomicOrdering},
};

// Ids below this are reserved for the built-in flags.
static NEXT_FLAG_ID: AtomicU32 = AtomicU32::new(16);

///
/// JoinType
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum JoinType {
    #[display("DEFAULT")]
    Default,
    #[display("JOIN")]
    Join,
    #[display("INNERJOIN")]
    InnerJoin,
    #[display("LEFTJOIN")]
    LeftJoin,
    #[display("RIGHTJOIN")]
    RightJoin,
    #[display("FULLJOIN")]
    FullJoin,
}

///
/// JoinFlag
///
/// Identity-compared rendering marker attached to a join. The prefix is
/// written before the join target and the suffix after it; neither takes
/// part in equality.
///

#[derive(Clone, Debug)]
pub struct JoinFlag {
    id: u32,
    prefix: Cow<'static, str>,
    suffix: Cow<'static, str>,
}

impl JoinFlag {
    /// `inner join fetch cat.kittens`
    pub const FETCH: Self = Self::builtin(1, "fetch ", "");

    /// `from Cat cat fetch all properties`
    pub const FETCH_ALL_PROPERTIES: Self = Self::builtin(2, "", " fetch all properties");

    const fn builtin(id: u32, prefix: &'static str, suffix: &'static str) -> Self {
        Self {
            id,
            prefix: Cow::Borrowed(prefix),
            suffix: Cow::Borrowed(suffix),
        }
    }

    fn mint(prefix: Cow<'static, str>, suffix: Cow<'static, str>) -> Self {
        Self {
            id: NEXT_FLAG_ID.fetch_add(1, AtomicOrdering::Relaxed),
            prefix,
            suffix,
        }
    }

    /// Fresh flag rendering `suffix` after the target.
    #[must_use]
    pub fn new(suffix: impl Into<Cow<'static, str>>) -> Self {
        Self::mint(Cow::Borrowed(""), suffix.into())
    }

    /// Fresh flag rendering `prefix` before the target.
    #[must_use]
    pub fn prefix(prefix: impl Into<Cow<'static, str>>) -> Self {
        Self::mint(prefix.into(), Cow::Borrowed(""))
    }

    /// Fresh flag rendering `suffix` after the target.
    #[must_use]
    pub fn suffix(suffix: impl Into<Cow<'static, str>>) -> Self {
        Self::new(suffix)
    }

    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    #[must_use]
    pub fn prefix_text(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn suffix_text(&self) -> &str {
        &self.suffix
    }
}

impl PartialEq for JoinFlag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for JoinFlag {}

impl Hash for JoinFlag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for JoinFlag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for JoinFlag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for JoinFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix.trim(), self.suffix.trim())
    }
}

///
/// JoinExpression
///
/// One FROM/JOIN entry. Conditions only ever accumulate conjunctively.
///

#[derive(Clone, Debug, PartialEq)]
pub struct JoinExpression {
    join_type: JoinType,
    target: Expr,
    condition: Option<Expr>,
    flags: BTreeSet<JoinFlag>,
}

impl JoinExpression {
    #[must_use]
    pub fn new(join_type: JoinType, target: impl Into<Expr>) -> Self {
        Self {
            join_type,
            target: target.into(),
            condition: None,
            flags: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Expr) -> Self {
        self.add_condition(condition);
        self
    }

    /// AND-fold `condition` into the existing one.
    pub fn add_condition(&mut self, condition: Expr) {
        self.condition = Some(match self.condition.take() {
            Some(existing) => Expr::binary(Operator::And, existing, condition),
            None => condition,
        });
    }

    pub fn add_flag(&mut self, flag: JoinFlag) {
        self.flags.insert(flag);
    }

    #[must_use]
    pub fn has_flag(&self, flag: &JoinFlag) -> bool {
        self.flags.contains(flag)
    }

    #[must_use]
    pub const fn join_type(&self) -> JoinType {
        self.join_type
    }

    #[must_use]
    pub const fn target(&self) -> &Expr {
        &self.target
    }

    #[must_use]
    pub const fn condition(&self) -> Option<&Expr> {
        self.condition.as_ref()
    }

    pub fn flags(&self) -> impl Iterator<Item = &JoinFlag> {
        self.flags.iter()
    }
}

impl fmt::Display for JoinExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.join_type, self.target)?;
        if let Some(condition) = &self.condition {
            write!(f, " on {condition}")?;
        }
        for flag in &self.flags {
            write!(f, " {flag}")?;
        }

        Ok(())
    }
}
