//! Module: template
//! Responsibility: per-dialect rendering rules (operator patterns, precedence,
//! literal formats, identifier quoting, placeholders, clause keywords).
//! Does not own: AST traversal or clause assembly.
//! Boundary: immutable registries shared by `Arc` across queries and threads.

mod dialects;
mod pattern;


pub use pattern::{Element, LikeAffix, Template};

use crate::{
    error::QueryError,
    expr::Operator,
    query::JoinType,
    value::Value,
};
use derive_more::Display;
use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet},
};

///
/// Precedence ranks. Lower binds tighter; `None` on a template marks an
/// atomic (function-call shaped) rendering.
///

pub const PREC_UNARY: u8 = 5;
pub const PREC_MUL: u8 = 10;
pub const PREC_ADD: u8 = 20;
pub const PREC_COMPARE: u8 = 30;
pub const PREC_NOT: u8 = 40;
pub const PREC_BOOLEAN: u8 = 50;

///
/// DialectId
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum DialectId {
    #[display("ansi")]
    Ansi,
    #[display("derby")]
    Derby,
    #[display("mysql")]
    MySql,
    #[display("postgres")]
    Postgres,
    #[display("jpql")]
    Jpql,
    #[display("jdoql")]
    Jdoql,
}

impl DialectId {
    pub const ALL: [Self; 6] = [
        Self::Ansi,
        Self::Derby,
        Self::MySql,
        Self::Postgres,
        Self::Jpql,
        Self::Jdoql,
    ];

    /// Case-insensitive lookup by display name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dialect| dialect.to_string().eq_ignore_ascii_case(name.trim()))
    }
}

///
/// Grammar
///
/// Overall statement shape of the target language.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Grammar {
    Sql,
    Jpql,
    Jdoql,
}

///
/// PlaceholderStyle
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlaceholderStyle {
    /// `?`
    Question,
    /// `$1`, `$2`, ...
    Dollar,
    /// `?1`, `?2`, ...
    NumberedQuestion,
    /// `:a1`, `:a2`, ...
    Named(&'static str),
}

///
/// PaginationStyle
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PaginationStyle {
    /// `limit n` / `offset m`; `max_limit` fills a missing limit when only an
    /// offset is given.
    LimitOffset { max_limit: Option<u64> },
    /// `offset m rows` / `fetch first n rows only`
    OffsetFetch,
    /// `RANGE from, to` with an exclusive upper bound.
    Range,
    /// Left to the executor (first/max result on the statement handle).
    External,
}

///
/// Keywords
///

#[derive(Clone, Debug)]
pub struct Keywords {
    pub select: &'static str,
    pub distinct: &'static str,
    pub unique: Option<&'static str>,
    pub from: &'static str,
    pub where_: &'static str,
    pub group_by: &'static str,
    pub having: &'static str,
    pub order_by: &'static str,
    pub asc: &'static str,
    pub desc: &'static str,
    pub nulls_first: Option<&'static str>,
    pub nulls_last: Option<&'static str>,
    pub join: &'static str,
    pub inner_join: &'static str,
    pub left_join: &'static str,
    pub right_join: Option<&'static str>,
    pub full_join: Option<&'static str>,
    pub on: &'static str,
    pub variables: Option<&'static str>,
    pub count_all: Option<&'static str>,
    pub insert_into: Option<&'static str>,
    pub values: &'static str,
    pub update: Option<&'static str>,
    pub set: &'static str,
    pub delete_from: &'static str,
}

///
/// LiteralForms
///
/// Prefix/suffix pairs wrapped around chrono-formatted temporal values.
///

#[derive(Clone, Debug)]
pub struct LiteralForms {
    pub true_: &'static str,
    pub false_: &'static str,
    pub null: &'static str,
    pub date: Option<(&'static str, &'static str)>,
    pub time: Option<(&'static str, &'static str)>,
    pub datetime: Option<(&'static str, &'static str)>,
    pub bytes: Option<(&'static str, &'static str)>,
    pub always_true: &'static str,
    pub always_false: &'static str,
}

///
/// OperatorTemplate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorTemplate {
    pub template: Template,
    pub precedence: Option<u8>,
}

///
/// Templates
///
/// Immutable rendering registry for one dialect.
///

#[derive(Clone, Debug)]
pub struct Templates {
    dialect: DialectId,
    grammar: Grammar,
    operators: BTreeMap<Operator, OperatorTemplate>,
    keywords: Keywords,
    literals: LiteralForms,
    identifier_quote: Option<char>,
    reserved: BTreeSet<&'static str>,
    placeholder: PlaceholderStyle,
    pagination: PaginationStyle,
    like_escape: Option<char>,
    newline: &'static str,
    flatten_lists: bool,
    collection_any_joins: bool,
}

impl Templates {
    /// Preset for a dialect.
    #[must_use]
    pub fn for_dialect(dialect: DialectId) -> Self {
        match dialect {
            DialectId::Ansi => Self::ansi(),
            DialectId::Derby => Self::derby(),
            DialectId::MySql => Self::mysql(),
            DialectId::Postgres => Self::postgres(),
            DialectId::Jpql => Self::jpql(),
            DialectId::Jdoql => Self::jdoql(),
        }
    }

    /// Copy rendering every clause break and template newline as one space.
    #[must_use]
    pub fn new_line_to_single_space(&self) -> Self {
        let mut out = self.clone();
        out.newline = " ";
        for entry in out.operators.values_mut() {
            entry.template = entry.template.single_line();
        }
        out
    }

    /// Copy with an operator pattern registered or replaced.
    #[must_use]
    pub fn with_operator(mut self, op: Operator, pattern: &str, precedence: Option<u8>) -> Self {
        self.operators.insert(
            op,
            OperatorTemplate {
                template: Template::new(pattern),
                precedence,
            },
        );
        self
    }

    /// Copy without a pattern for `op`; rendering it becomes unsupported.
    #[must_use]
    pub fn without_operator(mut self, op: Operator) -> Self {
        self.operators.remove(&op);
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn dialect(&self) -> DialectId {
        self.dialect
    }

    #[must_use]
    pub const fn grammar(&self) -> Grammar {
        self.grammar
    }

    #[must_use]
    pub const fn keywords(&self) -> &Keywords {
        &self.keywords
    }

    #[must_use]
    pub const fn literals(&self) -> &LiteralForms {
        &self.literals
    }

    #[must_use]
    pub const fn pagination(&self) -> PaginationStyle {
        self.pagination
    }

    #[must_use]
    pub const fn newline(&self) -> &'static str {
        self.newline
    }

    /// Whether collection-any paths are rewritten into correlated joins.
    #[must_use]
    pub const fn collection_any_joins(&self) -> bool {
        self.collection_any_joins
    }

    #[must_use]
    pub fn operator(&self, op: Operator) -> Option<&OperatorTemplate> {
        self.operators.get(&op)
    }

    /// Like `operator`, failing with `UnsupportedConstruct` when absent.
    pub fn require(&self, op: Operator) -> Result<&OperatorTemplate, QueryError> {
        self.operator(op)
            .ok_or_else(|| QueryError::unsupported(format!("operator {op}"), self.dialect))
    }

    /// Join keyword for a join type; `None` for DEFAULT.
    pub fn join_keyword(&self, join_type: JoinType) -> Result<Option<&'static str>, QueryError> {
        let kw = &self.keywords;
        let keyword = match join_type {
            JoinType::Default => return Ok(None),
            JoinType::Join => Some(kw.join),
            JoinType::InnerJoin => Some(kw.inner_join),
            JoinType::LeftJoin => Some(kw.left_join),
            JoinType::RightJoin => kw.right_join,
            JoinType::FullJoin => kw.full_join,
        };

        keyword
            .map(Some)
            .ok_or_else(|| QueryError::unsupported(format!("join type {join_type}"), self.dialect))
    }

    // ------------------------------------------------------------------
    // Identifiers and placeholders
    // ------------------------------------------------------------------

    /// Quote an identifier when it is reserved or not a plain identifier.
    #[must_use]
    pub fn quote_identifier<'a>(&self, name: &'a str) -> Cow<'a, str> {
        let Some(quote) = self.identifier_quote else {
            return Cow::Borrowed(name);
        };

        let plain = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
        let reserved = self.reserved.contains(name.to_ascii_uppercase().as_str());

        if plain && !reserved {
            return Cow::Borrowed(name);
        }

        let doubled = format!("{quote}{quote}");
        let escaped = name.replace(quote, &doubled);

        Cow::Owned(format!("{quote}{escaped}{quote}"))
    }

    #[must_use]
    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved.contains(word.to_ascii_uppercase().as_str())
    }

    /// Placeholder text for the 1-based statement slot `index`.
    #[must_use]
    pub fn placeholder(&self, index: usize) -> String {
        match self.placeholder {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Dollar => format!("${index}"),
            PlaceholderStyle::NumberedQuestion => format!("?{index}"),
            PlaceholderStyle::Named(prefix) => format!(":{prefix}{index}"),
        }
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    /// Values occupying one statement slot each when `value` is bound.
    ///
    /// Lists expand element-wise on dialects that render lists as
    /// placeholder groups; everything else occupies a single slot.
    #[must_use]
    pub fn slot_values<'a>(&self, value: &'a Value) -> Vec<&'a Value> {
        match value {
            Value::List(items) if self.flatten_lists => items.iter().collect(),
            other => vec![other],
        }
    }

    /// Number of statement slots a bound value consumes.
    #[must_use]
    pub fn slot_count(&self, value: &Value) -> usize {
        match value {
            Value::List(items) if self.flatten_lists => items.len(),
            _ => 1,
        }
    }

    #[must_use]
    pub const fn flattens_lists(&self) -> bool {
        self.flatten_lists
    }

    /// Escape LIKE wildcards in a text operand.
    #[must_use]
    pub fn escape_like(&self, text: &str) -> String {
        let Some(escape) = self.like_escape else {
            return text.to_string();
        };

        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            if c == '%' || c == '_' || c == escape {
                out.push(escape);
            }
            out.push(c);
        }
        out
    }

    /// Render a value as an inline literal.
    pub fn literal(&self, value: &Value) -> Result<String, QueryError> {
        let lit = &self.literals;

        match value {
            Value::Null => Ok(lit.null.to_string()),
            Value::Bool(b) => Ok(if *b { lit.true_ } else { lit.false_ }.to_string()),
            Value::Int(n) => Ok(n.to_string()),
            Value::Uint(n) => Ok(n.to_string()),
            Value::Float(f) if f.is_finite() => Ok(format!("{f:?}")),
            Value::Float(f) => Err(QueryError::unsupported(
                format!("non-finite float literal {f}"),
                self.dialect,
            )),
            Value::Text(s) => Ok(quote_text(s)),
            Value::Date(d) => self.temporal(lit.date, "date", &d.format("%Y-%m-%d").to_string()),
            Value::Time(t) => self.temporal(lit.time, "time", &t.format("%H:%M:%S").to_string()),
            Value::DateTime(dt) => self.temporal(
                lit.datetime,
                "datetime",
                &dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            ),
            Value::Bytes(bytes) => {
                let (prefix, suffix) = lit.bytes.ok_or_else(|| {
                    QueryError::unsupported("binary literal".to_string(), self.dialect)
                })?;
                let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();

                Ok(format!("{prefix}{hex}{suffix}"))
            }
            Value::List(items) => {
                if !self.flatten_lists {
                    return Err(QueryError::unsupported(
                        "inline list literal".to_string(),
                        self.dialect,
                    ));
                }
                let rendered = items
                    .iter()
                    .map(|item| self.literal(item))
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(format!("({})", rendered.join(", ")))
            }
        }
    }

    fn temporal(
        &self,
        form: Option<(&'static str, &'static str)>,
        kind: &str,
        formatted: &str,
    ) -> Result<String, QueryError> {
        let (prefix, suffix) =
            form.ok_or_else(|| QueryError::unsupported(format!("{kind} literal"), self.dialect))?;

        Ok(format!("{prefix}{formatted}{suffix}"))
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::ansi()
    }
}

fn quote_text(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
