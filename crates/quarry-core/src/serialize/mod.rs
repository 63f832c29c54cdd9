//! Module: serialize
//! Responsibility: render expressions and query metadata into dialect text
//! plus the ordered values bound to its placeholders.
//! Does not own: builder normalization or statement execution.
//! Boundary: pure reads over immutable input; the i-th placeholder in the
//! text always corresponds to the i-th emitted binding.

mod dml;
mod fingerprint;
mod select;

#[cfg(test)]
mod tests;

pub use dml::{serialize_delete, serialize_insert, serialize_update};
pub use fingerprint::Fingerprint;
pub use select::{serialize, serialize_count};

pub(crate) use select::preview_query;

use crate::{
    error::QueryError,
    expr::{Custom, Expr, Operation, Operator, Param, ParamMap, Path},
    query::QueryModifiers,
    template::{DialectId, Element, Grammar, LikeAffix, Template, Templates},
    value::Value,
};
use std::sync::LazyLock;

static PREVIEW_TEMPLATES: LazyLock<Templates> = LazyLock::new(Templates::ansi);

///
/// Binding
///
/// One placeholder's value source. Statement serialization defers params
/// to bind time; query serialization resolves them eagerly.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Binding {
    Value(Value),
    Param(Param),
}

///
/// SerializedQuery
///

#[derive(Clone, Debug, PartialEq)]
pub struct SerializedQuery {
    text: String,
    params: Vec<Value>,
    paths: Vec<Option<Path>>,
    dialect: DialectId,
    modifiers: QueryModifiers,
}

impl SerializedQuery {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Values in placeholder order.
    #[must_use]
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Path each param was compared against, when known.
    #[must_use]
    pub fn paths(&self) -> &[Option<Path>] {
        &self.paths
    }

    #[must_use]
    pub const fn dialect(&self) -> DialectId {
        self.dialect
    }

    /// Pagination, for dialects where the executor applies it.
    #[must_use]
    pub const fn modifiers(&self) -> QueryModifiers {
        self.modifiers
    }

    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::compute(self.dialect, &self.text, self.params.len())
    }
}

///
/// SerializedStatement
///

#[derive(Clone, Debug, PartialEq)]
pub struct SerializedStatement {
    text: String,
    bindings: Vec<Binding>,
    paths: Vec<Option<Path>>,
    dialect: DialectId,
}

impl SerializedStatement {
    /// Statement view of an already resolved query.
    pub(crate) fn from_query(query: &SerializedQuery) -> Self {
        Self {
            text: query.text.clone(),
            bindings: query.params.iter().cloned().map(Binding::Value).collect(),
            paths: query.paths.clone(),
            dialect: query.dialect,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    #[must_use]
    pub fn paths(&self) -> &[Option<Path>] {
        &self.paths
    }

    #[must_use]
    pub const fn dialect(&self) -> DialectId {
        self.dialect
    }

    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::compute(self.dialect, &self.text, self.bindings.len())
    }
}

/// Dialect-neutral rendering used by `Display` impls. Unbound params show
/// as `:name`.
pub(crate) fn preview_expr(expr: &Expr) -> Result<String, QueryError> {
    let mut serializer = Serializer::new(&PREVIEW_TEMPLATES, Mode::Preview, true);
    serializer.visit(expr)?;

    Ok(serializer.out)
}

// ----------------------------------------------------------------------
// Serializer
// ----------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    /// Resolve params now; unbound is an error.
    Query,
    /// Defer params to bind time.
    Statement,
    /// Best-effort text for display.
    Preview,
}

struct Serializer<'t> {
    templates: &'t Templates,
    mode: Mode,
    use_literals: bool,
    out: String,
    bindings: Vec<Binding>,
    paths: Vec<Option<Path>>,
    scopes: Vec<ParamMap>,
    constant_path: Option<Path>,
    // JDOQL candidate root, rendered as `this`
    candidate: Option<Path>,
    bare_columns: bool,
    depth: usize,
}

impl<'t> Serializer<'t> {
    const fn new(templates: &'t Templates, mode: Mode, use_literals: bool) -> Self {
        Self {
            templates,
            mode,
            use_literals,
            out: String::new(),
            bindings: Vec::new(),
            paths: Vec::new(),
            scopes: Vec::new(),
            constant_path: None,
            candidate: None,
            bare_columns: false,
            depth: 0,
        }
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push_str(self.templates.newline());
    }

    fn unsupported(&self, construct: impl Into<String>) -> QueryError {
        QueryError::unsupported(construct, self.templates.dialect())
    }

    fn resolve(&self, param: &Param) -> Option<Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(param))
            .cloned()
    }

    fn write_list(&mut self, exprs: &[Expr]) -> Result<(), QueryError> {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.visit(expr)?;
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn visit(&mut self, expr: &Expr) -> Result<(), QueryError> {
        match expr {
            Expr::Path(path) => self.visit_path(path),
            Expr::Operation(op) => self.visit_operation(op),
            Expr::Constant(value) => self.emit_value(value),
            Expr::Param(param) => self.visit_param(param),
            Expr::Custom(custom) => self.visit_custom(custom),
            Expr::SubQuery(metadata) => {
                self.push("(");
                self.scopes.push(metadata.params().clone());
                let candidate = self.candidate.take();
                self.depth += 1;
                let result = self.write_select(metadata, select::SelectKind::List);
                self.depth -= 1;
                self.candidate = candidate;
                self.scopes.pop();
                result?;
                self.push(")");

                Ok(())
            }
        }
    }

    fn visit_path(&mut self, path: &Path) -> Result<(), QueryError> {
        if path.contains_any() && self.mode != Mode::Preview {
            return Err(self.unsupported(format!(
                "collection any-path '{}' outside a join",
                path.dotted()
            )));
        }

        let text = self.path_text(path);
        self.push(&text);

        Ok(())
    }

    fn path_text(&self, path: &Path) -> String {
        match path.parent() {
            None if self.candidate.as_ref() == Some(path) => "this".to_string(),
            None => self.templates.quote_identifier(path.name()).into_owned(),
            Some(parent) if self.bare_columns && parent.is_root() => {
                self.templates.quote_identifier(path.name()).into_owned()
            }
            Some(parent) => format!(
                "{}.{}",
                self.path_text(parent),
                self.templates.quote_identifier(path.name())
            ),
        }
    }

    fn visit_param(&mut self, param: &Param) -> Result<(), QueryError> {
        match self.mode {
            Mode::Statement => match self.resolve(param) {
                Some(value @ Value::List(_)) => self.emit_value(&value),
                None if param.value_type().is_collection() => {
                    Err(QueryError::ParameterNotSet {
                        param: param.clone(),
                    })
                }
                _ => {
                    self.push_slot(Binding::Param(param.clone()));
                    Ok(())
                }
            },
            Mode::Query => {
                let value = self
                    .resolve(param)
                    .ok_or_else(|| QueryError::ParameterNotSet {
                        param: param.clone(),
                    })?;
                self.emit_value(&value)
            }
            Mode::Preview => match self.resolve(param) {
                Some(value) => self.emit_value(&value),
                None => {
                    self.push(":");
                    self.push(param.name());
                    Ok(())
                }
            },
        }
    }

    fn emit_value(&mut self, value: &Value) -> Result<(), QueryError> {
        if self.mode == Mode::Preview {
            match self.templates.literal(value) {
                Ok(literal) => self.push(&literal),
                Err(_) => self.push(&format!("{value:?}")),
            }
            return Ok(());
        }

        if self.use_literals {
            let literal = self.templates.literal(value)?;
            self.push(&literal);
            return Ok(());
        }

        match value {
            Value::List(items) if self.templates.flattens_lists() => {
                self.push("(");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.push_slot(Binding::Value(item.clone()));
                }
                self.push(")");
            }
            _ => self.push_slot(Binding::Value(value.clone())),
        }

        Ok(())
    }

    fn push_slot(&mut self, binding: Binding) {
        let placeholder = self.templates.placeholder(self.bindings.len() + 1);
        self.push(&placeholder);
        self.bindings.push(binding);
        self.paths.push(self.constant_path.clone());
    }

    fn visit_operation(&mut self, op: &Operation) -> Result<(), QueryError> {
        let operator = op.op();

        if matches!(operator, Operator::In | Operator::NotIn) && self.is_empty_list(op.arg(1)) {
            let literals = self.templates.literals();
            let text: &'static str = if operator == Operator::In {
                literals.always_false
            } else {
                literals.always_true
            };
            self.push(text);
            return Ok(());
        }

        let templates = self.templates;
        let template = templates.require(operator)?;

        let outer_path = self.constant_path.clone();
        if let Some(path) = op.arg(0).and_then(Expr::as_path) {
            self.constant_path = Some(path.clone());
        }

        let result = self.render_operation(op, &template.template, template.precedence);
        self.constant_path = outer_path;

        result
    }

    fn render_operation(
        &mut self,
        op: &Operation,
        template: &'t Template,
        precedence: Option<u8>,
    ) -> Result<(), QueryError> {
        let operator = op.op();

        for element in template.elements() {
            match element {
                Element::Text(text) => self.push(text),
                Element::Arg {
                    index,
                    affix,
                    enclosed,
                } => {
                    let arg = op.arg(*index).ok_or_else(|| {
                        self.unsupported(format!("slot {{{index}}} in the {operator} pattern"))
                    })?;

                    if operator == Operator::InstanceOf && *index == 1 {
                        self.write_type_name(arg)?;
                        continue;
                    }

                    let rewritten;
                    let arg = match self.affixed(arg, *affix)? {
                        Affixed::Emitted => continue,
                        Affixed::Rewritten(expr) => {
                            rewritten = expr;
                            &rewritten
                        }
                        Affixed::Untouched => arg,
                    };

                    let wrap = self.needs_parens(operator, precedence, *index, arg, *enclosed);
                    if wrap {
                        self.push("(");
                    }
                    self.visit(arg)?;
                    if wrap {
                        self.push(")");
                    }
                }
            }
        }

        Ok(())
    }

    /// Entity type operand: the simple name in JPQL, the class name in
    /// JDOQL.
    fn write_type_name(&mut self, arg: &Expr) -> Result<(), QueryError> {
        let Some(entity) = arg.as_path().and_then(Path::entity_name) else {
            return Err(self.unsupported("instanceof without an entity type"));
        };
        let name = match self.templates.grammar() {
            Grammar::Jdoql => entity.type_name(),
            Grammar::Sql | Grammar::Jpql => entity.simple_name(),
        };
        self.push(name);

        Ok(())
    }

    fn visit_custom(&mut self, custom: &Custom) -> Result<(), QueryError> {
        if !custom.supports(self.templates.dialect()) {
            return Err(self.unsupported(format!(
                "custom template '{}'",
                custom.template().pattern()
            )));
        }

        for element in custom.template().elements() {
            match element {
                Element::Text(text) => self.push(text),
                Element::Arg { index, affix, .. } => {
                    let arg = custom.args().get(*index).ok_or_else(|| {
                        self.unsupported(format!(
                            "slot {{{index}}} in custom template '{}'",
                            custom.template().pattern()
                        ))
                    })?;

                    match self.affixed(arg, *affix)? {
                        Affixed::Emitted => {}
                        Affixed::Rewritten(expr) => {
                            self.push("(");
                            self.visit(&expr)?;
                            self.push(")");
                        }
                        Affixed::Untouched => self.visit(arg)?,
                    }
                }
            }
        }

        Ok(())
    }

    /// Apply LIKE wildcards for `{n%}`-style slots. Text operands are
    /// escaped and emitted directly; anything else becomes a concatenation.
    fn affixed(&mut self, arg: &Expr, affix: LikeAffix) -> Result<Affixed, QueryError> {
        if affix == LikeAffix::None {
            return Ok(Affixed::Untouched);
        }

        let text = match arg {
            Expr::Constant(Value::Text(text)) => Some(text.clone()),
            Expr::Param(param) if self.mode != Mode::Statement => self
                .resolve(param)
                .and_then(|value| value.as_text().map(str::to_string)),
            _ => None,
        };

        if let Some(text) = text {
            let value = Value::Text(affix.apply(&self.templates.escape_like(&text)));
            self.emit_value(&value)?;
            return Ok(Affixed::Emitted);
        }

        let percent = || Expr::constant("%");
        let expr = match affix {
            LikeAffix::Prefix => Expr::binary(Operator::Concat, percent(), arg.clone()),
            LikeAffix::Suffix => Expr::binary(Operator::Concat, arg.clone(), percent()),
            LikeAffix::Both => Expr::binary(
                Operator::Concat,
                Expr::binary(Operator::Concat, percent(), arg.clone()),
                percent(),
            ),
            LikeAffix::None => return Ok(Affixed::Untouched),
        };

        Ok(Affixed::Rewritten(expr))
    }

    fn needs_parens(
        &self,
        parent: Operator,
        parent_precedence: Option<u8>,
        position: usize,
        arg: &Expr,
        enclosed: bool,
    ) -> bool {
        if enclosed || arg.is_atomic() {
            return false;
        }
        if parent == Operator::Not {
            return true;
        }

        let (child, child_precedence) = match arg {
            Expr::Operation(op) => match self.templates.operator(op.op()) {
                Some(template) => (op.op(), template.precedence),
                None => return false,
            },
            Expr::Custom(custom) => return !call_shaped(custom.template().pattern()),
            _ => return false,
        };

        // function-shaped child
        let Some(child_precedence) = child_precedence else {
            return false;
        };
        // postfix or method-call parent
        let Some(parent_precedence) = parent_precedence else {
            return true;
        };

        child_precedence > parent_precedence
            || (child_precedence == parent_precedence
                && (child != parent || (position > 0 && !parent.is_associative())))
    }

    fn is_empty_list(&self, arg: Option<&Expr>) -> bool {
        match arg {
            Some(Expr::Constant(Value::List(items))) => items.is_empty(),
            Some(Expr::Param(param)) => self
                .resolve(param)
                .is_some_and(|value| value.as_list().is_some_and(<[Value]>::is_empty)),
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    fn into_query(self, modifiers: QueryModifiers) -> Result<SerializedQuery, QueryError> {
        let params = self
            .bindings
            .into_iter()
            .map(|binding| match binding {
                Binding::Value(value) => Ok(value),
                Binding::Param(param) => Err(QueryError::ParameterNotSet { param }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SerializedQuery {
            text: self.out,
            params,
            paths: self.paths,
            dialect: self.templates.dialect(),
            modifiers,
        })
    }

    fn into_statement(self) -> SerializedStatement {
        SerializedStatement {
            text: self.out,
            bindings: self.bindings,
            paths: self.paths,
            dialect: self.templates.dialect(),
        }
    }
}

/// `name(...)` where the first parenthesis closes at the very end.
fn call_shaped(pattern: &str) -> bool {
    let Some(open) = pattern.find('(') else {
        return false;
    };
    let name = &pattern[..open];
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return false;
    }

    let mut depth = 0usize;
    for (i, c) in pattern[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return open + i + 1 == pattern.len();
                }
            }
            _ => {}
        }
    }

    false
}

enum Affixed {
    Emitted,
    Rewritten(Expr),
    Untouched,
}
