//! Select and count statement assembly for the three grammars.

use super::{Mode, SerializedQuery, Serializer};
use crate::{
    config::Configuration,
    error::QueryError,
    expr::{Expr, Operator, Path},
    obs::sink::{self, QueryEvent, StatementKind},
    query::{JoinExpression, JoinType, NullHandling, Order, QueryMetadata, QueryModifiers},
    template::{Grammar, PaginationStyle},
    value::ValueType,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum SelectKind {
    List,
    Count,
    // distinct row set under a wrapping count
    CountSource,
}

/// Render the list form of `metadata`.
pub fn serialize(
    metadata: &QueryMetadata,
    config: &Configuration,
) -> Result<SerializedQuery, QueryError> {
    run(metadata, config, SelectKind::List)
}

/// Render the count form of `metadata`. Ordering and pagination are
/// dropped.
pub fn serialize_count(
    metadata: &QueryMetadata,
    config: &Configuration,
) -> Result<SerializedQuery, QueryError> {
    run(metadata, config, SelectKind::Count)
}

/// Dialect text with params inlined where bound, for `Display`.
pub(crate) fn preview_query(
    metadata: &QueryMetadata,
    config: &Configuration,
) -> Result<String, QueryError> {
    let mut serializer = Serializer::new(config.templates(), Mode::Preview, true);
    serializer.scopes.push(metadata.params().clone());
    serializer.write_select(metadata, SelectKind::List)?;

    Ok(serializer.out)
}

fn run(
    metadata: &QueryMetadata,
    config: &Configuration,
    kind: SelectKind,
) -> Result<SerializedQuery, QueryError> {
    let mut serializer = Serializer::new(config.templates(), Mode::Query, config.use_literals());
    serializer.scopes.push(metadata.params().clone());
    serializer.write_select(metadata, kind)?;

    let modifiers = match kind {
        SelectKind::List => metadata.modifiers(),
        SelectKind::Count | SelectKind::CountSource => QueryModifiers::default(),
    };
    let query = serializer.into_query(modifiers)?;

    sink::record(QueryEvent::Serialized {
        dialect: query.dialect(),
        kind: match kind {
            SelectKind::List => StatementKind::Select,
            SelectKind::Count | SelectKind::CountSource => StatementKind::Count,
        },
        params: u64::try_from(query.params().len()).unwrap_or(u64::MAX),
    });

    Ok(query)
}

/// AND-fold, left to right.
fn conjoin(predicates: impl IntoIterator<Item = Expr>) -> Option<Expr> {
    predicates
        .into_iter()
        .reduce(|lhs, rhs| Expr::binary(Operator::And, lhs, rhs))
}

/// Java type name used in JDOQL declarations.
fn java_type_name(ty: &ValueType) -> String {
    match ty {
        ValueType::Entity(entity) => entity.type_name().to_string(),
        ValueType::Text => "java.lang.String".to_string(),
        ValueType::Int => "java.lang.Long".to_string(),
        ValueType::Float => "java.lang.Double".to_string(),
        ValueType::Bool => "java.lang.Boolean".to_string(),
        ValueType::Date | ValueType::DateTime | ValueType::Time => "java.util.Date".to_string(),
        ValueType::Bytes => "byte[]".to_string(),
        ValueType::Collection(_) => "java.util.Collection".to_string(),
        ValueType::Any => "java.lang.Object".to_string(),
    }
}

impl Serializer<'_> {
    pub(super) fn write_select(
        &mut self,
        metadata: &QueryMetadata,
        kind: SelectKind,
    ) -> Result<(), QueryError> {
        match self.templates.grammar() {
            Grammar::Sql | Grammar::Jpql => self.write_select_sql(metadata, kind),
            Grammar::Jdoql => self.write_select_jdoql(metadata, kind),
        }
    }

    // ------------------------------------------------------------------
    // SQL / JPQL
    // ------------------------------------------------------------------

    fn write_select_sql(
        &mut self,
        metadata: &QueryMetadata,
        kind: SelectKind,
    ) -> Result<(), QueryError> {
        let templates = self.templates;
        let kw = templates.keywords();
        let grammar = templates.grammar();
        let joins = metadata.joins();
        let first = joins
            .first()
            .ok_or_else(|| QueryError::precondition("query has no source"))?;

        if kind == SelectKind::Count
            && grammar == Grammar::Sql
            && metadata.is_distinct()
            && metadata.projection().len() != 1
        {
            return self.write_count_of_distinct_rows(metadata);
        }

        let mut wrote_select = false;
        match kind {
            SelectKind::Count => {
                self.push(kw.select);
                self.push(" ");
                self.write_count(metadata, first)?;
                wrote_select = true;
            }
            SelectKind::List | SelectKind::CountSource => {
                let projection = metadata.projection();
                if !projection.is_empty() || grammar == Grammar::Sql || metadata.is_distinct() {
                    self.push(kw.select);
                    self.push(" ");
                    if metadata.is_distinct() {
                        self.push(kw.distinct);
                        self.push(" ");
                    }
                    if projection.is_empty() {
                        match grammar {
                            Grammar::Sql => self.push("*"),
                            _ => self.visit(first.target())?,
                        }
                    } else {
                        self.write_projection(projection)?;
                    }
                    wrote_select = true;
                }
            }
        }
        if wrote_select {
            self.newline();
        }

        // sources
        self.push(kw.from);
        self.push(" ");
        let mut filters = Vec::new();
        for (i, join) in joins.iter().enumerate() {
            if i == 0 || join.join_type() == JoinType::Default {
                if i > 0 {
                    self.push(", ");
                }
                self.write_join_target(join)?;
                self.write_flag_suffixes(join);
                filters.extend(join.condition().cloned());
                continue;
            }

            self.newline();
            if let Some(keyword) = templates.join_keyword(join.join_type())? {
                self.push(keyword);
                self.push(" ");
            }
            self.write_join_target(join)?;
            if let Some(condition) = join.condition() {
                self.push(" ");
                self.push(kw.on);
                self.push(" ");
                self.visit(condition)?;
            }
            self.write_flag_suffixes(join);
        }
        filters.extend(metadata.where_clause().cloned());

        if let Some(filter) = conjoin(filters) {
            self.newline();
            self.push(kw.where_);
            self.push(" ");
            self.visit(&filter)?;
        }

        self.write_tail(metadata, kind)
    }

    /// `select count(*) from (select distinct ...) distinct_rows`
    fn write_count_of_distinct_rows(&mut self, metadata: &QueryMetadata) -> Result<(), QueryError> {
        let kw = self.templates.keywords();

        self.push(kw.select);
        self.push(" ");
        self.push(kw.count_all.unwrap_or("count(*)"));
        self.newline();
        self.push(kw.from);
        self.push(" (");
        self.write_select_sql(metadata, SelectKind::CountSource)?;
        self.push(") distinct_rows");

        Ok(())
    }

    fn write_count(
        &mut self,
        metadata: &QueryMetadata,
        first: &JoinExpression,
    ) -> Result<(), QueryError> {
        let kw = self.templates.keywords();
        let projection = metadata.projection();

        if metadata.is_distinct() {
            let counted = match projection {
                [] => first.target(),
                [single] => single,
                _ => return Err(self.unsupported("count of a multi-column distinct projection")),
            };
            self.push("count(");
            self.push(kw.distinct);
            self.push(" ");
            self.visit(counted)?;
            self.push(")");
        } else if let Some(count_all) = kw.count_all {
            self.push(count_all);
        } else {
            self.push("count(");
            self.visit(first.target())?;
            self.push(")");
        }

        Ok(())
    }

    fn write_projection(&mut self, projection: &[Expr]) -> Result<(), QueryError> {
        for (i, expr) in projection.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            match expr {
                Expr::Path(path)
                    if self.templates.grammar() == Grammar::Sql
                        && path.is_root()
                        && path.entity_name().is_some() =>
                {
                    let alias = self.templates.quote_identifier(path.name()).into_owned();
                    self.push(&alias);
                    self.push(".*");
                }
                _ => self.visit(expr)?,
            }
        }

        Ok(())
    }

    fn write_join_target(&mut self, join: &JoinExpression) -> Result<(), QueryError> {
        for flag in join.flags() {
            self.push(flag.prefix_text());
        }

        match join.target() {
            Expr::Path(path) if path.is_root() && path.entity_name().is_some() => {
                self.write_entity_source(path);
                Ok(())
            }
            target => self.visit(target),
        }
    }

    fn write_flag_suffixes(&mut self, join: &JoinExpression) {
        for flag in join.flags() {
            self.push(flag.suffix_text());
        }
    }

    /// `[schema.]TABLE alias` in SQL, `Entity alias` in JPQL.
    fn write_entity_source(&mut self, path: &Path) {
        let Some(entity) = path.entity_name() else {
            return;
        };
        let templates = self.templates;

        if templates.grammar() == Grammar::Sql {
            if let Some(schema) = entity.schema() {
                self.push(&templates.quote_identifier(schema));
                self.push(".");
            }
            self.push(&templates.quote_identifier(entity.table()));
        } else {
            self.push(entity.simple_name());
        }
        self.push(" ");
        self.push(&templates.quote_identifier(path.name()));
    }

    // ------------------------------------------------------------------
    // JDOQL
    // ------------------------------------------------------------------

    fn write_select_jdoql(
        &mut self,
        metadata: &QueryMetadata,
        kind: SelectKind,
    ) -> Result<(), QueryError> {
        let kw = self.templates.keywords();
        let joins = metadata.joins();
        let first = joins
            .first()
            .ok_or_else(|| QueryError::precondition("query has no source"))?;

        let (candidate, entity) = match first.target() {
            Expr::Path(path) if path.is_root() => match path.entity_name() {
                Some(entity) => (path.clone(), entity.clone()),
                None => return Err(self.unsupported("non-entity candidate")),
            },
            _ => return Err(self.unsupported("non-entity candidate")),
        };
        let nested = self.depth > 0;
        if !nested {
            self.candidate = Some(candidate.clone());
        }

        // select
        let mut wrote_select = false;
        match kind {
            SelectKind::Count => {
                self.push(kw.select);
                self.push(" ");
                if metadata.is_distinct() {
                    let counted = match metadata.projection() {
                        [] => None,
                        [single] => Some(single),
                        _ => {
                            return Err(
                                self.unsupported("count of a multi-column distinct projection")
                            );
                        }
                    };
                    self.push("count(");
                    self.push(kw.distinct);
                    self.push(" ");
                    match counted {
                        Some(expr) => self.visit(expr)?,
                        None => self.push("this"),
                    }
                    self.push(")");
                } else {
                    self.push(kw.count_all.unwrap_or("count(this)"));
                }
                wrote_select = true;
            }
            SelectKind::List | SelectKind::CountSource => {
                let projection = metadata.projection();
                if !projection.is_empty() || metadata.is_distinct() || metadata.is_unique() {
                    self.push(kw.select);
                    if metadata.is_unique()
                        && let Some(unique) = kw.unique
                    {
                        self.push(" ");
                        self.push(unique);
                    }
                    if metadata.is_distinct() {
                        self.push(" ");
                        self.push(kw.distinct);
                    }
                    if !projection.is_empty() {
                        self.push(" ");
                        self.write_projection(projection)?;
                    }
                    wrote_select = true;
                }
            }
        }
        if wrote_select {
            self.newline();
        }

        self.push(kw.from);
        self.push(" ");
        self.push(entity.type_name());
        if nested {
            self.push(" ");
            self.push(candidate.name());
        }

        // remaining sources become variables
        let mut variables = Vec::new();
        let mut filters: Vec<Expr> = first.condition().cloned().into_iter().collect();
        for join in &joins[1..] {
            match join.target() {
                Expr::Operation(op) if op.op() == Operator::Alias => {
                    let (Some(collection), Some(Expr::Path(variable))) = (op.arg(0), op.arg(1))
                    else {
                        return Err(self.unsupported("alias join without a variable"));
                    };
                    variables.push(format!(
                        "{} {}",
                        java_type_name(variable.value_type()),
                        variable.name()
                    ));
                    filters.push(Expr::binary(
                        Operator::In,
                        Expr::Path(variable.clone()),
                        collection.clone(),
                    ));
                }
                Expr::Path(path) if join.join_type() == JoinType::Default && path.is_root() => {
                    variables.push(format!(
                        "{} {}",
                        java_type_name(path.value_type()),
                        path.name()
                    ));
                }
                _ => {
                    return Err(self.unsupported(format!("{} join", join.join_type())));
                }
            }
            filters.extend(join.condition().cloned());
        }
        filters.extend(metadata.where_clause().cloned());

        if let Some(filter) = conjoin(filters) {
            self.newline();
            self.push(kw.where_);
            self.push(" ");
            self.visit(&filter)?;
        }
        if !variables.is_empty() {
            self.newline();
            self.push(kw.variables.unwrap_or("VARIABLES"));
            self.push(" ");
            self.push(&variables.join("; "));
        }

        self.write_tail(metadata, kind)
    }

    // ------------------------------------------------------------------
    // Shared tail
    // ------------------------------------------------------------------

    fn write_tail(&mut self, metadata: &QueryMetadata, kind: SelectKind) -> Result<(), QueryError> {
        let kw = self.templates.keywords();

        if !metadata.group_by().is_empty() {
            self.newline();
            self.push(kw.group_by);
            self.push(" ");
            self.write_list(metadata.group_by())?;
        }
        if let Some(having) = metadata.having() {
            self.newline();
            self.push(kw.having);
            self.push(" ");
            self.visit(having)?;
        }

        if kind != SelectKind::List {
            return Ok(());
        }

        if !metadata.order_by().is_empty() {
            self.newline();
            self.push(kw.order_by);
            self.push(" ");
            for (i, specifier) in metadata.order_by().iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.visit(specifier.target())?;
                self.push(" ");
                self.push(match specifier.order() {
                    Order::Asc => kw.asc,
                    Order::Desc => kw.desc,
                });
                let nulls = match specifier.nulls() {
                    NullHandling::Default => None,
                    NullHandling::NullsFirst => Some(
                        kw.nulls_first
                            .ok_or_else(|| self.unsupported("nulls first ordering"))?,
                    ),
                    NullHandling::NullsLast => Some(
                        kw.nulls_last
                            .ok_or_else(|| self.unsupported("nulls last ordering"))?,
                    ),
                };
                if let Some(nulls) = nulls {
                    self.push(" ");
                    self.push(nulls);
                }
            }
        }

        self.write_pagination(metadata.modifiers());

        Ok(())
    }

    fn write_pagination(&mut self, modifiers: QueryModifiers) {
        let limit = modifiers.get_limit();
        let offset = modifiers.get_offset();

        match self.templates.pagination() {
            PaginationStyle::LimitOffset { max_limit } => {
                let limit = limit.or(if offset.is_some() { max_limit } else { None });
                if let Some(limit) = limit {
                    self.newline();
                    self.push(&format!("limit {limit}"));
                }
                if let Some(offset) = offset {
                    self.newline();
                    self.push(&format!("offset {offset}"));
                }
            }
            PaginationStyle::OffsetFetch => {
                if let Some(offset) = offset {
                    self.newline();
                    self.push(&format!("offset {offset} rows"));
                }
                if let Some(limit) = limit {
                    self.newline();
                    self.push(&format!("fetch first {limit} rows only"));
                }
            }
            PaginationStyle::Range => {
                if modifiers.is_restricting() {
                    let from = offset.unwrap_or(0);
                    let to = modifiers.end().unwrap_or(i64::MAX.unsigned_abs());
                    self.newline();
                    self.push(&format!("RANGE {from}, {to}"));
                }
            }
            PaginationStyle::External => {}
        }
    }
}
