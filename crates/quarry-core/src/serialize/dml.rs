//! Insert, update and delete statement text. Scalar params stay deferred
//! so the binding step can resolve them against the clause's own param
//! map. List params are resolved here, since their placeholder count
//! depends on the value.

use super::{Mode, SerializedStatement, Serializer};
use crate::{
    config::Configuration,
    error::QueryError,
    expr::{Expr, ParamMap, Path},
    obs::sink::{self, QueryEvent, StatementKind},
    schema::EntityName,
    template::Grammar,
};

fn entity_of(path: &Path) -> Result<&EntityName, QueryError> {
    match path.entity_name() {
        Some(entity) if path.is_root() => Ok(entity),
        _ => Err(QueryError::precondition(format!(
            "'{}' is not an entity root",
            path.dotted()
        ))),
    }
}

fn statement_serializer<'c>(config: &'c Configuration, params: &ParamMap) -> Serializer<'c> {
    let mut serializer =
        Serializer::new(config.templates(), Mode::Statement, config.use_literals());
    serializer.bare_columns = config.templates().grammar() == Grammar::Sql;
    serializer.scopes.push(params.clone());
    serializer
}

fn finish(serializer: Serializer<'_>, kind: StatementKind) -> SerializedStatement {
    let statement = serializer.into_statement();

    sink::record(QueryEvent::Serialized {
        dialect: statement.dialect(),
        kind,
        params: u64::try_from(statement.bindings().len()).unwrap_or(u64::MAX),
    });

    statement
}

/// `insert into TABLE (c1, c2) values (v1, v2)`. SQL dialects only.
pub fn serialize_insert(
    entity: &Path,
    columns: &[Path],
    values: &[Expr],
    params: &ParamMap,
    config: &Configuration,
) -> Result<SerializedStatement, QueryError> {
    let name = entity_of(entity)?;
    let templates = config.templates();
    let kw = templates.keywords();

    let insert_into = match (templates.grammar(), kw.insert_into) {
        (Grammar::Sql, Some(keyword)) => keyword,
        _ => {
            return Err(QueryError::unsupported("insert", templates.dialect()));
        }
    };
    if columns.is_empty() {
        return Err(QueryError::precondition("no columns to insert"));
    }
    if columns.len() != values.len() {
        return Err(QueryError::ArityMismatch {
            paths: columns.len(),
            values: values.len(),
        });
    }

    let mut serializer = statement_serializer(config, params);
    serializer.push(insert_into);
    serializer.push(" ");
    serializer.write_table(name);
    serializer.push(" (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            serializer.push(", ");
        }
        serializer.push(&templates.quote_identifier(column.name()));
    }
    serializer.push(")");
    serializer.newline();
    serializer.push(kw.values);
    serializer.push(" (");
    for (i, (column, value)) in columns.iter().zip(values).enumerate() {
        if i > 0 {
            serializer.push(", ");
        }
        serializer.constant_path = Some(column.clone());
        serializer.visit(value)?;
    }
    serializer.constant_path = None;
    serializer.push(")");

    Ok(finish(serializer, StatementKind::Insert))
}

/// `update TABLE set c = v [where ...]`; JPQL keeps the entity alias.
pub fn serialize_update(
    entity: &Path,
    assignments: &[(Path, Expr)],
    where_: Option<&Expr>,
    params: &ParamMap,
    config: &Configuration,
) -> Result<SerializedStatement, QueryError> {
    let name = entity_of(entity)?;
    let templates = config.templates();
    let kw = templates.keywords();

    let Some(update) = kw.update else {
        return Err(QueryError::unsupported("update", templates.dialect()));
    };
    if assignments.is_empty() {
        return Err(QueryError::precondition("no columns to update"));
    }

    let mut serializer = statement_serializer(config, params);
    serializer.push(update);
    serializer.push(" ");
    serializer.write_target(entity, name);
    serializer.newline();
    serializer.push(kw.set);
    serializer.push(" ");
    for (i, (column, value)) in assignments.iter().enumerate() {
        if i > 0 {
            serializer.push(", ");
        }
        serializer.visit_path(column)?;
        serializer.push(" = ");
        serializer.constant_path = Some(column.clone());
        serializer.visit(value)?;
    }
    serializer.constant_path = None;
    serializer.write_where(where_)?;

    Ok(finish(serializer, StatementKind::Update))
}

/// `delete from TABLE [where ...]`.
pub fn serialize_delete(
    entity: &Path,
    where_: Option<&Expr>,
    params: &ParamMap,
    config: &Configuration,
) -> Result<SerializedStatement, QueryError> {
    let name = entity_of(entity)?;
    let templates = config.templates();

    let mut serializer = statement_serializer(config, params);
    serializer.push(templates.keywords().delete_from);
    serializer.push(" ");
    serializer.write_target(entity, name);
    serializer.write_where(where_)?;

    Ok(finish(serializer, StatementKind::Delete))
}

impl Serializer<'_> {
    fn write_table(&mut self, entity: &EntityName) {
        let templates = self.templates;
        if let Some(schema) = entity.schema() {
            self.push(&templates.quote_identifier(schema));
            self.push(".");
        }
        self.push(&templates.quote_identifier(entity.table()));
    }

    fn write_target(&mut self, root: &Path, entity: &EntityName) {
        match self.templates.grammar() {
            Grammar::Sql => self.write_table(entity),
            Grammar::Jpql => {
                self.push(entity.simple_name());
                self.push(" ");
                self.push(root.name());
            }
            Grammar::Jdoql => {
                self.push(entity.type_name());
                self.candidate = Some(root.clone());
            }
        }
    }

    fn write_where(&mut self, where_: Option<&Expr>) -> Result<(), QueryError> {
        if let Some(predicate) = where_ {
            let keyword = self.templates.keywords().where_;
            self.newline();
            self.push(keyword);
            self.push(" ");
            self.visit(predicate)?;
        }

        Ok(())
    }
}
