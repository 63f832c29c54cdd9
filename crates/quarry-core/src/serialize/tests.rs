use super::*;
use crate::{
    config::Configuration,
    expr::exists,
    query::{JoinType, Query, QueryModifiers},
    schema::EntityName,
    test_support::{cat, cat_name, field, product},
    value::ValueType,
};
use proptest::prelude::*;

fn ansi() -> Configuration {
    Configuration::for_dialect(DialectId::Ansi)
}

fn config(dialect: DialectId) -> Configuration {
    Configuration::for_dialect(dialect)
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

// ----------------------------------------------------------------------
// Select basics
// ----------------------------------------------------------------------

#[test]
fn sql_select_binds_constants_in_order() {
    let cat = cat();
    let name = field(&cat, "name");
    let id = field(&cat, "id");

    let query = Query::new(&ansi())
        .from([cat.root()])
        .where_([name.eq("Tiddles"), id.gt(3_i64)])
        .serialize()
        .expect("serializes");

    assert_eq!(
        query.text(),
        "select *\nfrom CAT cat\nwhere cat.name = ? and cat.id > ?"
    );
    assert_eq!(query.params(), &[text("Tiddles"), Value::Int(3)]);
    assert_eq!(query.paths(), &[Some(name), Some(id)]);
}

#[test]
fn literal_mode_inlines_constants() {
    let cat = cat();
    let name = field(&cat, "name");

    let query = Query::new(&ansi().with_literals(true))
        .from([cat.root()])
        .where_([name.eq("O'Malley")])
        .serialize()
        .expect("serializes");

    assert_eq!(
        query.text(),
        "select *\nfrom CAT cat\nwhere cat.name = 'O''Malley'"
    );
    assert!(query.params().is_empty());
}

#[test]
fn or_under_and_is_parenthesized() {
    let cat = cat();
    let name = field(&cat, "name");
    let alive = field(&cat, "alive");
    let id = field(&cat, "id");

    let query = Query::new(&ansi())
        .from([cat.root()])
        .where_([name.eq("a").or(alive.eq(true)).and(id.gt(1_i64))])
        .serialize()
        .expect("serializes");

    assert!(
        query
            .text()
            .ends_with("where (cat.name = ? or cat.alive = ?) and cat.id > ?")
    );
}

#[test]
fn and_under_or_is_parenthesized() {
    let cat = cat();
    let name = field(&cat, "name");
    let alive = field(&cat, "alive");
    let id = field(&cat, "id");

    let query = Query::new(&ansi())
        .from([cat.root()])
        .where_([name.eq("a").and(alive.eq(true)).or(id.gt(1_i64))])
        .serialize()
        .expect("serializes");

    assert!(
        query
            .text()
            .ends_with("where (cat.name = ? and cat.alive = ?) or cat.id > ?")
    );
}

#[test]
fn same_associative_operator_is_flat() {
    let cat = cat();
    let id = field(&cat, "id");

    let chained = id.eq(1_i64).and(id.eq(2_i64)).and(id.eq(3_i64));
    let nested = id.eq(1_i64).and(id.eq(2_i64).and(id.eq(3_i64)));

    let render = |expr: Expr| {
        Query::new(&ansi())
            .from([cat.root()])
            .where_([expr])
            .serialize()
            .expect("serializes")
            .text()
            .to_string()
    };

    assert!(render(chained).ends_with("where cat.id = ? and cat.id = ? and cat.id = ?"));
    assert!(render(nested).ends_with("where cat.id = ? and cat.id = ? and cat.id = ?"));
}

#[test]
fn right_operand_of_subtraction_is_grouped() {
    let cat = cat();
    let id = field(&cat, "id");

    let expr = id.sub(id.sub(1_i64)).gt(0_i64);

    assert_eq!(expr.to_string(), "cat.id - (cat.id - 1) > 0");
}

#[test]
fn not_wraps_compound_operand() {
    let cat = cat();
    let name = field(&cat, "name");

    assert_eq!(name.eq("x").not().to_string(), "not (cat.name = 'x')");
    assert_eq!(name.lower().eq("x").to_string(), "lower(cat.name) = 'x'");
}

#[test]
fn in_list_flattens_to_placeholder_group() {
    let cat = cat();
    let id = field(&cat, "id");

    let query = Query::new(&ansi())
        .from([cat.root()])
        .where_([id.in_list([1_i64, 2, 3])])
        .serialize()
        .expect("serializes");

    assert!(query.text().ends_with("where cat.id in (?, ?, ?)"));
    assert_eq!(query.params().len(), 3);
    assert!(query.paths().iter().all(|path| path.as_ref() == Some(&id)));
}

#[test]
fn empty_in_list_renders_constant_predicates() {
    let cat = cat();
    let id = field(&cat, "id");

    let query = Query::new(&ansi())
        .from([cat.root()])
        .where_([id.in_list(Vec::<i64>::new())])
        .serialize()
        .expect("serializes");
    assert!(query.text().ends_with("where 1 = 0"));
    assert!(query.params().is_empty());

    let query = Query::new(&ansi())
        .from([cat.root()])
        .where_([id.not_in_list(Vec::<i64>::new())])
        .serialize()
        .expect("serializes");
    assert!(query.text().ends_with("where 1 = 1"));
}

#[test]
fn starts_with_escapes_and_decorates_text() {
    let cat = cat();
    let name = field(&cat, "name");

    let query = Query::new(&ansi())
        .from([cat.root()])
        .where_([name.starts_with("50%_off")])
        .serialize()
        .expect("serializes");

    assert!(query.text().ends_with("where cat.name like ? escape '!'"));
    assert_eq!(query.params(), &[text("50!%!_off%")]);
}

#[test]
fn ends_with_path_operand_concatenates_wildcard() {
    let cat = cat();
    let product = product();
    let name = field(&cat, "name");
    let product_name = field(&product, "name");

    let query = Query::new(&ansi())
        .from([cat.root(), product.root()])
        .where_([name.ends_with(&product_name)])
        .serialize()
        .expect("serializes");

    assert!(
        query
            .text()
            .ends_with("where cat.name like ? || product.name escape '!'")
    );
    assert_eq!(query.params(), &[text("%")]);
    assert_eq!(query.paths(), &[Some(name)]);
}

#[test]
fn bound_param_resolves_and_unbound_param_fails() {
    let cat = cat();
    let name = field(&cat, "name");
    let param = Param::new("name", ValueType::Text);

    let unbound = Query::new(&ansi())
        .from([cat.root()])
        .where_([name.eq(&param)]);
    let err = unbound.serialize().expect_err("unbound");
    assert!(matches!(err, QueryError::ParameterNotSet { param: p } if p == param));

    let query = unbound.bind(&param, "Felix").serialize().expect("bound");
    assert_eq!(query.params(), &[text("Felix")]);
}

#[test]
fn unbound_param_previews_by_name() {
    let cat = cat();
    let name = field(&cat, "name");
    let param = Param::new("who", ValueType::Text);

    assert_eq!(name.eq(&param).to_string(), "cat.name = :who");
}

// ----------------------------------------------------------------------
// Joins
// ----------------------------------------------------------------------

#[test]
fn default_sources_are_comma_separated_with_conditions_in_where() {
    let cat = cat();
    let product = product();
    let cat_id = field(&cat, "id");
    let product_id = field(&product, "id");

    let query = Query::new(&ansi())
        .from([cat.root(), product.root()])
        .on([product_id.eq(&cat_id)])
        .expect("has joins")
        .serialize()
        .expect("serializes");

    assert_eq!(
        query.text(),
        "select *\nfrom CAT cat, PRODUCTS product\nwhere product.id = cat.id"
    );
}

#[test]
fn typed_join_renders_keyword_and_condition() {
    let cat = cat();
    let product = product();
    let cat_id = field(&cat, "id");
    let product_id = field(&product, "id");

    let query = Query::new(&ansi())
        .from([cat.root()])
        .join_on(JoinType::LeftJoin, product.root(), product_id.eq(&cat_id))
        .expect("joins")
        .serialize()
        .expect("serializes");

    assert_eq!(
        query.text(),
        "select *\nfrom CAT cat\nleft join PRODUCTS product on product.id = cat.id"
    );
}

#[test]
fn derby_rejects_full_join() {
    let cat = cat();
    let product = product();

    let err = Query::new(&config(DialectId::Derby))
        .from([cat.root()])
        .full_join(product.root())
        .serialize()
        .expect_err("unsupported");

    assert!(matches!(
        err,
        QueryError::UnsupportedConstruct {
            dialect: DialectId::Derby,
            ..
        }
    ));
}

#[test]
fn jpql_fetch_join_uses_alias_and_prefix() {
    let cat = cat();
    let kittens = field(&cat, "kittens");
    let kitten = Path::entity(cat_name(), "kitten");

    let query = Query::new(&config(DialectId::Jpql))
        .from([cat.root()])
        .inner_join_as(&kittens, &kitten)
        .fetch()
        .expect("has joins")
        .serialize()
        .expect("serializes");

    assert_eq!(
        query.text(),
        "from Cat cat\ninner join fetch cat.kittens as kitten"
    );
}

#[test]
fn jpql_with_condition_declares_any_alias_first() {
    let cat = cat();
    let kitten_name = field(&cat, "kittens").any().property("name", ValueType::Text);
    let mate = Path::entity(cat_name(), "m");

    let query = Query::new(&config(DialectId::Jpql))
        .from([cat.root()])
        .inner_join_as(&field(&cat, "mate"), &mate)
        .with([kitten_name.eq("a")])
        .expect("has joins")
        .serialize()
        .expect("serializes");

    assert_eq!(
        query.text(),
        "from Cat cat\n\
         inner join cat.kittens as cat_kittens_0\n\
         inner join cat.mate as m with cat_kittens_0.name = ?1"
    );
    assert_eq!(query.params(), [text("a")]);
}

#[test]
fn jpql_collection_any_becomes_inner_join() {
    let cat = cat();
    let kittens = field(&cat, "kittens");
    let kitten_name = kittens.any().property("name", ValueType::Text);

    let query = Query::new(&config(DialectId::Jpql))
        .from([cat.root()])
        .where_([kitten_name.eq("Fluffy")])
        .serialize()
        .expect("serializes");

    assert_eq!(
        query.text(),
        "from Cat cat\ninner join cat.kittens as cat_kittens_0\nwhere cat_kittens_0.name = ?1"
    );
    assert_eq!(query.params(), &[text("Fluffy")]);
}

#[test]
fn sql_rejects_collection_any_paths() {
    let cat = cat();
    let kittens = field(&cat, "kittens");
    let kitten_name = kittens.any().property("name", ValueType::Text);

    let err = Query::new(&ansi())
        .from([cat.root()])
        .where_([kitten_name.eq("Fluffy")])
        .serialize()
        .expect_err("any-path outside a join");

    assert!(matches!(err, QueryError::UnsupportedConstruct { .. }));
}

#[test]
fn source_without_joins_is_a_precondition_failure() {
    let err = Query::new(&ansi()).serialize().expect_err("no source");

    assert!(matches!(err, QueryError::BuilderPrecondition(_)));
}

// ----------------------------------------------------------------------
// JDOQL
// ----------------------------------------------------------------------

#[test]
fn jdoql_declares_extra_sources_as_variables() {
    let product = product();
    let other = product.aliased("product2");

    let query = Query::new(&config(DialectId::Jdoql))
        .from([product.root(), other.root()])
        .serialize()
        .expect("serializes");

    assert_eq!(
        query.text(),
        "FROM com.example.domain.Product\nVARIABLES com.example.domain.Product product2"
    );
}

#[test]
fn jdoql_candidate_renders_as_this() {
    let cat = cat();
    let name = field(&cat, "name");

    let query = Query::new(&config(DialectId::Jdoql))
        .from([cat.root()])
        .where_([name.eq("Tom")])
        .limit(10)
        .offset(5)
        .serialize()
        .expect("serializes");

    assert_eq!(
        query.text(),
        "FROM com.example.domain.Cat\nWHERE this.name == :a1\nRANGE 5, 15"
    );
}

#[test]
fn instance_of_names_the_entity_type() {
    let product = product();
    let book = EntityName::new("com.example.domain.Book");
    let is_book = product.root().instance_of(&book);

    assert!(is_book.is_predicate());

    let jdoql = Query::new(&config(DialectId::Jdoql))
        .from([product.root()])
        .where_([is_book.clone()])
        .serialize()
        .expect("serializes");
    assert_eq!(
        jdoql.text(),
        "FROM com.example.domain.Product\nWHERE this instanceof com.example.domain.Book"
    );

    let jpql = Query::new(&config(DialectId::Jpql))
        .from([product.root()])
        .where_([is_book.clone()])
        .serialize()
        .expect("serializes");
    assert_eq!(jpql.text(), "from Product product\nwhere type(product) = Book");

    let err = Query::new(&ansi())
        .from([product.root()])
        .where_([is_book])
        .serialize()
        .expect_err("no runtime types in SQL");
    assert!(matches!(err, QueryError::UnsupportedConstruct { .. }));
}

#[test]
fn jdoql_collection_any_becomes_contains_variable() {
    let cat = cat();
    let kittens = field(&cat, "kittens");
    let kitten_name = kittens.any().property("name", ValueType::Text);

    let query = Query::new(&config(DialectId::Jdoql))
        .from([cat.root()])
        .where_([kitten_name.eq("Fluffy")])
        .serialize()
        .expect("serializes");

    assert_eq!(
        query.text(),
        "FROM com.example.domain.Cat\n\
         WHERE this.kittens.contains(cat_kittens_0) && cat_kittens_0.name == :a1\n\
         VARIABLES com.example.domain.Cat cat_kittens_0"
    );
}

// ----------------------------------------------------------------------
// Tail clauses
// ----------------------------------------------------------------------

#[test]
fn order_by_renders_direction_and_nulls() {
    let cat = cat();
    let name = field(&cat, "name");
    let id = field(&cat, "id");

    let query = Query::new(&config(DialectId::Postgres))
        .from([cat.root()])
        .order_by([name.asc().nulls_last(), id.desc()])
        .serialize()
        .expect("serializes");

    assert_eq!(
        query.text(),
        "select *\nfrom CAT cat\norder by cat.name asc nulls last, cat.id desc"
    );

    let err = Query::new(&config(DialectId::Derby))
        .from([cat.root()])
        .order_by([name.asc().nulls_first()])
        .serialize()
        .expect_err("derby has no nulls ordering");
    assert!(matches!(err, QueryError::UnsupportedConstruct { .. }));
}

#[test]
fn group_by_and_having_follow_where() {
    let cat = cat();
    let name = field(&cat, "name");
    let weight = field(&cat, "bodyWeight");

    let query = Query::new(&ansi())
        .from([cat.root()])
        .select([Expr::from(&name), weight.avg()])
        .where_([weight.gt(1.5)])
        .group_by([&name])
        .having([weight.avg().gt(2.0)])
        .serialize()
        .expect("serializes");

    assert_eq!(
        query.text(),
        "select cat.name, avg(cat.bodyWeight)\nfrom CAT cat\nwhere cat.bodyWeight > ?\n\
         group by cat.name\nhaving avg(cat.bodyWeight) > ?"
    );
}

#[test]
fn pagination_styles_per_dialect() {
    let cat = cat();
    let page = |dialect| {
        Query::new(&config(dialect))
            .from([cat.root()])
            .restrict(QueryModifiers::new(Some(10), Some(20)))
            .serialize()
            .expect("serializes")
    };

    assert!(page(DialectId::Postgres).text().ends_with("\nlimit 10\noffset 20"));
    assert!(
        page(DialectId::Ansi)
            .text()
            .ends_with("\noffset 20 rows\nfetch first 10 rows only")
    );
    assert!(page(DialectId::Jdoql).text().ends_with("\nRANGE 20, 30"));

    let jpql = page(DialectId::Jpql);
    assert_eq!(jpql.text(), "from Cat cat");
    assert_eq!(jpql.modifiers(), QueryModifiers::new(Some(10), Some(20)));
}

#[test]
fn mysql_offset_only_uses_max_limit() {
    let cat = cat();

    let query = Query::new(&config(DialectId::MySql))
        .from([cat.root()])
        .offset(5)
        .serialize()
        .expect("serializes");

    assert!(
        query
            .text()
            .ends_with("\nlimit 18446744073709551615\noffset 5")
    );
}

#[test]
fn derby_single_space_config_collapses_clause_breaks() {
    let cat = cat();
    let name = field(&cat, "name");
    let config =
        Configuration::from_toml_str("dialect = \"derby\"\nnew_line_to_single_space = true")
            .expect("valid config");

    let query = Query::new(&config)
        .from([cat.root()])
        .where_([name.eq("x")])
        .limit(10)
        .offset(20)
        .serialize()
        .expect("serializes");

    assert_eq!(
        query.text(),
        "select * from CAT cat where cat.name = ? offset 20 rows fetch first 10 rows only"
    );
}

#[test]
fn count_drops_ordering_and_pagination() {
    let cat = cat();
    let name = field(&cat, "name");

    let ansi_count = Query::new(&ansi())
        .from([cat.root()])
        .where_([name.eq("x")])
        .order_by([name.asc()])
        .limit(3)
        .serialize_count()
        .expect("serializes");
    assert_eq!(
        ansi_count.text(),
        "select count(*)\nfrom CAT cat\nwhere cat.name = ?"
    );
    assert_eq!(ansi_count.modifiers(), QueryModifiers::default());

    let jpql_count = Query::new(&config(DialectId::Jpql))
        .from([cat.root()])
        .serialize_count()
        .expect("serializes");
    assert_eq!(jpql_count.text(), "select count(cat)\nfrom Cat cat");
}

#[test]
fn count_keeps_distinct_over_joined_rows() {
    let cat = cat();
    let kittens = field(&cat, "kittens");
    let kitten = Path::entity(cat_name(), "kitten");

    let jpql = Query::new(&config(DialectId::Jpql))
        .from([cat.root()])
        .inner_join_as(&kittens, &kitten)
        .distinct();
    assert_eq!(
        jpql.serialize().expect("serializes").text(),
        "select distinct cat\nfrom Cat cat\ninner join cat.kittens as kitten"
    );
    assert_eq!(
        jpql.serialize_count().expect("serializes").text(),
        "select count(distinct cat)\nfrom Cat cat\ninner join cat.kittens as kitten"
    );

    let jdoql_count = Query::new(&config(DialectId::Jdoql))
        .from([cat.root()])
        .distinct()
        .serialize_count()
        .expect("serializes");
    assert_eq!(
        jdoql_count.text(),
        "SELECT count(DISTINCT this)\nFROM com.example.domain.Cat"
    );
}

#[test]
fn sql_count_wraps_multi_column_distinct() {
    let cat = cat();
    let name = field(&cat, "name");
    let id = field(&cat, "id");

    let count = Query::new(&ansi())
        .from([cat.root()])
        .where_([id.gt(3_i64)])
        .select([Expr::from(&name), Expr::from(&id)])
        .distinct()
        .order_by([name.asc()])
        .limit(5)
        .serialize_count()
        .expect("serializes");

    assert_eq!(
        count.text(),
        "select count(*)\nfrom (select distinct cat.name, cat.id\nfrom CAT cat\nwhere cat.id > ?) distinct_rows"
    );
    assert_eq!(count.params(), [Value::Int(3)]);

    let single = Query::new(&ansi())
        .from([cat.root()])
        .select([Expr::from(&name)])
        .distinct()
        .serialize_count()
        .expect("serializes");
    assert_eq!(
        single.text(),
        "select count(distinct cat.name)\nfrom CAT cat"
    );
}

#[test]
fn object_query_count_rejects_multi_column_distinct() {
    let cat = cat();
    let name = field(&cat, "name");
    let id = field(&cat, "id");

    for dialect in [DialectId::Jpql, DialectId::Jdoql] {
        let err = Query::new(&config(dialect))
            .from([cat.root()])
            .select([Expr::from(&name), Expr::from(&id)])
            .distinct()
            .serialize_count()
            .expect_err("no derived tables");
        assert!(
            matches!(err, QueryError::UnsupportedConstruct { .. }),
            "{dialect}"
        );
    }
}

#[test]
fn exists_sub_query_renders_parenthesized_select() {
    let cat = cat();
    let product = product();
    let cat_name = field(&cat, "name");
    let product_name = field(&product, "name");

    let sub = Query::new(&ansi())
        .from([product.root()])
        .where_([product_name.eq(&cat_name)])
        .into_metadata();

    let query = Query::new(&ansi())
        .from([cat.root()])
        .where_([exists(sub)])
        .serialize()
        .expect("serializes");

    assert_eq!(
        query.text(),
        "select *\nfrom CAT cat\nwhere exists (select *\nfrom PRODUCTS product\nwhere product.name = cat.name)"
    );
}

#[test]
fn postgres_placeholders_are_numbered() {
    let cat = cat();
    let name = field(&cat, "name");
    let id = field(&cat, "id");

    let query = Query::new(&config(DialectId::Postgres))
        .from([cat.root()])
        .where_([name.eq("x"), id.in_list([1_i64, 2])])
        .serialize()
        .expect("serializes");

    assert!(
        query
            .text()
            .ends_with("where cat.name = $1 and cat.id in ($2, $3)")
    );
}

#[test]
fn custom_template_is_dialect_gated() {
    let cat = cat();
    let name = field(&cat, "name");
    let soundex = Expr::Custom(
        Custom::new(
            Template::new("soundex({0})"),
            vec![Expr::from(&name)],
            ValueType::Text,
        )
        .only_for(&[DialectId::MySql]),
    );

    let mysql = Query::new(&config(DialectId::MySql))
        .from([cat.root()])
        .where_([soundex.eq("T500")])
        .serialize()
        .expect("mysql supports it");
    assert!(mysql.text().ends_with("where soundex(cat.name) = ?"));

    let err = Query::new(&ansi())
        .from([cat.root()])
        .where_([soundex.eq("T500")])
        .serialize()
        .expect_err("ansi does not");
    assert!(matches!(err, QueryError::UnsupportedConstruct { .. }));
}

// ----------------------------------------------------------------------
// Determinism and fingerprints
// ----------------------------------------------------------------------

#[test]
fn serialization_is_idempotent() {
    let cat = cat();
    let name = field(&cat, "name");
    let query = Query::new(&ansi())
        .from([cat.root()])
        .where_([name.eq("x")]);

    let first = query.serialize().expect("serializes");
    let second = query.serialize().expect("serializes");

    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn fingerprint_ignores_values_but_not_dialect() {
    let cat = cat();
    let name = field(&cat, "name");
    let render = |dialect, value: &str| {
        Query::new(&config(dialect))
            .from([cat.root()])
            .where_([name.eq(value)])
            .serialize()
            .expect("serializes")
            .fingerprint()
    };

    assert_eq!(
        render(DialectId::Ansi, "a"),
        render(DialectId::Ansi, "b")
    );
    assert_ne!(
        render(DialectId::Ansi, "a"),
        render(DialectId::Derby, "a")
    );
    assert_eq!(render(DialectId::Ansi, "a").as_hex().len(), 64);
    assert_eq!(render(DialectId::Ansi, "a").short().len(), 8);
}

// ----------------------------------------------------------------------
// DML
// ----------------------------------------------------------------------

#[test]
fn sql_insert_defers_params() {
    let cat = cat();
    let id = field(&cat, "id");
    let name = field(&cat, "name");
    let param = Param::new("name", ValueType::Text);

    let statement = serialize_insert(
        cat.root(),
        &[id.clone(), name.clone()],
        &[Expr::constant(1_i64), Expr::param(param.clone())],
        &ParamMap::new(),
        &ansi(),
    )
    .expect("serializes");

    assert_eq!(statement.text(), "insert into CAT (id, name)\nvalues (?, ?)");
    assert_eq!(
        statement.bindings(),
        &[Binding::Value(Value::Int(1)), Binding::Param(param)]
    );
    assert_eq!(statement.paths(), &[Some(id), Some(name)]);
}

#[test]
fn insert_arity_mismatch_is_rejected() {
    let cat = cat();
    let id = field(&cat, "id");

    let err = serialize_insert(cat.root(), &[id], &[], &ParamMap::new(), &ansi()).expect_err("arity");

    assert!(matches!(
        err,
        QueryError::ArityMismatch {
            paths: 1,
            values: 0
        }
    ));
}

#[test]
fn update_uses_bare_columns_in_sql_and_alias_in_jpql() {
    let cat = cat();
    let id = field(&cat, "id");
    let name = field(&cat, "name");
    let assignments = [(name.clone(), Expr::constant("Tom"))];
    let filter = id.eq(7_i64);

    let sql = serialize_update(cat.root(), &assignments, Some(&filter), &ParamMap::new(), &ansi())
        .expect("serializes");
    assert_eq!(sql.text(), "update CAT\nset name = ?\nwhere id = ?");

    let jpql = serialize_update(
        cat.root(),
        &assignments,
        Some(&filter),
        &ParamMap::new(),
        &config(DialectId::Jpql),
    )
    .expect("serializes");
    assert_eq!(
        jpql.text(),
        "update Cat cat\nset cat.name = ?1\nwhere cat.id = ?2"
    );
}

#[test]
fn jdoql_delete_targets_candidate_type() {
    let cat = cat();
    let alive = field(&cat, "alive");
    let filter = alive.eq(false);

    let statement = serialize_delete(
        cat.root(),
        Some(&filter),
        &ParamMap::new(),
        &config(DialectId::Jdoql),
    )
        .expect("serializes");

    assert_eq!(
        statement.text(),
        "DELETE FROM com.example.domain.Cat\nWHERE this.alive == :a1"
    );
}

#[test]
fn object_dialects_reject_insert() {
    let cat = cat();
    let id = field(&cat, "id");

    for dialect in [DialectId::Jpql, DialectId::Jdoql] {
        let err = serialize_insert(
            cat.root(),
            &[id.clone()],
            &[Expr::constant(1_i64)],
            &ParamMap::new(),
            &config(dialect),
        )
            .expect_err("no insert");
        assert!(matches!(err, QueryError::UnsupportedConstruct { .. }));
    }
}

// ----------------------------------------------------------------------
// Properties
// ----------------------------------------------------------------------

fn arb_leaf() -> impl Strategy<Value = Expr> {
    let cat = cat();
    let id = field(&cat, "id");
    let name = field(&cat, "name");
    let weight = field(&cat, "bodyWeight");

    prop_oneof![
        any::<i64>().prop_map(move |n| id.eq(n)),
        "[a-z]{0,6}".prop_map(move |s| name.starts_with(s)),
        prop::collection::vec(any::<i64>(), 0..4).prop_map({
            let id = field(&cat, "id");
            move |items| id.in_list(items)
        }),
        (-1.0e6..1.0e6f64).prop_map(move |f| weight.lt(f)),
    ]
}

fn arb_predicate() -> impl Strategy<Value = Expr> {
    arb_leaf().prop_recursive(3, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.and(b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.or(b)),
            inner.prop_map(|p| p.not()),
        ]
    })
}

proptest! {
    #[test]
    fn placeholders_align_with_params(predicate in arb_predicate()) {
        let cat = cat();
        let query = Query::new(&ansi())
            .from([cat.root()])
            .where_([predicate])
            .serialize()
            .expect("serializes");

        prop_assert_eq!(query.text().matches('?').count(), query.params().len());
        prop_assert_eq!(query.paths().len(), query.params().len());
    }

    #[test]
    fn numbered_placeholders_are_sequential(predicate in arb_predicate()) {
        let cat = cat();
        let query = Query::new(&config(DialectId::Postgres))
            .from([cat.root()])
            .where_([predicate])
            .serialize()
            .expect("serializes");

        let numbers: Vec<usize> = query
            .text()
            .split('$')
            .skip(1)
            .map(|rest| {
                rest.chars()
                    .take_while(char::is_ascii_digit)
                    .collect::<String>()
                    .parse()
                    .expect("placeholder index")
            })
            .collect();

        prop_assert_eq!(numbers, (1..=query.params().len()).collect::<Vec<_>>());
    }

    #[test]
    fn serializing_twice_is_identical(predicate in arb_predicate()) {
        let cat = cat();
        let query = Query::new(&config(DialectId::Jpql))
            .from([cat.root()])
            .where_([predicate]);

        prop_assert_eq!(query.serialize().expect("first"), query.serialize().expect("second"));
    }
}
