use super::*;
use crate::{
    error::QueryError,
    query::QueryMetadata,
    template::Template,
    test_support::{cat, cat_name, field},
};

// ----------------------------------------------------------------------
// Paths
// ----------------------------------------------------------------------

#[test]
fn path_walks_to_its_root() {
    let cat = cat();
    let mate_name = field(&cat, "mate").property("name", ValueType::Text);

    assert_eq!(mate_name.dotted(), "cat.mate.name");
    assert_eq!(mate_name.depth(), 2);
    assert_eq!(mate_name.root(), cat.root());
    assert!(cat.root().is_root());
    assert_eq!(cat.root().entity_name(), Some(&cat_name()));
}

#[test]
fn any_element_takes_the_collection_element_type() {
    let cat = cat();
    let any = field(&cat, "kittens").any();

    assert_eq!(any.kind(), PathKind::CollectionAny);
    assert_eq!(any.name(), ANY_ELEMENT);
    assert_eq!(any.value_type(), &ValueType::Entity(cat_name()));
    assert!(any.property("name", ValueType::Text).contains_any());
    assert!(!field(&cat, "kittens").contains_any());

    let scalar = field(&cat, "name").any();
    assert_eq!(scalar.value_type(), &ValueType::Any);
}

#[test]
fn paths_compare_structurally() {
    let left = cat();
    let right = cat();

    assert_eq!(field(&left, "name"), field(&right, "name"));
    assert_ne!(field(&left, "name"), field(&left.aliased("other"), "name"));

    let moved = field(&left, "name").with_parent(Path::variable("c2", ValueType::Any));
    assert_eq!(moved.dotted(), "c2.name");
}

// ----------------------------------------------------------------------
// Params
// ----------------------------------------------------------------------

#[test]
fn params_are_distinct_by_identity() {
    let first = Param::new("name", ValueType::Text);
    let second = Param::new("name", ValueType::Text);

    assert_ne!(first, second);
    assert_eq!(first, first.clone());
    assert!(first.id() < second.id());

    let anonymous = Param::anonymous(ValueType::Int);
    assert_eq!(anonymous.name(), format!("param{}", anonymous.id().get()));
}

#[test]
fn param_map_rebinds_by_identity() {
    let first = Param::new("name", ValueType::Text);
    let second = Param::new("name", ValueType::Text);
    let mut params = ParamMap::new();

    params.set(&first, "a");
    params.set(&first, "b");

    assert_eq!(params.len(), 1);
    assert_eq!(params.get(&first), Some(&Value::Text("b".to_string())));
    assert!(!params.contains(&second));
}

// ----------------------------------------------------------------------
// Operations
// ----------------------------------------------------------------------

#[test]
fn operation_checks_arity() {
    let cat = cat();

    let err = Expr::operation(Operator::Eq, vec![field(&cat, "id").into()])
        .expect_err("one arg for a binary operator");
    assert!(matches!(
        err,
        QueryError::OperatorArity {
            op: Operator::Eq,
            expected: 2,
            actual: 1
        }
    ));

    let ok = Expr::operation(
        Operator::Eq,
        vec![field(&cat, "id").into(), Expr::constant(1_i64)],
    )
    .expect("two args");
    assert_eq!(ok, field(&cat, "id").eq(1_i64));
}

#[test]
fn value_types_follow_the_operator() {
    let cat = cat();
    let id = field(&cat, "id");
    let name = field(&cat, "name");

    assert_eq!(id.eq(1_i64).value_type(), ValueType::Bool);
    assert!(name.starts_with("x").is_predicate());
    assert_eq!(name.concat("x").value_type(), ValueType::Text);
    assert_eq!(name.length().value_type(), ValueType::Int);
    assert_eq!(id.avg().value_type(), ValueType::Float);
    assert_eq!(id.sum().value_type(), ValueType::Int);
    assert_eq!(field(&cat, "bodyWeight").max().value_type(), ValueType::Float);
    assert_eq!(
        Expr::sub_query(QueryMetadata::new()).value_type(),
        ValueType::Any
    );
}

#[test]
fn contains_depends_on_the_operand() {
    let cat = cat();
    let kittens = field(&cat, "kittens");
    let name = field(&cat, "name");

    let membership = kittens.contains(cat.root());
    let op = membership.as_operation().expect("operation");
    assert_eq!(op.op(), Operator::In);
    assert_eq!(op.arg(1), Some(&Expr::from(&kittens)));

    let substring = name.contains("abc");
    assert_eq!(
        substring.as_operation().map(Operation::op),
        Some(Operator::StringContains)
    );
}

#[test]
fn in_list_collects_a_list_constant() {
    let cat = cat();
    let expr = field(&cat, "id").in_list([1_i64, 2, 3]);

    let op = expr.as_operation().expect("operation");
    assert_eq!(
        op.arg(1),
        Some(&Expr::Constant(Value::List(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(3)
        ])))
    );
}

#[test]
fn atomic_nodes() {
    let cat = cat();
    let name = field(&cat, "name");

    assert!(Expr::from(&name).is_atomic());
    assert!(Expr::constant(1_i64).is_atomic());
    assert!(Expr::param(Param::new("p", ValueType::Int)).is_atomic());
    assert!(!name.eq("x").is_atomic());
    assert!(!Expr::custom("f({0})", vec![name.into()], ValueType::Int).is_atomic());
}

#[test]
fn custom_dialect_restriction() {
    let custom = Custom::new(Template::new("soundex({0})"), Vec::new(), ValueType::Text)
        .only_for(&[DialectId::MySql, DialectId::Postgres]);

    assert!(custom.supports(DialectId::MySql));
    assert!(!custom.supports(DialectId::Ansi));
    assert!(
        Custom::new(Template::new("x"), Vec::new(), ValueType::Any).supports(DialectId::Jdoql)
    );
}

// ----------------------------------------------------------------------
// Display
// ----------------------------------------------------------------------

#[test]
fn display_renders_a_preview() {
    let cat = cat();
    let name = field(&cat, "name");
    let who = Param::new("who", ValueType::Text);

    assert_eq!(name.eq(&who).to_string(), "cat.name = :who");
    assert_eq!(
        name.eq("Tom").and(field(&cat, "alive").not()).to_string(),
        "cat.name = 'Tom' and not cat.alive"
    );
    assert_eq!(name.concat("!").to_string(), "cat.name || '!'");
}
