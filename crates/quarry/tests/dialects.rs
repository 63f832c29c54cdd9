use proptest::prelude::*;
use quarry::{
    Error, ErrorKind, ErrorOrigin,
    core::exec::{
        CoercionError, ExecuteOutcome, ExecutorError, Statement, StatementExecutor, TypeCoercion,
    },
    prelude::*,
};
use std::{cell::RefCell, rc::Rc};

const CAT: &str = "com.example.Cat";

fn cat() -> EntityDescriptor {
    EntityDescriptor::new(EntityName::new(CAT))
        .field("id", ValueType::Int)
        .field("name", ValueType::Text)
        .field("alive", ValueType::Bool)
}

fn field(descriptor: &EntityDescriptor, name: &str) -> Path {
    descriptor.get(name).cloned().expect("declared field")
}

fn page_of_living_cats(dialect: DialectId) -> Query {
    let cat = cat();

    Query::new(&Configuration::for_dialect(dialect))
        .from([cat.root()])
        .where_([field(&cat, "alive").eq(true)])
        .order_by([field(&cat, "name").asc()])
        .limit(10)
        .offset(20)
}

// ----------------------------------------------------------------------
// Recording backend
// ----------------------------------------------------------------------

#[derive(Default)]
struct Journal {
    prepared: Vec<String>,
    bound: Vec<(usize, Value)>,
    closed: usize,
}

#[derive(Default)]
struct Backend {
    journal: Rc<RefCell<Journal>>,
    rows: Vec<Row>,
}

struct Handle {
    journal: Rc<RefCell<Journal>>,
    rows: Vec<Row>,
}

impl StatementExecutor for Backend {
    type Statement = Handle;

    fn prepare(&self, text: &str) -> Result<Handle, ExecutorError> {
        self.journal.borrow_mut().prepared.push(text.to_string());

        Ok(Handle {
            journal: Rc::clone(&self.journal),
            rows: self.rows.clone(),
        })
    }
}

impl TypeCoercion for Handle {
    fn bind(
        &mut self,
        slot: usize,
        _path: Option<&Path>,
        value: &Value,
    ) -> Result<usize, CoercionError> {
        self.journal.borrow_mut().bound.push((slot, value.clone()));
        Ok(1)
    }
}

impl Statement for Handle {
    fn execute(&mut self) -> Result<ExecuteOutcome, ExecutorError> {
        Ok(ExecuteOutcome::Rows(std::mem::take(&mut self.rows)))
    }

    fn close(&mut self) -> Result<(), ExecutorError> {
        self.journal.borrow_mut().closed += 1;
        Ok(())
    }
}

// ----------------------------------------------------------------------
// Rendering
// ----------------------------------------------------------------------

#[test]
fn one_query_many_dialects() {
    let cases = [
        (
            DialectId::Ansi,
            "select *\nfrom CAT cat\nwhere cat.alive = ?\norder by cat.name asc\noffset 20 rows\nfetch first 10 rows only",
        ),
        (
            DialectId::Postgres,
            "select *\nfrom CAT cat\nwhere cat.alive = $1\norder by cat.name asc\nlimit 10\noffset 20",
        ),
        (
            DialectId::Jpql,
            "from Cat cat\nwhere cat.alive = ?1\norder by cat.name asc",
        ),
        (
            DialectId::Jdoql,
            "FROM com.example.Cat\nWHERE this.alive == :a1\nORDER BY this.name ASC\nRANGE 20, 30",
        ),
    ];

    for (dialect, expected) in cases {
        let serialized = page_of_living_cats(dialect)
            .serialize()
            .unwrap_or_else(|err| panic!("{dialect}: {err}"));

        assert_eq!(serialized.text(), expected, "{dialect}");
        assert_eq!(serialized.params(), [Value::Bool(true)], "{dialect}");
    }
}

#[test]
fn config_file_selects_the_dialect() {
    let config = Configuration::from_toml_str(
        "dialect = \"postgres\"\nnew_line_to_single_space = true\n",
    )
    .map_err(Error::from)
    .expect("valid config");
    let cat = cat();

    let text = Query::new(&config)
        .from([cat.root()])
        .where_([field(&cat, "id").eq(3_i64)])
        .serialize()
        .expect("serializes")
        .text()
        .to_string();

    assert_eq!(text, "select * from CAT cat where cat.id = $1");
}

#[test]
fn unknown_dialect_maps_to_config_error() {
    let err = Configuration::from_toml_str("dialect = \"cobol\"")
        .map_err(Error::from)
        .expect_err("unknown dialect");

    assert_eq!(err.kind, ErrorKind::Config);
    assert_eq!(err.origin, ErrorOrigin::Config);
}

#[test]
fn unbound_param_surfaces_as_not_set() {
    let cat = cat();
    let who = Param::new("who", ValueType::Text);

    let err = Query::new(&Configuration::for_dialect(DialectId::Ansi))
        .from([cat.root()])
        .where_([field(&cat, "name").eq(&who)])
        .serialize()
        .map_err(Error::from)
        .expect_err("unbound");

    assert_eq!(err.kind, ErrorKind::NotSet);
    assert!(err.message.contains("who"));
}

// ----------------------------------------------------------------------
// Execution
// ----------------------------------------------------------------------

#[test]
fn list_runs_against_a_backend() {
    let backend = Backend {
        rows: vec![Row::new(vec![Value::from("Tom")])],
        ..Backend::default()
    };

    let rows = page_of_living_cats(DialectId::Postgres)
        .list(&backend)
        .expect("runs");

    assert_eq!(rows.len(), 1);
    let journal = backend.journal.borrow();
    assert_eq!(journal.prepared.len(), 1);
    assert_eq!(journal.bound, [(1, Value::Bool(true))]);
    assert_eq!(journal.closed, 1);
}

#[test]
fn dml_round_trip_through_the_facade() {
    let cat = cat();
    let config = Configuration::for_dialect(DialectId::MySql);
    let backend = Backend::default();

    InsertClause::new(&config, cat.root())
        .set(&field(&cat, "id"), 1_i64)
        .set(&field(&cat, "name"), "Tom")
        .execute(&backend)
        .expect("insert");
    UpdateClause::new(&config, cat.root())
        .set(&field(&cat, "alive"), false)
        .where_([field(&cat, "id").eq(1_i64)])
        .execute(&backend)
        .expect("update");
    DeleteClause::new(&config, cat.root())
        .where_([field(&cat, "alive").eq(false)])
        .execute(&backend)
        .expect("delete");

    let journal = backend.journal.borrow();
    assert_eq!(
        journal.prepared,
        [
            "insert into CAT (id, name)\nvalues (?, ?)",
            "update CAT\nset alive = ?\nwhere id = ?",
            "delete from CAT\nwhere alive = ?",
        ]
    );
    assert_eq!(journal.bound.len(), 5);
    assert_eq!(journal.closed, 3);
}

proptest! {
    #[test]
    fn every_in_list_value_gets_a_placeholder(values in prop::collection::vec(any::<i64>(), 1..12)) {
        let cat = cat();
        let query = Query::new(&Configuration::for_dialect(DialectId::Postgres))
            .from([cat.root()])
            .where_([field(&cat, "id").in_list(values.clone())]);

        let serialized = query.serialize().expect("serializes");
        let placeholders = serialized.text().matches('$').count();

        prop_assert_eq!(placeholders, values.len());
        prop_assert_eq!(serialized.params().len(), values.len());
    }
}
