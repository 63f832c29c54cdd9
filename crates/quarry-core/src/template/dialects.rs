use crate::{
    expr::Operator,
    template::{
        DialectId, Grammar, Keywords, LiteralForms, OperatorTemplate, PREC_ADD, PREC_BOOLEAN,
        PREC_COMPARE, PREC_MUL, PREC_NOT, PREC_UNARY, PaginationStyle, PlaceholderStyle, Template,
        Templates,
    },
};
use std::collections::{BTreeMap, BTreeSet};

const SQL_RESERVED: &[&str] = &[
    "ALL", "AND", "ANY", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN", "CREATE",
    "CROSS", "CURRENT", "DATE", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END",
    "EXISTS", "FALSE", "FETCH", "FOR", "FOREIGN", "FROM", "FULL", "GROUP", "HAVING", "IN",
    "INNER", "INSERT", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE", "LIMIT", "NOT", "NULL",
    "OFFSET", "ON", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES", "RIGHT", "ROWS", "SELECT",
    "SET", "TABLE", "THEN", "TIME", "TIMESTAMP", "TO", "TRUE", "UNION", "UNIQUE", "UPDATE",
    "USER", "USING", "VALUES", "WHEN", "WHERE", "WITH",
];

const MYSQL_RESERVED: &[&str] = &["DATABASE", "INDEX", "KEYS", "RANGE", "READ", "REPLACE"];

const POSTGRES_RESERVED: &[&str] = &["ANALYSE", "ANALYZE", "ARRAY", "LATERAL", "RETURNING"];

// ----------------------------------------------------------------------
// Operator tables
// ----------------------------------------------------------------------

struct OperatorTable(BTreeMap<Operator, OperatorTemplate>);

impl OperatorTable {
    const fn new() -> Self {
        Self(BTreeMap::new())
    }

    fn add(&mut self, op: Operator, pattern: &str, precedence: Option<u8>) -> &mut Self {
        self.0.insert(
            op,
            OperatorTemplate {
                template: Template::new(pattern),
                precedence,
            },
        );
        self
    }

    fn remove(&mut self, op: Operator) -> &mut Self {
        self.0.remove(&op);
        self
    }
}

fn shared_operators(table: &mut OperatorTable) {
    let cmp = Some(PREC_COMPARE);

    table
        .add(Operator::And, "{0} and {1}", Some(PREC_BOOLEAN))
        .add(Operator::Or, "{0} or {1}", Some(PREC_BOOLEAN))
        .add(Operator::Not, "not {0}", Some(PREC_NOT))
        .add(Operator::Eq, "{0} = {1}", cmp)
        .add(Operator::Ne, "{0} <> {1}", cmp)
        .add(Operator::Lt, "{0} < {1}", cmp)
        .add(Operator::Gt, "{0} > {1}", cmp)
        .add(Operator::Loe, "{0} <= {1}", cmp)
        .add(Operator::Goe, "{0} >= {1}", cmp)
        .add(Operator::Between, "{0} between {1} and {2}", cmp)
        .add(Operator::Like, "{0} like {1}", cmp)
        .add(Operator::In, "{0} in {1}", cmp)
        .add(Operator::NotIn, "{0} not in {1}", cmp)
        .add(Operator::IsNull, "{0} is null", cmp)
        .add(Operator::IsNotNull, "{0} is not null", cmp)
        .add(Operator::Exists, "exists {0}", None)
        .add(Operator::Add, "{0} + {1}", Some(PREC_ADD))
        .add(Operator::Sub, "{0} - {1}", Some(PREC_ADD))
        .add(Operator::Mul, "{0} * {1}", Some(PREC_MUL))
        .add(Operator::Div, "{0} / {1}", Some(PREC_MUL))
        .add(Operator::Mod, "mod({0}, {1})", None)
        .add(Operator::Negate, "-{0}", Some(PREC_UNARY))
        .add(Operator::Lower, "lower({0})", None)
        .add(Operator::Upper, "upper({0})", None)
        .add(Operator::Trim, "trim({0})", None)
        .add(Operator::Length, "length({0})", None)
        .add(Operator::StartsWith, "{0} like {1%} escape '!'", cmp)
        .add(Operator::EndsWith, "{0} like {%1} escape '!'", cmp)
        .add(Operator::StringContains, "{0} like {%1%} escape '!'", cmp)
        .add(Operator::Abs, "abs({0})", None)
        .add(Operator::Sqrt, "sqrt({0})", None)
        .add(Operator::Count, "count({0})", None)
        .add(Operator::CountDistinct, "count(distinct {0})", None)
        .add(Operator::Sum, "sum({0})", None)
        .add(Operator::Avg, "avg({0})", None)
        .add(Operator::Min, "min({0})", None)
        .add(Operator::Max, "max({0})", None);
}

fn sql_operators() -> OperatorTable {
    let mut table = OperatorTable::new();
    shared_operators(&mut table);

    table
        .add(Operator::Concat, "{0} || {1}", Some(PREC_ADD))
        .add(Operator::Substr1, "substr({0}, {1}+1)", None)
        .add(Operator::Substr2, "substr({0}, {1}+1, {2}-{1})", None)
        .add(Operator::IndexOf, "locate({1}, {0})-1", Some(PREC_ADD))
        .add(Operator::Alias, "{0} {1}", None);

    table
}

// ----------------------------------------------------------------------
// Keywords and literals
// ----------------------------------------------------------------------

const fn sql_keywords() -> Keywords {
    Keywords {
        select: "select",
        distinct: "distinct",
        unique: None,
        from: "from",
        where_: "where",
        group_by: "group by",
        having: "having",
        order_by: "order by",
        asc: "asc",
        desc: "desc",
        nulls_first: Some("nulls first"),
        nulls_last: Some("nulls last"),
        join: "join",
        inner_join: "inner join",
        left_join: "left join",
        right_join: Some("right join"),
        full_join: Some("full join"),
        on: "on",
        variables: None,
        count_all: Some("count(*)"),
        insert_into: Some("insert into"),
        values: "values",
        update: Some("update"),
        set: "set",
        delete_from: "delete from",
    }
}

const fn sql_literals() -> LiteralForms {
    LiteralForms {
        true_: "true",
        false_: "false",
        null: "null",
        date: Some(("date '", "'")),
        time: Some(("time '", "'")),
        datetime: Some(("timestamp '", "'")),
        bytes: Some(("x'", "'")),
        always_true: "1 = 1",
        always_false: "1 = 0",
    }
}

fn reserved(words: &[&[&'static str]]) -> BTreeSet<&'static str> {
    words.iter().flat_map(|list| list.iter().copied()).collect()
}

fn sql_base(dialect: DialectId, operators: OperatorTable) -> Templates {
    Templates {
        dialect,
        grammar: Grammar::Sql,
        operators: operators.0,
        keywords: sql_keywords(),
        literals: sql_literals(),
        identifier_quote: Some('"'),
        reserved: reserved(&[SQL_RESERVED]),
        placeholder: PlaceholderStyle::Question,
        pagination: PaginationStyle::OffsetFetch,
        like_escape: Some('!'),
        newline: "\n",
        flatten_lists: true,
        collection_any_joins: false,
    }
}

// ----------------------------------------------------------------------
// Presets
// ----------------------------------------------------------------------

impl Templates {
    /// SQL:2008 flavoured defaults.
    #[must_use]
    pub fn ansi() -> Self {
        sql_base(DialectId::Ansi, sql_operators())
    }

    #[must_use]
    pub fn derby() -> Self {
        let mut operators = sql_operators();
        operators.add(Operator::Concat, "varchar({0} || {1})", None);

        let mut templates = sql_base(DialectId::Derby, operators);
        templates.literals.true_ = "1";
        templates.literals.false_ = "0";
        templates.literals.date = Some(("date('", "')"));
        templates.literals.time = Some(("time('", "')"));
        templates.literals.datetime = Some(("timestamp('", "')"));
        templates.keywords.full_join = None;
        templates.keywords.nulls_first = None;
        templates.keywords.nulls_last = None;
        templates
    }

    #[must_use]
    pub fn mysql() -> Self {
        let mut operators = sql_operators();
        operators
            .add(Operator::Concat, "concat({0}, {1})", None)
            .add(Operator::Length, "char_length({0})", None)
            .add(Operator::Mod, "{0} % {1}", Some(PREC_MUL));

        let mut templates = sql_base(DialectId::MySql, operators);
        templates.identifier_quote = Some('`');
        templates.reserved = reserved(&[SQL_RESERVED, MYSQL_RESERVED]);
        templates.pagination = PaginationStyle::LimitOffset {
            max_limit: Some(u64::MAX),
        };
        templates.literals.datetime = Some(("timestamp '", "'"));
        templates.keywords.full_join = None;
        templates.keywords.nulls_first = None;
        templates.keywords.nulls_last = None;
        templates
    }

    #[must_use]
    pub fn postgres() -> Self {
        let mut operators = sql_operators();
        operators
            .add(Operator::Mod, "{0} % {1}", Some(PREC_MUL))
            .add(Operator::IndexOf, "strpos({0}, {1})-1", Some(PREC_ADD));

        let mut templates = sql_base(DialectId::Postgres, operators);
        templates.reserved = reserved(&[SQL_RESERVED, POSTGRES_RESERVED]);
        templates.placeholder = PlaceholderStyle::Dollar;
        templates.pagination = PaginationStyle::LimitOffset { max_limit: None };
        templates
    }

    /// JPQL with the Hibernate `with` join-condition keyword.
    #[must_use]
    pub fn jpql() -> Self {
        let mut operators = OperatorTable::new();
        shared_operators(&mut operators);
        operators
            .add(Operator::Concat, "concat({0}, {1})", None)
            .add(Operator::Substr1, "substring({0}, {1}+1)", None)
            .add(Operator::Substr2, "substring({0}, {1}+1, {2}-{1})", None)
            .add(Operator::IndexOf, "locate({1}, {0})-1", Some(PREC_ADD))
            .add(Operator::IsEmpty, "{0} is empty", Some(PREC_COMPARE))
            .add(Operator::IsNotEmpty, "{0} is not empty", Some(PREC_COMPARE))
            .add(Operator::Size, "size({0})", None)
            .add(Operator::InstanceOf, "type({0}) = {1}", Some(PREC_COMPARE))
            .add(Operator::Alias, "{0} as {1}", None);

        Self {
            dialect: DialectId::Jpql,
            grammar: Grammar::Jpql,
            operators: operators.0,
            keywords: Keywords {
                count_all: None,
                on: "with",
                ..sql_keywords()
            },
            literals: LiteralForms {
                date: Some(("{d '", "'}")),
                time: Some(("{t '", "'}")),
                datetime: Some(("{ts '", "'}")),
                bytes: None,
                ..sql_literals()
            },
            identifier_quote: None,
            reserved: BTreeSet::new(),
            placeholder: PlaceholderStyle::NumberedQuestion,
            pagination: PaginationStyle::External,
            like_escape: Some('!'),
            newline: "\n",
            flatten_lists: true,
            collection_any_joins: true,
        }
    }

    #[must_use]
    pub fn jdoql() -> Self {
        let cmp = Some(PREC_COMPARE);
        let mut operators = OperatorTable::new();
        shared_operators(&mut operators);
        operators
            .add(Operator::And, "{0} && {1}", Some(PREC_BOOLEAN))
            .add(Operator::Or, "{0} || {1}", Some(PREC_BOOLEAN))
            .add(Operator::Not, "!{0}", Some(PREC_NOT))
            .add(Operator::Eq, "{0} == {1}", cmp)
            .add(Operator::Ne, "{0} != {1}", cmp)
            .add(Operator::Between, "{0} >= {1} && {0} <= {2}", Some(PREC_BOOLEAN))
            .add(Operator::Like, "{0}.matches({1})", None)
            .add(Operator::In, "{1}.contains({0})", None)
            .add(Operator::NotIn, "!{1}.contains({0})", Some(PREC_NOT))
            .add(Operator::IsNull, "{0} == null", cmp)
            .add(Operator::IsNotNull, "{0} != null", cmp)
            .add(Operator::Mod, "{0} % {1}", Some(PREC_MUL))
            .add(Operator::Concat, "{0} + {1}", Some(PREC_ADD))
            .add(Operator::Lower, "{0}.toLowerCase()", None)
            .add(Operator::Upper, "{0}.toUpperCase()", None)
            .add(Operator::Trim, "{0}.trim()", None)
            .add(Operator::Length, "{0}.length()", None)
            .add(Operator::Substr1, "{0}.substring({1})", None)
            .add(Operator::Substr2, "{0}.substring({1}, {2})", None)
            .add(Operator::StartsWith, "{0}.startsWith({1})", None)
            .add(Operator::EndsWith, "{0}.endsWith({1})", None)
            .add(Operator::StringContains, "{0}.indexOf({1}) > -1", cmp)
            .add(Operator::IndexOf, "{0}.indexOf({1})", None)
            .add(Operator::Abs, "Math.abs({0})", None)
            .add(Operator::Sqrt, "Math.sqrt({0})", None)
            .add(Operator::IsEmpty, "{0}.isEmpty()", None)
            .add(Operator::IsNotEmpty, "!{0}.isEmpty()", Some(PREC_NOT))
            .add(Operator::Size, "{0}.size()", None)
            .add(Operator::InstanceOf, "{0} instanceof {1}", cmp)
            .add(Operator::Alias, "{0} {1}", None)
            .remove(Operator::Exists);

        Self {
            dialect: DialectId::Jdoql,
            grammar: Grammar::Jdoql,
            operators: operators.0,
            keywords: Keywords {
                select: "SELECT",
                distinct: "DISTINCT",
                unique: Some("UNIQUE"),
                from: "FROM",
                where_: "WHERE",
                group_by: "GROUP BY",
                having: "HAVING",
                order_by: "ORDER BY",
                asc: "ASC",
                desc: "DESC",
                nulls_first: None,
                nulls_last: None,
                join: "",
                inner_join: "",
                left_join: "",
                right_join: None,
                full_join: None,
                on: "",
                variables: Some("VARIABLES"),
                count_all: Some("count(this)"),
                insert_into: None,
                values: "",
                update: None,
                set: "",
                delete_from: "DELETE FROM",
            },
            literals: LiteralForms {
                date: None,
                time: None,
                datetime: None,
                bytes: None,
                always_true: "true",
                always_false: "false",
                ..sql_literals()
            },
            identifier_quote: None,
            reserved: BTreeSet::new(),
            placeholder: PlaceholderStyle::Named("a"),
            pagination: PaginationStyle::Range,
            like_escape: None,
            newline: "\n",
            flatten_lists: false,
            collection_any_joins: true,
        }
    }
}
