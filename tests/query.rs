mod common;

use common::Employee;
use relq::prelude::*;

#[test]
fn repeated_from_adds_comma_separated_sources() {
    let emp = Employee::new("EMP");
    let sup = Employee::new("SUP");

    let query = SqlQuery::new().from(&emp.rel).from(&sup.rel);
    assert_eq!(query.to_string(), "from EMPLOYEE EMP, EMPLOYEE SUP");
}

#[test]
fn select_renders_before_the_sources() {
    let emp = Employee::new("EMP");

    let query = SqlQuery::new()
        .select([
            Expression::from(&emp.firstname),
            Expression::from(&emp.lastname),
        ])
        .from(&emp.rel);

    assert_eq!(
        query.to_string(),
        "select EMP.FIRSTNAME, EMP.LASTNAME\nfrom EMPLOYEE EMP"
    );
}

#[test]
fn distinct_select() {
    let emp = Employee::new("EMP");

    let query = SqlQuery::new()
        .select([Expression::from(&emp.lastname)])
        .distinct()
        .from(&emp.rel);

    assert_eq!(
        query.to_string(),
        "select distinct EMP.LASTNAME\nfrom EMPLOYEE EMP"
    );
}

#[test]
fn filters_group_having_and_order_render_in_clause_order() {
    let emp = Employee::new("EMP");
    let count = Expression::clone(&emp.rel.count().unwrap());

    let query = SqlQuery::new()
        .select([count.clone()])
        .from(&emp.rel)
        .r#where(emp.salary.gt(1000))
        .group_by(&emp.superior_id)
        .having(Predicate::binary(relq::Operator::Gt, count, 1))
        .order_by(OrderSpecifier::asc(&emp.lastname));

    assert_eq!(
        query.to_string(),
        "select count(EMP.ID)\n\
         from EMPLOYEE EMP\n\
         where EMP.SALARY > 1000\n\
         group by EMP.SUPERIOR_ID\n\
         having count(EMP.ID) > 1\n\
         order by EMP.LASTNAME asc"
    );
}

#[test]
fn repeated_where_conjoins() {
    let emp = Employee::new("EMP");

    let query = SqlQuery::new()
        .from(&emp.rel)
        .r#where(emp.salary.gt(1000))
        .r#where(emp.superior_id.is_null());

    assert_eq!(
        query.to_string(),
        "from EMPLOYEE EMP\nwhere EMP.SALARY > 1000 and EMP.SUPERIOR_ID is null"
    );
}

#[test]
fn order_by_descending() {
    let emp = Employee::new("EMP");

    let query = SqlQuery::new()
        .from(&emp.rel)
        .order_by(OrderSpecifier::desc(&emp.salary))
        .order_by(OrderSpecifier::asc(&emp.lastname));

    assert_eq!(
        query.to_string(),
        "from EMPLOYEE EMP\norder by EMP.SALARY desc, EMP.LASTNAME asc"
    );
}

#[test]
fn aliased_subquery_as_join_target() {
    let emp = Employee::new("EMP");
    let boss = Employee::new("BOSS");

    let sub = SqlQuery::new()
        .select([Expression::from(&emp.superior_id)])
        .from(&emp.rel);
    let alias = Path::variable("SUPS");

    let query = SqlQuery::new()
        .from(&boss.rel)
        .inner_join((sub, alias))
        .on(boss.id.eq(Path::property("SUPS", "SUPERIOR_ID")))
        .unwrap();

    assert_eq!(
        query.to_string(),
        "from EMPLOYEE BOSS\n\
         inner join (select EMP.SUPERIOR_ID\nfrom EMPLOYEE EMP) SUPS\n\
         on BOSS.ID = SUPS.SUPERIOR_ID"
    );
}

#[test]
fn aliased_entity_as_join_target() {
    let emp = Employee::new("EMP");
    let sup = Employee::new("SUP");

    let query = SqlQuery::new()
        .from(&emp.rel)
        .inner_join((&sup.rel, Path::variable("BOSS")));

    assert_eq!(
        query.to_string(),
        "from EMPLOYEE EMP\ninner join EMPLOYEE BOSS"
    );
}

#[test]
fn aliased_function_call_as_source() {
    let series = Expression::function(
        "generate_series",
        vec![Expression::from(1), Expression::from(10)],
    );

    let query = SqlQuery::new().from((series, Path::variable("S")));
    assert_eq!(query.to_string(), "from generate_series(1, 10) S");
}

#[test]
fn with_clause_renders_before_the_query() {
    let emp = Employee::new("EMP");

    let body = SqlQuery::new()
        .select([Expression::from(&emp.id)])
        .from(&emp.rel)
        .r#where(emp.salary.gt(100000));

    let query = SqlQuery::new()
        .with(Path::variable("SENIOR"), body)
        .from(Expression::from(Path::variable("SENIOR")));

    assert_eq!(
        query.to_string(),
        "with SENIOR as (select EMP.ID\nfrom EMPLOYEE EMP\nwhere EMP.SALARY > 100000)\n\
         from SENIOR"
    );
}

#[test]
fn with_columns_lists_the_column_names() {
    let emp = Employee::new("EMP");

    let body = SqlQuery::new()
        .select([
            Expression::from(&emp.firstname),
            Expression::from(&emp.lastname),
        ])
        .from(&emp.rel);

    let query = SqlQuery::new()
        .with_columns(
            Path::variable("NAMES"),
            [Path::variable("FIRST"), Path::variable("LAST")],
        )
        .as_(body)
        .from(Expression::from(Path::variable("NAMES")));

    assert_eq!(
        query.to_string(),
        "with NAMES (FIRST, LAST) as (select EMP.FIRSTNAME, EMP.LASTNAME\nfrom EMPLOYEE EMP)\n\
         from NAMES"
    );
}

#[test]
fn with_recursive_switches_the_keyword() {
    let emp = Employee::new("EMP");

    let body = SqlQuery::new()
        .select([Expression::from(&emp.id)])
        .from(&emp.rel);

    let query = SqlQuery::new()
        .with_recursive(Path::variable("TREE"), body)
        .from(Expression::from(Path::variable("TREE")));

    assert_eq!(
        query.to_string(),
        "with recursive TREE as (select EMP.ID\nfrom EMPLOYEE EMP)\nfrom TREE"
    );
}

#[test]
fn query_flags_render_at_their_positions() {
    let emp = Employee::new("EMP");

    let query = SqlQuery::new()
        .select([Expression::from(&emp.id)])
        .from(&emp.rel)
        .add_flag(FlagPosition::End, "\nfor update");

    assert_eq!(
        query.to_string(),
        "select EMP.ID\nfrom EMPLOYEE EMP\nfor update"
    );
}

#[test]
fn query_flags_render_at_leading_positions() {
    let emp = Employee::new("EMP");

    let query = SqlQuery::new()
        .select([Expression::from(&emp.id)])
        .from(&emp.rel)
        .r#where(emp.salary.gt(1000))
        .add_flag(FlagPosition::Start, "explain ")
        .add_flag(FlagPosition::AfterSelect, "/*+ parallel */ ")
        .add_flag(FlagPosition::BeforeFilters, "\nsample (10)");

    assert_eq!(
        query.to_string(),
        "explain select /*+ parallel */ EMP.ID\n\
         from EMPLOYEE EMP\n\
         sample (10)\n\
         where EMP.SALARY > 1000"
    );
}

#[test]
fn expression_flag_payloads_render_through_the_serializer() {
    let emp = Employee::new("EMP");

    // Flags at the same position render in insertion order.
    let query = SqlQuery::new()
        .select([Expression::from(&emp.id)])
        .from(&emp.rel)
        .add_flag(FlagPosition::BeforeOrder, "\n")
        .add_flag(
            FlagPosition::BeforeOrder,
            Expression::function("fetch_hint", vec![Expression::from(&emp.id)]),
        );

    assert_eq!(
        query.to_string(),
        "select EMP.ID\nfrom EMPLOYEE EMP\nfetch_hint(EMP.ID)"
    );
}

#[test]
fn with_expr_accepts_an_arbitrary_query_expression() {
    let body = Expression::function(
        "table",
        vec![Expression::from(Path::variable("EMPLOYEE_ARCHIVE"))],
    );

    let query = SqlQuery::new()
        .with_expr(Path::variable("OLD"), body)
        .from(Expression::from(Path::variable("OLD")));

    assert_eq!(
        query.to_string(),
        "with OLD as (table(EMPLOYEE_ARCHIVE))\nfrom OLD"
    );
}

#[test]
fn with_recursive_expr_marks_the_recursive_keyword() {
    let emp = Employee::new("EMP");

    let base = SqlQuery::new()
        .select([Expression::from(&emp.id)])
        .from(&emp.rel);

    let query = SqlQuery::new()
        .with_recursive_expr(Path::variable("TREE"), Expression::from(base))
        .from(Expression::from(Path::variable("TREE")));

    assert_eq!(
        query.to_string(),
        "with recursive TREE as (select EMP.ID\nfrom EMPLOYEE EMP)\nfrom TREE"
    );
}

#[test]
fn prefixed_flags_carry_an_expression() {
    let emp = Employee::new("EMP");

    let query = SqlQuery::new()
        .select([Expression::from(&emp.id)])
        .from(&emp.rel)
        .add_prefixed_flag(FlagPosition::End, "\nfor update of ", Expression::from(&emp.id));

    assert_eq!(
        query.to_string(),
        "select EMP.ID\nfrom EMPLOYEE EMP\nfor update of EMP.ID"
    );
}

#[test]
fn template_options_qualify_and_quote_identifiers() {
    let emp = Employee::new("EMP");
    let query = SqlQuery::new().from(&emp.rel).r#where(emp.id.is_not_null());

    let qualified = SqlTemplates::new().with_print_schema();
    assert_eq!(
        query.to_sql(&qualified),
        "from PUBLIC.EMPLOYEE EMP\nwhere EMP.ID is not null"
    );

    let quoted = SqlTemplates::new().with_quoted_identifiers();
    assert_eq!(
        query.to_sql(&quoted),
        "from \"EMPLOYEE\" \"EMP\"\nwhere \"EMP\".\"ID\" is not null"
    );
}

#[test]
fn subquery_in_a_filter_parenthesizes() {
    let emp = Employee::new("EMP");
    let sup = Employee::new("SUP");

    let sub = SqlQuery::new()
        .select([Expression::clone(&sup.rel.count().unwrap())])
        .from(&sup.rel);

    let query = SqlQuery::new()
        .from(&emp.rel)
        .r#where(emp.salary.gt(Expression::from(sub)));

    assert_eq!(
        query.to_string(),
        "from EMPLOYEE EMP\nwhere EMP.SALARY > (select count(SUP.ID)\nfrom EMPLOYEE SUP)"
    );
}
