use super::*;
use crate::dialect::Dialect;
use crate::fixtures::{Users, int, text};
use crate::writer::{FinalQuery, QueryWriter};

fn render_in(expr: &Expr, dialect: Dialect) -> FinalQuery {
    let mut w = QueryWriter::new(dialect);
    expr.write_to(&mut w);
    w.finish().unwrap()
}

fn sql(expr: Expr) -> String {
    render_in(&expr, Dialect::Generic).sql
}

#[test]
fn right_operand_wrapped_only_when_looser() {
    assert_eq!(sql(raw("3").mul(raw("5")).add(raw("3"))), "3 * 5 + 3");
    assert_eq!(sql(raw("3").mul(raw("5").add(raw("3")))), "3 * (5 + 3)");
    assert_eq!(sql(raw("3").add(raw("5").mul(raw("5")))), "3 + 5 * 5");
    assert_eq!(sql(raw("3").eq(raw("5")).and(raw("5").eq(raw("3")))), "3 = 5 AND 5 = 3");
    assert_eq!(sql(raw("3").add(raw("5")).gt(raw("5").eq(raw("3")))), "3 + 5 > (5 = 3)");
}

#[test]
fn left_operand_is_never_wrapped() {
    // grouping on the left has to be explicit
    assert_eq!(sql(raw("3").add(raw("5")).mul(raw("5"))), "3 + 5 * 5");
    assert_eq!(sql(parens(raw("3").add(raw("5"))).mul(raw("5"))), "(3 + 5) * 5");
}

#[test]
fn nested_boolean_conditions() {
    let users = Users::new();
    let cond = users
        .id
        .is_not_null()
        .and(users.id.eq(2).or(users.id.gt(4).and(users.id.lt(8))));

    let fq = render_in(&cond, Dialect::Generic);
    assert_eq!(
        fq.sql,
        "users.id IS NOT NULL AND (users.id = ? OR users.id > ? AND users.id < ?)"
    );
    assert_eq!(fq.args, vec![int(2), int(4), int(8)]);

    let fq = render_in(&cond, Dialect::Postgres);
    assert_eq!(
        fq.sql,
        r#""users"."id" IS NOT NULL AND ("users"."id" = $1 OR "users"."id" > $2 AND "users"."id" < $3)"#
    );
}

#[test]
fn same_precedence_on_the_right_is_not_wrapped() {
    assert_eq!(sql(raw("a").sub(raw("b").add(raw("c")))), "a - b + c");
    assert_eq!(sql(raw("a").or(raw("b").or(raw("c")))), "a OR b OR c");
}

#[test]
fn concat_follows_dialect() {
    let expr = concat(["a", "b", "c"]);

    let fq = render_in(&expr, Dialect::Generic);
    assert_eq!(fq.sql, "? || ? || ?");
    assert_eq!(fq.args, vec![text("a"), text("b"), text("c")]);

    assert_eq!(render_in(&expr, Dialect::Postgres).sql, "$1 || $2 || $3");
    assert_eq!(render_in(&expr, Dialect::MySql).sql, "CONCAT(?, ?, ?)");
}

#[test]
fn concat_wraps_looser_parts() {
    let expr = concat([raw("a"), raw("b").eq(raw("c")), raw("d").add(raw("e"))]);
    assert_eq!(sql(expr), "a || (b = c) || d + e");
}

#[test]
fn concat_call_is_not_wrapped_as_operand() {
    let expr = raw("a").mul(concat([raw("b"), raw("c")]));
    assert_eq!(render_in(&expr, Dialect::Generic).sql, "a * (b || c)");
    assert_eq!(render_in(&expr, Dialect::MySql).sql, "a * CONCAT(b, c)");
}

#[test]
fn like_helpers() {
    let users = Users::new();
    assert_eq!(sql(users.name.like("al%")), "users.name LIKE ?");
    assert_eq!(sql(users.name.like_prefix("al")), "users.name LIKE ? || '%'");
    assert_eq!(sql(users.name.like_suffix("al")), "users.name LIKE '%' || ?");
    assert_eq!(
        sql(users.name.like_partial("al")),
        "users.name LIKE '%' || ? || '%'"
    );

    let fq = render_in(&users.name.like_partial("al"), Dialect::MySql);
    assert_eq!(fq.sql, "`users`.`name` LIKE CONCAT('%', ?, '%')");
    assert_eq!(fq.args, vec![text("al")]);
}

#[test]
fn null_checks_and_null_literal() {
    let users = Users::new();
    assert_eq!(sql(users.name.is_null()), "users.name IS NULL");
    assert_eq!(sql(users.id.add(1).is_null()), "users.id + ? IS NULL");

    let fq = render_in(&users.name.eq(Value::Null), Dialect::Generic);
    assert_eq!(fq.sql, "users.name = NULL");
    assert!(fq.args.is_empty());

    let none: Option<i64> = None;
    assert_eq!(sql(users.id.neq(none)), "users.id <> NULL");
    assert_eq!(sql(null()), "NULL");
}

#[test]
fn function_calls() {
    let users = Users::new();
    assert_eq!(sql(count(&users.id)), "COUNT(users.id)");
    assert_eq!(sql(count(&users.id).distinct()), "COUNT(DISTINCT users.id)");
    assert_eq!(sql(max(&users.id).sub(min(&users.id))), "MAX(users.id) - MIN(users.id)");
    assert_eq!(sql(sum(&users.id).div(avg(&users.id))), "SUM(users.id) / AVG(users.id)");
    assert_eq!(sql(func("NOW", Vec::<Expr>::new())), "NOW()");

    let fq = render_in(&func("COALESCE", [users.name.expr(), lit("anon")]), Dialect::Postgres);
    assert_eq!(fq.sql, r#"COALESCE("users"."name", $1)"#);
    assert_eq!(fq.args, vec![text("anon")]);

    // only function calls carry the flag
    assert_eq!(sql(raw("x").distinct()), "x");
}

#[test]
fn in_lists() {
    let users = Users::new();
    let fq = render_in(&users.id.in_([1, 2, 3]), Dialect::Generic);
    assert_eq!(fq.sql, "users.id IN (?, ?, ?)");
    assert_eq!(fq.args, vec![int(1), int(2), int(3)]);

    assert_eq!(sql(users.name.in_any([raw("'a'"), lit("b")])), "users.name IN ('a', ?)");
}

#[test]
fn empty_in_is_false() {
    let users = Users::new();
    let fq = render_in(&users.id.in_(Vec::<i64>::new()), Dialect::Generic);
    assert_eq!(fq.sql, "1=0");
    assert!(fq.args.is_empty());

    assert_eq!(
        sql(users.name.is_null().or(users.id.in_(Vec::<i64>::new()))),
        "users.name IS NULL OR 1=0"
    );
}

#[test]
fn typed_literal_hint() {
    let users = Users::new();
    let expr = users.id.eq(typed(5, "int8"));
    assert_eq!(render_in(&expr, Dialect::Postgres).sql, r#""users"."id" = $1::int8"#);
    assert_eq!(render_in(&expr, Dialect::Generic).sql, "users.id = ?");
}

#[test]
fn raw_fragments_share_numbering() {
    let users = Users::new();
    let expr = users
        .id
        .eq(5)
        .and(raw_with("lower(users.name) = ?", ["x"]))
        .and(users.id.lt(9));

    let fq = render_in(&expr, Dialect::Postgres);
    assert_eq!(
        fq.sql,
        r#""users"."id" = $1 AND lower(users.name) = $2 AND "users"."id" < $3"#
    );
    assert_eq!(fq.args, vec![int(5), text("x"), int(9)]);
}

#[test]
fn precedence_levels() {
    let users = Users::new();
    assert_eq!(users.id.expr().precedence(), Precedence::Atomic);
    assert_eq!(users.id.eq(1).precedence(), Precedence::Equality);
    assert_eq!(users.id.is_null().precedence(), Precedence::Postfix);
    assert_eq!(users.name.like("a").precedence(), Precedence::Postfix);
    assert_eq!(concat(["a"]).precedence(), Precedence::Additive);
    assert!(Precedence::Or < Precedence::And);
    assert!(Precedence::Multiplicative < Precedence::Atomic);
}

#[test]
fn and_all_folds_left() {
    assert!(and_all(&[]).is_none());

    let one = and_all(&[raw("a")]).unwrap();
    assert_eq!(sql(one), "a");

    let many = and_all(&[raw("a"), raw("b").or(raw("c")), raw("d")]).unwrap();
    assert_eq!(sql(many), "a AND (b OR c) AND d");
}
