//! Free-standing expression constructors.

use super::{Expr, IntoExpr};
use crate::value::{IntoValue, Value};
use std::borrow::Cow;

/// A bound literal.
pub fn lit(value: impl IntoValue) -> Expr {
    value.into_expr()
}

/// A bound literal with a type hint (`$N::hint` under Postgres).
pub fn typed(value: impl IntoValue, hint: impl Into<Cow<'static, str>>) -> Expr {
    Expr::Literal {
        value: value.into_value(),
        type_hint: Some(hint.into()),
    }
}

/// The `NULL` literal.
pub fn null() -> Expr {
    Expr::Null
}

/// Opaque SQL text without arguments.
pub fn raw(sql: impl Into<String>) -> Expr {
    Expr::Raw {
        sql: sql.into(),
        args: Vec::new(),
    }
}

/// Opaque SQL text whose `?` markers bind `args` in order.
pub fn raw_with<I>(sql: impl Into<String>, args: I) -> Expr
where
    I: IntoIterator,
    I::Item: IntoValue,
{
    Expr::Raw {
        sql: sql.into(),
        args: args.into_iter().map(IntoValue::into_value).collect::<Vec<Value>>(),
    }
}

pub fn parens(inner: impl IntoExpr) -> Expr {
    Expr::Parens(Box::new(inner.into_expr()))
}

/// Dialect-aware string concatenation.
pub fn concat<I>(parts: I) -> Expr
where
    I: IntoIterator,
    I::Item: IntoExpr,
{
    Expr::Concat(parts.into_iter().map(IntoExpr::into_expr).collect())
}

/// A function call `NAME(args...)`.
pub fn func<I>(name: impl Into<Cow<'static, str>>, args: I) -> Expr
where
    I: IntoIterator,
    I::Item: IntoExpr,
{
    Expr::Func {
        name: name.into(),
        args: args.into_iter().map(IntoExpr::into_expr).collect(),
        distinct: false,
    }
}

pub fn count(arg: impl IntoExpr) -> Expr {
    func("COUNT", [arg.into_expr()])
}

pub fn max(arg: impl IntoExpr) -> Expr {
    func("MAX", [arg.into_expr()])
}

pub fn min(arg: impl IntoExpr) -> Expr {
    func("MIN", [arg.into_expr()])
}

pub fn sum(arg: impl IntoExpr) -> Expr {
    func("SUM", [arg.into_expr()])
}

pub fn avg(arg: impl IntoExpr) -> Expr {
    func("AVG", [arg.into_expr()])
}
