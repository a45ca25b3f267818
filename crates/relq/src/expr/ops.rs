use super::{BinaryOp, Expr, IntoExpr, SuffixOp, raw};
use crate::qb::OrderBy;
use crate::schema::{Column, Selection};

/// Composing operations shared by expressions and column handles.
///
/// Each call builds a new node; operands are never mutated.
pub trait ExprOps: IntoExpr + Sized {
    fn eq(self, other: impl IntoExpr) -> Expr {
        Expr::infix(BinaryOp::Eq, self.into_expr(), other.into_expr())
    }

    fn neq(self, other: impl IntoExpr) -> Expr {
        Expr::infix(BinaryOp::Neq, self.into_expr(), other.into_expr())
    }

    fn gt(self, other: impl IntoExpr) -> Expr {
        Expr::infix(BinaryOp::Gt, self.into_expr(), other.into_expr())
    }

    fn gte(self, other: impl IntoExpr) -> Expr {
        Expr::infix(BinaryOp::Gte, self.into_expr(), other.into_expr())
    }

    fn lt(self, other: impl IntoExpr) -> Expr {
        Expr::infix(BinaryOp::Lt, self.into_expr(), other.into_expr())
    }

    fn lte(self, other: impl IntoExpr) -> Expr {
        Expr::infix(BinaryOp::Lte, self.into_expr(), other.into_expr())
    }

    fn add(self, other: impl IntoExpr) -> Expr {
        Expr::infix(BinaryOp::Add, self.into_expr(), other.into_expr())
    }

    fn sub(self, other: impl IntoExpr) -> Expr {
        Expr::infix(BinaryOp::Sub, self.into_expr(), other.into_expr())
    }

    fn mul(self, other: impl IntoExpr) -> Expr {
        Expr::infix(BinaryOp::Mul, self.into_expr(), other.into_expr())
    }

    fn div(self, other: impl IntoExpr) -> Expr {
        Expr::infix(BinaryOp::Div, self.into_expr(), other.into_expr())
    }

    fn and(self, other: impl IntoExpr) -> Expr {
        Expr::infix(BinaryOp::And, self.into_expr(), other.into_expr())
    }

    fn or(self, other: impl IntoExpr) -> Expr {
        Expr::infix(BinaryOp::Or, self.into_expr(), other.into_expr())
    }

    fn is_null(self) -> Expr {
        Expr::Suffix {
            op: SuffixOp::IsNull,
            operand: Box::new(self.into_expr()),
        }
    }

    fn is_not_null(self) -> Expr {
        Expr::Suffix {
            op: SuffixOp::IsNotNull,
            operand: Box::new(self.into_expr()),
        }
    }

    /// `self LIKE pattern`
    fn like(self, pattern: impl IntoExpr) -> Expr {
        Expr::infix(BinaryOp::Like, self.into_expr(), pattern.into_expr())
    }

    /// `self LIKE x || '%'`
    fn like_prefix(self, x: impl IntoExpr) -> Expr {
        self.like(Expr::Concat(vec![x.into_expr(), percent()]))
    }

    /// `self LIKE '%' || x`
    fn like_suffix(self, x: impl IntoExpr) -> Expr {
        self.like(Expr::Concat(vec![percent(), x.into_expr()]))
    }

    /// `self LIKE '%' || x || '%'`
    fn like_partial(self, x: impl IntoExpr) -> Expr {
        self.like(Expr::Concat(vec![percent(), x.into_expr(), percent()]))
    }

    /// `self IN (values...)` over arbitrary expressions (sub-queries included).
    fn in_any<I>(self, values: I) -> Expr
    where
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        Expr::In {
            operand: Box::new(self.into_expr()),
            values: values.into_iter().map(IntoExpr::into_expr).collect(),
        }
    }

    /// Use as a selection with an output alias.
    fn as_(self, alias: impl Into<String>) -> Selection {
        Selection::aliased(self.into_expr(), alias)
    }

    fn asc(self) -> OrderBy {
        OrderBy::asc(self.into_expr())
    }

    fn desc(self) -> OrderBy {
        OrderBy::desc(self.into_expr())
    }
}

fn percent() -> Expr {
    raw("'%'")
}

impl ExprOps for Expr {}

impl<T> ExprOps for &Column<T> {}
