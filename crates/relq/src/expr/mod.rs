//! Expression tree with precedence-aware rendering.
//!
//! Expressions are built from column handles and plain values through the
//! [`ExprOps`] methods and the free constructors in this module:
//!
//! ```ignore
//! use relq::prelude::*;
//!
//! let cond = users.id.is_not_null().and(
//!     users.id.eq(2).or(users.id.gt(4).and(users.id.lt(8))),
//! );
//! // users.id IS NOT NULL AND (users.id = ? OR users.id > ? AND users.id < ?)
//! ```
//!
//! Only the right operand of a binary node is parenthesized automatically,
//! and only when it binds looser than the node itself. The left operand is
//! written as-is, so `a.add(b).mul(c)` renders `a + b * c`; wrap explicitly
//! with [`parens`] when the other grouping is meant.

mod func;
mod ops;

pub use func::{avg, concat, count, func, lit, max, min, null, parens, raw, raw_with, sum, typed};
pub use ops::ExprOps;

use crate::dialect::ConcatStyle;
use crate::qb::SelectCore;
use crate::schema::ColumnRef;
use crate::value::{IntoValue, Value};
use crate::writer::QueryWriter;
use std::borrow::Cow;

/// Binding strength used only to decide parenthesization.
///
/// Ordered from loosest to tightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Or,
    And,
    /// `IS NULL`, `LIKE`, `IN`
    Postfix,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    /// literals, columns, function calls, parentheses, raw fragments
    Atomic,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    Like,
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "OR",
            BinaryOp::And => "AND",
            BinaryOp::Like => "LIKE",
            BinaryOp::Eq => "=",
            BinaryOp::Neq => "<>",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            BinaryOp::Or => Precedence::Or,
            BinaryOp::And => Precedence::And,
            BinaryOp::Like => Precedence::Postfix,
            BinaryOp::Eq | BinaryOp::Neq => Precedence::Equality,
            BinaryOp::Gt | BinaryOp::Gte | BinaryOp::Lt | BinaryOp::Lte => Precedence::Relational,
            BinaryOp::Add | BinaryOp::Sub => Precedence::Additive,
            BinaryOp::Mul | BinaryOp::Div => Precedence::Multiplicative,
        }
    }
}

/// Postfix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuffixOp {
    IsNull,
    IsNotNull,
}

impl SuffixOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuffixOp::IsNull => "IS NULL",
            SuffixOp::IsNotNull => "IS NOT NULL",
        }
    }
}

/// An SQL expression.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A qualified column reference.
    Column(ColumnRef),
    /// `NULL`, rendered inline without an argument.
    Null,
    /// A bound argument, optionally carrying a Postgres type hint.
    Literal {
        value: Value,
        type_hint: Option<Cow<'static, str>>,
    },
    Infix {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Suffix {
        op: SuffixOp,
        operand: Box<Expr>,
    },
    /// String concatenation in the dialect's style.
    Concat(Vec<Expr>),
    /// `operand IN (values...)`
    In {
        operand: Box<Expr>,
        values: Vec<Expr>,
    },
    /// `NAME([DISTINCT] args...)`
    Func {
        name: Cow<'static, str>,
        args: Vec<Expr>,
        distinct: bool,
    },
    /// Explicit parentheses.
    Parens(Box<Expr>),
    /// Opaque SQL text with `?` markers for its own arguments.
    Raw { sql: String, args: Vec<Value> },
    /// A SELECT rendered in parentheses into the enclosing statement.
    Subquery(Box<SelectCore>),
}

impl Expr {
    pub fn precedence(&self) -> Precedence {
        match self {
            Expr::Infix { op, .. } => op.precedence(),
            Expr::Suffix { .. } | Expr::In { .. } => Precedence::Postfix,
            Expr::Concat(_) => Precedence::Additive,
            Expr::Column(_)
            | Expr::Null
            | Expr::Literal { .. }
            | Expr::Func { .. }
            | Expr::Parens(_)
            | Expr::Raw { .. }
            | Expr::Subquery(_) => Precedence::Atomic,
        }
    }

    pub(crate) fn infix(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Infix {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Render `COUNT(DISTINCT x)` instead of `COUNT(x)`.
    ///
    /// Only function calls carry the flag; other expressions are returned
    /// unchanged.
    pub fn distinct(self) -> Expr {
        match self {
            Expr::Func { name, args, .. } => Expr::Func {
                name,
                args,
                distinct: true,
            },
            other => other,
        }
    }

    /// Render into `w`.
    pub fn write_to(&self, w: &mut QueryWriter) {
        match self {
            Expr::Column(col) => col.write_to(w),
            Expr::Null => w.push("NULL"),
            Expr::Literal { value, type_hint } => w.push_arg(value.clone(), type_hint.as_deref()),
            Expr::Infix { op, left, right } => {
                left.write_to(w);
                w.push(" ");
                w.push(op.as_str());
                w.push(" ");
                right.write_operand(w, op.precedence());
            }
            Expr::Suffix { op, operand } => {
                operand.write_to(w);
                w.push(" ");
                w.push(op.as_str());
            }
            Expr::Concat(parts) => write_concat(parts, w),
            Expr::In { operand, values } => {
                if values.is_empty() {
                    w.push("1=0");
                    return;
                }
                operand.write_to(w);
                w.push(" IN (");
                write_list(values, w);
                w.push(")");
            }
            Expr::Func {
                name,
                args,
                distinct,
            } => {
                w.push(name);
                w.push("(");
                if *distinct {
                    w.push("DISTINCT ");
                }
                write_list(args, w);
                w.push(")");
            }
            Expr::Parens(inner) => {
                w.push("(");
                inner.write_to(w);
                w.push(")");
            }
            Expr::Raw { sql, args } => w.push_raw(sql, args),
            Expr::Subquery(core) => {
                w.push("(");
                core.write_to(w);
                w.push(")");
            }
        }
    }

    /// Precedence of the text this node renders to under `w`'s dialect. A
    /// concatenation rendered as a function call cannot be split apart.
    fn rendered_precedence(&self, w: &QueryWriter) -> Precedence {
        match (self, w.dialect().concat_style()) {
            (Expr::Concat(_), ConcatStyle::FunctionCall(_)) => Precedence::Atomic,
            _ => self.precedence(),
        }
    }

    /// Render as the right operand of a node with precedence `parent`.
    fn write_operand(&self, w: &mut QueryWriter, parent: Precedence) {
        if self.rendered_precedence(w) < parent {
            w.push("(");
            self.write_to(w);
            w.push(")");
        } else {
            self.write_to(w);
        }
    }
}

fn write_list(items: &[Expr], w: &mut QueryWriter) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            w.push(", ");
        }
        item.write_to(w);
    }
}

fn write_concat(parts: &[Expr], w: &mut QueryWriter) {
    match w.dialect().concat_style() {
        ConcatStyle::Infix(op) => {
            for (i, part) in parts.iter().enumerate() {
                if i == 0 {
                    part.write_to(w);
                } else {
                    w.push(" ");
                    w.push(op);
                    w.push(" ");
                    part.write_operand(w, Precedence::Additive);
                }
            }
        }
        ConcatStyle::FunctionCall(name) => {
            w.push(name);
            w.push("(");
            write_list(parts, w);
            w.push(")");
        }
    }
}

/// Conversion into an [`Expr`].
///
/// Implemented for expressions, column handles, sub-queries and every
/// [`IntoValue`] type. Values become bound literals, except `Value::Null`,
/// which becomes the inline `NULL` literal.
pub trait IntoExpr {
    fn into_expr(self) -> Expr;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl IntoExpr for &Expr {
    fn into_expr(self) -> Expr {
        self.clone()
    }
}

impl<T: IntoValue> IntoExpr for T {
    fn into_expr(self) -> Expr {
        match self.into_value() {
            Value::Null => Expr::Null,
            value => Expr::Literal {
                value,
                type_hint: None,
            },
        }
    }
}

/// AND-fold predicates left to right. `None` when there are none.
pub(crate) fn and_all(preds: &[Expr]) -> Option<Expr> {
    let mut iter = preds.iter().cloned();
    let first = iter.next()?;
    Some(iter.fold(first, |acc, next| Expr::infix(BinaryOp::And, acc, next)))
}

#[cfg(test)]
mod tests;
