use crate::expr::{Expr, IntoExpr};
use crate::schema::{Column, ColumnRef};
use std::collections::HashMap;

/// One `column = expr` assignment for INSERT / UPDATE.
#[derive(Debug, Clone)]
pub struct ValuePair {
    pub(crate) column: ColumnRef,
    pub(crate) value: Expr,
}

impl ValuePair {
    pub fn new(column: ColumnRef, value: Expr) -> Self {
        Self { column, value }
    }

    pub fn column(&self) -> &ColumnRef {
        &self.column
    }

    pub fn value(&self) -> &Expr {
        &self.value
    }
}

/// Loosely typed column → value set.
///
/// Any [`IntoExpr`] is accepted regardless of the column's declared type;
/// `Value::Null` becomes the inline `NULL` literal.
///
/// ```ignore
/// let row = ValueMap::new()
///     .set(&USERS.id, 2)
///     .set(&USERS.name, Value::Null);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValueMap {
    pairs: Vec<ValuePair>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T>(mut self, column: &Column<T>, value: impl IntoExpr) -> Self {
        self.pairs.push(ValuePair::new(column.to_ref(), value.into_expr()));
        self
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl IntoIterator for ValueMap {
    type Item = ValuePair;
    type IntoIter = std::vec::IntoIter<ValuePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

/// Assignments keyed by column identity. A later pair for the same column
/// replaces the earlier one.
pub(crate) type ValueSet = HashMap<ColumnRef, Expr>;

pub(crate) fn collect_set(pairs: impl IntoIterator<Item = ValuePair>) -> ValueSet {
    pairs
        .into_iter()
        .map(|pair| (pair.column, pair.value))
        .collect()
}
