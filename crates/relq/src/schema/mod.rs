//! Tables, columns, selections and the row-mapping contract.
//!
//! Table descriptors are normally produced by a code generator, but writing
//! one by hand is short:
//!
//! ```ignore
//! #[derive(Debug, Clone, Default)]
//! pub struct User { pub id: i64, pub name: String }
//!
//! pub struct Users { base: TableBase, pub id: Column<i64>, pub name: Column<String> }
//!
//! impl Users {
//!     pub fn new(alias: Option<&str>) -> Self {
//!         let q = alias.unwrap_or("users");
//!         let id = Column::new(q, "id");
//!         let name = Column::new(q, "name");
//!         let base = TableBase::new("users", alias, vec![id.to_ref(), name.to_ref()]);
//!         Self { base, id, name }
//!     }
//! }
//!
//! impl RowMapper for Users {
//!     type Row = User;
//!     fn selections(&self) -> &[Selection] { self.base.selections() }
//!     fn fields<'r>(&self, row: &'r mut User) -> Vec<&'r mut dyn Field> {
//!         vec![&mut row.id, &mut row.name]
//!     }
//! }
//!
//! impl Table for Users {
//!     fn base(&self) -> &TableBase { &self.base }
//!     fn as_(&self, alias: &str) -> Self { Users::new(Some(alias)) }
//! }
//! ```

mod relship;

pub use relship::Relship;

use crate::expr::{Expr, IntoExpr};
use crate::qb::ValuePair;
use crate::value::{Field, IntoValue};
use crate::writer::QueryWriter;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SELECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a selection, assigned once at construction.
///
/// Lookups inside selection lists compare ids, never names or structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectionId(u64);

impl SelectionId {
    pub fn next() -> Self {
        SelectionId(NEXT_SELECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// An expression in a SELECT list, with an optional output alias.
#[derive(Debug, Clone)]
pub struct Selection {
    id: SelectionId,
    expr: Expr,
    alias: Option<String>,
}

impl Selection {
    /// A selection with a fresh identity.
    pub fn new(expr: Expr) -> Self {
        Self {
            id: SelectionId::next(),
            expr,
            alias: None,
        }
    }

    pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
        Self {
            id: SelectionId::next(),
            expr,
            alias: Some(alias.into()),
        }
    }

    pub fn id(&self) -> SelectionId {
        self.id
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub(crate) fn write_to(&self, w: &mut QueryWriter) {
        self.expr.write_to(w);
        if let Some(alias) = &self.alias {
            w.push(" AS ");
            w.push_ident(alias);
        }
    }
}

/// Conversion into a [`Selection`]. See the [`sels!`](crate::sels) macro.
pub trait IntoSelection {
    fn into_selection(self) -> Selection;
}

impl IntoSelection for Selection {
    fn into_selection(self) -> Selection {
        self
    }
}

impl IntoSelection for Expr {
    fn into_selection(self) -> Selection {
        Selection::new(self)
    }
}

impl<T> IntoSelection for &Column<T> {
    fn into_selection(self) -> Selection {
        self.sel()
    }
}

/// Offset of `target` relative to `anchor` inside `active`.
///
/// `None` when the anchor is missing or the target does not appear at or
/// after it.
pub(crate) fn selection_offset(
    active: &[Selection],
    anchor: SelectionId,
    target: SelectionId,
) -> Option<usize> {
    let from = active.iter().position(|s| s.id == anchor)?;
    active[from..].iter().position(|s| s.id == target)
}

/// Untyped column reference: qualifier (table name or alias) + column name.
///
/// Equality and hashing use the identity only.
#[derive(Debug, Clone)]
pub struct ColumnRef {
    id: SelectionId,
    qualifier: String,
    name: String,
}

impl ColumnRef {
    pub fn id(&self) -> SelectionId {
        self.id
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn write_to(&self, w: &mut QueryWriter) {
        w.push_ident(&self.qualifier);
        w.push(".");
        w.push_ident(&self.name);
    }
}

impl PartialEq for ColumnRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ColumnRef {}

impl Hash for ColumnRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A typed column handle.
pub struct Column<T> {
    inner: ColumnRef,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _ty: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.inner.id)
            .field("qualifier", &self.inner.qualifier)
            .field("name", &self.inner.name)
            .finish()
    }
}

impl<T> Column<T> {
    /// A new column with its own identity.
    pub fn new(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            inner: ColumnRef {
                id: SelectionId::next(),
                qualifier: qualifier.into(),
                name: name.into(),
            },
            _ty: PhantomData,
        }
    }

    pub fn id(&self) -> SelectionId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn qualifier(&self) -> &str {
        &self.inner.qualifier
    }

    pub fn column_ref(&self) -> &ColumnRef {
        &self.inner
    }

    pub fn to_ref(&self) -> ColumnRef {
        self.inner.clone()
    }

    pub fn expr(&self) -> Expr {
        Expr::Column(self.inner.clone())
    }

    /// This column as a selection. Keeps the column's identity.
    pub fn sel(&self) -> Selection {
        Selection {
            id: self.inner.id,
            expr: self.expr(),
            alias: None,
        }
    }

    /// Assign an arbitrary expression in an insert/update value set.
    pub fn set_expr(&self, value: impl IntoExpr) -> ValuePair {
        ValuePair::new(self.to_ref(), value.into_expr())
    }
}

impl<T: IntoValue> Column<T> {
    /// Assign a typed value in an insert/update value set.
    pub fn set(&self, value: impl Into<T>) -> ValuePair {
        let value: T = value.into();
        ValuePair::new(self.to_ref(), value.into_expr())
    }

    /// `column IN (values...)` over typed values.
    pub fn in_<I>(&self, values: I) -> Expr
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        Expr::In {
            operand: Box::new(self.expr()),
            values: values
                .into_iter()
                .map(|v| {
                    let v: T = v.into();
                    v.into_expr()
                })
                .collect(),
        }
    }
}

impl<T> IntoExpr for &Column<T> {
    fn into_expr(self) -> Expr {
        self.expr()
    }
}

/// Binds a record type's fields to a list of selections.
///
/// `fields` must return exactly one slot per entry of `selections`, in the
/// same order.
pub trait RowMapper {
    type Row: Default;

    fn selections(&self) -> &[Selection];

    fn fields<'r>(&self, row: &'r mut Self::Row) -> Vec<&'r mut dyn Field>;
}

impl<M: RowMapper + ?Sized> RowMapper for &M {
    type Row = M::Row;

    fn selections(&self) -> &[Selection] {
        (**self).selections()
    }

    fn fields<'r>(&self, row: &'r mut Self::Row) -> Vec<&'r mut dyn Field> {
        (**self).fields(row)
    }
}

/// Name, alias and columns shared by every table descriptor.
#[derive(Debug, Clone)]
pub struct TableBase {
    name: String,
    alias: Option<String>,
    columns: Vec<ColumnRef>,
    selections: Vec<Selection>,
}

impl TableBase {
    /// Build from the table's columns; the selection list mirrors them.
    ///
    /// An alias equal to the table name is dropped.
    pub fn new(name: impl Into<String>, alias: Option<&str>, columns: Vec<ColumnRef>) -> Self {
        let name = name.into();
        let alias = alias.filter(|a| *a != name).map(str::to_owned);
        let selections = columns
            .iter()
            .map(|c| Selection {
                id: c.id,
                expr: Expr::Column(c.clone()),
                alias: None,
            })
            .collect();
        Self {
            name,
            alias,
            columns,
            selections,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }
}

/// A named row source.
pub trait Table: RowMapper {
    fn base(&self) -> &TableBase;

    /// An independently aliased copy of this table.
    fn as_(&self, alias: &str) -> Self
    where
        Self: Sized;

    fn table_name(&self) -> &str {
        self.base().name()
    }

    fn table_alias(&self) -> Option<&str> {
        self.base().alias()
    }

    fn columns(&self) -> &[ColumnRef] {
        self.base().columns()
    }
}

/// Mapper for queries whose rows are not materialized.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyMapper;

impl RowMapper for EmptyMapper {
    type Row = ();

    fn selections(&self) -> &[Selection] {
        &[]
    }

    fn fields<'r>(&self, _row: &'r mut ()) -> Vec<&'r mut dyn Field> {
        Vec::new()
    }
}

/// Mapper that loads a single selection into a bare value.
#[derive(Debug, Clone)]
pub struct ValueMapper<V> {
    selections: Vec<Selection>,
    _ty: PhantomData<fn() -> V>,
}

impl<V> ValueMapper<V> {
    pub fn new(selection: impl IntoSelection) -> Self {
        Self {
            selections: vec![selection.into_selection()],
            _ty: PhantomData,
        }
    }
}

impl<V: Field + Default> RowMapper for ValueMapper<V> {
    type Row = V;

    fn selections(&self) -> &[Selection] {
        &self.selections
    }

    fn fields<'r>(&self, row: &'r mut V) -> Vec<&'r mut dyn Field> {
        vec![row as &mut dyn Field]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_with_same_name_are_distinct() {
        let a: Column<i64> = Column::new("users", "id");
        let b: Column<i64> = Column::new("users", "id");
        assert_ne!(a.id(), b.id());
        assert_ne!(a.to_ref(), b.to_ref());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn offset_is_relative_to_anchor() {
        let a: Column<i64> = Column::new("t", "a");
        let b: Column<i64> = Column::new("t", "b");
        let c: Column<i64> = Column::new("u", "c");
        let d: Column<i64> = Column::new("u", "d");
        let active = vec![a.sel(), b.sel(), c.sel(), d.sel()];

        assert_eq!(selection_offset(&active, a.id(), b.id()), Some(1));
        assert_eq!(selection_offset(&active, c.id(), d.id()), Some(1));
        assert_eq!(selection_offset(&active, c.id(), a.id()), None);

        let stray: Column<i64> = Column::new("t", "a");
        assert_eq!(selection_offset(&active, stray.id(), a.id()), None);
    }

    #[test]
    fn table_base_mirrors_columns() {
        let id: Column<i64> = Column::new("u", "id");
        let name: Column<String> = Column::new("u", "name");
        let base = TableBase::new("users", Some("u"), vec![id.to_ref(), name.to_ref()]);

        assert_eq!(base.alias(), Some("u"));
        let ids: Vec<_> = base.selections().iter().map(Selection::id).collect();
        assert_eq!(ids, vec![id.id(), name.id()]);

        let plain = TableBase::new("users", Some("users"), Vec::new());
        assert_eq!(plain.alias(), None);
    }

    #[test]
    fn aliased_selection_gets_new_identity() {
        let id: Column<i64> = Column::new("users", "id");
        let sel = Selection::aliased(id.expr(), "foo");
        assert_ne!(sel.id(), id.id());
        assert_eq!(sel.alias(), Some("foo"));
    }
}
