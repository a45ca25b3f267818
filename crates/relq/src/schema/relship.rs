use super::{Column, Table, selection_offset};
use crate::error::{RelqError, RelqResult};
use crate::expr::{Expr, ExprOps, IntoExpr};
use std::sync::OnceLock;

/// A typed foreign-key relationship: `left = right_table.right_column`.
///
/// The right table is built on first use and cached behind a box, so two
/// tables can hold relationships to each other without recursing at
/// construction time or in their layout.
///
/// ```ignore
/// // on Posts: author_id -> users.id
/// let author = Relship::new(&author_id, || Users::new(Some("posts_users")), |u| &u.id);
/// ```
pub struct Relship<T, C> {
    left: Column<C>,
    right: OnceLock<Box<T>>,
    make_right: fn() -> T,
    right_column: fn(&T) -> &Column<C>,
}

impl<T: Table, C> Relship<T, C> {
    pub fn new(left: &Column<C>, make_right: fn() -> T, right_column: fn(&T) -> &Column<C>) -> Self {
        Self {
            left: left.clone(),
            right: OnceLock::new(),
            make_right,
            right_column,
        }
    }

    /// The related table.
    pub fn table(&self) -> &T {
        self.right.get_or_init(|| Box::new((self.make_right)()))
    }

    pub fn left(&self) -> &Column<C> {
        &self.left
    }

    pub fn right(&self) -> &Column<C> {
        (self.right_column)(self.table())
    }

    /// Join condition `left = right`.
    pub fn on(&self) -> Expr {
        (&self.left).eq(self.right())
    }

    /// `left IN (keys...)` where the keys are read from already loaded
    /// records of the related table.
    ///
    /// Fails with [`RelqError::KeyNotFound`] when the right column is not part
    /// of the related table's own selections.
    pub fn in_(&self, records: &[T::Row]) -> RelqResult<Expr>
    where
        T::Row: Clone,
    {
        let table = self.table();
        let right = self.right();
        let sels = table.selections();
        let offset = sels
            .first()
            .and_then(|anchor| selection_offset(sels, anchor.id(), right.id()))
            .ok_or_else(|| {
                RelqError::key_not_found(format!(
                    "{}.{} is not selected by table {}",
                    right.qualifier(),
                    right.name(),
                    table.table_name()
                ))
            })?;

        let mut keys = Vec::with_capacity(records.len());
        for record in records {
            let mut record = record.clone();
            let fields = table.fields(&mut record);
            let field = fields.get(offset).ok_or_else(|| {
                RelqError::validation(format!(
                    "table {} bound {} fields for {} selections",
                    table.table_name(),
                    fields.len(),
                    sels.len()
                ))
            })?;
            keys.push(field.to_value().into_expr());
        }

        Ok(Expr::In {
            operand: Box::new(self.left.expr()),
            values: keys,
        })
    }
}
