//! INSERT builder.

use super::TableTarget;
use super::traits::{Mutation, SqlQuery};
use super::values::{ValueMap, ValuePair, ValueSet, collect_set};
use crate::config::QueryConfig;
use crate::error::{RelqError, RelqResult};
use crate::schema::{ColumnRef, Table};
use crate::writer::QueryWriter;

/// Multi-row INSERT.
///
/// Every row must assign exactly the same columns. The column list follows
/// the table's declared order; rows keep their input order.
#[derive(Debug, Clone)]
pub struct InsertQuery {
    table: TableTarget,
    rows: Vec<ValueSet>,
    config: Option<QueryConfig>,
}

impl InsertQuery {
    pub fn new<T: Table>(table: &T) -> Self {
        Self {
            table: TableTarget::of(table),
            rows: Vec::new(),
            config: None,
        }
    }

    /// Add one row of typed assignments.
    pub fn values(mut self, row: impl IntoIterator<Item = ValuePair>) -> Self {
        self.rows.push(collect_set(row));
        self
    }

    /// Add several loosely typed rows.
    pub fn value_maps(mut self, rows: impl IntoIterator<Item = ValueMap>) -> Self {
        self.rows.extend(rows.into_iter().map(collect_set));
        self
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Target columns in table order, after checking every row against the
    /// first one.
    fn target_columns(&self) -> RelqResult<Vec<&ColumnRef>> {
        let Some(first) = self.rows.first() else {
            return Err(RelqError::validation("insert: no rows given"));
        };
        if first.is_empty() {
            return Err(RelqError::validation("insert: empty value set"));
        }

        let columns: Vec<&ColumnRef> = self
            .table
            .columns
            .iter()
            .filter(|c| first.contains_key(*c))
            .collect();
        if columns.len() < first.len() {
            return Err(RelqError::validation(format!(
                "insert: row 0 assigns columns that are not in table {}",
                self.table.name
            )));
        }

        for (i, row) in self.rows.iter().enumerate().skip(1) {
            if row.len() != columns.len() || columns.iter().any(|c| !row.contains_key(*c)) {
                return Err(RelqError::validation(format!(
                    "insert: row {i} columns do not match row 0"
                )));
            }
        }
        Ok(columns)
    }
}

impl SqlQuery for InsertQuery {
    const KIND: &'static str = "insert";

    fn config(&self) -> Option<&QueryConfig> {
        self.config.as_ref()
    }

    fn write_sql(&self, w: &mut QueryWriter) -> RelqResult<()> {
        let columns = self.target_columns()?;

        w.push("INSERT INTO ");
        w.push_ident(&self.table.name);
        w.push(" (");
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push_ident(col.name());
        }
        w.push(") VALUES ");

        for (r, row) in self.rows.iter().enumerate() {
            if r > 0 {
                w.push(", ");
            }
            w.push("(");
            for (i, col) in columns.iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                // presence checked in target_columns
                if let Some(value) = row.get(*col) {
                    value.write_to(w);
                }
            }
            w.push(")");
        }
        Ok(())
    }
}

impl Mutation for InsertQuery {}
