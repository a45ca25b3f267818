//! DELETE builder.

use super::TableTarget;
use super::traits::{Mutation, SqlQuery};
use crate::config::QueryConfig;
use crate::error::RelqResult;
use crate::expr::{Expr, IntoExpr, and_all};
use crate::schema::Table;
use crate::writer::QueryWriter;

/// Single-table DELETE. Without a predicate every row is deleted.
#[derive(Debug, Clone)]
pub struct DeleteQuery {
    table: TableTarget,
    wheres: Vec<Expr>,
    config: Option<QueryConfig>,
}

impl DeleteQuery {
    pub fn new<T: Table>(table: &T) -> Self {
        Self {
            table: TableTarget::of(table),
            wheres: Vec::new(),
            config: None,
        }
    }

    /// Add a predicate; multiple predicates are AND-ed in call order.
    pub fn where_(mut self, predicate: impl IntoExpr) -> Self {
        self.wheres.push(predicate.into_expr());
        self
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = Some(config);
        self
    }
}

impl SqlQuery for DeleteQuery {
    const KIND: &'static str = "delete";

    fn config(&self) -> Option<&QueryConfig> {
        self.config.as_ref()
    }

    fn write_sql(&self, w: &mut QueryWriter) -> RelqResult<()> {
        w.push("DELETE FROM ");
        w.push_ident(&self.table.name);
        if let Some(cond) = and_all(&self.wheres) {
            w.push(" WHERE ");
            cond.write_to(w);
        }
        Ok(())
    }
}

impl Mutation for DeleteQuery {}
