//! UPDATE builder.

use super::TableTarget;
use super::traits::{Mutation, SqlQuery};
use super::values::{ValueMap, ValuePair, ValueSet, collect_set};
use crate::config::QueryConfig;
use crate::error::{RelqError, RelqResult};
use crate::expr::{Expr, IntoExpr, and_all};
use crate::schema::Table;
use crate::writer::QueryWriter;

/// Single-table UPDATE.
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    table: TableTarget,
    values: ValueSet,
    wheres: Vec<Expr>,
    config: Option<QueryConfig>,
}

impl UpdateQuery {
    pub fn new<T: Table>(table: &T) -> Self {
        Self {
            table: TableTarget::of(table),
            values: ValueSet::new(),
            wheres: Vec::new(),
            config: None,
        }
    }

    /// Replace the value set with typed assignments.
    pub fn set(mut self, pairs: impl IntoIterator<Item = ValuePair>) -> Self {
        self.values = collect_set(pairs);
        self
    }

    /// Replace the value set with a loosely typed map.
    pub fn set_map(mut self, map: ValueMap) -> Self {
        self.values = collect_set(map);
        self
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

impl SqlQuery for UpdateQuery {
    const KIND: &'static str = "update";

    fn config(&self) -> Option<&QueryConfig> {
        self.config.as_ref()
    }

    fn write_sql(&self, w: &mut QueryWriter) -> RelqResult<()> {
        if self.values.is_empty() {
            return Err(RelqError::validation("update: empty value set"));
        }
        let assignments: Vec<_> = self
            .table
            .columns
            .iter()
            .filter_map(|c| self.values.get(c).map(|v| (c, v)))
            .collect();
        if assignments.len() < self.values.len() {
            return Err(RelqError::validation(format!(
                "update: value set assigns columns that are not in table {}",
                self.table.name
            )));
        }

        w.push("UPDATE ");
        w.push_ident(&self.table.name);
        w.push(" SET ");
        for (i, (col, value)) in assignments.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push_ident(col.name());
            w.push(" = ");
            value.write_to(w);
        }

        if let Some(cond) = and_all(&self.wheres) {
            w.push(" WHERE ");
            cond.write_to(w);
        }
        Ok(())
    }
}

impl Mutation for UpdateQuery {}
