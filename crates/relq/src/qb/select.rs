//! SELECT builder.

use super::source::{IntoSource, Source};
use super::traits::SqlQuery;
use crate::config::QueryConfig;
use crate::error::RelqResult;
use crate::expr::{Expr, IntoExpr, and_all};
use crate::schema::{Column, IntoSelection, Relship, RowMapper, Selection, Table};
use crate::writer::QueryWriter;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

/// An ORDER BY item. Without a direction the database default applies.
#[derive(Debug, Clone)]
pub struct OrderBy {
    expr: Expr,
    direction: Option<Direction>,
}

impl OrderBy {
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            direction: None,
        }
    }

    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            direction: Some(Direction::Asc),
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            direction: Some(Direction::Desc),
        }
    }

    fn write_to(&self, w: &mut QueryWriter) {
        self.expr.write_to(w);
        match self.direction {
            Some(Direction::Asc) => w.push(" ASC"),
            Some(Direction::Desc) => w.push(" DESC"),
            None => {}
        }
    }
}

impl From<Expr> for OrderBy {
    fn from(expr: Expr) -> Self {
        OrderBy::new(expr)
    }
}

impl<T> From<&Column<T>> for OrderBy {
    fn from(column: &Column<T>) -> Self {
        OrderBy::new(column.expr())
    }
}

/// Join flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

#[derive(Debug, Clone)]
struct Join {
    kind: JoinKind,
    source: Source,
    on: Option<Expr>,
}

/// The mapper-independent part of a SELECT.
///
/// This is what gets embedded when a query is used as an expression or a FROM
/// source, so nested queries render into the enclosing writer.
#[derive(Debug, Clone, Default)]
pub struct SelectCore {
    distinct: bool,
    pub(crate) selections: Vec<Selection>,
    from: Option<Source>,
    joins: Vec<Join>,
    wheres: Vec<Expr>,
    groups: Vec<Expr>,
    havings: Vec<Expr>,
    orders: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectCore {
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub(crate) fn write_to(&self, w: &mut QueryWriter) {
        w.push("SELECT ");
        if self.distinct {
            w.push("DISTINCT ");
        }
        if self.selections.is_empty() {
            w.push("*");
        }
        for (i, sel) in self.selections.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            sel.write_to(w);
        }

        if let Some(from) = &self.from {
            w.push(" FROM ");
            from.write_to(w);
        }

        for join in &self.joins {
            w.push(" ");
            w.push(join.kind.as_str());
            w.push(" ");
            join.source.write_to(w);
            if let Some(on) = &join.on {
                w.push(" ON ");
                on.write_to(w);
            }
        }

        if let Some(cond) = and_all(&self.wheres) {
            w.push(" WHERE ");
            cond.write_to(w);
        }

        if !self.groups.is_empty() {
            w.push(" GROUP BY ");
            for (i, group) in self.groups.iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                group.write_to(w);
            }
        }

        if let Some(cond) = and_all(&self.havings) {
            w.push(" HAVING ");
            cond.write_to(w);
        }

        if !self.orders.is_empty() {
            w.push(" ORDER BY ");
            for (i, order) in self.orders.iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                order.write_to(w);
            }
        }

        if let Some(limit) = self.limit {
            w.push(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            w.push(&format!(" OFFSET {offset}"));
        }
    }
}

/// SELECT builder over a row mapper `M`.
#[derive(Debug, Clone)]
pub struct Query<M> {
    pub(crate) mapper: M,
    pub(crate) core: SelectCore,
    pub(crate) config: Option<QueryConfig>,
}

impl<M: RowMapper> Query<M> {
    /// A query selecting the mapper's selections, with no FROM yet.
    pub fn new(mapper: M) -> Self {
        let core = SelectCore {
            selections: mapper.selections().to_vec(),
            ..SelectCore::default()
        };
        Self {
            mapper,
            core,
            config: None,
        }
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    /// The active selection list.
    pub fn selections(&self) -> &[Selection] {
        &self.core.selections
    }

    // ==================== SELECT list ====================

    /// Replace the active selection list.
    pub fn select(mut self, selections: Vec<Selection>) -> Self {
        self.core.selections = selections;
        self
    }

    /// Append one selection.
    pub fn add_select(mut self, selection: impl IntoSelection) -> Self {
        self.core.selections.push(selection.into_selection());
        self
    }

    pub fn distinct(mut self) -> Self {
        self.core.distinct = true;
        self
    }

    // ==================== FROM / JOIN ====================

    pub fn from(mut self, source: impl IntoSource) -> Self {
        self.core.from = Some(source.into_source());
        self
    }

    fn join(mut self, kind: JoinKind, source: Source, on: Option<Expr>) -> Self {
        self.core.joins.push(Join { kind, source, on });
        self
    }

    pub fn inner_join(self, source: impl IntoSource, on: impl IntoExpr) -> Self {
        self.join(JoinKind::Inner, source.into_source(), Some(on.into_expr()))
    }

    pub fn left_join(self, source: impl IntoSource, on: impl IntoExpr) -> Self {
        self.join(JoinKind::Left, source.into_source(), Some(on.into_expr()))
    }

    pub fn right_join(self, source: impl IntoSource, on: impl IntoExpr) -> Self {
        self.join(JoinKind::Right, source.into_source(), Some(on.into_expr()))
    }

    pub fn cross_join(self, source: impl IntoSource) -> Self {
        self.join(JoinKind::Cross, source.into_source(), None)
    }

    /// INNER JOIN the related table on the relationship's columns.
    pub fn join_rel<T: Table, C>(self, relship: &Relship<T, C>) -> Self {
        self.inner_join(relship.table(), relship.on())
    }

    /// LEFT JOIN the related table on the relationship's columns.
    pub fn left_join_rel<T: Table, C>(self, relship: &Relship<T, C>) -> Self {
        self.left_join(relship.table(), relship.on())
    }

    // ==================== WHERE / GROUP BY / HAVING ====================

    /// Add a predicate; multiple predicates are AND-ed in call order.
    pub fn where_(mut self, predicate: impl IntoExpr) -> Self {
        self.core.wheres.push(predicate.into_expr());
        self
    }

    pub fn group_by(mut self, expr: impl IntoExpr) -> Self {
        self.core.groups.push(expr.into_expr());
        self
    }

    /// Add a HAVING predicate; multiple predicates are AND-ed in call order.
    pub fn having(mut self, predicate: impl IntoExpr) -> Self {
        self.core.havings.push(predicate.into_expr());
        self
    }

    // ==================== ORDER BY / LIMIT / OFFSET ====================

    pub fn order_by(mut self, order: impl Into<OrderBy>) -> Self {
        self.core.orders.push(order.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.core.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.core.offset = Some(offset);
        self
    }

    // ==================== Config / nesting ====================

    /// Attach a configuration used by `finalize`, `load` and friends.
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Name this query so it can be used as a FROM source or a selection.
    pub fn as_(self, alias: impl Into<String>) -> AliasedQuery {
        AliasedQuery {
            core: self.core,
            alias: alias.into(),
        }
    }
}

impl<M: RowMapper> SqlQuery for Query<M> {
    const KIND: &'static str = "select";

    fn config(&self) -> Option<&QueryConfig> {
        self.config.as_ref()
    }

    fn write_sql(&self, w: &mut QueryWriter) -> RelqResult<()> {
        self.core.write_to(w);
        Ok(())
    }
}

impl<M> IntoExpr for Query<M> {
    fn into_expr(self) -> Expr {
        Expr::Subquery(Box::new(self.core))
    }
}

impl<M> IntoSelection for Query<M> {
    fn into_selection(self) -> Selection {
        Selection::new(self.into_expr())
    }
}

/// A query with an alias: `(SELECT ...) AS alias`.
#[derive(Debug, Clone)]
pub struct AliasedQuery {
    core: SelectCore,
    alias: String,
}

impl AliasedQuery {
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub(crate) fn into_parts(self) -> (SelectCore, String) {
        (self.core, self.alias)
    }
}

impl IntoSelection for AliasedQuery {
    fn into_selection(self) -> Selection {
        Selection::aliased(Expr::Subquery(Box::new(self.core)), self.alias)
    }
}
