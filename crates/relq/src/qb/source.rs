use super::select::{AliasedQuery, SelectCore};
use crate::expr::Expr;
use crate::schema::Table;
use crate::writer::QueryWriter;

/// A FROM / JOIN source.
#[derive(Debug, Clone)]
pub enum Source {
    /// `name [AS alias]`
    Table { name: String, alias: Option<String> },
    /// `(SELECT ...) AS alias`
    Subquery { query: Box<SelectCore>, alias: String },
    /// Any expression, typically a raw fragment.
    Expr(Expr),
}

impl Source {
    pub(crate) fn write_to(&self, w: &mut QueryWriter) {
        match self {
            Source::Table { name, alias } => {
                w.push_ident(name);
                if let Some(alias) = alias {
                    w.push(" AS ");
                    w.push_ident(alias);
                }
            }
            Source::Subquery { query, alias } => {
                w.push("(");
                query.write_to(w);
                w.push(") AS ");
                w.push_ident(alias);
            }
            Source::Expr(expr) => expr.write_to(w),
        }
    }
}

/// Conversion into a [`Source`].
pub trait IntoSource {
    fn into_source(self) -> Source;
}

impl IntoSource for Source {
    fn into_source(self) -> Source {
        self
    }
}

impl<T: Table> IntoSource for &T {
    fn into_source(self) -> Source {
        Source::Table {
            name: self.table_name().to_string(),
            alias: self.table_alias().map(str::to_owned),
        }
    }
}

impl IntoSource for Expr {
    fn into_source(self) -> Source {
        Source::Expr(self)
    }
}

impl IntoSource for AliasedQuery {
    fn into_source(self) -> Source {
        let (query, alias) = self.into_parts();
        Source::Subquery {
            query: Box::new(query),
            alias,
        }
    }
}
