//! # relq
//!
//! Typed SQL query construction and result materialization.
//!
//! ## Features
//!
//! - **Typed handles**: tables and `Column<T>` descriptors drive every builder
//! - **Precedence-aware rendering**: expression trees parenthesize only where needed
//! - **Dialects**: generic `?`, Postgres `$N`, MySQL backticks and `CONCAT`
//! - **Driver agnostic**: execution goes through a caller-supplied [`Connection`]
//! - **Flexible loading**: vectors, keyed maps, grouped maps, or several
//!   destinations filled from one result set
//!
//! ## Example
//!
//! ```ignore
//! use relq::prelude::*;
//!
//! relq::set_default_dialect(Dialect::Postgres);
//!
//! let users = Users::new(None);
//! let active = relq::select_from(&users)
//!     .where_(users.name.like_prefix("al"))
//!     .order_by(users.id.desc())
//!     .limit(10)
//!     .load(&conn)?;
//!
//! let posts = Posts::new(None);
//! let by_author = relq::as_slice_map(
//!     &posts.author_id,
//!     relq::select_via(&active, &posts, &posts.author)?,
//! )
//! .load(&conn)?;
//! ```

pub mod client;
pub mod config;
pub mod dialect;
pub mod error;
pub mod expr;
#[cfg(test)]
mod fixtures;
mod log;
pub mod qb;
pub mod scan;
pub mod schema;
pub mod value;
pub mod writer;

pub use client::{Connection, RowCursor};
pub use config::QueryConfig;
pub use dialect::{ConcatStyle, Dialect, default_dialect, set_default_dialect};
pub use error::{RelqError, RelqResult};
pub use expr::{
    Expr, ExprOps, IntoExpr, Precedence, avg, concat, count, func, lit, max, min, null, parens,
    raw, raw_with, sum, typed,
};
pub use qb::{
    AliasedQuery, DeleteQuery, FinalQuery, InsertQuery, IntoSource, Mutation, OrderBy, Query,
    SqlQuery, UpdateQuery, ValueMap, ValuePair, delete_from, insert_into, select, select_as,
    select_from, select_only, select_via, update,
};
pub use scan::{
    GroupedMap, KeyedMap, RowsScanner, as_map, as_slice_map, to_map, to_slice, to_slice_map,
};
pub use schema::{
    Column, ColumnRef, EmptyMapper, IntoSelection, Relship, RowMapper, Selection, SelectionId,
    Table, TableBase, ValueMapper,
};
pub use value::{Field, FromValue, IntoValue, Value};

/// Build a `Vec<Selection>` from columns, expressions, selections and queries.
///
/// ```ignore
/// let q = relq::select(sels![users.id, count(&posts.id).as_("n")]);
/// ```
#[macro_export]
macro_rules! sels {
    ($($sel:expr),* $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::IntoSelection as _;
        ::std::vec![$(($sel).into_selection()),*]
    }};
}

/// Traits and types needed to build and run queries.
pub mod prelude {
    pub use crate::sels;
    pub use crate::{
        Column, Connection, Dialect, Expr, ExprOps, Field, IntoExpr, IntoSelection, Mutation,
        QueryConfig, RelqError, RelqResult, Relship, RowMapper, Selection, SqlQuery, Table,
        TableBase, Value,
    };
}
