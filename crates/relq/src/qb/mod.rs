//! Statement builders.
//!
//! Every builder is a plain value mutated by consuming `self -> Self` calls
//! and rendered with [`SqlQuery::finalize`] (process default dialect) or
//! [`SqlQuery::finalize_with`] (explicit configuration).
//!
//! ```ignore
//! use relq::prelude::*;
//!
//! // SELECT
//! let users = relq::select_from(&USERS)
//!     .where_(USERS.name.like_prefix("al"))
//!     .order_by(USERS.id.desc())
//!     .limit(10)
//!     .load(&conn)?;
//!
//! // INSERT
//! relq::insert_into(&USERS)
//!     .values([USERS.id.set(1), USERS.name.set("alice")])
//!     .execute(&conn)?;
//!
//! // UPDATE
//! relq::update(&USERS)
//!     .set([USERS.name.set("bob")])
//!     .where_(USERS.id.eq(1))
//!     .execute(&conn)?;
//!
//! // DELETE
//! relq::delete_from(&USERS)
//!     .where_(USERS.id.in_([1, 2]))
//!     .execute(&conn)?;
//! ```

mod delete;
mod insert;
mod select;
mod source;
mod traits;
mod update;
mod values;

pub use delete::DeleteQuery;
pub use insert::InsertQuery;
pub use select::{AliasedQuery, Direction, JoinKind, OrderBy, Query, SelectCore};
pub use source::{IntoSource, Source};
pub use traits::{Mutation, SqlQuery};
pub use update::UpdateQuery;
pub use values::{ValueMap, ValuePair};

pub use crate::writer::FinalQuery;

use crate::error::RelqResult;
use crate::schema::{Column, EmptyMapper, Relship, RowMapper, Selection, Table, ValueMapper};
use crate::value::Field;

/// SELECT the table's columns FROM the table.
pub fn select_from<T: Table>(table: &T) -> Query<&T> {
    Query::new(table).from(table)
}

/// SELECT arbitrary selections without a row mapper.
///
/// Such a query is meant to be used as a sub-query, a FROM source, or with
/// [`Query::will_scan`]. Loading it directly discards the row contents and
/// yields one `()` per row.
pub fn select(selections: Vec<Selection>) -> Query<EmptyMapper> {
    Query::new(EmptyMapper).select(selections)
}

/// SELECT a single column; rows load as bare values.
pub fn select_only<T: Field + Default>(column: &Column<T>) -> Query<ValueMapper<T>> {
    Query::new(ValueMapper::new(column))
}

/// SELECT through a custom projection mapper. Add a FROM with [`Query::from`].
pub fn select_as<M: RowMapper>(mapper: M) -> Query<M> {
    Query::new(mapper)
}

/// SELECT `from` rows related to already loaded `records` through `relship`.
pub fn select_via<'t, T, R, C>(
    records: &[R::Row],
    from: &'t T,
    relship: &Relship<R, C>,
) -> RelqResult<Query<&'t T>>
where
    T: Table,
    R: Table,
    R::Row: Clone,
{
    Ok(select_from(from).where_(relship.in_(records)?))
}

/// INSERT INTO the table.
pub fn insert_into<T: Table>(table: &T) -> InsertQuery {
    InsertQuery::new(table)
}

/// UPDATE the table.
pub fn update<T: Table>(table: &T) -> UpdateQuery {
    UpdateQuery::new(table)
}

/// DELETE FROM the table.
pub fn delete_from<T: Table>(table: &T) -> DeleteQuery {
    DeleteQuery::new(table)
}

/// Name and declared columns of a mutation target.
#[derive(Debug, Clone)]
pub(crate) struct TableTarget {
    pub(crate) name: String,
    pub(crate) columns: Vec<crate::schema::ColumnRef>,
}

impl TableTarget {
    pub(crate) fn of<T: Table>(table: &T) -> Self {
        Self {
            name: table.table_name().to_string(),
            columns: table.columns().to_vec(),
        }
    }
}
