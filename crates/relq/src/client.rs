//! Connection contract implemented by the caller.
//!
//! relq performs no I/O itself. Any driver (or a test double) that can run a
//! parameterized statement and walk its result rows can back the loaders and
//! mutation builders.

use crate::error::RelqResult;
use crate::value::Value;

/// A forward-only cursor over result rows.
pub trait RowCursor {
    /// The next row's cells in selection order, or `None` when exhausted.
    fn next_row(&mut self) -> RelqResult<Option<Vec<Value>>>;
}

impl RowCursor for std::vec::IntoIter<Vec<Value>> {
    fn next_row(&mut self) -> RelqResult<Option<Vec<Value>>> {
        Ok(self.next())
    }
}

/// A database handle able to run finalized statements.
///
/// `args` must be bound as positional parameters; the SQL text never carries
/// interpolated values. Driver errors should be wrapped with
/// [`RelqError::connection`](crate::RelqError::connection).
pub trait Connection {
    type Rows: RowCursor;

    /// Run a statement that returns rows.
    fn query(&self, sql: &str, args: &[Value]) -> RelqResult<Self::Rows>;

    /// Run a statement and return the number of affected rows.
    fn execute(&self, sql: &str, args: &[Value]) -> RelqResult<u64>;
}

impl<C: Connection + ?Sized> Connection for &C {
    type Rows = C::Rows;

    fn query(&self, sql: &str, args: &[Value]) -> RelqResult<Self::Rows> {
        (**self).query(sql, args)
    }

    fn execute(&self, sql: &str, args: &[Value]) -> RelqResult<u64> {
        (**self).execute(sql, args)
    }
}
