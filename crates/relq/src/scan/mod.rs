//! Row scanning and loading.
//!
//! A [`RowsScanner`] owns one mapper and one destination. The shared loop in
//! this module feeds it, row by row, the contiguous slice of cells that belongs
//! to its selections. Scanners buffer what they decode and only write into the
//! caller's destination from [`RowsScanner::finish`], which runs after every
//! row decoded successfully.
//!
//! ```ignore
//! // one query, two destinations
//! let mut posts = Vec::new();
//! let mut authors = HashMap::new();
//! relq::select_from(&POSTS)
//!     .join_rel(&POSTS.author)
//!     .will_scan()
//!     .scan(to_slice(&POSTS, &mut posts))
//!     .scan(to_map(POSTS.author.table(), &POSTS.author.table().id, &mut authors))
//!     .load(&conn)?;
//! ```

mod loaders;
mod scanners;

pub use loaders::{GroupedMapLoader, KeyedMapLoader, MultiScanLoader, as_map, as_slice_map};
pub use scanners::{MapScanner, SliceMapScanner, SliceScanner, to_map, to_slice, to_slice_map};

use crate::client::{Connection, RowCursor};
use crate::error::{RelqError, RelqResult};
use crate::schema::Selection;
use crate::value::Field;
use crate::writer::FinalQuery;
use std::collections::HashMap;

/// Records keyed by a column value; later rows replace earlier ones.
pub type KeyedMap<K, R> = HashMap<K, R>;

/// Records grouped by a column value, in row order.
pub type GroupedMap<K, R> = HashMap<K, Vec<R>>;

/// Consumer of one mapper's slice of every result row.
pub trait RowsScanner {
    /// Selections this scanner decodes, in order.
    fn selections(&self) -> &[Selection];

    /// Called once with the full active selection list before the query runs.
    fn prepare(&mut self, _active: &[Selection]) -> RelqResult<()> {
        Ok(())
    }

    /// Destination slots for the next row, one per selection.
    fn before_each_scan(&mut self) -> Vec<&mut dyn Field>;

    /// The slots returned by `before_each_scan` have been filled.
    fn after_each_scan(&mut self) -> RelqResult<()>;

    /// Every row decoded; publish the buffered result.
    fn finish(&mut self);
}

/// Run `fq` on `conn` and feed each row to `scanners`.
///
/// `active` is the selection list the statement was rendered with; it must be
/// the concatenation of the scanners' selections.
pub(crate) fn scan_rows<'s, C: Connection + ?Sized>(
    conn: &C,
    fq: &FinalQuery,
    active: &[Selection],
    scanners: &mut [&mut (dyn RowsScanner + 's)],
) -> RelqResult<()> {
    let widths: Vec<usize> = scanners.iter().map(|s| s.selections().len()).collect();
    let total: usize = widths.iter().sum();
    if total != active.len() {
        return Err(RelqError::validation(format!(
            "scanners decode {total} selections but the query selects {}",
            active.len()
        )));
    }
    for scanner in scanners.iter_mut() {
        scanner.prepare(active)?;
    }

    let mut rows = conn.query(&fq.sql, &fq.args)?;
    while let Some(row) = rows.next_row()? {
        if row.len() != total {
            return Err(RelqError::decode(
                row.len().min(total),
                format!("row has {} values, expected {total}", row.len()),
            ));
        }

        let mut cells = row.into_iter();
        let mut base = 0;
        for (scanner, &width) in scanners.iter_mut().zip(&widths) {
            let fields = scanner.before_each_scan();
            if fields.len() != width {
                return Err(RelqError::validation(format!(
                    "mapper bound {} fields for {width} selections",
                    fields.len()
                )));
            }
            for (i, (field, cell)) in fields.into_iter().zip(cells.by_ref()).enumerate() {
                field.set_value(cell).map_err(|e| e.at_column(base + i))?;
            }
            scanner.after_each_scan()?;
            base += width;
        }
    }

    for scanner in scanners.iter_mut() {
        scanner.finish();
    }
    Ok(())
}
