use super::scanners::{discard_rows, to_map, to_slice, to_slice_map};
use super::{GroupedMap, KeyedMap, RowsScanner, scan_rows};
use crate::client::Connection;
use crate::error::{RelqError, RelqResult};
use crate::log;
use crate::qb::{Query, SqlQuery};
use crate::schema::{Column, RowMapper, Selection};
use crate::value::FromValue;
use std::hash::Hash;

impl<M: RowMapper> Query<M> {
    /// Finalize, run, and feed the rows to `scanners`.
    fn run<'s, C: Connection + ?Sized>(
        &self,
        conn: &C,
        scanners: &mut [&mut (dyn RowsScanner + 's)],
    ) -> RelqResult<()> {
        let cfg = self.effective_config();
        let fq = self.finalize_with(&cfg)?;
        log::sending(Self::KIND, &cfg, &fq);
        scan_rows(conn, &fq, &self.core.selections, scanners)
    }

    /// Load every row as a record.
    ///
    /// A query whose mapper binds nothing (see [`crate::select`]) still runs;
    /// its cells are read and dropped, leaving one default record per row.
    pub fn load<C: Connection + ?Sized>(&self, conn: &C) -> RelqResult<Vec<M::Row>> {
        let mut out = Vec::new();
        if self.mapper.selections().is_empty() && !self.core.selections.is_empty() {
            let mut scanner = discard_rows(&self.core.selections, &mut out);
            let mut scanners: [&mut dyn RowsScanner; 1] = [&mut scanner];
            self.run(conn, &mut scanners)?;
        } else {
            let mut scanner = to_slice(&self.mapper, &mut out);
            let mut scanners: [&mut dyn RowsScanner; 1] = [&mut scanner];
            self.run(conn, &mut scanners)?;
        }
        Ok(out)
    }

    /// Run the query and hand back the raw cursor.
    pub fn load_rows<C: Connection + ?Sized>(&self, conn: &C) -> RelqResult<C::Rows> {
        let cfg = self.effective_config();
        let fq = self.finalize_with(&cfg)?;
        log::sending(Self::KIND, &cfg, &fq);
        conn.query(&fq.sql, &fq.args)
    }

    /// Scan one result set into several destinations. The selection list
    /// becomes the concatenation of the scanners' selections.
    pub fn will_scan<'s>(self) -> MultiScanLoader<'s, M> {
        MultiScanLoader {
            query: self,
            scanners: Vec::new(),
        }
    }
}

/// Loader for [`as_map`].
pub struct KeyedMapLoader<'k, M, K> {
    query: Query<M>,
    key: &'k Column<K>,
}

/// Load `query` into a map keyed by `key`. Later duplicate keys replace
/// earlier rows.
pub fn as_map<M: RowMapper, K>(key: &Column<K>, query: Query<M>) -> KeyedMapLoader<'_, M, K> {
    KeyedMapLoader { query, key }
}

impl<M, K> KeyedMapLoader<'_, M, K>
where
    M: RowMapper,
    K: FromValue + Eq + Hash,
{
    pub fn load<C: Connection + ?Sized>(&self, conn: &C) -> RelqResult<KeyedMap<K, M::Row>> {
        let mut out = KeyedMap::new();
        {
            let mut scanner = to_map(&self.query.mapper, self.key, &mut out);
            let mut scanners: [&mut dyn RowsScanner; 1] = [&mut scanner];
            self.query.run(conn, &mut scanners)?;
        }
        Ok(out)
    }
}

/// Loader for [`as_slice_map`].
pub struct GroupedMapLoader<'k, M, K> {
    query: Query<M>,
    key: &'k Column<K>,
}

/// Load `query` into lists grouped by `key`, keeping row order per group.
pub fn as_slice_map<M: RowMapper, K>(
    key: &Column<K>,
    query: Query<M>,
) -> GroupedMapLoader<'_, M, K> {
    GroupedMapLoader { query, key }
}

impl<M, K> GroupedMapLoader<'_, M, K>
where
    M: RowMapper,
    K: FromValue + Eq + Hash,
{
    pub fn load<C: Connection + ?Sized>(&self, conn: &C) -> RelqResult<GroupedMap<K, M::Row>> {
        let mut out = GroupedMap::new();
        {
            let mut scanner = to_slice_map(&self.query.mapper, self.key, &mut out);
            let mut scanners: [&mut dyn RowsScanner; 1] = [&mut scanner];
            self.query.run(conn, &mut scanners)?;
        }
        Ok(out)
    }
}

/// Loader returned by [`Query::will_scan`].
pub struct MultiScanLoader<'s, M> {
    query: Query<M>,
    scanners: Vec<Box<dyn RowsScanner + 's>>,
}

impl<'s, M: RowMapper> MultiScanLoader<'s, M> {
    /// Add a destination. Scanners read consecutive slices of each row in the
    /// order they are added.
    pub fn scan(mut self, scanner: impl RowsScanner + 's) -> Self {
        self.scanners.push(Box::new(scanner));
        self
    }

    /// The selection list the statement will be rendered with.
    pub fn selections(&self) -> Vec<Selection> {
        self.scanners
            .iter()
            .flat_map(|s| s.selections().iter().cloned())
            .collect()
    }

    /// Run the query and publish every scanner's result.
    ///
    /// Fails before querying when no scanner was added.
    pub fn load<C: Connection + ?Sized>(self, conn: &C) -> RelqResult<()> {
        if self.scanners.is_empty() {
            return Err(RelqError::validation("will_scan needs at least one scanner"));
        }
        let selections = self.selections();
        let query = self.query.select(selections);
        let mut scanners = self.scanners;
        let mut refs: Vec<&mut (dyn RowsScanner + 's)> =
            scanners.iter_mut().map(|s| s.as_mut()).collect();
        query.run(conn, &mut refs)
    }
}
