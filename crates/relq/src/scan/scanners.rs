use super::{GroupedMap, KeyedMap, RowsScanner};
use crate::error::{RelqError, RelqResult};
use crate::schema::{Column, RowMapper, Selection, SelectionId, selection_offset};
use crate::value::{Field, FromValue, Value};
use std::hash::Hash;

/// Appends every row to a `Vec`.
pub struct SliceScanner<'d, M: RowMapper> {
    mapper: M,
    dest: &'d mut Vec<M::Row>,
    buf: Vec<M::Row>,
    pending: Option<M::Row>,
}

/// Scan into `dest`, replacing its contents once the load succeeds.
pub fn to_slice<M: RowMapper>(mapper: M, dest: &mut Vec<M::Row>) -> SliceScanner<'_, M> {
    SliceScanner {
        mapper,
        dest,
        buf: Vec::new(),
        pending: None,
    }
}

impl<M: RowMapper> RowsScanner for SliceScanner<'_, M> {
    fn selections(&self) -> &[Selection] {
        self.mapper.selections()
    }

    fn before_each_scan(&mut self) -> Vec<&mut dyn Field> {
        let row = self.pending.insert(M::Row::default());
        self.mapper.fields(row)
    }

    fn after_each_scan(&mut self) -> RelqResult<()> {
        if let Some(row) = self.pending.take() {
            self.buf.push(row);
        }
        Ok(())
    }

    fn finish(&mut self) {
        *self.dest = std::mem::take(&mut self.buf);
    }
}

/// Reads every cell of the active selections and keeps one default record
/// per row. Used when the mapper binds no selections of its own.
pub(crate) struct DiscardScanner<'d, R> {
    selections: Vec<Selection>,
    dest: &'d mut Vec<R>,
    buf: Vec<R>,
    cells: Vec<Value>,
}

pub(crate) fn discard_rows<'d, R>(
    selections: &[Selection],
    dest: &'d mut Vec<R>,
) -> DiscardScanner<'d, R> {
    DiscardScanner {
        selections: selections.to_vec(),
        dest,
        buf: Vec::new(),
        cells: Vec::new(),
    }
}

impl<R: Default> RowsScanner for DiscardScanner<'_, R> {
    fn selections(&self) -> &[Selection] {
        &self.selections
    }

    fn before_each_scan(&mut self) -> Vec<&mut dyn Field> {
        self.cells.clear();
        self.cells.resize(self.selections.len(), Value::Null);
        self.cells.iter_mut().map(|c| c as &mut dyn Field).collect()
    }

    fn after_each_scan(&mut self) -> RelqResult<()> {
        self.buf.push(R::default());
        Ok(())
    }

    fn finish(&mut self) {
        *self.dest = std::mem::take(&mut self.buf);
    }
}

/// Locates a key column inside the active selections, relative to the
/// mapper's first selection.
#[derive(Debug, Clone)]
struct KeyLocator {
    key: SelectionId,
    label: String,
    /// offset inside the mapper's own selections
    offset: usize,
    /// absolute position inside the active selections
    column: usize,
}

impl KeyLocator {
    fn new<K>(key: &Column<K>) -> Self {
        Self {
            key: key.id(),
            label: format!("{}.{}", key.qualifier(), key.name()),
            offset: 0,
            column: 0,
        }
    }

    fn locate(&mut self, own: &[Selection], active: &[Selection]) -> RelqResult<()> {
        let not_found = || RelqError::key_not_found(self.label.clone());
        let anchor = own.first().ok_or_else(not_found)?;
        let offset = selection_offset(active, anchor.id(), self.key).ok_or_else(not_found)?;
        if offset >= own.len() {
            return Err(not_found());
        }
        let base = active
            .iter()
            .position(|s| s.id() == anchor.id())
            .ok_or_else(not_found)?;
        self.offset = offset;
        self.column = base + offset;
        Ok(())
    }

    fn read<M: RowMapper, K: FromValue>(&self, mapper: &M, row: &mut M::Row) -> RelqResult<K> {
        let fields = mapper.fields(row);
        let value = fields
            .get(self.offset)
            .map(|f| f.to_value())
            .ok_or_else(|| RelqError::key_not_found(self.label.clone()))?;
        K::from_value(value).map_err(|e| e.at_column(self.column))
    }
}

/// Stores every row under its key; a later row with the same key wins.
pub struct MapScanner<'d, M: RowMapper, K> {
    mapper: M,
    key: KeyLocator,
    dest: &'d mut KeyedMap<K, M::Row>,
    buf: KeyedMap<K, M::Row>,
    pending: Option<M::Row>,
}

/// Scan into `dest` keyed by `key`, replacing its contents once the load succeeds.
pub fn to_map<'d, M, K>(
    mapper: M,
    key: &Column<K>,
    dest: &'d mut KeyedMap<K, M::Row>,
) -> MapScanner<'d, M, K>
where
    M: RowMapper,
    K: FromValue + Eq + Hash,
{
    MapScanner {
        mapper,
        key: KeyLocator::new(key),
        dest,
        buf: KeyedMap::new(),
        pending: None,
    }
}

impl<M, K> RowsScanner for MapScanner<'_, M, K>
where
    M: RowMapper,
    K: FromValue + Eq + Hash,
{
    fn selections(&self) -> &[Selection] {
        self.mapper.selections()
    }

    fn prepare(&mut self, active: &[Selection]) -> RelqResult<()> {
        self.key.locate(self.mapper.selections(), active)
    }

    fn before_each_scan(&mut self) -> Vec<&mut dyn Field> {
        let row = self.pending.insert(M::Row::default());
        self.mapper.fields(row)
    }

    fn after_each_scan(&mut self) -> RelqResult<()> {
        if let Some(mut row) = self.pending.take() {
            let key: K = self.key.read(&self.mapper, &mut row)?;
            self.buf.insert(key, row);
        }
        Ok(())
    }

    fn finish(&mut self) {
        *self.dest = std::mem::take(&mut self.buf);
    }
}

/// Appends every row to the list stored under its key.
pub struct SliceMapScanner<'d, M: RowMapper, K> {
    mapper: M,
    key: KeyLocator,
    dest: &'d mut GroupedMap<K, M::Row>,
    buf: GroupedMap<K, M::Row>,
    pending: Option<M::Row>,
}

/// Scan into `dest` grouped by `key`, replacing its contents once the load succeeds.
pub fn to_slice_map<'d, M, K>(
    mapper: M,
    key: &Column<K>,
    dest: &'d mut GroupedMap<K, M::Row>,
) -> SliceMapScanner<'d, M, K>
where
    M: RowMapper,
    K: FromValue + Eq + Hash,
{
    SliceMapScanner {
        mapper,
        key: KeyLocator::new(key),
        dest,
        buf: GroupedMap::new(),
        pending: None,
    }
}

impl<M, K> RowsScanner for SliceMapScanner<'_, M, K>
where
    M: RowMapper,
    K: FromValue + Eq + Hash,
{
    fn selections(&self) -> &[Selection] {
        self.mapper.selections()
    }

    fn prepare(&mut self, active: &[Selection]) -> RelqResult<()> {
        self.key.locate(self.mapper.selections(), active)
    }

    fn before_each_scan(&mut self) -> Vec<&mut dyn Field> {
        let row = self.pending.insert(M::Row::default());
        self.mapper.fields(row)
    }

    fn after_each_scan(&mut self) -> RelqResult<()> {
        if let Some(mut row) = self.pending.take() {
            let key: K = self.key.read(&self.mapper, &mut row)?;
            self.buf.entry(key).or_default().push(row);
        }
        Ok(())
    }

    fn finish(&mut self) {
        *self.dest = std::mem::take(&mut self.buf);
    }
}
