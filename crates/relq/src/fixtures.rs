//! Hand-written tables and an in-memory connection for unit tests.

use crate::client::Connection;
use crate::config::QueryConfig;
use crate::dialect::Dialect;
use crate::error::{RelqError, RelqResult};
use crate::schema::{Column, Relship, RowMapper, Selection, Table, TableBase};
use crate::value::{Field, Value};
use std::cell::RefCell;

pub fn generic() -> QueryConfig {
    QueryConfig::new(Dialect::Generic)
}

pub fn pg() -> QueryConfig {
    QueryConfig::new(Dialect::Postgres)
}

pub fn mysql() -> QueryConfig {
    QueryConfig::new(Dialect::MySql)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
}

pub struct Users {
    base: TableBase,
    pub id: Column<i64>,
    pub name: Column<String>,
}

impl Users {
    pub fn new() -> Self {
        Self::with_alias(None)
    }

    fn with_alias(alias: Option<&str>) -> Self {
        let q = alias.unwrap_or("users");
        let id = Column::new(q, "id");
        let name = Column::new(q, "name");
        let base = TableBase::new("users", alias, vec![id.to_ref(), name.to_ref()]);
        Self { base, id, name }
    }
}

impl RowMapper for Users {
    type Row = User;

    fn selections(&self) -> &[Selection] {
        self.base.selections()
    }

    fn fields<'r>(&self, row: &'r mut User) -> Vec<&'r mut dyn Field> {
        vec![&mut row.id, &mut row.name]
    }
}

impl Table for Users {
    fn base(&self) -> &TableBase {
        &self.base
    }

    fn as_(&self, alias: &str) -> Self {
        Self::with_alias(Some(alias))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
}

pub struct Posts {
    base: TableBase,
    pub id: Column<i64>,
    pub author_id: Column<i64>,
    pub title: Column<String>,
    pub author: Relship<Users, i64>,
}

impl Posts {
    pub fn new() -> Self {
        Self::with_alias(None)
    }

    fn with_alias(alias: Option<&str>) -> Self {
        let q = alias.unwrap_or("posts");
        let id = Column::new(q, "id");
        let author_id = Column::new(q, "author_id");
        let title = Column::new(q, "title");
        let base = TableBase::new(
            "posts",
            alias,
            vec![id.to_ref(), author_id.to_ref(), title.to_ref()],
        );
        let author = Relship::new(&author_id, Users::new, |u| &u.id);
        Self {
            base,
            id,
            author_id,
            title,
            author,
        }
    }
}

impl RowMapper for Posts {
    type Row = Post;

    fn selections(&self) -> &[Selection] {
        self.base.selections()
    }

    fn fields<'r>(&self, row: &'r mut Post) -> Vec<&'r mut dyn Field> {
        vec![&mut row.id, &mut row.author_id, &mut row.title]
    }
}

impl Table for Posts {
    fn base(&self) -> &TableBase {
        &self.base
    }

    fn as_(&self, alias: &str) -> Self {
        Self::with_alias(Some(alias))
    }
}

pub fn int(i: i64) -> Value {
    Value::Int(i)
}

pub fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

/// Records every statement and replays canned rows.
#[derive(Default)]
pub struct MockConn {
    pub rows: RefCell<Vec<Vec<Value>>>,
    pub calls: RefCell<Vec<(String, Vec<Value>)>>,
    pub affected: u64,
    pub fail: bool,
}

impl MockConn {
    pub fn with_rows(rows: Vec<Vec<Value>>) -> Self {
        Self {
            rows: RefCell::new(rows),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, sql: &str, args: &[Value]) -> RelqResult<()> {
        self.calls.borrow_mut().push((sql.to_string(), args.to_vec()));
        if self.fail {
            return Err(RelqError::connection(std::io::Error::other("connection reset")));
        }
        Ok(())
    }
}

impl Connection for MockConn {
    type Rows = std::vec::IntoIter<Vec<Value>>;

    fn query(&self, sql: &str, args: &[Value]) -> RelqResult<Self::Rows> {
        self.record(sql, args)?;
        Ok(self.rows.take().into_iter())
    }

    fn execute(&self, sql: &str, args: &[Value]) -> RelqResult<u64> {
        self.record(sql, args)?;
        Ok(self.affected)
    }
}
