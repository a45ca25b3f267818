#![allow(dead_code)]

use chrono::NaiveDateTime;
use relq::prelude::*;
use relq::{RowCursor, Selection};
use std::cell::RefCell;
use std::collections::VecDeque;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

pub struct Authors {
    base: TableBase,
    pub id: Column<i64>,
    pub name: Column<String>,
    pub email: Column<Option<String>>,
    pub articles: Relship<Articles, i64>,
}

impl Authors {
    pub fn new(alias: Option<&str>) -> Self {
        let q = alias.unwrap_or("authors");
        let id = Column::new(q, "id");
        let name = Column::new(q, "name");
        let email = Column::new(q, "email");
        let base = TableBase::new(
            "authors",
            alias,
            vec![id.to_ref(), name.to_ref(), email.to_ref()],
        );
        let articles = Relship::new(&id, || Articles::new(Some("authors_articles")), |a| {
            &a.author_id
        });
        Self {
            base,
            id,
            name,
            email,
            articles,
        }
    }
}

impl RowMapper for Authors {
    type Row = Author;

    fn selections(&self) -> &[Selection] {
        self.base.selections()
    }

    fn fields<'r>(&self, row: &'r mut Author) -> Vec<&'r mut dyn Field> {
        vec![&mut row.id, &mut row.name, &mut row.email]
    }
}

impl Table for Authors {
    fn base(&self) -> &TableBase {
        &self.base
    }

    fn as_(&self, alias: &str) -> Self {
        Self::new(Some(alias))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Article {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub published_at: Option<NaiveDateTime>,
}

pub struct Articles {
    base: TableBase,
    pub id: Column<i64>,
    pub author_id: Column<i64>,
    pub title: Column<String>,
    pub published_at: Column<Option<NaiveDateTime>>,
    pub author: Relship<Authors, i64>,
}

impl Articles {
    pub fn new(alias: Option<&str>) -> Self {
        let q = alias.unwrap_or("articles");
        let id = Column::new(q, "id");
        let author_id = Column::new(q, "author_id");
        let title = Column::new(q, "title");
        let published_at = Column::new(q, "published_at");
        let base = TableBase::new(
            "articles",
            alias,
            vec![
                id.to_ref(),
                author_id.to_ref(),
                title.to_ref(),
                published_at.to_ref(),
            ],
        );
        let author = Relship::new(&author_id, || Authors::new(Some("articles_author")), |a| {
            &a.id
        });
        Self {
            base,
            id,
            author_id,
            title,
            published_at,
            author,
        }
    }
}

impl RowMapper for Articles {
    type Row = Article;

    fn selections(&self) -> &[Selection] {
        self.base.selections()
    }

    fn fields<'r>(&self, row: &'r mut Article) -> Vec<&'r mut dyn Field> {
        vec![
            &mut row.id,
            &mut row.author_id,
            &mut row.title,
            &mut row.published_at,
        ]
    }
}

impl Table for Articles {
    fn base(&self) -> &TableBase {
        &self.base
    }

    fn as_(&self, alias: &str) -> Self {
        Self::new(Some(alias))
    }
}

pub fn author(id: i64, name: &str, email: Option<&str>) -> Author {
    Author {
        id,
        name: name.to_string(),
        email: email.map(str::to_string),
    }
}

pub fn author_row(id: i64, name: &str, email: Option<&str>) -> Vec<Value> {
    vec![
        Value::Int(id),
        Value::Text(name.to_string()),
        email.map_or(Value::Null, |e| Value::Text(e.to_string())),
    ]
}

pub fn article(id: i64, author_id: i64, title: &str) -> Article {
    Article {
        id,
        author_id,
        title: title.to_string(),
        published_at: None,
    }
}

pub fn article_row(id: i64, author_id: i64, title: &str) -> Vec<Value> {
    vec![
        Value::Int(id),
        Value::Int(author_id),
        Value::Text(title.to_string()),
        Value::Null,
    ]
}

pub fn pg() -> QueryConfig {
    QueryConfig::new(Dialect::Postgres)
}

pub fn generic() -> QueryConfig {
    QueryConfig::new(Dialect::Generic)
}

/// Result cursor that can be told to fail after a number of rows.
pub struct MemRows {
    rows: VecDeque<Vec<Value>>,
    fail_after: Option<usize>,
    served: usize,
}

impl RowCursor for MemRows {
    fn next_row(&mut self) -> RelqResult<Option<Vec<Value>>> {
        if self.fail_after == Some(self.served) {
            return Err(RelqError::connection(std::io::Error::other(
                "server closed the connection",
            )));
        }
        self.served += 1;
        Ok(self.rows.pop_front())
    }
}

/// In-memory connection that records statements and replays canned results.
#[derive(Default)]
pub struct MemConnection {
    pub results: RefCell<VecDeque<Vec<Vec<Value>>>>,
    pub log: RefCell<Vec<(String, Vec<Value>)>>,
    pub affected: u64,
    pub fail_after: Option<usize>,
}

impl MemConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one result set; each `query` call consumes the next one.
    pub fn returning(self, rows: Vec<Vec<Value>>) -> Self {
        self.results.borrow_mut().push_back(rows);
        self
    }

    pub fn statements(&self) -> Vec<String> {
        self.log.borrow().iter().map(|(sql, _)| sql.clone()).collect()
    }

    pub fn last_args(&self) -> Vec<Value> {
        self.log
            .borrow()
            .last()
            .map(|(_, args)| args.clone())
            .unwrap_or_default()
    }
}

impl Connection for MemConnection {
    type Rows = MemRows;

    fn query(&self, sql: &str, args: &[Value]) -> RelqResult<MemRows> {
        self.log.borrow_mut().push((sql.to_string(), args.to_vec()));
        let rows = self.results.borrow_mut().pop_front().unwrap_or_default();
        Ok(MemRows {
            rows: rows.into(),
            fail_after: self.fail_after,
            served: 0,
        })
    }

    fn execute(&self, sql: &str, args: &[Value]) -> RelqResult<u64> {
        self.log.borrow_mut().push((sql.to_string(), args.to_vec()));
        Ok(self.affected)
    }
}
