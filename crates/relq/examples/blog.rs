//! Blog schema walkthrough over an in-memory connection.
//!
//! Run with: `cargo run -p relq --example blog`

use relq::prelude::*;
use relq::{
    RowCursor, ValueMap, as_slice_map, count, delete_from, insert_into, select, select_from,
    select_via, to_map, to_slice, update,
};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Default)]
struct User {
    id: i64,
    name: String,
}

struct Users {
    base: TableBase,
    id: Column<i64>,
    name: Column<String>,
}

impl Users {
    fn new(alias: Option<&str>) -> Self {
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
        Self::new(Some(alias))
    }
}

#[derive(Debug, Clone, Default)]
struct Post {
    id: i64,
    author_id: i64,
    title: String,
}

struct Posts {
    base: TableBase,
    id: Column<i64>,
    author_id: Column<i64>,
    title: Column<String>,
    author: Relship<Users, i64>,
}

impl Posts {
    fn new(alias: Option<&str>) -> Self {
        let q = alias.unwrap_or("posts");
        let id = Column::new(q, "id");
        let author_id = Column::new(q, "author_id");
        let title = Column::new(q, "title");
        let base = TableBase::new(
            "posts",
            alias,
            vec![id.to_ref(), author_id.to_ref(), title.to_ref()],
        );
        let author = Relship::new(&author_id, || Users::new(Some("posts_author")), |u| &u.id);
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
        Self::new(Some(alias))
    }
}

struct Rows(VecDeque<Vec<Value>>);

impl RowCursor for Rows {
    fn next_row(&mut self) -> RelqResult<Option<Vec<Value>>> {
        Ok(self.0.pop_front())
    }
}

/// Prints every statement and answers queries from a queue of result sets.
#[derive(Default)]
struct Console {
    results: RefCell<VecDeque<Vec<Vec<Value>>>>,
}

impl Console {
    fn then(self, rows: Vec<Vec<Value>>) -> Self {
        self.results.borrow_mut().push_back(rows);
        self
    }
}

impl Connection for Console {
    type Rows = Rows;

    fn query(&self, sql: &str, args: &[Value]) -> RelqResult<Rows> {
        println!("query   {sql}\n        {args:?}");
        let rows = self.results.borrow_mut().pop_front().unwrap_or_default();
        Ok(Rows(rows.into()))
    }

    fn execute(&self, sql: &str, args: &[Value]) -> RelqResult<u64> {
        println!("execute {sql}\n        {args:?}");
        Ok(1)
    }
}

fn user_row(id: i64, name: &str) -> Vec<Value> {
    vec![Value::Int(id), Value::Text(name.into())]
}

fn post_row(id: i64, author_id: i64, title: &str) -> Vec<Value> {
    vec![Value::Int(id), Value::Int(author_id), Value::Text(title.into())]
}

fn main() -> RelqResult<()> {
    relq::set_default_dialect(Dialect::Postgres);

    let users = Users::new(None);
    let posts = Posts::new(None);

    let conn = Console::default()
        .then(vec![user_row(1, "alice"), user_row(2, "alan")])
        .then(vec![
            post_row(10, 1, "hello"),
            post_row(11, 2, "again"),
            post_row(12, 1, "more"),
        ])
        .then(vec![
            [post_row(10, 1, "hello"), user_row(1, "alice")].concat(),
            [post_row(11, 2, "again"), user_row(2, "alan")].concat(),
        ]);

    insert_into(&users)
        .values([users.id.set(1), users.name.set("alice")])
        .values([users.id.set(2), users.name.set("alan")])
        .execute(&conn)?;

    let found = select_from(&users)
        .where_(users.name.like_prefix("al"))
        .order_by(users.id.asc())
        .load(&conn)?;
    println!("users: {found:?}");

    let by_author = as_slice_map(&posts.author_id, select_via(&found, &posts, &posts.author)?)
        .load(&conn)?;
    for user in &found {
        let titles: Vec<&str> = by_author
            .get(&user.id)
            .map(|ps| ps.iter().map(|p| p.title.as_str()).collect())
            .unwrap_or_default();
        println!("{} wrote {titles:?}", user.name);
    }

    let authors = posts.author.table();
    let mut listing = Vec::new();
    let mut writers = HashMap::new();
    select_from(&posts)
        .join_rel(&posts.author)
        .where_(posts.id.lt(100))
        .will_scan()
        .scan(to_slice(&posts, &mut listing))
        .scan(to_map(authors, &authors.id, &mut writers))
        .load(&conn)?;
    for post in &listing {
        let writer = writers.get(&post.author_id).map_or("?", |u: &User| u.name.as_str());
        println!("#{} {:?} by {writer}", post.id, post.title);
    }

    let report = select(relq::sels![posts.author_id, count(&posts.id).as_("n")])
        .from(&posts)
        .group_by(&posts.author_id)
        .having(count(&posts.id).gt(1))
        .finalize()?;
    println!("report  {}", report.sql);

    update(&posts)
        .set_map(ValueMap::new().set(&posts.title, relq::concat([posts.title.expr(), relq::lit("!")])))
        .where_(posts.author_id.eq(1))
        .execute(&conn)?;

    delete_from(&posts)
        .where_(posts.id.in_([11]))
        .execute(&conn)?;

    Ok(())
}
