mod common;

use chrono::NaiveDate;
use common::{Articles, Authors, generic, pg};
use relq::prelude::*;
use relq::{count, max, raw, select, select_as, select_from, typed};

#[test]
fn relationship_joins_use_the_related_alias() {
    let articles = Articles::new(None);
    let fq = select_from(&articles)
        .join_rel(&articles.author)
        .where_(articles.author.table().name.like_prefix("Ann"))
        .order_by(articles.id.desc())
        .limit(20)
        .finalize_with(&generic())
        .unwrap();
    assert_eq!(
        fq.sql,
        "SELECT articles.id, articles.author_id, articles.title, articles.published_at \
         FROM articles \
         INNER JOIN authors AS articles_author ON articles.author_id = articles_author.id \
         WHERE articles_author.name LIKE ? || '%' \
         ORDER BY articles.id DESC LIMIT 20"
    );
    assert_eq!(fq.args, vec![Value::Text("Ann".into())]);
}

#[test]
fn relationships_resolve_in_both_directions() {
    let authors = Authors::new(None);
    let articles = authors.articles.table();

    // each side builds its own copy of the other lazily
    assert_eq!(articles.table_alias(), Some("authors_articles"));
    assert_eq!(articles.author.table().table_alias(), Some("articles_author"));
    // built once, then cached
    assert!(std::ptr::eq(authors.articles.table(), articles));

    let fq = select_from(&authors)
        .left_join_rel(&authors.articles)
        .where_(articles.id.is_null())
        .finalize_with(&pg())
        .unwrap();
    assert_eq!(
        fq.sql,
        r#"SELECT "authors"."id", "authors"."name", "authors"."email" FROM "authors" LEFT JOIN "articles" AS "authors_articles" ON "authors"."id" = "authors_articles"."author_id" WHERE "authors_articles"."id" IS NULL"#
    );
}

#[test]
fn postgres_typed_timestamps() {
    let articles = Articles::new(None);
    let since = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let fq = select_from(&articles)
        .where_(articles.published_at.gte(typed(since, "timestamp")))
        .where_(articles.author_id.in_([3, 4]))
        .finalize_with(&pg())
        .unwrap();
    assert!(fq.sql.ends_with(
        r#"WHERE "articles"."published_at" >= $1::timestamp AND "articles"."author_id" IN ($2, $3)"#
    ));
    assert_eq!(
        fq.args,
        vec![Value::Timestamp(since), Value::Int(3), Value::Int(4)]
    );
}

#[test]
fn aggregate_report_with_subquery_source() {
    let articles = Articles::new(None);
    let per_author = select(relq::sels![
        articles.author_id,
        count(&articles.id).as_("n"),
        max(&articles.published_at).as_("latest"),
    ])
    .from(&articles)
    .group_by(&articles.author_id)
    .having(count(&articles.id).gte(2));

    let fq = select(relq::sels![raw("stats.author_id"), raw("stats.latest")])
        .from(per_author.as_("stats"))
        .where_(raw("stats.n").lt(10))
        .finalize_with(&pg())
        .unwrap();
    assert_eq!(
        fq.sql,
        r#"SELECT stats.author_id, stats.latest FROM (SELECT "articles"."author_id", COUNT("articles"."id") AS "n", MAX("articles"."published_at") AS "latest" FROM "articles" GROUP BY "articles"."author_id" HAVING COUNT("articles"."id") >= $1) AS "stats" WHERE stats.n < $2"#
    );
    assert_eq!(fq.args, vec![Value::Int(2), Value::Int(10)]);
}

#[test]
fn correlated_subquery_in_selection() {
    let authors = Authors::new(None);
    let a2 = Articles::new(Some("a2"));
    let article_count = select(relq::sels![count(&a2.id)])
        .from(&a2)
        .where_(a2.author_id.eq(&authors.id));

    let fq = select_from(&authors)
        .add_select(article_count.as_("article_count"))
        .finalize_with(&generic())
        .unwrap();
    assert_eq!(
        fq.sql,
        "SELECT authors.id, authors.name, authors.email, \
         (SELECT COUNT(a2.id) FROM articles AS a2 WHERE a2.author_id = authors.id) AS article_count \
         FROM authors"
    );
}

/// Projection of `authors` onto name plus a computed column.
struct NameAndEmail {
    selections: Vec<Selection>,
}

impl NameAndEmail {
    fn new(authors: &Authors) -> Self {
        Self {
            selections: relq::sels![
                authors.name,
                relq::func("COALESCE", [authors.email.expr(), relq::lit("-")]).as_("contact"),
            ],
        }
    }
}

impl RowMapper for NameAndEmail {
    type Row = (String, String);

    fn selections(&self) -> &[Selection] {
        &self.selections
    }

    fn fields<'r>(&self, row: &'r mut (String, String)) -> Vec<&'r mut dyn Field> {
        vec![&mut row.0, &mut row.1]
    }
}

#[test]
fn custom_projection_mapper() {
    let authors = Authors::new(None);
    let conn = common::MemConnection::new().returning(vec![
        vec![Value::Text("ann".into()), Value::Text("ann@x.io".into())],
        vec![Value::Text("bob".into()), Value::Text("-".into())],
    ]);

    let rows = select_as(NameAndEmail::new(&authors))
        .from(&authors)
        .with_config(generic())
        .load(&conn)
        .unwrap();
    assert_eq!(
        conn.statements(),
        vec!["SELECT authors.name, COALESCE(authors.email, ?) AS contact FROM authors"]
    );
    assert_eq!(
        rows,
        vec![
            ("ann".to_string(), "ann@x.io".to_string()),
            ("bob".to_string(), "-".to_string()),
        ]
    );
}

#[test]
fn mysql_rendering() {
    let authors = Authors::new(Some("a"));
    let fq = select_from(&authors)
        .where_(authors.name.like_partial("nn"))
        .finalize_with(&QueryConfig::new(Dialect::MySql))
        .unwrap();
    assert_eq!(
        fq.sql,
        "SELECT `a`.`id`, `a`.`name`, `a`.`email` FROM `authors` AS `a` \
         WHERE `a`.`name` LIKE CONCAT('%', ?, '%')"
    );
}
