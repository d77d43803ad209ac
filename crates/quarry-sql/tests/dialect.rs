mod support;

use pretty_assertions::assert_eq;
use quarry_core::stmt::{Expr, QuerySpec, Type, Value};
use quarry_sql::Serializer;

#[test]
fn case_insensitive_matching() {
    let catalog = support::catalog();
    let query = QuerySpec::table("users")
        .select([Expr::col("id")])
        .filter(Expr::col("name").ilike("al%"));

    let compiled = Serializer::postgresql(&catalog).compile_query(&query).unwrap();
    assert_eq!(compiled.sql, r#"SELECT "id" FROM "users" WHERE "name" ILIKE $1;"#);

    let compiled = Serializer::sqlite(&catalog).compile_query(&query).unwrap();
    assert_eq!(
        compiled.sql,
        r#"SELECT "id" FROM "users" WHERE LOWER("name") LIKE LOWER(?1);"#
    );
}

#[test]
fn postgresql_operators() {
    let catalog = support::catalog();
    let tags = Value::List(vec!["a".into(), "b".into()]);

    let query = QuerySpec::table("tasks")
        .select([Expr::col("id")])
        .filter(Expr::col("title").eq_any(tags.clone()));

    let compiled = Serializer::postgresql(&catalog).compile_query(&query).unwrap();
    assert_eq!(
        compiled.sql,
        r#"SELECT "id" FROM "tasks" WHERE "title" = ANY($1);"#
    );
    assert_eq!(compiled.params, [tags]);

    for serializer in [Serializer::sqlite(&catalog), Serializer::mysql(&catalog)] {
        assert!(serializer.compile_query(&query).unwrap_err().is_unsupported_feature());
    }
}

#[test]
fn json_access() {
    let catalog = support::catalog();
    let query = QuerySpec::table("tasks")
        .select([Expr::col("title").json_get_text("key")]);

    let compiled = Serializer::sqlite(&catalog).compile_query(&query).unwrap();
    assert_eq!(compiled.sql, r#"SELECT "title" ->> ?1 FROM "tasks";"#);

    assert!(Serializer::mysql(&catalog)
        .compile_query(&query)
        .unwrap_err()
        .is_unsupported_feature());
}

#[test]
fn full_text_search() {
    let catalog = support::catalog();
    let query = QuerySpec::table("tasks")
        .select([Expr::col("id")])
        .filter(Expr::text_search_with(Expr::col("title"), "rust", "english"));

    let compiled = Serializer::postgresql(&catalog).compile_query(&query).unwrap();
    assert_eq!(
        compiled.sql,
        r#"SELECT "id" FROM "tasks" WHERE to_tsvector('english'::regconfig, "title") @@ plainto_tsquery('english'::regconfig, $1);"#
    );

    let compiled = Serializer::mysql(&catalog).compile_query(&query).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT `id` FROM `tasks` WHERE MATCH (`title`) AGAINST (? IN NATURAL LANGUAGE MODE);"
    );

    let compiled = Serializer::sqlite(&catalog).compile_query(&query).unwrap();
    assert_eq!(
        compiled.sql,
        r#"SELECT "id" FROM "tasks" WHERE "title" MATCH ?1;"#
    );
}

#[test]
fn casts() {
    let catalog = support::catalog();
    let query = QuerySpec::table("tasks").select([Expr::col("done").cast(Type::I64)]);

    let sql = |serializer: Serializer<'_>| serializer.compile_query(&query).unwrap().sql;

    assert_eq!(
        sql(Serializer::postgresql(&catalog)),
        r#"SELECT CAST("done" AS BIGINT) FROM "tasks";"#
    );
    assert_eq!(
        sql(Serializer::sqlite(&catalog)),
        r#"SELECT CAST("done" AS INTEGER) FROM "tasks";"#
    );
    assert_eq!(
        sql(Serializer::mysql(&catalog)),
        "SELECT CAST(`done` AS SIGNED) FROM `tasks`;"
    );
}

#[test]
fn json_values_on_mysql() {
    let catalog = support::catalog();
    let query = QuerySpec::table("tasks")
        .select([Expr::col("id")])
        .filter(Expr::col("title").eq(serde_json_value()));

    let compiled = Serializer::mysql(&catalog).compile_query(&query).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT `id` FROM `tasks` WHERE `title` = CAST(? AS JSON);"
    );
}

fn serde_json_value() -> Value {
    Value::Json(vec![1, 2].into())
}

#[test]
fn identifiers_are_escaped() {
    let catalog = support::catalog();
    let query = QuerySpec::raw("SELECT 1 AS \"a\"", vec![], "odd\"name")
        .select([Expr::star_of("odd\"name")]);

    let compiled = Serializer::postgresql(&catalog).compile_query(&query).unwrap();
    assert_eq!(
        compiled.sql,
        r#"SELECT "odd""name".* FROM (SELECT 1 AS "a") AS "odd""name";"#
    );
}
