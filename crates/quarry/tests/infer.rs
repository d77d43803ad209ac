mod support;

use pretty_assertions::assert_eq;
use quarry::{
    schema::{AssociationKind, TypeRegistry, UnknownTypePolicy},
    stmt::Type,
    Db, Inferrer, Value,
};
use support::{reply, Mock};

#[tokio::test]
async fn sqlite_tables_are_inferred() {
    let (db, _) = support::sqlite_db().await;
    let catalog = db.catalog();

    assert_eq!(catalog.len(), 2);

    let users = catalog.get("users").unwrap();
    assert_eq!(users.attribute_names().collect::<Vec<_>>(), ["id", "name", "email"]);
    assert_eq!(users.primary_key, ["id"]);
    assert_eq!(*users.attribute("id").unwrap().kind(), Type::I64);
    assert!(!users.attribute("id").unwrap().nullable);
    assert!(!users.attribute("name").unwrap().nullable);
    assert!(users.attribute("email").unwrap().nullable);
    assert!(users.restriction("by_email").unwrap().unique);
    assert!(!users.view);

    let tasks = catalog.get("tasks").unwrap();
    assert_eq!(*tasks.attribute("done").unwrap().kind(), Type::Bool);
    assert_eq!(tasks.foreign_keys.len(), 1);

    let user = catalog.association("tasks", "user").unwrap();
    assert_eq!(user.kind, AssociationKind::ManyToOne);
    assert_eq!(user.keys, [("user_id".to_string(), "id".to_string())]);

    let owned = catalog.association("users", "tasks").unwrap();
    assert_eq!(owned.kind, AssociationKind::OneToMany);
}

#[tokio::test]
async fn missing_relations_are_reported() {
    let mock = Mock::sqlite();
    support::sqlite_catalog(&mock);

    let registry = TypeRegistry::new();
    let inferrer = Inferrer::new(&mock, &registry);
    assert!(inferrer.infer("projects").await.unwrap_err().is_relation_not_found());

    let err = Db::builder()
        .relation("projects")
        .build(mock.clone())
        .await
        .unwrap_err();
    assert!(err.is_relation_not_found());

    // Only the named relations are inferred
    let db = Db::builder().relation("users").build(mock).await.unwrap();
    assert!(db.catalog().contains("users"));
    assert!(!db.catalog().contains("tasks"));
}

#[tokio::test]
async fn unusable_indexes_and_foreign_keys_are_skipped() {
    let mock = Mock::sqlite();
    support::sqlite_catalog(&mock);

    mock.on_param(
        "pragma_index_list",
        "tasks",
        [reply(
            &["name", "is_unique", "origin", "partial", "attribute", "sql"],
            vec![
                // Expression index
                vec![
                    "tasks_lower_title".into(),
                    Value::I64(0),
                    "c".into(),
                    Value::I64(0),
                    Value::Null,
                    "CREATE INDEX tasks_lower_title ON tasks (lower(title))".into(),
                ],
                // Partial index
                vec![
                    "open_tasks".into(),
                    Value::I64(0),
                    "c".into(),
                    Value::I64(1),
                    "user_id".into(),
                    "CREATE INDEX open_tasks ON tasks (user_id) WHERE done = 0".into(),
                ],
            ],
        )],
    );

    let registry = TypeRegistry::new();
    let tasks = Inferrer::new(&mock, &registry)
        .infer("tasks")
        .await
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(tasks.indexes.len(), 1);
    assert_eq!(tasks.indexes[0].predicate.as_deref(), Some("done = 0"));
    assert!(tasks.restriction("open_tasks").is_none());
}

fn pg_column(name: &str, data_type: &str, udt_name: &str, nullable: bool) -> Vec<Value> {
    vec![
        name.into(),
        data_type.into(),
        udt_name.into(),
        if nullable { "YES" } else { "NO" }.into(),
        Value::Null,
        Value::Null,
        Value::Null,
        Value::Null,
        Value::Null,
    ]
}

const PG_COLUMNS: &[&str] = &[
    "name",
    "data_type",
    "udt_name",
    "nullable",
    "default_value",
    "max_length",
    "precision",
    "scale",
    "time_precision",
];

fn pg_catalog() -> Mock {
    let mock = Mock::postgresql();

    mock.on(
        "FROM information_schema.tables",
        [reply(&["kind"], vec![vec!["BASE TABLE".into()]])],
    );

    mock.on_param(
        "FROM information_schema.columns",
        "accounts",
        [reply(
            PG_COLUMNS,
            vec![
                pg_column("id", "uuid", "uuid", false),
                pg_column("status", "USER-DEFINED", "account_status", false),
                pg_column("tags", "ARRAY", "_text", true),
            ],
        )],
    );

    mock.on_param(
        "FROM pg_index",
        "accounts",
        [reply(
            &["name", "attribute", "is_unique", "is_primary", "method", "predicate"],
            vec![
                vec![
                    "accounts_pkey".into(),
                    "id".into(),
                    Value::Bool(true),
                    Value::Bool(true),
                    "btree".into(),
                    Value::Null,
                ],
                vec![
                    "accounts_tags_idx".into(),
                    "tags".into(),
                    Value::Bool(false),
                    Value::Bool(false),
                    "gin".into(),
                    Value::Null,
                ],
            ],
        )],
    );

    mock
}

#[tokio::test]
async fn postgresql_types_and_primary_keys() {
    let mock = pg_catalog();
    let mut registry = TypeRegistry::new();

    // Unknown types are kept raw by default
    let accounts = Inferrer::new(&mock, &registry)
        .infer("accounts")
        .await
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(accounts.primary_key, ["id"]);
    assert_eq!(*accounts.attribute("id").unwrap().kind(), Type::Uuid);
    assert_eq!(*accounts.attribute("tags").unwrap().kind(), Type::list(Type::String));
    assert!(accounts.attribute("status").unwrap().ty.is_raw());
    // The primary key is not repeated as an index
    assert_eq!(accounts.indexes.len(), 1);
    assert_eq!(accounts.indexes[0].name, "accounts_tags_idx");
    assert_eq!(accounts.indexes[0].method.as_deref(), Some("gin"));

    let err = Inferrer::new(&mock, &registry)
        .unknown_types(UnknownTypePolicy::Fail)
        .infer("accounts")
        .await
        .unwrap_err();
    assert!(err.is_unknown_type());

    registry.register("account_status", Type::String);
    let accounts = Inferrer::new(&mock, &registry)
        .unknown_types(UnknownTypePolicy::Fail)
        .infer("accounts")
        .await
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(*accounts.attribute("status").unwrap().kind(), Type::String);

    // Catalog queries bind the relation name
    let executed = mock.executed();
    assert!(executed.iter().all(|c| !c.sql.contains("accounts")));
    assert!(executed.iter().any(|c| c.params == [Value::from("accounts")]));
}
