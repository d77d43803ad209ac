use pretty_assertions::assert_eq;
use quarry::{stmt::Expr, ImportOptions, ImportTransaction, Value};
use tests::{fixtures, tests, Setup};

async fn seed(users: &quarry::Relation) {
    users
        .multi_insert(
            ["name", "email"],
            vec![
                vec![Value::from("Ada"), Value::from("ada@example.com")],
                vec![Value::from("Grace"), Value::Null],
                vec![Value::from("Edsger"), Value::Null],
                vec![Value::from("Barbara"), Value::from("barbara@example.com")],
                vec![Value::from("Donald"), Value::Null],
            ],
        )
        .await
        .unwrap();
}

async fn import_within_a_database_is_one_statement(test: &impl Setup) {
    let (db, log) = test
        .connect(&[&fixtures::USERS, &fixtures::ARCHIVED_USERS])
        .await;
    let users = db.relation("users").unwrap();
    let archived = db.relation("archived_users").unwrap();

    seed(&users).await;
    log.clear();

    let imported = archived
        .import(&users.filter(Expr::col("email").is_null()))
        .await
        .unwrap();
    assert_eq!(imported, 3);
    assert_eq!(log.len(), 1);
    assert!(log.pop().sql.starts_with("INSERT INTO"));

    assert_eq!(
        archived.order([Expr::col("id").asc()]).pluck("name").await.unwrap(),
        [Value::from("Grace"), Value::from("Edsger"), Value::from("Donald")]
    );
}

async fn import_across_databases_streams_batches(test: &impl Setup) {
    let (source, _) = test.connect(&[&fixtures::USERS]).await;
    let (target, log) = test.connect(&[&fixtures::ARCHIVED_USERS]).await;

    let users = source.relation("users").unwrap();
    seed(&users).await;

    let archived = target.relation("archived_users").unwrap();
    let options = ImportOptions::default()
        .batch_size(2)
        .transaction(ImportTransaction::Whole);

    let imported = archived.import_with(&users, &options).await.unwrap();
    assert_eq!(imported, 5);

    // Five rows in batches of two
    let inserts = log
        .sql()
        .into_iter()
        .filter(|sql| sql.starts_with("INSERT INTO"))
        .count();
    assert_eq!(inserts, 3);

    let copied = archived.order([Expr::col("id").asc()]).to_a().await.unwrap();
    let original = users.order([Expr::col("id").asc()]).to_a().await.unwrap();
    assert_eq!(copied.len(), 5);

    for (copy, row) in copied.iter().zip(&original) {
        assert_eq!(copy.get("id"), row.get("id"));
        assert_eq!(copy.get("name"), row.get("name"));
        assert_eq!(copy.get("email"), row.get("email"));
    }
}

async fn failed_imports_leave_nothing_behind(test: &impl Setup) {
    let (source, _) = test.connect(&[&fixtures::USERS]).await;
    let (target, _) = test.connect(&[&fixtures::ARCHIVED_USERS]).await;

    let users = source.relation("users").unwrap();
    seed(&users).await;

    let archived = target.relation("archived_users").unwrap();

    // A row already holding the third key makes the second batch fail
    let third = users.order([Expr::col("id").asc()]).offset(2).first().await.unwrap().unwrap();
    archived
        .insert([
            ("id", third.get("id").cloned().unwrap()),
            ("name", Value::from("placeholder")),
        ])
        .await
        .unwrap();

    let options = ImportOptions::default()
        .batch_size(2)
        .transaction(ImportTransaction::Whole);

    let err = archived.import_with(&users, &options).await.unwrap_err();
    assert!(err.is_constraint_violation());
    assert_eq!(archived.count().await.unwrap(), 1);
}

tests!(
    import_within_a_database_is_one_statement,
    import_across_databases_streams_batches,
    failed_imports_leave_nothing_behind,
);
