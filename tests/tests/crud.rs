use pretty_assertions::assert_eq;
use quarry::{stmt::Expr, Error, Value};
use tests::{fixtures, tests, Setup};

async fn insert_and_read_back(test: &impl Setup) {
    let (db, _) = test.connect(&[&fixtures::USERS]).await;
    let users = db.relation("users").unwrap();

    let ada = users
        .insert([("name", "Ada"), ("email", "ada@example.com")])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ada.get("name"), Some(&Value::from("Ada")));

    users
        .insert([("name", Value::from("Grace")), ("email", Value::Null)])
        .await
        .unwrap();

    assert_eq!(users.count().await.unwrap(), 2);

    let id = ada.get("id").cloned().unwrap();
    let fetched = users.fetch([id]).await.unwrap();
    assert_eq!(fetched.get("email"), Some(&Value::from("ada@example.com")));

    let first = users.first().await.unwrap().unwrap();
    let last = users.last().await.unwrap().unwrap();
    assert_eq!(first.get("name"), Some(&Value::from("Ada")));
    assert_eq!(last.get("name"), Some(&Value::from("Grace")));

    let missing = users.fetch([Value::I64(9_999)]).await.unwrap_err();
    assert!(missing.is_record_not_found());
}

async fn restriction_helpers_find_by_unique_keys(test: &impl Setup) {
    let (db, log) = test.connect(&[&fixtures::USERS]).await;
    let users = db.relation("users").unwrap();

    users
        .multi_insert(
            ["name", "email"],
            vec![
                vec![Value::from("Ada"), Value::from("ada@example.com")],
                vec![Value::from("Grace"), Value::from("grace@example.com")],
            ],
        )
        .await
        .unwrap();

    assert_eq!(users.restrictions().unwrap(), ["by_email"]);

    let rows = users
        .restrict_by("by_email", ["grace@example.com"])
        .unwrap()
        .to_a()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&Value::from("Grace")));

    // The lookup binds the key rather than inlining it
    let statement = log.sql().pop().unwrap();
    assert!(!statement.contains("grace@example.com"), "{statement}");

    let nobody = users
        .restrict_by("by_email", ["nobody@example.com"])
        .unwrap()
        .first()
        .await
        .unwrap();
    assert!(nobody.is_none());
}

async fn update_and_delete_are_scoped(test: &impl Setup) {
    let (db, _) = test.connect(&[&fixtures::USERS, &fixtures::TASKS]).await;
    let users = db.relation("users").unwrap();
    let tasks = db.relation("tasks").unwrap();

    let ada = users.insert([("name", "Ada")]).await.unwrap().unwrap();
    let id = ada.get("id").cloned().unwrap();

    tasks
        .multi_insert(
            ["user_id", "title"],
            (0..5).map(|i| vec![id.clone(), Value::from(format!("task {i}"))]),
        )
        .await
        .unwrap();

    let updated = tasks
        .order([Expr::col("id").asc()])
        .limit(2)
        .update([("done", true)])
        .await
        .unwrap();
    assert_eq!(updated, 2);

    let done = tasks.filter(Expr::col("done").eq(true));
    assert_eq!(done.count().await.unwrap(), 2);
    assert_eq!(
        done.order([Expr::col("id").asc()]).pluck("title").await.unwrap(),
        [Value::from("task 0"), Value::from("task 1")]
    );

    let deleted = tasks
        .join("user")
        .unwrap()
        .filter(Expr::qualified("users", "name").eq("Ada"))
        .filter(Expr::qualified("tasks", "done").eq(false))
        .delete()
        .await
        .unwrap();
    assert_eq!(deleted, 3);
    assert_eq!(tasks.count().await.unwrap(), 2);

    assert!(tasks.exists().await.unwrap());
    assert_eq!(tasks.max("title").await.unwrap(), Value::from("task 1"));
}

async fn failed_transactions_roll_back(test: &impl Setup) {
    let (db, _) = test.connect(&[&fixtures::USERS]).await;

    let err = db
        .in_transaction(|db| async move {
            db.relation("users")?.insert([("name", "Ada")]).await?;
            Err::<(), _>(Error::invalid_statement("abandoned"))
        })
        .await
        .unwrap_err();
    assert!(err.is_invalid_statement());

    let users = db.relation("users").unwrap();
    assert_eq!(users.count().await.unwrap(), 0);

    db.in_transaction(|db| async move { db.relation("users")?.insert([("name", "Ada")]).await })
        .await
        .unwrap();
    assert_eq!(users.count().await.unwrap(), 1);
}

tests!(
    insert_and_read_back,
    restriction_helpers_find_by_unique_keys,
    update_and_delete_are_scoped,
    failed_transactions_roll_back,
);
