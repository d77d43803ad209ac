use pretty_assertions::assert_eq;
use quarry::{ConstraintKind, Value};
use tests::{fixtures, tests, Setup};

async fn not_null_names_the_attribute(test: &impl Setup) {
    let (db, _) = test.connect(&[&fixtures::USERS]).await;
    let users = db.relation("users").unwrap();

    let err = users
        .insert([("email", "ada@example.com")])
        .await
        .unwrap_err();

    let violation = err.as_constraint_violation().unwrap();
    assert_eq!(violation.kind(), ConstraintKind::NotNull);
    assert_eq!(violation.attribute(), Some("name"));
    assert!(!err.is_driver_operation_failed());
}

async fn duplicate_keys_are_uniqueness_violations(test: &impl Setup) {
    let (db, _) = test.connect(&[&fixtures::USERS]).await;
    let users = db.relation("users").unwrap();

    users
        .insert([("name", "Ada"), ("email", "ada@example.com")])
        .await
        .unwrap();

    let err = users
        .insert([("name", "Imposter"), ("email", "ada@example.com")])
        .await
        .unwrap_err();

    assert_eq!(err.constraint_violation_kind(), Some(ConstraintKind::Uniqueness));
    assert_eq!(users.count().await.unwrap(), 1);
}

async fn dangling_references_are_foreign_key_violations(test: &impl Setup) {
    let (db, _) = test.connect(&[&fixtures::USERS, &fixtures::TASKS]).await;
    let tasks = db.relation("tasks").unwrap();

    let err = tasks
        .insert([("user_id", Value::I64(42)), ("title", Value::from("orphan"))])
        .await
        .unwrap_err();

    assert_eq!(err.constraint_violation_kind(), Some(ConstraintKind::ForeignKey));
}

tests!(
    not_null_names_the_attribute,
    duplicate_keys_are_uniqueness_violations,
    dangling_references_are_foreign_key_violations,
);
