use pretty_assertions::assert_eq;
use quarry::Value;
use tests::{fixtures, tests, Setup};

use std::pin::pin;
use tokio_stream::StreamExt;

async fn batches_cover_every_key_once_in_order(test: &impl Setup) {
    let (db, _) = test.connect(&[&fixtures::USERS]).await;
    let users = db.relation("users").unwrap();

    let inserted = users
        .multi_insert(
            ["name"],
            (1..=250).map(|i| vec![Value::from(format!("user {i}"))]),
        )
        .await
        .unwrap();
    assert_eq!(inserted, 250);

    let mut batches = pin!(users.each_batch(100));
    let mut sizes = vec![];
    let mut ids = vec![];

    while let Some(batch) = batches.next().await {
        let batch_ids = batch.unwrap().pluck("id").await.unwrap();
        sizes.push(batch_ids.len());
        ids.extend(batch_ids);
    }

    assert_eq!(sizes, [100, 100, 50]);
    assert_eq!(ids, (1..=250).map(Value::I64).collect::<Vec<_>>());
}

async fn batches_respect_filters(test: &impl Setup) {
    let (db, _) = test.connect(&[&fixtures::USERS]).await;
    let users = db.relation("users").unwrap();

    users
        .multi_insert(
            ["name", "email"],
            (1..=10).map(|i| {
                let email = if i % 2 == 0 {
                    Value::from(format!("user{i}@example.com"))
                } else {
                    Value::Null
                };
                vec![Value::from(format!("user {i}")), email]
            }),
        )
        .await
        .unwrap();

    let with_email = users.filter(quarry::Expr::col("email").is_not_null());
    let mut batches = pin!(with_email.each_batch(2));
    let mut ids = vec![];

    while let Some(batch) = batches.next().await {
        ids.extend(batch.unwrap().pluck("id").await.unwrap());
    }

    assert_eq!(ids, [2, 4, 6, 8, 10].map(Value::I64));
}

async fn empty_relations_yield_no_batches(test: &impl Setup) {
    let (db, _) = test.connect(&[&fixtures::USERS]).await;
    let users = db.relation("users").unwrap();

    let mut batches = pin!(users.each_batch(100));
    assert!(batches.next().await.is_none());
}

tests!(
    batches_cover_every_key_once_in_order,
    batches_respect_filters,
    empty_relations_yield_no_batches,
);
