use pretty_assertions::assert_eq;
use quarry::{stmt::Type, Value};
use tests::{fixtures, tests, Setup};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

async fn inferred_types(test: &impl Setup) {
    let (db, _) = test.connect(&[&fixtures::SAMPLES]).await;
    let samples = db.catalog().get("samples").unwrap();

    let kind = |name: &str| samples.attribute(name).unwrap().kind().clone();

    assert_eq!(kind("id"), Type::I64);
    assert_eq!(kind("flag"), Type::Bool);
    assert_eq!(kind("amount"), Type::Decimal);
    assert_eq!(kind("born"), Type::Date);
    assert_eq!(kind("seen_at"), Type::Timestamp);
    assert_eq!(kind("external_id"), Type::Uuid);
    assert_eq!(kind("payload"), Type::Json);
}

async fn values_survive_a_round_trip(test: &impl Setup) {
    let (db, _) = test.connect(&[&fixtures::SAMPLES]).await;
    let samples = db.relation("samples").unwrap();

    let born = NaiveDate::from_ymd_opt(1815, 12, 10).unwrap();
    let seen_at = NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
    );
    let external_id = uuid::Uuid::new_v4();
    let payload = serde_json::json!({ "tags": ["math", "poetry"], "rank": 1 });

    let row = [
        ("flag", Value::Bool(true)),
        ("amount", Value::Decimal(Decimal::new(1250, 2))),
        ("born", Value::Date(born)),
        ("seen_at", Value::Timestamp(seen_at)),
        ("external_id", Value::Uuid(external_id)),
        ("payload", Value::Json(payload.clone())),
    ];

    samples.insert(row).await.unwrap();

    let read = samples.first().await.unwrap().unwrap();
    assert_eq!(read.get("flag"), Some(&Value::Bool(true)));
    assert_eq!(read.get("amount"), Some(&Value::Decimal(Decimal::new(125, 1))));
    assert_eq!(read.get("born"), Some(&Value::Date(born)));
    assert_eq!(read.get("seen_at"), Some(&Value::Timestamp(seen_at)));
    assert_eq!(read.get("external_id"), Some(&Value::Uuid(external_id)));
    assert_eq!(read.get("payload"), Some(&Value::Json(payload)));

    // Nulls stay null whatever the type
    samples.insert([("flag", Value::Null)]).await.unwrap();
    let empty = samples.last().await.unwrap().unwrap();
    assert!(empty.values()[1..].iter().all(Value::is_null));
}

async fn filters_use_written_representations(test: &impl Setup) {
    let (db, _) = test.connect(&[&fixtures::SAMPLES]).await;
    let samples = db.relation("samples").unwrap();

    let external_id = uuid::Uuid::new_v4();
    samples
        .insert([("flag", Value::Bool(false)), ("external_id", Value::Uuid(external_id))])
        .await
        .unwrap();

    let found = samples
        .by_pk([Value::I64(1)])
        .unwrap()
        .pluck("external_id")
        .await
        .unwrap();
    assert_eq!(found, [Value::Uuid(external_id)]);
}

tests!(
    inferred_types,
    values_survive_a_round_trip,
    filters_use_written_representations,
);
