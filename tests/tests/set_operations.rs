use pretty_assertions::assert_eq;
use quarry::{stmt::Expr, Relation, Value};
use tests::{fixtures, tests, Setup};

async fn seed(users: &Relation) {
    for name in ["a", "b", "c"] {
        users.insert([("name", name)]).await.unwrap();
    }
}

async fn names(relation: &Relation) -> Vec<String> {
    let mut names: Vec<String> = relation
        .pluck("name")
        .await
        .unwrap()
        .into_iter()
        .map(|name| match name {
            Value::String(name) => name,
            other => panic!("expected a name, got {other:?}"),
        })
        .collect();
    names.sort();
    names
}

async fn union_keeps_the_left_operands_paging(test: &impl Setup) {
    let (db, _) = test.connect(&[&fixtures::USERS]).await;
    let users = db.relation("users").unwrap();
    seed(&users).await;

    let first = users.order([Expr::col("id").asc()]).limit(1);
    let named_c = users.filter(Expr::col("name").eq("c"));

    let union = first.union(&named_c);
    assert_eq!(names(&union).await, ["a", "c"]);
    assert_eq!(union.count().await.unwrap(), 2);

    // Paging added after the union applies to the combined rows
    let union = named_c.union(&first);
    let paged = union.order([union.attr("name").unwrap().asc()]).limit(1);
    assert_eq!(names(&paged).await, ["a"]);
}

async fn except_removes_right_rows(test: &impl Setup) {
    let (db, _) = test.connect(&[&fixtures::USERS]).await;
    let users = db.relation("users").unwrap();
    seed(&users).await;

    let rest = users.except(&users.filter(Expr::col("name").eq("b")));
    assert_eq!(names(&rest).await, ["a", "c"]);
}

tests!(union_keeps_the_left_operands_paging, except_removes_right_rows);
