use pretty_assertions::assert_eq;
use quarry::{stmt::Expr, Value};
use tests::{fixtures, tests, Setup};

async fn each_user_has_its_own_profile(test: &impl Setup) {
    let (db, _) = test.connect(&[&fixtures::USERS, &fixtures::PROFILES]).await;
    let users = db.relation("users").unwrap();
    let profiles = db.relation("profiles").unwrap();

    for name in ["a", "b", "c"] {
        let user = users.insert([("name", name)]).await.unwrap().unwrap();
        profiles
            .insert([
                ("user_id", user.get("id").cloned().unwrap()),
                ("bio", Value::from(format!("about {name}"))),
            ])
            .await
            .unwrap();
    }

    let bios = users
        .related("profile")
        .unwrap()
        .order([Expr::col("bio").asc()])
        .pluck("bio")
        .await
        .unwrap();
    assert_eq!(
        bios,
        [Value::from("about a"), Value::from("about b"), Value::from("about c")]
    );

    let last = users
        .order([Expr::col("id").desc()])
        .limit(1)
        .related("profile")
        .unwrap();
    assert_eq!(last.pluck("bio").await.unwrap(), [Value::from("about c")]);
}

tests!(each_user_has_its_own_profile);
