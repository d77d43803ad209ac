use pretty_assertions::assert_eq;
use quarry::{stmt::Expr, Db, Value};
use tests::{fixtures, tests, Setup};

async fn connect(test: &impl Setup) -> Db {
    let mut builder = Db::builder();
    builder.config_toml(fixtures::CATEGORIES_CONFIG).unwrap();

    let (db, _) = test.connect_with(&[&fixtures::CATEGORIES], builder).await;
    db
}

async fn self_references_need_an_alias(test: &impl Setup) {
    let gateway = test.gateway().await.unwrap();
    gateway
        .run_ddl(fixtures::CATEGORIES.ddl(gateway.dialect()))
        .await
        .unwrap();

    let err = Db::builder().infer_all().build_shared(gateway).await.unwrap_err();
    assert!(err.is_ambiguous_association());
}

async fn parents_and_children(test: &impl Setup) {
    let db = connect(test).await;
    let categories = db.relation("categories").unwrap();

    let root = categories.insert([("name", "root")]).await.unwrap().unwrap();
    let root_id = root.get("id").cloned().unwrap();

    for name in ["b", "a"] {
        categories
            .insert([("name", Value::from(name)), ("parent_id", root_id.clone())])
            .await
            .unwrap();
    }

    let children = categories
        .filter(Expr::col("name").eq("root"))
        .related("children")
        .unwrap();
    assert_eq!(children.name(), "categories");
    assert_eq!(
        children.order([Expr::col("name").asc()]).pluck("name").await.unwrap(),
        [Value::from("a"), Value::from("b")]
    );

    let parent = categories
        .filter(categories.attr("name").unwrap().eq("a"))
        .join("parent")
        .unwrap()
        .select([Expr::qualified("parent", "name").alias("parent_name")])
        .first()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(parent.get("parent_name"), Some(&Value::from("root")));

    // The root has no parent
    let orphans = categories
        .filter(Expr::col("name").eq("root"))
        .related("parent")
        .unwrap();
    assert_eq!(orphans.count().await.unwrap(), 0);
}

tests!(self_references_need_an_alias, parents_and_children);
