use quarry_core::{
    driver::Dialect,
    schema::{Attribute, Catalog, ForeignKey, Index, Schema, SchemaConfig, TypeRegistry},
};

/// `users(id, name, email UNIQUE)` and `tasks(id, user_id -> users, title, done)`.
pub fn catalog() -> Catalog {
    let registry = TypeRegistry::new();
    let ty = |native: &str| registry.resolve(native, Dialect::Postgresql).unwrap();

    let users = Schema::builder("users")
        .attribute(Attribute::new("users", "id", ty("bigint")))
        .attribute(Attribute::new("users", "name", ty("text")))
        .attribute(Attribute::new("users", "email", ty("text")))
        .primary_key(["id"])
        .index(Index::new("users_email_key", ["email"]).unique(true))
        .build()
        .unwrap();

    let tasks = Schema::builder("tasks")
        .attribute(Attribute::new("tasks", "id", ty("bigint")))
        .attribute(Attribute::new("tasks", "user_id", ty("bigint")))
        .attribute(Attribute::new("tasks", "title", ty("text")))
        .attribute(Attribute::new("tasks", "done", ty("boolean")))
        .primary_key(["id"])
        .foreign_key(ForeignKey::new(["user_id"], "users", ["id"]))
        .build()
        .unwrap();

    Catalog::build(vec![users, tasks], &SchemaConfig::default()).unwrap()
}
