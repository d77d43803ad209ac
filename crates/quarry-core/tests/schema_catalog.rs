use quarry_core::{
    driver::Dialect,
    schema::{
        AssociationKind, Attribute, Cardinality, Catalog, ForeignKey, Index, Schema,
        SchemaConfig, TypeRegistry,
    },
};

fn attribute(relation: &str, name: &str, native: &str) -> Attribute {
    let ty = TypeRegistry::new()
        .resolve(native, Dialect::Postgresql)
        .unwrap();
    Attribute::new(relation, name, ty)
}

fn users() -> Schema {
    Schema::builder("users")
        .attribute(attribute("users", "id", "bigint"))
        .attribute(attribute("users", "email", "text"))
        .primary_key(["id"])
        .index(Index::new("users_email_key", ["email"]).unique(true))
        .build()
        .unwrap()
}

fn tasks() -> Schema {
    Schema::builder("tasks")
        .attribute(attribute("tasks", "id", "bigint"))
        .attribute(attribute("tasks", "user_id", "bigint"))
        .primary_key(["id"])
        .foreign_key(ForeignKey::new(["user_id"], "users", ["id"]))
        .build()
        .unwrap()
}

fn categories() -> Schema {
    Schema::builder("categories")
        .attribute(attribute("categories", "id", "bigint"))
        .attribute(attribute("categories", "parent_id", "bigint"))
        .primary_key(["id"])
        .foreign_key(ForeignKey::new(["parent_id"], "categories", ["id"]))
        .build()
        .unwrap()
}

const SELF_REFERENCE: &str = r#"
    [[relations.categories.self_references]]
    attributes = ["parent_id"]
    alias = "parent"
    inverse = "children"
"#;

#[test]
fn resolution_is_deterministic() {
    let config = SchemaConfig::from_toml_str(SELF_REFERENCE).unwrap();

    let a = Catalog::build(vec![users(), tasks(), categories()], &config).unwrap();
    let b = Catalog::build(vec![categories(), tasks(), users()], &config).unwrap();

    for name in ["users", "tasks", "categories"] {
        assert_eq!(
            a.get(name).unwrap().associations,
            b.get(name).unwrap().associations,
        );
    }
}

#[test]
fn self_reference_without_alias_is_ambiguous() {
    let err = Catalog::build(vec![categories()], &SchemaConfig::default()).unwrap_err();
    assert!(err.is_ambiguous_association());
}

#[test]
fn self_reference_with_alias() {
    let config = SchemaConfig::from_toml_str(SELF_REFERENCE).unwrap();
    let catalog = Catalog::build(vec![categories()], &config).unwrap();

    let parent = catalog.association("categories", "parent").unwrap();
    assert_eq!(parent.kind, AssociationKind::SelfReferencing(Cardinality::One));
    assert_eq!(parent.target_qualifier(), "parent");

    let children = catalog.association("categories", "children").unwrap();
    assert_eq!(children.kind, AssociationKind::SelfReferencing(Cardinality::Many));
    assert_eq!(children.target_qualifier(), "children");
}

#[test]
fn foreign_keys_yield_both_directions() {
    let catalog = Catalog::build(vec![users(), tasks()], &SchemaConfig::default()).unwrap();

    assert_eq!(
        catalog.association("tasks", "user").unwrap().kind,
        AssociationKind::ManyToOne
    );
    assert_eq!(
        catalog.association("users", "tasks").unwrap().kind,
        AssociationKind::OneToMany
    );
    assert!(catalog
        .association("users", "projects")
        .unwrap_err()
        .is_invalid_statement());
}

#[test]
fn missing_relation() {
    let catalog = Catalog::build(vec![users()], &SchemaConfig::default()).unwrap();
    assert!(catalog.get("userz").unwrap_err().is_relation_not_found());
}

#[test]
fn unique_index_restriction() {
    let users = users();
    let index = users.restriction("by_email").unwrap();
    assert!(index.unique);
    assert_eq!(index.attributes, ["email"]);
}
