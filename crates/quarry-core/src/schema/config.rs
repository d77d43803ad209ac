use super::{
    Attribute, ForeignKey, Index, SchemaBuilder, TypeRegistry, UnknownTypePolicy,
};
use crate::{driver::Dialect, stmt::Value, Error, Result};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Declarations that override or complete inferred schemas.
///
/// ```toml
/// [relations.users]
/// attributes.email = { type = "varchar(255)", nullable = false }
/// indexes = [{ name = "users_lower_email", attributes = ["email"], unique = true }]
///
/// [[relations.categories.self_references]]
/// attributes = ["parent_id"]
/// alias = "parent"
/// inverse = "children"
///
/// [[relations.users.associations]]
/// name = "active_tasks"
/// kind = "one_to_many"
/// target = "tasks"
/// keys = [["id", "user_id"]]
/// conditions = { done = false }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    #[serde(default)]
    pub relations: IndexMap<String, RelationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationConfig {
    /// Read the relation's structure from the database. When `false`, the
    /// declarations below are the whole schema.
    #[serde(default = "default_true")]
    pub infer: bool,

    #[serde(default)]
    pub attributes: IndexMap<String, AttributeConfig>,

    #[serde(default)]
    pub primary_key: Option<Vec<String>>,

    #[serde(default)]
    pub indexes: Vec<IndexConfig>,

    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyConfig>,

    #[serde(default)]
    pub associations: Vec<AssociationConfig>,

    #[serde(default)]
    pub self_references: Vec<SelfReferenceConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeConfig {
    /// Native type name, resolved through the type registry
    #[serde(rename = "type", default)]
    pub ty: Option<String>,

    #[serde(default)]
    pub nullable: Option<bool>,

    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    pub name: String,
    pub attributes: Vec<String>,

    #[serde(default)]
    pub unique: bool,

    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub predicate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForeignKeyConfig {
    pub attributes: Vec<String>,
    pub target: String,

    #[serde(default)]
    pub target_attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssociationConfig {
    pub name: String,
    pub kind: DeclaredKind,
    pub target: String,

    /// `[source attribute, target attribute]` pairs. Inferred from foreign
    /// keys when empty.
    #[serde(default)]
    pub keys: Vec<(String, String)>,

    /// Join table for through associations
    #[serde(default)]
    pub through: Option<String>,

    /// `[join table attribute, target attribute]` pairs
    #[serde(default)]
    pub through_keys: Vec<(String, String)>,

    #[serde(default)]
    pub view: Option<String>,

    /// Equalities on target attributes
    #[serde(default)]
    pub conditions: IndexMap<String, serde_json::Value>,

    #[serde(default)]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredKind {
    OneToMany,
    ManyToOne,
    OneToOne,
    OneToOneThrough,
    ManyToMany,
}

/// Names the two sides of a self-referencing foreign key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelfReferenceConfig {
    /// The referencing attributes (`parent_id`)
    pub attributes: Vec<String>,

    /// Name and qualifier of the referenced row (`parent`)
    pub alias: String,

    /// Name and qualifier of the referencing rows (`children`)
    #[serde(default)]
    pub inverse: Option<String>,
}

fn default_true() -> bool {
    true
}

impl SchemaConfig {
    pub fn from_toml_str(src: &str) -> Result<SchemaConfig> {
        Ok(toml::from_str(src)?)
    }

    pub fn relation(&self, name: &str) -> Option<&RelationConfig> {
        self.relations.get(name)
    }

    /// The alias configured for a self-referencing foreign key.
    pub fn self_reference(&self, relation: &str, attributes: &[String]) -> Option<&SelfReferenceConfig> {
        self.relation(relation)?
            .self_references
            .iter()
            .find(|config| config.attributes == attributes)
    }
}

impl Default for RelationConfig {
    fn default() -> Self {
        Self {
            infer: true,
            attributes: IndexMap::new(),
            primary_key: None,
            indexes: vec![],
            foreign_keys: vec![],
            associations: vec![],
            self_references: vec![],
        }
    }
}

impl RelationConfig {
    /// Applies the declarations on top of an inferred (or empty) schema.
    ///
    /// Attribute overrides replace the inferred type, nullability or
    /// default; attributes only declared here are appended.
    pub fn apply(
        &self,
        mut builder: SchemaBuilder,
        registry: &TypeRegistry,
        dialect: Dialect,
        policy: UnknownTypePolicy,
    ) -> Result<SchemaBuilder> {
        let relation = builder.name().to_string();

        for (name, config) in &self.attributes {
            let ty = match &config.ty {
                Some(native) => Some(registry.resolve_or(native, dialect, policy)?),
                None => None,
            };

            match builder.attribute_mut(name) {
                Some(attribute) => {
                    if let Some(ty) = ty {
                        attribute.ty = ty;
                    }
                    if let Some(nullable) = config.nullable {
                        attribute.nullable = nullable;
                    }
                    if config.default.is_some() {
                        attribute.default = config.default.clone();
                    }
                }
                None => {
                    let Some(ty) = ty else {
                        return Err(Error::invalid_schema(format!(
                            "declared attribute `{relation}.{name}` needs a type"
                        )));
                    };

                    builder = builder.attribute(
                        Attribute::new(&relation[..], &name[..], ty)
                            .nullable(config.nullable.unwrap_or(true))
                            .default_value(config.default.clone()),
                    );
                }
            }
        }

        if let Some(primary_key) = &self.primary_key {
            builder = builder.primary_key(primary_key.iter().cloned());
        }

        for index in &self.indexes {
            builder = builder.index(
                Index::new(&index.name[..], index.attributes.iter().cloned())
                    .unique(index.unique)
                    .method(index.method.clone())
                    .predicate(index.predicate.clone()),
            );
        }

        for foreign_key in &self.foreign_keys {
            builder = builder.foreign_key(ForeignKey::new(
                foreign_key.attributes.iter().cloned(),
                &foreign_key.target[..],
                foreign_key.target_attributes.iter().cloned(),
            ));
        }

        Ok(builder)
    }
}

impl AssociationConfig {
    pub(crate) fn conditions(&self) -> Vec<(String, Value)> {
        self.conditions
            .iter()
            .map(|(name, value)| (name.clone(), Value::from_json(value.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::stmt::Type;

    const CONFIG: &str = r#"
        [relations.users]
        attributes.email = { type = "varchar(255)", nullable = false }
        indexes = [{ name = "users_email_key", attributes = ["email"], unique = true }]

        [[relations.users.associations]]
        name = "open_tasks"
        kind = "one_to_many"
        target = "tasks"
        keys = [["id", "user_id"]]
        conditions = { done = false }

        [[relations.categories.self_references]]
        attributes = ["parent_id"]
        alias = "parent"
        inverse = "children"

        [relations.audit_log]
        infer = false
        primary_key = ["id"]
        attributes.id = { type = "bigint", nullable = false }
        attributes.message = { type = "text" }
    "#;

    #[test]
    fn parses_toml() {
        let config = SchemaConfig::from_toml_str(CONFIG).unwrap();

        let users = config.relation("users").unwrap();
        assert!(users.infer);
        assert_eq!(users.attributes["email"].ty.as_deref(), Some("varchar(255)"));
        assert_eq!(users.associations[0].kind, DeclaredKind::OneToMany);
        assert_eq!(
            users.associations[0].conditions(),
            vec![("done".to_string(), Value::Bool(false))]
        );

        let parent = config
            .self_reference("categories", &["parent_id".to_string()])
            .unwrap();
        assert_eq!(parent.alias, "parent");
        assert_eq!(parent.inverse.as_deref(), Some("children"));

        assert!(!config.relation("audit_log").unwrap().infer);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(SchemaConfig::from_toml_str("[relations.users]\ninfr = false").is_err());
    }

    #[test]
    fn declared_relation_builds_a_schema() {
        let config = SchemaConfig::from_toml_str(CONFIG).unwrap();
        let registry = TypeRegistry::new();

        let schema = config.relations["audit_log"]
            .apply(
                Schema::builder("audit_log"),
                &registry,
                Dialect::Postgresql,
                UnknownTypePolicy::Fail,
            )
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(schema.attribute_names().collect::<Vec<_>>(), ["id", "message"]);
        assert_eq!(schema.attribute("id").unwrap().kind(), &Type::I64);
        assert!(!schema.attribute("id").unwrap().nullable);
        assert_eq!(schema.primary_key, ["id"]);
    }

    #[test]
    fn overrides_keep_attribute_position() {
        let registry = TypeRegistry::new();
        let builder = Schema::builder("users")
            .attribute(Attribute::new(
                "users",
                "id",
                registry.resolve("integer", Dialect::Postgresql).unwrap(),
            ))
            .attribute(Attribute::new(
                "users",
                "email",
                registry.resolve("text", Dialect::Postgresql).unwrap(),
            ));

        let config = SchemaConfig::from_toml_str(CONFIG).unwrap();
        let schema = config.relations["users"]
            .apply(builder, &registry, Dialect::Postgresql, UnknownTypePolicy::Fail)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(schema.attribute_names().collect::<Vec<_>>(), ["id", "email"]);
        let email = schema.attribute("email").unwrap();
        assert_eq!(email.max_length(), Some(255));
        assert!(!email.nullable);
        assert!(schema.restriction("by_email").is_some());
    }
}
