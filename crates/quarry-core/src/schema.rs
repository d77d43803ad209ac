mod association;
pub use association::{Association, AssociationKind, Cardinality, JoinPlan, Through};

mod attribute;
pub use attribute::Attribute;

mod builder;
pub use builder::SchemaBuilder;

mod catalog;
pub use catalog::Catalog;

mod config;
pub use config::{
    AssociationConfig, AttributeConfig, DeclaredKind, ForeignKeyConfig, IndexConfig,
    RelationConfig, SchemaConfig, SelfReferenceConfig,
};

mod foreign_key;
pub use foreign_key::ForeignKey;

mod index;
pub use index::Index;

pub mod naming;

mod native_type;
pub use native_type::NativeType;

mod registry;
pub use registry::{TypeRegistry, UnknownTypePolicy};

mod relation;
pub use relation::Schema;

mod resolver;

mod semantic_type;
pub use semantic_type::{encode_array_literal, parse_array_literal, SemanticType, TypeMeta};
