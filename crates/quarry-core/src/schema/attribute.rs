use super::{SemanticType, TypeMeta};
use crate::stmt::{Expr, Type};

/// A column of a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Column name, unique within the relation
    pub name: String,

    /// Name of the relation the attribute belongs to
    pub relation: String,

    pub ty: SemanticType,

    pub nullable: bool,

    /// Default expression as reported by the database, verbatim
    pub default: Option<String>,

    /// Part of the relation's primary key
    pub primary_key: bool,
}

impl Attribute {
    pub fn new(relation: impl Into<String>, name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            name: name.into(),
            relation: relation.into(),
            ty,
            nullable: true,
            default: None,
            primary_key: false,
        }
    }

    pub fn nullable(self, nullable: bool) -> Self {
        Self { nullable, ..self }
    }

    pub fn default_value(self, default: Option<String>) -> Self {
        Self { default, ..self }
    }

    pub fn kind(&self) -> &Type {
        &self.ty.ty
    }

    pub fn meta(&self) -> &TypeMeta {
        &self.ty.meta
    }

    pub fn max_length(&self) -> Option<u32> {
        self.ty.meta.max_length
    }

    /// A column reference qualified by the owning relation.
    pub fn expr(&self) -> Expr {
        Expr::qualified(&self.relation[..], &self.name[..])
    }

    /// A column reference qualified by `alias` instead of the relation name.
    pub fn expr_as(&self, alias: &str) -> Expr {
        Expr::qualified(alias, &self.name[..])
    }
}

impl From<&Attribute> for Expr {
    fn from(value: &Attribute) -> Self {
        value.expr()
    }
}
