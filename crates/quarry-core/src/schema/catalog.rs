use super::{resolver, Association, Schema, SchemaConfig};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// Every relation known to a database handle, with associations resolved.
///
/// Schemas are immutable once the catalog is built and are shared by
/// reference with every relation object.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    schemas: IndexMap<String, Arc<Schema>>,
}

impl Catalog {
    /// Resolves associations across `schemas` and freezes the result.
    pub fn build(schemas: Vec<Schema>, config: &SchemaConfig) -> Result<Catalog> {
        let mut by_name = IndexMap::with_capacity(schemas.len());

        for schema in schemas {
            if by_name.contains_key(&schema.name) {
                return Err(Error::invalid_schema(format!(
                    "relation `{}` defined twice",
                    schema.name
                )));
            }
            by_name.insert(schema.name.clone(), schema);
        }

        let mut associations = resolver::resolve(&by_name, config)?;

        let schemas = by_name
            .into_iter()
            .map(|(name, mut schema)| {
                schema.associations = associations.shift_remove(&name).unwrap_or_default();
                (name, Arc::new(schema))
            })
            .collect();

        Ok(Catalog { schemas })
    }

    pub fn schema(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(name)
    }

    /// Like [`Catalog::schema`], failing with `RelationNotFound`.
    pub fn get(&self, name: &str) -> Result<&Arc<Schema>> {
        self.schemas
            .get(name)
            .ok_or_else(|| Error::relation_not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Arc<Schema>> + '_ {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn association(&self, relation: &str, name: &str) -> Result<&Association> {
        self.get(relation)?.association(name).ok_or_else(|| {
            Error::invalid_statement(format!("relation `{relation}` has no association `{name}`"))
        })
    }
}
