use super::{Attribute, ForeignKey, Index, Schema};
use crate::{Error, Result};

use indexmap::IndexMap;

/// Accumulates a relation's structure and validates it into a [`Schema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    attributes: Vec<Attribute>,
    primary_key: Vec<String>,
    indexes: Vec<Index>,
    foreign_keys: Vec<ForeignKey>,
    view: bool,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: vec![],
            primary_key: vec![],
            indexes: vec![],
            foreign_keys: vec![],
            view: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attribute| attribute.name == name)
    }

    /// Replaces an attribute's definition in place, keeping its position.
    /// Unknown attributes are appended.
    pub fn replace_attribute(mut self, attribute: Attribute) -> Self {
        match self.attributes.iter_mut().find(|a| a.name == attribute.name) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
        self
    }

    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|attribute| attribute.name == name)
    }

    pub fn primary_key<T: Into<String>>(mut self, attributes: impl IntoIterator<Item = T>) -> Self {
        self.primary_key = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn index(mut self, index: Index) -> Self {
        self.indexes.retain(|existing| existing.name != index.name);
        self.indexes.push(index);
        self
    }

    pub fn foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    pub fn view(mut self, view: bool) -> Self {
        self.view = view;
        self
    }

    /// Validates the accumulated structure.
    ///
    /// Duplicate attribute names, and keys, indexes or foreign keys naming
    /// unknown attributes are errors. Associations are attached later, once
    /// every relation of the catalog is known.
    pub fn build(self) -> Result<Schema> {
        let mut attributes = IndexMap::with_capacity(self.attributes.len());

        for attribute in self.attributes {
            let name = attribute.name.clone();
            if attributes.insert(name.clone(), attribute).is_some() {
                return Err(Error::invalid_schema(format!(
                    "duplicate attribute `{}` in relation `{}`",
                    name, self.name
                )));
            }
        }

        for name in &self.primary_key {
            match attributes.get_mut(name) {
                Some(attribute) => attribute.primary_key = true,
                None => {
                    return Err(Error::invalid_schema(format!(
                        "primary key of `{}` names unknown attribute `{name}`",
                        self.name
                    )))
                }
            }
        }

        for index in &self.indexes {
            if let Some(unknown) = index.attributes.iter().find(|a| !attributes.contains_key(*a)) {
                return Err(Error::invalid_schema(format!(
                    "index `{}` of `{}` names unknown attribute `{unknown}`",
                    index.name, self.name
                )));
            }
        }

        for foreign_key in &self.foreign_keys {
            if let Some(unknown) = foreign_key.source.iter().find(|a| !attributes.contains_key(*a)) {
                return Err(Error::invalid_schema(format!(
                    "foreign key of `{}` names unknown attribute `{unknown}`",
                    self.name
                )));
            }
        }

        let indexes = self.indexes;

        let mut restrictions = IndexMap::new();
        for (position, index) in indexes.iter().enumerate() {
            if index.is_partial() {
                continue;
            }
            restrictions.entry(index.restriction_name()).or_insert(position);
        }

        Ok(Schema {
            name: self.name,
            attributes,
            primary_key: self.primary_key,
            indexes,
            foreign_keys: self.foreign_keys,
            associations: IndexMap::new(),
            restrictions,
            view: self.view,
        })
    }
}
