use super::{Association, Attribute, ForeignKey, Index, SchemaBuilder};

use indexmap::IndexMap;

/// The canonical structure of one relation (table or view).
///
/// Built once at configuration time and shared read-only by every relation
/// object that reads from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: String,

    /// Attributes in database ordinal order
    pub attributes: IndexMap<String, Attribute>,

    /// Primary key attributes, in key order. May be empty.
    pub primary_key: Vec<String>,

    pub indexes: Vec<Index>,

    pub foreign_keys: Vec<ForeignKey>,

    /// Associations keyed by name, sorted
    pub associations: IndexMap<String, Association>,

    /// Restriction helper name -> position in `indexes`
    pub(crate) restrictions: IndexMap<String, usize>,

    pub view: bool,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attribute_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.attributes.keys().map(String::as_str)
    }

    pub fn primary_key_attributes(&self) -> impl ExactSizeIterator<Item = &Attribute> + '_ {
        self.primary_key.iter().map(|name| &self.attributes[name])
    }

    /// The primary key attribute, when the key is a single column.
    pub fn single_primary_key(&self) -> Option<&Attribute> {
        match &self.primary_key[..] {
            [name] => self.attributes.get(name),
            _ => None,
        }
    }

    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|index| index.name == name)
    }

    /// Looks up a restriction helper by its synthesized name (`by_email`)
    /// or by the name of the index behind it. Partial indexes have no
    /// helper.
    pub fn restriction(&self, name: &str) -> Option<&Index> {
        if let Some(&position) = self.restrictions.get(name) {
            return Some(&self.indexes[position]);
        }

        self.index(name).filter(|index| !index.is_partial())
    }

    pub fn restriction_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.restrictions.keys().map(String::as_str)
    }

    pub fn association(&self, name: &str) -> Option<&Association> {
        self.associations.get(name)
    }

    /// `true` when `attributes` are covered by the primary key or a
    /// unique, non-partial index.
    pub fn is_unique(&self, attributes: &[String]) -> bool {
        (!self.primary_key.is_empty()
            && self.primary_key.len() == attributes.len()
            && attributes.iter().all(|a| self.primary_key.contains(a)))
            || self
                .indexes
                .iter()
                .any(|index| index.unique && !index.is_partial() && index.covers_exactly(attributes))
    }
}
