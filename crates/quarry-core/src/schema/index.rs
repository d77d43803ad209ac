use super::naming;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// Index name as known by the database
    pub name: String,

    /// Indexed attributes, in key order
    pub attributes: Vec<String>,

    pub unique: bool,

    /// `WHERE` clause of a partial index, verbatim
    pub predicate: Option<String>,

    /// Access method (`btree`, `gin`, `hash`, ...)
    pub method: Option<String>,
}

impl Index {
    pub fn new<T: Into<String>>(name: impl Into<String>, attributes: impl IntoIterator<Item = T>) -> Self {
        Self {
            name: name.into(),
            attributes: attributes.into_iter().map(Into::into).collect(),
            unique: false,
            predicate: None,
            method: None,
        }
    }

    pub fn unique(self, unique: bool) -> Self {
        Self { unique, ..self }
    }

    pub fn predicate(self, predicate: Option<String>) -> Self {
        Self { predicate, ..self }
    }

    pub fn method(self, method: Option<String>) -> Self {
        Self { method, ..self }
    }

    pub fn is_partial(&self) -> bool {
        self.predicate.is_some()
    }

    /// Name of the restriction helper derived from this index.
    pub fn restriction_name(&self) -> String {
        naming::restriction_name(&self.attributes)
    }

    /// `true` when the index key is exactly `attributes`, in any order.
    pub fn covers_exactly(&self, attributes: &[String]) -> bool {
        self.attributes.len() == attributes.len()
            && attributes.iter().all(|a| self.attributes.contains(a))
    }
}
