/// A reference from attributes of one relation to another relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Constraint name, when the database reports one
    pub name: Option<String>,

    /// Referencing attributes of the owning relation
    pub source: Vec<String>,

    /// Referenced relation
    pub target: String,

    /// Referenced attributes. Empty means the target's primary key.
    pub target_attributes: Vec<String>,
}

impl ForeignKey {
    pub fn new<S: Into<String>, T: Into<String>>(
        source: impl IntoIterator<Item = S>,
        target: impl Into<String>,
        target_attributes: impl IntoIterator<Item = T>,
    ) -> Self {
        Self {
            name: None,
            source: source.into_iter().map(Into::into).collect(),
            target: target.into(),
            target_attributes: target_attributes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn named(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    pub fn is_composite(&self) -> bool {
        self.source.len() > 1
    }
}
