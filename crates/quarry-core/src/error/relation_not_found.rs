use super::Error;

/// Error when schema inference targets a table or view that does not exist.
///
/// Inference never produces an empty schema for a missing relation; a
/// misspelled table name must fail loudly at configuration time.
#[derive(Debug)]
pub(super) struct RelationNotFound {
    name: Box<str>,
}

impl std::error::Error for RelationNotFound {}

impl core::fmt::Display for RelationNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "relation not found: {}", self.name)
    }
}

impl Error {
    /// Creates a relation not found error.
    pub fn relation_not_found(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::RelationNotFound(RelationNotFound {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is a relation not found error.
    pub fn is_relation_not_found(&self) -> bool {
        self.find(|kind| matches!(kind, super::ErrorKind::RelationNotFound(_)))
            .is_some()
    }
}
