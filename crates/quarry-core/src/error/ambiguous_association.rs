use super::Error;

/// Error when an association cannot be resolved without more configuration.
///
/// The common case is a self-referencing foreign key: joining a relation to
/// itself needs an alias so both instances can be told apart.
#[derive(Debug)]
pub(super) struct AmbiguousAssociation {
    relation: Box<str>,
    detail: Box<str>,
}

impl std::error::Error for AmbiguousAssociation {}

impl core::fmt::Display for AmbiguousAssociation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "ambiguous association on {}: {}",
            self.relation, self.detail
        )
    }
}

impl Error {
    /// Creates an ambiguous association error.
    pub fn ambiguous_association(relation: impl Into<String>, detail: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::AmbiguousAssociation(AmbiguousAssociation {
            relation: relation.into().into(),
            detail: detail.into().into(),
        }))
    }

    /// Returns `true` if this error is an ambiguous association error.
    pub fn is_ambiguous_association(&self) -> bool {
        self.find(|kind| matches!(kind, super::ErrorKind::AmbiguousAssociation(_)))
            .is_some()
    }
}
