use super::Error;

/// Error when an expression references an attribute of a relation that does
/// not participate in the query.
///
/// Raised by the SQL compiler before anything is sent to the database.
#[derive(Debug)]
pub(super) struct UnboundReference {
    reference: Box<str>,
}

impl std::error::Error for UnboundReference {}

impl core::fmt::Display for UnboundReference {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unbound reference: {}", self.reference)
    }
}

impl Error {
    /// Creates an unbound reference error.
    pub fn unbound_reference(reference: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnboundReference(UnboundReference {
            reference: reference.into().into(),
        }))
    }

    /// Returns `true` if this error is an unbound reference error.
    pub fn is_unbound_reference(&self) -> bool {
        self.find(|kind| matches!(kind, super::ErrorKind::UnboundReference(_)))
            .is_some()
    }
}
