use super::Error;

/// Error when a schema definition is invalid.
///
/// This occurs when:
/// - A schema has duplicate attribute names
/// - A primary key or index names an attribute the relation does not have
/// - A declaration names an unknown association kind or target
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        self.find(|kind| matches!(kind, super::ErrorKind::InvalidSchema(_)))
            .is_some()
    }
}
