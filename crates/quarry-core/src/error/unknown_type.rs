use super::Error;

/// Error when a native column type has no registered semantic type.
///
/// Carries the raw type string exactly as the database reported it so the
/// caller can decide whether to fall back to an opaque type.
#[derive(Debug)]
pub(super) struct UnknownType {
    raw: Box<str>,
}

impl std::error::Error for UnknownType {}

impl core::fmt::Display for UnknownType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown type: {}", self.raw)
    }
}

impl Error {
    /// Creates an unknown type error for the given raw native type name.
    pub fn unknown_type(raw: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownType(UnknownType {
            raw: raw.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown type error.
    pub fn is_unknown_type(&self) -> bool {
        self.find(|kind| matches!(kind, super::ErrorKind::UnknownType(_)))
            .is_some()
    }

    /// The raw native type string carried by an unknown type error.
    pub fn unknown_type_name(&self) -> Option<&str> {
        match self.find(|kind| matches!(kind, super::ErrorKind::UnknownType(_))) {
            Some(super::ErrorKind::UnknownType(err)) => Some(&err.raw),
            _ => None,
        }
    }
}
