use super::Error;

/// The family of integrity constraint a database rejected a write with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    NotNull,
    Uniqueness,
    ForeignKey,
    Check,
}

/// A database constraint error translated out of dialect-specific codes.
///
/// The original database message is kept verbatim for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    kind: ConstraintKind,
    relation: Option<String>,
    attribute: Option<String>,
    constraint: Option<String>,
    message: String,
}

impl ConstraintViolation {
    pub fn new(kind: ConstraintKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            relation: None,
            attribute: None,
            constraint: None,
            message: message.into(),
        }
    }

    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    pub fn relation(&self) -> Option<&str> {
        self.relation.as_deref()
    }

    /// The offending attribute, when the database reports one.
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    pub fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
    }

    /// The database's own message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::error::Error for ConstraintViolation {}

impl core::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let kind = match self.kind {
            ConstraintKind::NotNull => "not-null",
            ConstraintKind::Uniqueness => "uniqueness",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::Check => "check",
        };

        write!(f, "{kind} constraint violated")?;

        match (&self.relation, &self.attribute, &self.constraint) {
            (Some(relation), Some(attribute), _) => write!(f, " on {relation}.{attribute}")?,
            (None, Some(attribute), _) => write!(f, " on {attribute}")?,
            (_, None, Some(constraint)) => write!(f, " ({constraint})")?,
            (Some(relation), None, None) => write!(f, " on {relation}")?,
            (None, None, None) => {}
        }

        write!(f, ": {}", self.message)
    }
}

impl Error {
    /// Creates a classified constraint violation error.
    pub fn constraint_violation(violation: ConstraintViolation) -> Error {
        Error::from(super::ErrorKind::ConstraintViolation(violation))
    }

    /// Returns `true` if this error is a constraint violation of any kind.
    pub fn is_constraint_violation(&self) -> bool {
        self.as_constraint_violation().is_some()
    }

    /// Returns the classified violation, looking through added context.
    pub fn as_constraint_violation(&self) -> Option<&ConstraintViolation> {
        match self.find(|kind| matches!(kind, super::ErrorKind::ConstraintViolation(_))) {
            Some(super::ErrorKind::ConstraintViolation(violation)) => Some(violation),
            _ => None,
        }
    }

    pub fn constraint_violation_kind(&self) -> Option<ConstraintKind> {
        self.as_constraint_violation().map(ConstraintViolation::kind)
    }
}
