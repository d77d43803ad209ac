mod adhoc;
mod aggregate_function_misuse;
mod ambiguous_association;
mod constraint_violation;
mod driver_operation_failed;
mod invalid_connection_url;
mod invalid_schema;
mod invalid_statement;
mod record_not_found;
mod relation_not_found;
mod type_conversion;
mod unbound_reference;
mod unknown_type;
mod unsupported_feature;

use adhoc::AdhocError;
use aggregate_function_misuse::AggregateFunctionMisuse;
use ambiguous_association::AmbiguousAssociation;
pub use constraint_violation::{ConstraintKind, ConstraintViolation};
use driver_operation_failed::DriverOperationFailed;
use invalid_connection_url::InvalidConnectionUrl;
use invalid_schema::InvalidSchema;
use invalid_statement::InvalidStatement;
use record_not_found::RecordNotFound;
use relation_not_found::RelationNotFound;
use std::{fmt, sync::Arc};
use type_conversion::TypeConversion;
use unbound_reference::UnboundReference;
use unknown_type::UnknownType;
use unsupported_feature::UnsupportedFeature;

/// Returns early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// The error type of every fallible quarry operation.
///
/// An error is a kind plus an optional cause. Wrapping with
/// [`Error::context`] pushes a new outer kind, and the classification
/// predicates (`is_*`, `constraint_violation_kind`, ..) search the whole
/// chain, so added context never hides what went wrong underneath.
#[derive(Clone)]
pub struct Error(Arc<Frame>);

#[derive(Debug)]
struct Frame {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Wraps `self` under `outer`. Displayed outermost first, ending with
    /// the root cause.
    #[cold]
    pub fn context(self, outer: Error) -> Error {
        let kind = match Arc::try_unwrap(outer.0) {
            Ok(frame) => frame.kind,
            Err(shared) => ErrorKind::Adhoc(AdhocError::new(shared.kind.to_string())),
        };

        Error(Arc::new(Frame {
            kind,
            cause: Some(self),
        }))
    }

    /// Creates an ad-hoc error from format arguments. Prefer the `err!` macro.
    pub fn from_args(args: fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(args.to_string())))
    }

    /// The innermost error of the context chain.
    pub fn root(&self) -> &Error {
        let mut err = self;
        while let Some(cause) = &err.0.cause {
            err = cause;
        }
        err
    }

    fn frames(&self) -> Frames<'_> {
        Frames { next: Some(self) }
    }

    fn find(&self, f: impl Fn(&ErrorKind) -> bool) -> Option<&ErrorKind> {
        self.frames().map(|err| &err.0.kind).find(|kind| f(kind))
    }
}

struct Frames<'a> {
    next: Option<&'a Error>,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a Error;

    fn next(&mut self) -> Option<&'a Error> {
        let err = self.next?;
        self.next = err.0.cause.as_ref();
        Some(err)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match (&self.0.kind, &self.0.cause) {
            (_, Some(cause)) => Some(cause),
            (ErrorKind::DriverOperationFailed(err), None) => Some(err),
            (ErrorKind::Anyhow(err), None) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.frames().enumerate() {
            if i > 0 {
                f.write_str(": ")?;
            }
            fmt::Display::fmt(&err.0.kind, f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.debug_struct("Error")
                .field("kind", &self.0.kind)
                .field("cause", &self.0.cause)
                .finish()
        } else {
            fmt::Display::fmt(self, f)
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    AggregateFunctionMisuse(AggregateFunctionMisuse),
    AmbiguousAssociation(AmbiguousAssociation),
    ConstraintViolation(ConstraintViolation),
    DriverOperationFailed(DriverOperationFailed),
    InvalidConnectionUrl(InvalidConnectionUrl),
    InvalidSchema(InvalidSchema),
    InvalidStatement(InvalidStatement),
    RecordNotFound(RecordNotFound),
    RelationNotFound(RelationNotFound),
    TypeConversion(TypeConversion),
    UnboundReference(UnboundReference),
    UnknownType(UnknownType),
    UnsupportedFeature(UnsupportedFeature),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ErrorKind::*;

        let err: &dyn fmt::Display = match self {
            Anyhow(err) => err,
            Adhoc(err) => err,
            AggregateFunctionMisuse(err) => err,
            AmbiguousAssociation(err) => err,
            ConstraintViolation(err) => err,
            DriverOperationFailed(err) => err,
            InvalidConnectionUrl(err) => err,
            InvalidSchema(err) => err,
            InvalidStatement(err) => err,
            RecordNotFound(err) => err,
            RelationNotFound(err) => err,
            TypeConversion(err) => err,
            UnboundReference(err) => err,
            UnknownType(err) => err,
            UnsupportedFeature(err) => err,
        };

        fmt::Display::fmt(err, f)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error(Arc::new(Frame { kind, cause: None }))
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

/// Library errors without a kind of their own travel through `anyhow`.
macro_rules! via_anyhow {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Error {
                fn from(err: $ty) -> Error {
                    Error::from(anyhow::Error::from(err))
                }
            }
        )*
    };
}

via_anyhow!(
    std::num::ParseIntError,
    serde_json::Error,
    toml::de::Error,
    uuid::Error,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_in_a_pointer() {
        assert_eq!(std::mem::size_of::<Error>(), std::mem::size_of::<usize>());
    }

    #[test]
    fn context_reads_outermost_first() {
        let err = err!("disk full")
            .context(err!("writing `users`"))
            .context(err!("import failed"));

        assert_eq!(err.to_string(), "import failed: writing `users`: disk full");
        assert_eq!(err.root().to_string(), "disk full");
    }

    #[test]
    fn anyhow_errors_convert() {
        let err = Error::from(anyhow::anyhow!("socket closed"));
        assert_eq!(err.to_string(), "socket closed");
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn unknown_type_keeps_raw_string() {
        let err = Error::unknown_type("geography(Point,4326)");
        assert!(err.is_unknown_type());
        assert_eq!(err.unknown_type_name(), Some("geography(Point,4326)"));
        assert_eq!(err.to_string(), "unknown type: geography(Point,4326)");
    }

    #[test]
    fn relation_not_found_with_context() {
        let err = Error::relation_not_found("userz").context(err!("schema inference failed"));
        assert!(err.is_relation_not_found());
        assert_eq!(
            err.to_string(),
            "schema inference failed: relation not found: userz"
        );
    }

    #[test]
    fn unbound_reference() {
        let err = Error::unbound_reference("tasks.title");
        assert!(err.is_unbound_reference());
        assert_eq!(err.to_string(), "unbound reference: tasks.title");
    }

    #[test]
    fn constraint_violation_is_classified() {
        let err = Error::constraint_violation(
            ConstraintViolation::new(ConstraintKind::NotNull, "null value in column \"name\"")
                .with_relation("users")
                .with_attribute("name"),
        );
        assert!(err.is_constraint_violation());
        assert_eq!(err.constraint_violation_kind(), Some(ConstraintKind::NotNull));

        let violation = err.as_constraint_violation().unwrap();
        assert_eq!(violation.attribute(), Some("name"));
        assert_eq!(violation.relation(), Some("users"));
        assert_eq!(
            err.to_string(),
            "not-null constraint violated on users.name: null value in column \"name\""
        );
    }

    #[test]
    fn classification_looks_through_context() {
        let err = Error::constraint_violation(ConstraintViolation::new(
            ConstraintKind::Uniqueness,
            "duplicate key",
        ))
        .context(err!("insert into users"));

        assert_eq!(
            err.constraint_violation_kind(),
            Some(ConstraintKind::Uniqueness)
        );
    }

    #[test]
    fn record_not_found() {
        let err = Error::record_not_found("relation=users key=[1]");
        assert!(err.is_record_not_found());
        assert_eq!(err.to_string(), "record not found: relation=users key=[1]");
    }
}
