use super::Error;

/// Error when an aggregate (or window) function appears where only scalar
/// expressions are allowed, such as `WHERE` or `GROUP BY`.
#[derive(Debug)]
pub(super) struct AggregateFunctionMisuse {
    detail: Box<str>,
}

impl std::error::Error for AggregateFunctionMisuse {}

impl core::fmt::Display for AggregateFunctionMisuse {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "aggregate function misuse: {}", self.detail)
    }
}

impl Error {
    /// Creates an aggregate function misuse error.
    pub fn aggregate_function_misuse(detail: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::AggregateFunctionMisuse(
            AggregateFunctionMisuse {
                detail: detail.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an aggregate function misuse error.
    pub fn is_aggregate_function_misuse(&self) -> bool {
        self.find(|kind| matches!(kind, super::ErrorKind::AggregateFunctionMisuse(_)))
            .is_some()
    }
}
