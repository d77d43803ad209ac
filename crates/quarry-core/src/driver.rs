mod capability;
pub use capability::{Capability, Dialect};

pub mod classify;

mod compiled;
pub use compiled::Compiled;

mod response;
pub use response::{Response, Row, Rows};

mod transaction;
pub use transaction::{IsolationLevel, Transaction};

use crate::{async_trait, stmt::Value, Result};

use std::fmt::Debug;

/// The execution boundary: runs compiled SQL against a live database.
///
/// A gateway never sees query specifications, only the self-contained
/// [`Compiled`] unit the SQL compiler produces, so the same compiled query
/// can be retried or re-issued as is.
#[async_trait]
pub trait Gateway: Debug + Send + Sync + 'static {
    /// Describes the gateway's dialect and capabilities.
    fn capability(&self) -> &'static Capability;

    /// Executes a compiled statement.
    ///
    /// Statements compiled with `returns_rows` produce [`Rows::Values`];
    /// other statements produce the number of affected rows.
    async fn execute(&self, query: &Compiled) -> Result<Response>;

    /// Runs a statement that takes no parameters and returns nothing (DDL,
    /// transaction control).
    async fn run_ddl(&self, sql: &str) -> Result<()>;

    /// Invokes a scalar SQL function and returns its result.
    async fn call_function(&self, name: &str, args: &[Value]) -> Result<Value>;

    /// Shorthand for [`Capability::dialect`].
    fn dialect(&self) -> Dialect {
        self.capability().dialect
    }
}
