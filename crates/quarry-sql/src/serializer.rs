#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod flavor;
use flavor::Flavor;

mod ident;
use ident::{Ident, Qualified};

mod params;
pub use params::{Params, Placeholder};

mod scope;
use scope::Scope;

// Fragment serializers
mod expr;
mod raw;
mod statement;
mod ty;
mod value;

use quarry_core::{
    driver::{Compiled, Transaction},
    schema::Catalog,
    stmt::{QuerySpec, Statement},
    Result,
};

/// Serialize a statement to a SQL string
#[derive(Debug)]
pub struct Serializer<'a> {
    /// Relations columns are resolved against
    catalog: &'a Catalog,

    /// The database flavor handles the differences between SQL dialects and
    /// supported features.
    flavor: Flavor,
}

/// The clause currently being written, used to reject aggregates and
/// window functions where SQL does not allow them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Projection,
    Filter,
    GroupBy,
    Having,
    OrderBy,
    Values,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,

    /// Sources in scope, innermost last
    scopes: Vec<Scope>,

    clause: Clause,

    /// Set while writing the arguments of an aggregate or window function
    in_aggregate: bool,
}

impl<'a> Serializer<'a> {
    /// Compiles a statement into SQL text and its bound parameters.
    pub fn compile(&self, stmt: &Statement) -> Result<Compiled> {
        self.compile_node(stmt, stmt.returns_rows())
    }

    /// Shorthand for compiling a query.
    pub fn compile_query(&self, query: &QuerySpec) -> Result<Compiled> {
        self.compile_node(query, true)
    }

    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> Result<String> {
        self.serialize_node(stmt, params)
    }

    fn compile_node(&self, node: impl ToSql, returns_rows: bool) -> Result<Compiled> {
        let mut params = vec![];
        let sql = self.serialize_node(node, &mut params)?;

        log::debug!(
            "compiled {:?} statement; params={}; sql={sql}",
            self.flavor,
            params.len()
        );

        Ok(Compiled {
            sql,
            params,
            returns_rows,
        })
    }

    fn serialize_node(&self, node: impl ToSql, params: &mut impl Params) -> Result<String> {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
            scopes: vec![],
            clause: Clause::Projection,
            in_aggregate: false,
        };

        node.to_sql(&mut fmt)?;

        ret.push(';');
        Ok(ret)
    }

    /// The statement that runs a transaction control operation.
    pub fn serialize_transaction(&self, op: &Transaction) -> String {
        let level = match op {
            Transaction::Begin(level) => *level,
            Transaction::Commit => return "COMMIT".to_string(),
            Transaction::Rollback => return "ROLLBACK".to_string(),
        };

        match (self.flavor, level) {
            (Flavor::Mysql, None) => "START TRANSACTION".to_string(),
            (Flavor::Mysql, Some(level)) => format!(
                "SET TRANSACTION ISOLATION LEVEL {}; START TRANSACTION",
                level.as_sql()
            ),
            (Flavor::Postgresql, Some(level)) => format!("BEGIN ISOLATION LEVEL {}", level.as_sql()),
            // SQLite transactions are always serializable
            (Flavor::Postgresql, None) | (Flavor::Sqlite, _) => "BEGIN".to_string(),
        }
    }
}

impl<T: Params> Formatter<'_, T> {
    /// Runs `f` with `clause` as the current clause.
    fn in_clause<R>(&mut self, clause: Clause, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let prev = std::mem::replace(&mut self.clause, clause);
        let ret = f(self);
        self.clause = prev;
        ret
    }

    /// Runs `f` while writing the arguments of an aggregate or window.
    fn within_aggregate<R>(&mut self, aggregate: bool, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let in_aggregate = self.in_aggregate || aggregate;
        let prev = std::mem::replace(&mut self.in_aggregate, in_aggregate);
        let ret = f(self);
        self.in_aggregate = prev;
        ret
    }

    /// Runs `f` with a fresh query scope pushed, restoring the clause state
    /// of the enclosing query afterwards.
    fn in_scope<R>(&mut self, scope: Scope, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let clause = self.clause;
        let in_aggregate = std::mem::replace(&mut self.in_aggregate, false);
        self.scopes.push(scope);

        let ret = f(self);

        self.scopes.pop();
        self.clause = clause;
        self.in_aggregate = in_aggregate;
        ret
    }
}
