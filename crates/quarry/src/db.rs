mod builder;
mod connect;

pub use builder::Builder;
pub use connect::connect;

use crate::{relation::Relation, ImportOptions, Result};

use quarry_core::{
    driver::{Compiled, Dialect, Gateway, Response, Transaction},
    stmt::{QuerySpec, Statement, Value},
    Catalog,
};
use quarry_sql::Serializer;

use by_address::ByAddress;
use std::sync::Arc;

/// Shared state between all `Db` clones.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) gateway: Arc<dyn Gateway>,
    pub(crate) catalog: Catalog,
    pub(crate) import: ImportOptions,
}

/// A handle to a database: the gateway that runs statements plus the
/// catalog of schemas inferred from it.
///
/// Cloning is cheap and every clone shares the same gateway and catalog.
#[derive(Debug, Clone)]
pub struct Db {
    pub(crate) shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Connects to `url` and infers every table and view.
    pub async fn connect(url: &str) -> Result<Db> {
        Builder::default().infer_all().connect(url).await
    }

    pub fn catalog(&self) -> &Catalog {
        &self.shared.catalog
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.shared.gateway
    }

    pub fn dialect(&self) -> Dialect {
        self.shared.gateway.dialect()
    }

    pub fn import_options(&self) -> &ImportOptions {
        &self.shared.import
    }

    pub fn serializer(&self) -> Serializer<'_> {
        Serializer::for_dialect(&self.shared.catalog, self.dialect())
    }

    /// A relation over every row of the named table or view.
    pub fn relation(&self, name: &str) -> Result<Relation> {
        let schema = self.shared.catalog.get(name)?;
        Ok(Relation::new(
            self.clone(),
            schema.name.clone(),
            QuerySpec::table(&schema.name[..]),
        ))
    }

    /// A relation over caller-supplied SQL. `?` marks a bound parameter;
    /// `??` is a literal question mark.
    pub fn read(&self, sql: impl Into<String>, params: Vec<Value>, alias: &str) -> Relation {
        Relation::new(self.clone(), alias.to_string(), QuerySpec::raw(sql, params, alias))
    }

    pub fn compile(&self, stmt: &Statement) -> Result<Compiled> {
        self.serializer().compile(stmt)
    }

    /// Compiles and runs a statement.
    pub async fn execute(&self, stmt: &Statement) -> Result<Response> {
        let compiled = self.compile(stmt)?;
        self.shared.gateway.execute(&compiled).await
    }

    pub async fn call_function(&self, name: &str, args: &[Value]) -> Result<Value> {
        self.shared.gateway.call_function(name, args).await
    }

    /// Runs a transaction control statement.
    pub async fn transaction(&self, op: Transaction) -> Result<()> {
        let sql = self.serializer().serialize_transaction(&op);
        self.shared.gateway.run_ddl(&sql).await
    }

    /// Runs `f` between `BEGIN` and `COMMIT`, rolling back when it fails.
    pub async fn in_transaction<T, F, Fut>(&self, f: F) -> Result<T>
    where
        F: FnOnce(Db) -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        self.transaction(Transaction::begin()).await?;

        match f(self.clone()).await {
            Ok(value) => {
                self.transaction(Transaction::Commit).await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = self.transaction(Transaction::Rollback).await {
                    return Err(err.context(rollback));
                }
                Err(err)
            }
        }
    }

    /// `true` when both handles run statements through the same gateway.
    pub fn same_gateway(&self, other: &Db) -> bool {
        ByAddress(&*self.shared.gateway) == ByAddress(&*other.shared.gateway)
    }
}
