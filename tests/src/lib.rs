#[macro_use]
mod macros;

pub mod db;
mod exec_log;
pub mod fixtures;
mod isolation;
mod logging_gateway;
mod quarry_test;

pub use exec_log::ExecLog;
pub use fixtures::Fixture;
pub use quarry_test::QuarryTest;

use logging_gateway::LoggingGateway;
use quarry::{Db, Result};
use quarry_core::driver::{Capability, Gateway};

use std::sync::Arc;

#[async_trait::async_trait]
pub trait Setup: Send + Sync + 'static {
    /// Opens a gateway over a database with none of this test's relations
    /// in it yet.
    async fn gateway(&self) -> Result<Arc<dyn Gateway>>;

    fn capability(&self) -> &'static Capability;

    /// Drops whatever this test created. Called once the test finishes,
    /// whether or not it passed.
    async fn cleanup(&self) -> Result<()> {
        Ok(())
    }

    /// Creates `fixtures` and builds a `Db` inferring all of them.
    async fn connect(&self, fixtures: &[&Fixture]) -> (Db, ExecLog) {
        self.connect_with(fixtures, Db::builder()).await
    }

    /// Like [`Setup::connect`], with a pre-configured builder.
    async fn connect_with(&self, fixtures: &[&Fixture], mut builder: quarry::Builder) -> (Db, ExecLog) {
        let gateway = self.gateway().await.unwrap();
        let dialect = gateway.dialect();

        for fixture in fixtures {
            gateway.run_ddl(fixture.ddl(dialect)).await.unwrap();
        }

        let logging = LoggingGateway::new(gateway);
        let log = ExecLog::new(logging.log_handle());

        let db = builder.infer_all().build(logging).await.unwrap();
        log.clear();

        (db, log)
    }
}
