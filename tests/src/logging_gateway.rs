use quarry_core::{
    async_trait,
    driver::{Capability, Compiled, Gateway, Response},
    stmt::Value,
    Result,
};
use std::sync::{Arc, Mutex};

/// A gateway wrapper recording every statement it executes.
#[derive(Debug)]
pub struct LoggingGateway {
    /// The underlying gateway that actually executes statements
    inner: Arc<dyn Gateway>,

    /// Statements executed through this gateway, in order
    log: Arc<Mutex<Vec<Compiled>>>,
}

impl LoggingGateway {
    pub fn new(inner: Arc<dyn Gateway>) -> Self {
        Self {
            inner,
            log: Arc::default(),
        }
    }

    /// Get a handle to access the statement log
    pub fn log_handle(&self) -> Arc<Mutex<Vec<Compiled>>> {
        self.log.clone()
    }
}

#[async_trait]
impl Gateway for LoggingGateway {
    fn capability(&self) -> &'static Capability {
        self.inner.capability()
    }

    async fn execute(&self, query: &Compiled) -> Result<Response> {
        self.log
            .lock()
            .expect("Failed to acquire statement log lock")
            .push(query.clone());

        self.inner.execute(query).await
    }

    async fn run_ddl(&self, sql: &str) -> Result<()> {
        self.inner.run_ddl(sql).await
    }

    async fn call_function(&self, name: &str, args: &[Value]) -> Result<Value> {
        self.inner.call_function(name, args).await
    }
}
