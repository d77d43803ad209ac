use quarry::{Error, Result};
use quarry_core::driver::{Capability, Gateway};

use std::sync::Arc;

use crate::{isolation::TestIsolation, Setup};

/// Every test gets its own schema, set as the connection's search path.
pub struct SetupPostgreSQL {
    isolation: TestIsolation,
}

impl SetupPostgreSQL {
    pub fn new() -> Self {
        Self {
            isolation: TestIsolation::new(),
        }
    }
}

impl Default for SetupPostgreSQL {
    fn default() -> Self {
        Self::new()
    }
}

fn url() -> String {
    std::env::var("QUARRY_TEST_POSTGRES_URL")
        .unwrap_or_else(|_| "postgresql://localhost:5432/quarry_test".to_string())
}

#[async_trait::async_trait]
impl Setup for SetupPostgreSQL {
    async fn gateway(&self) -> Result<Arc<dyn Gateway>> {
        let gateway = quarry::db::connect(&url()).await?;
        let schema = self.isolation.schema_name();

        gateway
            .run_ddl(&format!(
                "CREATE SCHEMA IF NOT EXISTS \"{schema}\"; SET search_path TO \"{schema}\""
            ))
            .await?;

        Ok(gateway)
    }

    fn capability(&self) -> &'static Capability {
        &Capability::POSTGRESQL
    }

    async fn cleanup(&self) -> Result<()> {
        use tokio_postgres::NoTls;

        let (client, connection) = tokio_postgres::connect(&url(), NoTls)
            .await
            .map_err(Error::driver_operation_failed)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("PostgreSQL connection error during cleanup: {e}");
            }
        });

        let schema = self.isolation.schema_name();
        client
            .batch_execute(&format!("DROP SCHEMA IF EXISTS \"{schema}\" CASCADE"))
            .await
            .map_err(Error::driver_operation_failed)
    }
}
