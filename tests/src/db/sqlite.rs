use quarry::Result;
use quarry_core::driver::{Capability, Gateway};

use std::sync::Arc;

use crate::Setup;

/// Every test gets its own in-memory database.
#[derive(Debug, Default)]
pub struct SetupSqlite;

impl SetupSqlite {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Setup for SetupSqlite {
    async fn gateway(&self) -> Result<Arc<dyn Gateway>> {
        quarry::db::connect("sqlite::memory:").await
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }
}
