use crate::Result;

use quarry_core::{driver::Gateway, Error};

use std::sync::Arc;
use url::Url;

/// Opens a gateway for `url`, picking the driver from the URL scheme.
///
/// Drivers are behind cargo features; a scheme whose driver is not compiled
/// in is an invalid connection URL.
pub async fn connect(url: &str) -> Result<Arc<dyn Gateway>> {
    // `sqlite::memory:` is not a valid URL
    let scheme = match Url::parse(url) {
        Ok(parsed) => parsed.scheme().to_string(),
        Err(_) if url.starts_with("sqlite:") => "sqlite".to_string(),
        Err(err) => {
            return Err(Error::invalid_connection_url(format!(
                "{err}; url={url}"
            )))
        }
    };

    match &scheme[..] {
        "postgresql" | "postgres" => connect_postgresql(url).await,
        "sqlite" => connect_sqlite(url),
        scheme => Err(Error::invalid_connection_url(format!(
            "unsupported database; scheme={scheme}; url={url}"
        ))),
    }
}

#[cfg(feature = "postgresql")]
async fn connect_postgresql(url: &str) -> Result<Arc<dyn Gateway>> {
    let gateway = quarry_driver_postgresql::PostgreSQL::connect(url).await?;
    Ok(Arc::new(gateway))
}

#[cfg(not(feature = "postgresql"))]
async fn connect_postgresql(_url: &str) -> Result<Arc<dyn Gateway>> {
    Err(Error::invalid_connection_url("`postgresql` feature not enabled"))
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &str) -> Result<Arc<dyn Gateway>> {
    let gateway = quarry_driver_sqlite::Sqlite::connect(url)?;
    Ok(Arc::new(gateway))
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &str) -> Result<Arc<dyn Gateway>> {
    Err(Error::invalid_connection_url("`sqlite` feature not enabled"))
}
