mod value;
pub(crate) use value::Value;

use quarry_core::{
    async_trait,
    driver::{classify, Capability, Compiled, Gateway, Response, Row},
    stmt, Error, Result,
};
use rusqlite::Connection;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::Mutex;
use url::Url;

/// A gateway over a single SQLite connection.
///
/// Statements are serialized through the connection; SQLite has no
/// concurrent writers to hand them to anyway.
#[derive(Debug)]
pub struct Sqlite {
    location: Location,
    connection: Mutex<Connection>,
}

#[derive(Debug, Clone, PartialEq)]
enum Location {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Opens the database named by a `sqlite:` connection URL.
    ///
    /// `sqlite::memory:` opens a fresh in-memory database; anything else
    /// is taken as a file path.
    pub fn connect(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url}")))?;

        if parsed.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={url}"
            )));
        }

        match parsed.path() {
            ":memory:" => Self::in_memory(),
            "" => Err(Error::invalid_connection_url(format!(
                "missing database path; url={url}"
            ))),
            path => Self::open(path),
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(Error::driver_operation_failed)?;
        Self::init(Location::InMemory, connection)
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let connection = Connection::open(&path).map_err(Error::driver_operation_failed)?;
        Self::init(Location::File(path), connection)
    }

    fn init(location: Location, connection: Connection) -> Result<Self> {
        connection
            .execute_batch("PRAGMA foreign_keys = ON")
            .map_err(Error::driver_operation_failed)?;

        log::debug!("opened sqlite database; location={location:?}");

        Ok(Self {
            location,
            connection: Mutex::new(connection),
        })
    }

    /// The file backing the database, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::InMemory => None,
        }
    }
}

#[async_trait]
impl Gateway for Sqlite {
    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn execute(&self, query: &Compiled) -> Result<Response> {
        let connection = self.connection.lock().await;
        let mut stmt = connection.prepare_cached(&query.sql).map_err(sqlite_error)?;

        let params = query.params.iter().map(Value).collect::<Vec<_>>();

        if !query.returns_rows {
            let count = stmt
                .execute(rusqlite::params_from_iter(params.iter()))
                .map_err(sqlite_error)?;

            return Ok(Response::count(count as u64));
        }

        let columns: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(sqlite_error)?;

        let mut ret = vec![];

        while let Some(row) = rows.next().map_err(sqlite_error)? {
            let mut values = Vec::with_capacity(columns.len());

            for index in 0..columns.len() {
                let value = row.get_ref(index).map_err(sqlite_error)?;
                values.push(value::from_sql(value)?);
            }

            ret.push(Row::new(columns.clone(), values));
        }

        Ok(Response::values(ret))
    }

    async fn run_ddl(&self, sql: &str) -> Result<()> {
        let connection = self.connection.lock().await;
        connection.execute_batch(sql).map_err(sqlite_error)
    }

    async fn call_function(&self, name: &str, args: &[stmt::Value]) -> Result<stmt::Value> {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::invalid_statement(format!(
                "invalid function name; name={name:?}"
            )));
        }

        let placeholders = (1..=args.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("SELECT {name}({placeholders})");

        let connection = self.connection.lock().await;
        let mut stmt = connection.prepare(&sql).map_err(sqlite_error)?;
        let params = args.iter().map(Value).collect::<Vec<_>>();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(sqlite_error)?;

        let value = match rows.next().map_err(sqlite_error)? {
            Some(row) => value::from_sql(row.get_ref(0).map_err(sqlite_error)?)?,
            None => stmt::Value::Null,
        };

        Ok(value)
    }
}

/// Maps a rusqlite error, classifying integrity violations.
fn sqlite_error(err: rusqlite::Error) -> Error {
    if let rusqlite::Error::SqliteFailure(code, Some(message)) = &err {
        if let Some(violation) = classify::sqlite(code.extended_code, message) {
            return Error::constraint_violation(violation);
        }
    }

    Error::driver_operation_failed(err)
}
