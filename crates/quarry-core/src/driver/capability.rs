use serde::{Deserialize, Serialize};

/// The SQL engine a statement is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgresql,
    Mysql,
    Sqlite,
}

#[derive(Debug)]
pub struct Capability {
    /// The dialect statements must be rendered in.
    pub dialect: Dialect,

    /// Supports `RETURNING` on insert, update and delete.
    pub returning: bool,

    /// Supports row-level locking (`FOR UPDATE`, `FOR SHARE`).
    pub select_for_update: bool,

    /// Array values can be bound and compared natively.
    pub native_arrays: bool,

    /// JSON values have a dedicated binary type on the wire.
    pub native_json: bool,

    /// Maximum number of bound parameters in a single statement.
    pub max_params: usize,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        dialect: Dialect::Sqlite,
        returning: true,
        select_for_update: false,
        native_arrays: false,
        native_json: false,

        // SQLITE_MAX_VARIABLE_NUMBER defaults to 32766 since 3.32.0
        max_params: 32_766,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        dialect: Dialect::Postgresql,
        select_for_update: true,
        native_arrays: true,
        native_json: true,

        // The wire protocol encodes the parameter count as an Int16.
        max_params: 65_535,
        ..Self::SQLITE
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        dialect: Dialect::Mysql,
        returning: false,
        select_for_update: true,
        max_params: 65_535,
        ..Self::SQLITE
    };

    pub fn for_dialect(dialect: Dialect) -> &'static Capability {
        match dialect {
            Dialect::Postgresql => &Self::POSTGRESQL,
            Dialect::Mysql => &Self::MYSQL,
            Dialect::Sqlite => &Self::SQLITE,
        }
    }
}

impl Dialect {
    pub fn is_postgresql(self) -> bool {
        matches!(self, Self::Postgresql)
    }

    pub fn is_mysql(self) -> bool {
        matches!(self, Self::Mysql)
    }

    pub fn is_sqlite(self) -> bool {
        matches!(self, Self::Sqlite)
    }

    pub fn capability(self) -> &'static Capability {
        Capability::for_dialect(self)
    }
}
