use super::Serializer;

use quarry_core::{driver::Dialect, schema::Catalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flavor {
    Postgresql,
    Sqlite,
    Mysql,
}

impl<'a> Serializer<'a> {
    pub fn sqlite(catalog: &'a Catalog) -> Serializer<'a> {
        Serializer {
            catalog,
            flavor: Flavor::Sqlite,
        }
    }

    pub fn postgresql(catalog: &'a Catalog) -> Serializer<'a> {
        Serializer {
            catalog,
            flavor: Flavor::Postgresql,
        }
    }

    pub fn mysql(catalog: &'a Catalog) -> Serializer<'a> {
        Serializer {
            catalog,
            flavor: Flavor::Mysql,
        }
    }

    pub fn for_dialect(catalog: &'a Catalog, dialect: Dialect) -> Serializer<'a> {
        match dialect {
            Dialect::Postgresql => Self::postgresql(catalog),
            Dialect::Sqlite => Self::sqlite(catalog),
            Dialect::Mysql => Self::mysql(catalog),
        }
    }

    pub fn dialect(&self) -> Dialect {
        match self.flavor {
            Flavor::Postgresql => Dialect::Postgresql,
            Flavor::Sqlite => Dialect::Sqlite,
            Flavor::Mysql => Dialect::Mysql,
        }
    }

    pub(super) fn is_postgresql(&self) -> bool {
        self.flavor == Flavor::Postgresql
    }

    pub(super) fn is_sqlite(&self) -> bool {
        self.flavor == Flavor::Sqlite
    }

    pub(super) fn is_mysql(&self) -> bool {
        self.flavor == Flavor::Mysql
    }
}
