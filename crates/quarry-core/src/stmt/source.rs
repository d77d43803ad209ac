use super::{QuerySpec, Value};

/// The dataset a query reads from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// A table or view, optionally aliased
    Table(SourceTable),

    /// A derived table: `(SELECT ..) AS alias`
    Query(SourceQuery),

    /// Caller-supplied SQL. `?` marks a parameter slot; `??` is a literal
    /// question mark.
    Raw(SourceRaw),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceTable {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceQuery {
    pub query: Box<QuerySpec>,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceRaw {
    pub sql: String,
    pub params: Vec<Value>,
    pub alias: String,
}

impl Source {
    pub fn table(name: impl Into<String>) -> Self {
        Self::Table(SourceTable {
            name: name.into(),
            alias: None,
        })
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::Table(SourceTable {
            name: name.into(),
            alias: Some(alias.into()),
        })
    }

    pub fn query(query: impl Into<QuerySpec>, alias: impl Into<String>) -> Self {
        Self::Query(SourceQuery {
            query: Box::new(query.into()),
            alias: alias.into(),
        })
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table(_))
    }

    pub fn as_table(&self) -> Option<&SourceTable> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// The name columns of this source are qualified with.
    pub fn qualifier(&self) -> &str {
        match self {
            Self::Table(table) => table.alias.as_deref().unwrap_or(&table.name),
            Self::Query(query) => &query.alias,
            Self::Raw(raw) => &raw.alias,
        }
    }

    /// The table name behind the source, if it reads a table directly.
    pub fn table_name(&self) -> Option<&str> {
        self.as_table().map(|table| &table.name[..])
    }

    /// Replaces the source's alias.
    pub fn with_alias(self, alias: impl Into<String>) -> Self {
        let alias = alias.into();

        match self {
            Self::Table(table) => Self::Table(SourceTable {
                name: table.name,
                alias: Some(alias),
            }),
            Self::Query(query) => Self::Query(SourceQuery {
                query: query.query,
                alias,
            }),
            Self::Raw(raw) => Self::Raw(SourceRaw { alias, ..raw }),
        }
    }
}

impl From<&str> for Source {
    fn from(value: &str) -> Self {
        Self::table(value)
    }
}

impl From<String> for Source {
    fn from(value: String) -> Self {
        Self::table(value)
    }
}
