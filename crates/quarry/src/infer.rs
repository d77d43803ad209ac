//! Schema inference from live database catalog metadata.
//!
//! Each dialect module issues catalog queries through the gateway, with the
//! relation name always bound as a parameter, and maps the result rows into
//! the dialect-neutral descriptions below. [`Inferrer::infer`] assembles those
//! into a [`SchemaBuilder`].

mod mysql;
mod postgresql;
mod sqlite;

use crate::Result;

use quarry_core::{
    driver::{Compiled, Dialect, Gateway, Row},
    err,
    schema::{Attribute, ForeignKey, Index, Schema, SchemaBuilder, TypeRegistry, UnknownTypePolicy},
    stmt::Value,
    Error,
};

/// Reads relation structure out of a database's catalog.
#[derive(Debug)]
pub struct Inferrer<'a> {
    gateway: &'a dyn Gateway,
    registry: &'a TypeRegistry,
    unknown_types: UnknownTypePolicy,
}

#[derive(Debug)]
struct ColumnInfo {
    name: String,
    native: String,
    nullable: bool,
    default: Option<String>,

    /// 1-based position in the primary key, when the dialect reports it
    /// per column
    primary_key: Option<i64>,
}

#[derive(Debug)]
struct IndexInfo {
    name: String,

    /// `None` entries are expressions rather than attributes
    attributes: Vec<Option<String>>,
    unique: bool,
    primary_key: bool,
    method: Option<String>,
    predicate: Option<String>,
}

#[derive(Debug)]
struct ForeignKeyInfo {
    name: Option<String>,
    attributes: Vec<String>,
    target: String,

    /// `None` entries reference the target's primary key
    target_attributes: Vec<Option<String>>,
}

impl<'a> Inferrer<'a> {
    pub fn new(gateway: &'a dyn Gateway, registry: &'a TypeRegistry) -> Self {
        Self {
            gateway,
            registry,
            unknown_types: UnknownTypePolicy::default(),
        }
    }

    pub fn unknown_types(self, policy: UnknownTypePolicy) -> Self {
        Self {
            unknown_types: policy,
            ..self
        }
    }

    fn dialect(&self) -> Dialect {
        self.gateway.dialect()
    }

    /// Names of every base table and view.
    pub async fn relations(&self) -> Result<Vec<String>> {
        match self.dialect() {
            Dialect::Postgresql => postgresql::relations(self).await,
            Dialect::Mysql => mysql::relations(self).await,
            Dialect::Sqlite => sqlite::relations(self).await,
        }
    }

    /// Infers the structure of one table or view.
    ///
    /// Fails with a relation-not-found error when the relation does not
    /// exist. Index and foreign key rows that cannot be used (expression
    /// indexes, attributes the relation does not have) are skipped with a
    /// warning.
    pub async fn infer(&self, name: &str) -> Result<SchemaBuilder> {
        let dialect = self.dialect();

        let view = match dialect {
            Dialect::Postgresql => postgresql::kind(self, name).await?,
            Dialect::Mysql => mysql::kind(self, name).await?,
            Dialect::Sqlite => sqlite::kind(self, name).await?,
        };

        let Some(view) = view else {
            return Err(Error::relation_not_found(name));
        };

        let (columns, indexes, foreign_keys) = match dialect {
            Dialect::Postgresql => (
                postgresql::columns(self, name).await?,
                postgresql::indexes(self, name).await?,
                postgresql::foreign_keys(self, name).await?,
            ),
            Dialect::Mysql => (
                mysql::columns(self, name).await?,
                mysql::indexes(self, name).await?,
                mysql::foreign_keys(self, name).await?,
            ),
            Dialect::Sqlite => (
                sqlite::columns(self, name).await?,
                sqlite::indexes(self, name).await?,
                sqlite::foreign_keys(self, name).await?,
            ),
        };

        let mut builder = Schema::builder(name).view(view);

        for column in &columns {
            let ty = self
                .registry
                .resolve_or(&column.native, dialect, self.unknown_types)
                .map_err(|e| e.context(err!("failed to infer `{name}.{}`", column.name)))?;

            builder = builder.attribute(
                Attribute::new(name, &column.name[..], ty)
                    .nullable(column.nullable)
                    .default_value(column.default.clone()),
            );
        }

        let mut primary_key: Vec<_> = columns
            .iter()
            .filter_map(|column| Some((column.primary_key?, column.name.clone())))
            .filter(|(position, _)| *position > 0)
            .collect();
        primary_key.sort();
        let mut primary_key: Vec<_> = primary_key.into_iter().map(|(_, name)| name).collect();

        for info in indexes {
            let Some(attributes) = info
                .attributes
                .iter()
                .map(|attribute| attribute.clone().filter(|a| builder.has_attribute(a)))
                .collect::<Option<Vec<_>>>()
            else {
                log::warn!(
                    "skipping index `{}` on `{name}`; it covers an expression or an unknown attribute",
                    info.name
                );
                continue;
            };

            // Key lookups go through `by_pk`, so the key's own index is not
            // kept as a restriction
            if info.primary_key {
                if primary_key.is_empty() {
                    primary_key = attributes;
                }
                continue;
            }

            let index = Index::new(&info.name[..], attributes)
                .unique(info.unique)
                .method(info.method)
                .predicate(info.predicate);

            builder = builder.index(index);
        }

        builder = builder.primary_key(primary_key);

        for info in foreign_keys {
            if let Some(unknown) = info.attributes.iter().find(|a| !builder.has_attribute(a)) {
                log::warn!(
                    "skipping foreign key from `{name}` to `{}`; unknown attribute `{unknown}`",
                    info.target
                );
                continue;
            }

            let target_attributes: Vec<_> = info.target_attributes.into_iter().flatten().collect();

            let mut foreign_key = ForeignKey::new(info.attributes, info.target, target_attributes);
            if let Some(constraint) = info.name {
                foreign_key = foreign_key.named(constraint);
            }

            builder = builder.foreign_key(foreign_key);
        }

        log::debug!("inferred `{name}`; columns={}", columns.len());

        Ok(builder)
    }

    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Row>> {
        let response = self.gateway.execute(&Compiled::query(sql, params)).await?;
        response.rows.into_values()
    }
}

/// Splits rows ordered by `key` into runs sharing the same key.
fn group_by<K: PartialEq>(rows: Vec<Row>, key: impl Fn(&Row) -> Result<K>) -> Result<Vec<Vec<Row>>> {
    let mut groups: Vec<(K, Vec<Row>)> = vec![];

    for row in rows {
        let k = key(&row)?;
        match groups.last_mut() {
            Some((last, group)) if *last == k => group.push(row),
            _ => groups.push((k, vec![row])),
        }
    }

    Ok(groups.into_iter().map(|(_, group)| group).collect())
}

fn column<'r>(row: &'r Row, name: &str) -> Result<&'r Value> {
    row.get(name)
        .ok_or_else(|| err!("catalog query returned no `{name}` column"))
}

fn opt_string(row: &Row, name: &str) -> Result<Option<String>> {
    match column(row, name)? {
        Value::Null => Ok(None),
        Value::String(value) => Ok(Some(value.clone())),
        Value::Bytes(value) => match String::from_utf8(value.clone()) {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(Error::type_conversion(Value::Bytes(value.clone()), "string")),
        },
        value => Err(Error::type_conversion(value.clone(), "string")),
    }
}

fn string(row: &Row, name: &str) -> Result<String> {
    opt_string(row, name)?.ok_or_else(|| err!("catalog column `{name}` is null"))
}

fn opt_int(row: &Row, name: &str) -> Result<Option<i64>> {
    match column(row, name)? {
        Value::Null => Ok(None),
        Value::String(value) => match value.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(Error::type_conversion(Value::String(value.clone()), "i64")),
        },
        value => value.to_i64().map(Some),
    }
}

/// Catalogs report flags as booleans, integers or `YES`/`NO` text.
fn flag(row: &Row, name: &str) -> Result<bool> {
    match column(row, name)? {
        Value::Null => Ok(false),
        Value::Bool(value) => Ok(*value),
        Value::I32(value) => Ok(*value != 0),
        Value::I64(value) => Ok(*value != 0),
        Value::String(value) => match &value.to_ascii_lowercase()[..] {
            "yes" | "y" | "t" | "true" | "1" => Ok(true),
            "no" | "n" | "f" | "false" | "0" => Ok(false),
            _ => Err(Error::type_conversion(Value::String(value.clone()), "bool")),
        },
        value => Err(Error::type_conversion(value.clone(), "bool")),
    }
}
