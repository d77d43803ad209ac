use crate::{Relation, Result};

use quarry_core::{
    driver::{Row, Transaction},
    stmt::{Expr, Insert, QuerySpec},
    Error,
};
use std::pin::pin;
use tokio_stream::StreamExt;

/// How an import between databases is wrapped in transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportTransaction {
    /// Each insert commits on its own
    #[default]
    None,

    /// One transaction per inserted batch
    PerBatch,

    /// One transaction around the whole import
    Whole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Rows read from the source per round trip when copying between
    /// databases
    pub batch_size: usize,

    pub transaction: ImportTransaction,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            transaction: ImportTransaction::None,
        }
    }
}

impl ImportOptions {
    pub fn batch_size(self, batch_size: usize) -> Self {
        Self { batch_size, ..self }
    }

    pub fn transaction(self, transaction: ImportTransaction) -> Self {
        Self { transaction, ..self }
    }
}

impl Relation {
    /// Copies every row of `source` into this relation, using the options
    /// configured on the database. Returns the number of rows inserted.
    pub async fn import(&self, source: &Relation) -> Result<u64> {
        let options = self.db.import_options().clone();
        self.import_with(source, &options).await
    }

    /// Copies every row of `source` into this relation.
    ///
    /// Within one database this is a single `INSERT .. SELECT`. Across
    /// databases, rows are streamed out of the source in batches and
    /// inserted with multi-row inserts.
    pub async fn import_with(&self, source: &Relation, options: &ImportOptions) -> Result<u64> {
        if options.batch_size == 0 {
            return Err(Error::invalid_statement("import batch size must be positive"));
        }

        let (columns, query) = self.import_source(source)?;

        if self.db.same_gateway(&source.db) {
            let insert = Insert::select(&self.name[..], columns, query);
            let response = self.db.execute(&insert.into()).await?;
            let count = response.rows.count();

            log::debug!("imported {count} rows into `{}` from `{}`", self.name, source.name);
            return Ok(count);
        }

        let source = source.with_spec(query);

        if options.transaction == ImportTransaction::Whole {
            self.db.transaction(Transaction::begin()).await?;

            return match self.copy(&source, &columns, options).await {
                Ok(count) => {
                    self.db.transaction(Transaction::Commit).await?;
                    Ok(count)
                }
                Err(err) => match self.db.transaction(Transaction::Rollback).await {
                    Ok(()) => Err(err),
                    Err(rollback) => Err(err.context(rollback)),
                },
            };
        }

        self.copy(&source, &columns, options).await
    }

    /// Streams `source` out of its database and inserts it batch by batch.
    async fn copy(&self, source: &Relation, columns: &[String], options: &ImportOptions) -> Result<u64> {
        let keyed = source
            .schema()
            .is_ok_and(|schema| schema.single_primary_key().is_some());

        let mut imported = 0;

        if keyed {
            let mut batches = pin!(source.each_batch(options.batch_size as u64));

            while let Some(batch) = batches.next().await {
                let rows = batch?.to_a().await?;
                imported += self.insert_batch(columns, rows, options).await?;
            }
        } else {
            // Without a key to range over, pages are ordered by every
            // copied column
            let base = source.spec.clone().from_self();
            let projection: Vec<Expr> = columns
                .iter()
                .map(|name| Expr::qualified(base.qualifier(), &name[..]))
                .collect();
            let base = base
                .select(projection.clone())
                .order_by(projection.into_iter().map(Expr::asc));

            let size = options.batch_size as u64;
            let mut offset = 0;

            loop {
                let page = match offset {
                    0 => base.clone().limit(size),
                    offset => base.clone().limit(size).offset(offset),
                };

                let rows = source.with_spec(page).to_a().await?;
                let fetched = rows.len() as u64;
                imported += self.insert_batch(columns, rows, options).await?;

                if fetched < size {
                    break;
                }
                offset += size;
            }
        }

        log::debug!(
            "imported {imported} rows into `{}` from `{}` in another database",
            self.name,
            source.name
        );

        Ok(imported)
    }

    async fn insert_batch(&self, columns: &[String], rows: Vec<Row>, options: &ImportOptions) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let schema = self.schema()?;
        let dialect = self.db.dialect();

        let rows = rows
            .into_iter()
            .map(|row| {
                columns
                    .iter()
                    .zip(row.into_values())
                    .map(|(column, value)| {
                        let attribute = schema.attribute(column).ok_or_else(|| {
                            Error::invalid_statement(format!("`{column}` is not an attribute of `{}`", self.name))
                        })?;
                        Ok(Expr::Value(attribute.ty.write(value, dialect)?))
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        if options.transaction != ImportTransaction::PerBatch {
            return self.insert_rows(columns.to_vec(), rows).await;
        }

        self.db.transaction(Transaction::begin()).await?;

        match self.insert_rows(columns.to_vec(), rows).await {
            Ok(count) => {
                self.db.transaction(Transaction::Commit).await?;
                Ok(count)
            }
            Err(err) => match self.db.transaction(Transaction::Rollback).await {
                Ok(()) => Err(err),
                Err(rollback) => Err(err.context(rollback)),
            },
        }
    }

    /// The target columns and the source query producing them, in the same
    /// order.
    ///
    /// An explicit source projection maps onto target attributes by output
    /// name. The default projection copies the attributes both relations
    /// have.
    fn import_source(&self, source: &Relation) -> Result<(Vec<String>, QuerySpec)> {
        let target = self.schema()?;

        if !source.spec.projection.is_empty() {
            let columns = source
                .spec
                .projection
                .iter()
                .map(|expr| match expr.output_name() {
                    Some(name) if target.has_attribute(name) => Ok(name.to_string()),
                    Some(name) => Err(Error::invalid_statement(format!(
                        "`{name}` is not an attribute of `{}`",
                        self.name
                    ))),
                    None => Err(Error::invalid_statement(
                        "imported expressions must be named after target attributes",
                    )),
                })
                .collect::<Result<Vec<_>>>()?;

            return Ok((columns, source.spec.clone()));
        }

        let schema = source.schema()?;
        let columns: Vec<String> = schema
            .attribute_names()
            .filter(|name| target.has_attribute(name))
            .map(str::to_string)
            .collect();

        if columns.is_empty() {
            return Err(Error::invalid_statement(format!(
                "`{}` and `{}` have no attributes in common",
                source.name, self.name
            )));
        }

        let qualifier = source.qualifier();
        let query = source
            .spec
            .clone()
            .select(columns.iter().map(|name| Expr::qualified(qualifier, &name[..])));

        Ok((columns, query))
    }
}
