use super::Relation;
use crate::Result;

use quarry_core::{
    driver::Row,
    schema::Schema,
    stmt::{Assignment, Delete, Expr, Insert, OnConflict, QuerySpec, Statement, Update, Value},
    Error,
};

impl Relation {
    /// Inserts one row. Returns the stored row, with database defaults
    /// filled in, on dialects supporting `RETURNING`.
    pub async fn insert<K, V>(&self, row: impl IntoIterator<Item = (K, V)>) -> Result<Option<Row>>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let (columns, values) = self.write_row(row)?;
        let mut insert = Insert::values(&self.name[..], columns, vec![values]);

        let returning = self.db.gateway().capability().returning;
        if returning {
            insert = insert.returning(vec![]);
        }

        let response = self.db.execute(&insert.into()).await?;

        if !returning {
            return Ok(None);
        }

        let rows = self.read_rows(response.rows.into_values()?, false)?;
        Ok(rows.into_iter().next())
    }

    /// Inserts many rows sharing the same columns, split into as few
    /// statements as the gateway's parameter limit allows. Returns the
    /// number of rows inserted.
    pub async fn multi_insert<C, V>(
        &self,
        columns: impl IntoIterator<Item = C>,
        rows: impl IntoIterator<Item = Vec<V>>,
    ) -> Result<u64>
    where
        C: Into<String>,
        V: Into<Value>,
    {
        let schema = self.schema()?;
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        if columns.is_empty() {
            return Err(Error::invalid_statement("multi-row insert without columns"));
        }

        let rows = rows
            .into_iter()
            .map(|row| {
                if row.len() != columns.len() {
                    return Err(Error::invalid_statement(format!(
                        "row has {} values for {} columns",
                        row.len(),
                        columns.len()
                    )));
                }

                columns
                    .iter()
                    .zip(row)
                    .map(|(column, value)| write_value(schema, column, value.into(), self).map(Expr::Value))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        self.insert_rows(columns, rows).await
    }

    /// Inserts pre-converted rows in chunks bounded by the parameter limit.
    pub(crate) async fn insert_rows(&self, columns: Vec<String>, rows: Vec<Vec<Expr>>) -> Result<u64> {
        let max_params = self.db.gateway().capability().max_params;
        let chunk_size = (max_params / columns.len().max(1)).max(1);

        let mut inserted = 0;

        for chunk in rows.chunks(chunk_size) {
            let insert = Insert::values(&self.name[..], columns.clone(), chunk.to_vec());
            let response = self.db.execute(&insert.into()).await?;
            inserted += response.rows.count();
        }

        log::debug!("inserted {inserted} rows into `{}`", self.name);

        Ok(inserted)
    }

    /// Inserts one row, resolving a unique conflict as `on_conflict`
    /// directs. Returns the number of rows affected.
    pub async fn upsert<K, V>(&self, row: impl IntoIterator<Item = (K, V)>, on_conflict: OnConflict) -> Result<u64>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let (columns, values) = self.write_row(row)?;
        let schema = self.schema()?;

        if let Some(unknown) = on_conflict.target.iter().find(|a| !schema.has_attribute(a)) {
            return Err(Error::invalid_statement(format!(
                "conflict target `{unknown}` is not an attribute of `{}`",
                self.name
            )));
        }

        let insert = Insert::values(&self.name[..], columns, vec![values]).on_conflict(on_conflict);
        let response = self.db.execute(&insert.into()).await?;

        Ok(response.rows.count())
    }

    /// Updates every row of the relation. Returns the number of rows
    /// affected.
    pub async fn update<A: Into<Assignment>>(&self, assignments: impl IntoIterator<Item = A>) -> Result<u64> {
        let schema = self.schema()?;

        let assignments = assignments
            .into_iter()
            .map(|assignment| {
                let Assignment { column, value } = assignment.into();

                if !schema.has_attribute(&column) {
                    return Err(unknown_attribute(&self.name, &column));
                }

                let value = match value {
                    Expr::Value(value) => Expr::Value(write_value(schema, &column, value, self)?),
                    value => value,
                };

                Ok(Assignment { column, value })
            })
            .collect::<Result<Vec<_>>>()?;

        if assignments.is_empty() {
            return Ok(0);
        }

        let update = Update::new(&self.name[..], assignments).filter(self.write_scope()?);
        let response = self.db.execute(&update.into()).await?;

        Ok(response.rows.count())
    }

    /// Deletes every row of the relation. Returns the number of rows
    /// affected.
    pub async fn delete(&self) -> Result<u64> {
        let delete = Delete::new(&self.name[..]).filter(self.write_scope()?);
        let response = self.db.execute(&Statement::Delete(delete)).await?;

        Ok(response.rows.count())
    }

    /// The `WHERE` clause of an update or delete affecting exactly the rows
    /// of this relation.
    ///
    /// A plain filtered table uses its filter directly. Anything else
    /// restricts the primary key to the keys the relation selects, going
    /// through a derived table on MySQL, which rejects a subquery over the
    /// table being modified.
    fn write_scope(&self) -> Result<Option<Expr>> {
        let spec = &self.spec;

        let plain = spec.source.as_table().is_some_and(|table| table.alias.is_none())
            && !spec.has_joins()
            && spec.limit.is_none()
            && spec.offset.is_none()
            && spec.group_by.is_empty()
            && spec.having.is_none()
            && !spec.distinct
            && spec.set_ops.is_empty();

        if plain {
            return Ok(spec.filter.clone());
        }

        let schema = self.schema()?;

        if schema.primary_key.is_empty() {
            return Err(Error::invalid_statement(format!(
                "cannot scope a write to `{}` without a primary key",
                self.name
            )));
        }

        let qualifier = self.qualifier();

        let mut keys = spec
            .clone()
            .select(schema.primary_key.iter().map(|key| Expr::qualified(qualifier, &key[..])));
        keys.lock = None;

        if self.db.dialect().is_mysql() {
            keys = QuerySpec::from_query(keys, "quarry_scope")
                .select(schema.primary_key.iter().map(|key| Expr::col(&key[..])));
        }

        let target = Expr::record(schema.primary_key.iter().map(|key| Expr::col(&key[..])));
        Ok(Some(target.in_subquery(keys)))
    }

    /// Splits a row into columns and written values, rejecting attributes
    /// the relation does not have.
    fn write_row<K, V>(&self, row: impl IntoIterator<Item = (K, V)>) -> Result<(Vec<String>, Vec<Expr>)>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let schema = self.schema()?;
        let mut columns = vec![];
        let mut values = vec![];

        for (column, value) in row {
            let column = column.into();
            let value = write_value(schema, &column, value.into(), self)?;
            columns.push(column);
            values.push(Expr::Value(value));
        }

        if columns.is_empty() {
            return Err(Error::invalid_statement(format!(
                "insert into `{}` without values",
                self.name
            )));
        }

        Ok((columns, values))
    }
}

fn write_value(schema: &Schema, column: &str, value: Value, relation: &Relation) -> Result<Value> {
    let Some(attribute) = schema.attribute(column) else {
        return Err(unknown_attribute(&relation.name, column));
    };

    attribute.ty.write(value, relation.db.dialect())
}

fn unknown_attribute(relation: &str, column: &str) -> Error {
    Error::invalid_statement(format!("`{column}` is not an attribute of `{relation}`"))
}
