use super::Relation;
use crate::Result;

use quarry_core::{
    driver::Row,
    stmt::{Expr, QuerySpec, Statement, Value},
    Error,
};

impl Relation {
    /// Runs the query and returns every row, with column values converted
    /// through the attribute types of the relation's schema.
    ///
    /// Without joins a value that fails conversion is an error. With joins,
    /// output names may belong to another relation, so such values are
    /// returned unconverted.
    pub async fn to_a(&self) -> Result<Vec<Row>> {
        self.run(self.spec.clone()).await
    }

    /// The first row in order, defaulting to primary key order.
    pub async fn first(&self) -> Result<Option<Row>> {
        let spec = self.ordered_spec();
        let limit = spec.limit.map_or(1, |limit| limit.min(1));

        Ok(self.run(spec.limit(limit)).await?.into_iter().next())
    }

    /// The last row in order, defaulting to primary key order.
    pub async fn last(&self) -> Result<Option<Row>> {
        let spec = self.ordered_spec();

        let spec = if spec.limit.is_some() || spec.offset.is_some() {
            let order = spec.order_by.clone();
            spec.from_self().order_by(order)
        } else {
            spec
        };

        Ok(self.run(spec.reverse().limit(1)).await?.into_iter().next())
    }

    /// Number of rows in the relation.
    pub async fn count(&self) -> Result<u64> {
        let value = self.aggregate(Expr::count_star()).await?;

        match value {
            Value::Null => Ok(0),
            value => Ok(u64::try_from(value.to_i64()?).unwrap_or(0)),
        }
    }

    pub async fn exists(&self) -> Result<bool> {
        let spec = self
            .base_for_aggregate()
            .select([Expr::value(1).alias("one")])
            .limit(1);

        Ok(!self.run(spec).await?.is_empty())
    }

    /// The values of one attribute across every row.
    pub async fn pluck(&self, attribute: &str) -> Result<Vec<Value>> {
        let expr = self.attr(attribute)?;
        let rows = self.run(self.spec.clone().select([expr])).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_values().into_iter().next())
            .collect())
    }

    pub async fn sum(&self, attribute: &str) -> Result<Value> {
        let expr = self.attr(attribute)?;
        self.aggregate(Expr::sum(expr)).await
    }

    pub async fn min(&self, attribute: &str) -> Result<Value> {
        let expr = self.attr(attribute)?;
        self.aggregate(Expr::min(expr)).await
    }

    pub async fn max(&self, attribute: &str) -> Result<Value> {
        let expr = self.attr(attribute)?;
        self.aggregate(Expr::max(expr)).await
    }

    pub async fn avg(&self, attribute: &str) -> Result<Value> {
        let expr = self.attr(attribute)?;
        self.aggregate(Expr::avg(expr)).await
    }

    /// Restricts the relation to the row with the given primary key.
    pub fn by_pk<T: Into<Value>>(&self, values: impl IntoIterator<Item = T>) -> Result<Relation> {
        let schema = self.schema()?;

        if schema.primary_key.is_empty() {
            return Err(Error::invalid_statement(format!(
                "`{}` has no primary key",
                self.name
            )));
        }

        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.restrict_to(&schema.primary_key, values)
    }

    /// The row with the given primary key. Fails with a record-not-found
    /// error when there is none.
    pub async fn fetch<T: Into<Value>>(&self, values: impl IntoIterator<Item = T>) -> Result<Row> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let relation = self.by_pk(values.iter().cloned())?;

        match relation.run(relation.spec.clone().limit(1)).await?.into_iter().next() {
            Some(row) => Ok(row),
            None => Err(Error::record_not_found(format!(
                "{} with primary key {values:?}",
                self.name
            ))),
        }
    }

    /// A single aggregate over the relation's rows.
    async fn aggregate(&self, expr: Expr) -> Result<Value> {
        let name = match &expr {
            Expr::Func(func) => func.name.clone(),
            _ => "value".to_string(),
        };

        let spec = self.base_for_aggregate().select([expr.alias(&name[..])]);
        let rows = self.run(spec).await?;

        Ok(rows
            .into_iter()
            .next()
            .and_then(|mut row| row.take(&name))
            .unwrap_or_default())
    }

    /// The spec aggregates are computed over. Row-shaping clauses keep their
    /// meaning by moving into a derived table.
    fn base_for_aggregate(&self) -> QuerySpec {
        let mut spec = self.spec.clone();
        spec.lock = None;

        if spec.is_shaped() {
            spec.from_self()
        } else {
            spec.unordered()
        }
    }

    pub(crate) async fn run(&self, spec: QuerySpec) -> Result<Vec<Row>> {
        let lenient = spec.has_joins();
        let response = self.db.execute(&Statement::Query(spec)).await?;
        self.read_rows(response.rows.into_values()?, lenient)
    }

    /// Converts returned values through the schema's attribute types,
    /// matching columns by output name.
    pub(super) fn read_rows(&self, rows: Vec<Row>, lenient: bool) -> Result<Vec<Row>> {
        // Raw SQL relations have no schema to read through
        let Ok(schema) = self.schema() else {
            return Ok(rows);
        };

        let dialect = self.db.dialect();

        rows.into_iter()
            .map(|row| {
                let columns = row.columns().to_vec();
                row.map_values(|(index, value)| {
                    let Some(attribute) = schema.attribute(&columns[index]) else {
                        return Ok(value);
                    };

                    if lenient {
                        Ok(attribute
                            .ty
                            .read(value.clone(), dialect)
                            .unwrap_or(value))
                    } else {
                        attribute.ty.read(value, dialect)
                    }
                })
            })
            .collect()
    }
}
